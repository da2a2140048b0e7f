//! The engine context: every piece of mutable state behind the host entry points.

use xnz_traits::{CommandPhase, FlightLoop, Host, Overlay, PropertyHandle};

use crate::axes::{table_len, AxisCapture};
use crate::builder::{check_calibration, check_shares};
use crate::commands::{CommandOutcome, CommandRouter, XnzCommand};
use crate::config::{CalibrationCfg, EngineCfg};
use crate::curves;
use crate::detect::{self, Binder};
use crate::dispatch::{self, TickOutcome};
use crate::error::{Result, XnzError};
use crate::hysteresis::IdleHold;
use crate::nullzones::{self, mps_to_kts, Nullzones};
use crate::overlay::{OverlayInputs, OverlayModel};
use crate::paths::sim;
use crate::profile::{AircraftProfile, Capability, ThrottleOutput};
use crate::reverse::{self, ModeCommands, ReverseStep};
use crate::zones::ZoneModel;

/// Oldest plugin API with array properties and per-loop scheduling.
pub const MIN_API_VERSION: i32 = 210;
/// Nullzone and overlay callback period.
pub const NULLZONE_INTERVAL_S: f32 = 1.0 / 20.0;

/// Host notifications the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMessage {
    WillWritePrefs,
    PlaneLoaded { user: bool },
    PlaneUnloaded { user: bool },
    LiveryLoaded { user: bool },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProfileLifecycle {
    #[default]
    Unloaded,
    Detecting,
    Bound(Box<AircraftProfile>),
}

/// Aircraft-independent handles bound at enable.
#[derive(Debug, Clone)]
struct BaseHandles {
    axis_assignments: PropertyHandle,
    axis_values: PropertyHandle,
    nullzones: [PropertyHandle; 3],
    groundspeed: PropertyHandle,
    airspeed: PropertyHandle,
    on_ground: Option<PropertyHandle>,
    ice: Vec<PropertyHandle>,
}

impl BaseHandles {
    fn bind(host: &dyn Host) -> std::result::Result<Self, XnzError> {
        let mut b = Binder::new(host);
        Ok(Self {
            axis_assignments: b.property(sim::AXIS_ASSIGNMENTS)?,
            axis_values: b.property(sim::AXIS_VALUES)?,
            nullzones: b.properties([sim::NULLZONE_PITCH, sim::NULLZONE_ROLL, sim::NULLZONE_YAW])?,
            groundspeed: b.property(sim::GROUNDSPEED)?,
            airspeed: b.property(sim::AIRSPEED)?,
            on_ground: host.find_property(sim::ON_GROUND),
            ice: sim::ICE.iter().filter_map(|p| host.find_property(p)).collect(),
        })
    }

    fn read_nullzones(&self, host: &dyn Host) -> Nullzones {
        let [pitch, roll, yaw] = self.nullzones.map(|h| host.get_f32(h));
        Nullzones { pitch, roll, yaw }
    }

    fn write_nullzones(&self, host: &mut dyn Host, nz: Nullzones) {
        let [pitch, roll, yaw] = self.nullzones;
        host.set_f32(pitch, nz.pitch);
        host.set_f32(roll, nz.roll);
        host.set_f32(yaw, nz.yaw);
    }
}

pub struct Engine<H: Host, O: Overlay> {
    host: H,
    overlay: O,
    cfg: EngineCfg,
    zones: ZoneModel,
    base: Option<BaseHandles>,
    lifecycle: ProfileLifecycle,
    axes: AxisCapture,
    idle_hold: IdleHold,
    throttle_enabled: bool,
    /// No hardware position seen since the engine was enabled.
    awaiting_input: bool,
    router: CommandRouter,
    overlay_model: OverlayModel,
    saved_nullzones: Option<Nullzones>,
    last_outcome: Option<TickOutcome>,
}

impl<H: Host, O: Overlay> core::fmt::Debug for Engine<H, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("enabled", &self.base.is_some())
            .field("profile", &self.profile().map(|p| p.name))
            .field("axes", &self.axes)
            .field("throttle_enabled", &self.throttle_enabled)
            .field("last_outcome", &self.last_outcome)
            .finish_non_exhaustive()
    }
}

impl<H: Host, O: Overlay> Engine<H, O> {
    pub(crate) fn from_parts(host: H, overlay: O, cfg: EngineCfg) -> Self {
        let zones = ZoneModel::recompute(&cfg.calibration).with_shares(&cfg.shares);
        Self {
            host,
            overlay,
            zones,
            base: None,
            lifecycle: ProfileLifecycle::Unloaded,
            axes: AxisCapture::new(cfg.axes),
            idle_hold: IdleHold::new(cfg.throttle.idle_hold_ticks),
            throttle_enabled: cfg.throttle.enabled,
            awaiting_input: true,
            router: CommandRouter::new(cfg.brakes.clone()),
            overlay_model: OverlayModel::new(cfg.overlay),
            saved_nullzones: None,
            last_outcome: None,
            cfg,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Bind the aircraft-independent handles and start the nullzone loop.
    /// The only entry point that can fail; the shim refuses to load on error.
    pub fn enable(&mut self) -> Result<()> {
        let versions = self.host.versions();
        if versions.api < MIN_API_VERSION {
            return Err(eyre::Report::new(XnzError::UnsupportedHost(format!(
                "plugin API {} is older than {MIN_API_VERSION}",
                versions.api
            ))));
        }
        let base = BaseHandles::bind(&self.host)?;
        self.saved_nullzones = Some(base.read_nullzones(&self.host));
        self.base = Some(base);
        self.awaiting_input = true;
        self.host.set_loop_interval(FlightLoop::Nullzones, NULLZONE_INTERVAL_S);
        tracing::info!(
            simulator = versions.simulator,
            api = versions.api,
            throttle = self.throttle_enabled,
            "engine enabled"
        );
        Ok(())
    }

    pub fn disable(&mut self) {
        self.unload_aircraft();
        if let Some(base) = self.base.take() {
            if let Some(saved) = self.saved_nullzones.take() {
                base.write_nullzones(&mut self.host, saved);
            }
        }
        self.host.set_loop_interval(FlightLoop::Nullzones, 0.0);
        self.overlay.hide();
        self.overlay_model.reset();
        tracing::info!("engine disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.base.is_some()
    }

    pub fn handle_message(&mut self, msg: HostMessage) {
        tracing::debug!(?msg, "host message");
        match msg {
            HostMessage::WillWritePrefs => {
                if let Some(base) = &self.base {
                    self.axes.release_for_save(&mut self.host, base.axis_assignments);
                    // The next flight loop puts the schedule back.
                    if let Some(saved) = self.saved_nullzones {
                        base.write_nullzones(&mut self.host, saved);
                    }
                }
            }
            HostMessage::PlaneLoaded { user: true } | HostMessage::PlaneUnloaded { user: true } => {
                self.unload_aircraft();
            }
            HostMessage::LiveryLoaded { user: true } => {
                if !matches!(self.lifecycle, ProfileLifecycle::Bound(_)) {
                    self.bind_aircraft();
                }
            }
            HostMessage::PlaneLoaded { user: false }
            | HostMessage::PlaneUnloaded { user: false }
            | HostMessage::LiveryLoaded { user: false } => {}
        }
    }

    fn bind_aircraft(&mut self) {
        let interval = self.throttle_interval();
        let Some(base) = &self.base else {
            return;
        };
        self.lifecycle = ProfileLifecycle::Detecting;
        let profile = detect::detect(&self.host);

        self.zones
            .assign_shares(&profile.shares.unwrap_or(self.cfg.shares));
        let len = table_len(self.host.versions().simulator);
        if self
            .axes
            .find_axis_pair(&self.host, base.axis_assignments, len)
            .is_some()
            && profile.throttle.is_supported()
        {
            if self.throttle_enabled {
                self.axes.capture(&mut self.host, base.axis_assignments);
            }
            self.host.set_loop_interval(FlightLoop::Throttle, interval);
        }
        self.idle_hold.reset();
        self.lifecycle = ProfileLifecycle::Bound(Box::new(profile));
    }

    fn unload_aircraft(&mut self) {
        if let ProfileLifecycle::Bound(profile) = &self.lifecycle {
            self.router.release_all(&mut self.host, profile);
        }
        if let Some(base) = &self.base {
            self.axes.release(&mut self.host, base.axis_assignments);
        }
        self.axes.forget();
        self.host.set_loop_interval(FlightLoop::Throttle, 0.0);
        self.zones.assign_shares(&self.cfg.shares);
        self.lifecycle = ProfileLifecycle::Unloaded;
        self.last_outcome = None;
    }

    /// Menu toggle for lever mapping.
    pub fn set_throttle_enabled(&mut self, on: bool) {
        if self.throttle_enabled == on {
            return;
        }
        self.throttle_enabled = on;
        let interval = self.throttle_interval();
        let supported = self.profile().is_some_and(|p| p.throttle.is_supported());
        let Some(base) = &self.base else {
            return;
        };
        if on {
            if supported && self.axes.capture(&mut self.host, base.axis_assignments) {
                self.host.set_loop_interval(FlightLoop::Throttle, interval);
            }
        } else {
            self.axes.release(&mut self.host, base.axis_assignments);
            self.host.set_loop_interval(FlightLoop::Throttle, 0.0);
        }
        self.idle_hold.reset();
        tracing::info!(enabled = on, "lever mapping toggled");
    }

    /// Apply new detent positions without reloading the aircraft.
    pub fn recalibrate(&mut self, calibration: CalibrationCfg) -> Result<()> {
        check_calibration(&calibration)?;
        let shares = self.profile().and_then(|p| p.shares).unwrap_or(self.cfg.shares);
        check_shares(&shares)?;
        self.cfg.calibration = calibration;
        self.zones = ZoneModel::recompute(&calibration).with_shares(&shares);
        self.idle_hold.reset();
        tracing::info!(
            idle = calibration.idle,
            climb = calibration.climb,
            flex = calibration.flex,
            deadband = calibration.deadband,
            "detents recalibrated"
        );
        Ok(())
    }

    // ── Periodic callbacks ───────────────────────────────────────────────────

    fn throttle_interval(&self) -> f32 {
        1.0 / self.cfg.throttle.rate_hz as f32
    }

    /// Lever-mapping callback. Returns the next interval; `0.0` stops the loop.
    pub fn throttle_loop(&mut self, _elapsed_s: f32) -> f32 {
        match self.throttle_tick() {
            TickOutcome::Disabled => 0.0,
            _ => self.throttle_interval(),
        }
    }

    /// One pass of read, map, suppress, resolve and write.
    pub fn throttle_tick(&mut self) -> TickOutcome {
        let outcome = self.tick_inner();
        if self.last_outcome != Some(outcome) {
            tracing::trace!(?outcome, "throttle tick");
        }
        self.last_outcome = Some(outcome);
        outcome
    }

    fn tick_inner(&mut self) -> TickOutcome {
        let (Some(base), ProfileLifecycle::Bound(profile)) = (&self.base, &self.lifecycle) else {
            return TickOutcome::Disabled;
        };
        let Some(index) = self.axes.index() else {
            return TickOutcome::Disabled;
        };
        if !self.throttle_enabled || !profile.throttle.is_supported() {
            return TickOutcome::Disabled;
        }
        if self.axes.take_recapture() || !self.axes.is_captured() {
            self.axes.capture(&mut self.host, base.axis_assignments);
        }

        if profile.autothrottle.is_driving(&self.host) {
            self.idle_hold.reset();
            let display = dispatch::display_value(&self.host, &profile.throttle).unwrap_or(0.0);
            return TickOutcome::AutothrottleActive { display };
        }

        let mut raw = [0.0f32; 2];
        if self.host.get_f32s(base.axis_values, index, &mut raw) < 2 {
            return TickOutcome::AwaitingInput;
        }
        if self.awaiting_input {
            let db = self.cfg.calibration.deadband;
            if raw.iter().any(|v| *v < db) {
                return TickOutcome::AwaitingInput;
            }
            self.awaiting_input = false;
            tracing::debug!(left = raw[0], right = raw[1], "first lever input");
        }

        let (merged, symmetric) =
            dispatch::merge_symmetric(raw, profile.asymmetric, self.cfg.throttle.sync_band);
        let invert = self.cfg.calibration.invert;
        let mapped = merged.map(|v| {
            let v = if invert { 1.0 - v } else { v };
            curves::map(v, &self.zones, profile.curve)
        });

        let (current, n) = dispatch::read_back(&self.host, &profile.throttle);
        if self.idle_hold.observe(mapped, &current[..n]) {
            return TickOutcome::Skipped;
        }

        let values = match &profile.throttle {
            ThrottleOutput::Generic {
                prop_mode,
                reverse_all,
                reverse,
                ..
            } => {
                let cmds = ModeCommands {
                    prop_mode: *prop_mode,
                    reverse_all: *reverse_all,
                    reverse,
                    capability: &profile.reverse,
                };
                match reverse::resolve(&mut self.host, &cmds, mapped, symmetric) {
                    ReverseStep::Toggled(commands) => return TickOutcome::ModeToggled { commands },
                    ReverseStep::Write(values) => values,
                }
            }
            _ => mapped,
        };

        if !dispatch::write(&mut self.host, &profile.throttle, values, symmetric) {
            return TickOutcome::Disabled;
        }
        TickOutcome::Written { values, symmetric }
    }

    /// Nullzone and readout callback. Returns the next interval.
    pub fn flight_loop(&mut self, elapsed_s: f32) -> f32 {
        let Some(base) = &self.base else {
            return 0.0;
        };
        let profile = match &self.lifecycle {
            ProfileLifecycle::Bound(p) => Some(&**p),
            ProfileLifecycle::Unloaded | ProfileLifecycle::Detecting => None,
        };
        let airspeed_kts = self.host.get_f32(base.airspeed);
        let groundspeed_kts = mps_to_kts(self.host.get_f32(base.groundspeed));

        if self.cfg.nullzones.enabled {
            let servos_on = profile.is_some_and(|p| p.autopilot.servos_on(&self.host));
            let nz =
                nullzones::schedule(&self.cfg.nullzones, airspeed_kts, groundspeed_kts, servos_on);
            base.write_nullzones(&mut self.host, nz);
        }

        if self.cfg.overlay.enabled {
            let throttle = profile
                .and_then(|p| dispatch::display_value(&self.host, &p.throttle))
                .unwrap_or(0.0);
            let ice: Vec<f32> = base.ice.iter().map(|h| self.host.get_f32(*h)).collect();
            let inputs = OverlayInputs {
                elapsed_s,
                throttle,
                ice: &ice,
                groundspeed_kts,
                on_ground: base.on_ground.is_some_and(|h| self.host.get_i32(h) != 0),
                autothrottle_active: profile.is_some_and(|p| p.autothrottle.is_driving(&self.host)),
                captured: self.axes.is_captured(),
                suppress_change: self.awaiting_input
                    || matches!(self.last_outcome, Some(TickOutcome::Skipped)),
            };
            let frame = self.overlay_model.update(&inputs);
            if let Some(text) = frame.speak {
                self.host.speak(text);
            }
            match frame.view.text() {
                Some(text) => self.overlay.show(text),
                None if self.overlay.is_visible() => self.overlay.hide(),
                None => {}
            }
        }
        NULLZONE_INTERVAL_S
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    pub fn handle_command(&mut self, cmd: XnzCommand, phase: CommandPhase) -> CommandOutcome {
        let (Some(base), ProfileLifecycle::Bound(profile)) = (&self.base, &self.lifecycle) else {
            return CommandOutcome::Unsupported;
        };
        let groundspeed_kts = mps_to_kts(self.host.get_f32(base.groundspeed));
        self.router
            .handle(&mut self.host, profile, groundspeed_kts, cmd, phase)
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn profile(&self) -> Option<&AircraftProfile> {
        match &self.lifecycle {
            ProfileLifecycle::Bound(p) => Some(p),
            ProfileLifecycle::Unloaded | ProfileLifecycle::Detecting => None,
        }
    }

    pub fn lifecycle(&self) -> &ProfileLifecycle {
        &self.lifecycle
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn zones(&self) -> &ZoneModel {
        &self.zones
    }

    pub fn axes(&self) -> &AxisCapture {
        &self.axes
    }

    pub fn cfg(&self) -> &EngineCfg {
        &self.cfg
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    pub fn is_throttle_enabled(&self) -> bool {
        self.throttle_enabled
    }

    pub fn last_outcome(&self) -> Option<TickOutcome> {
        self.last_outcome
    }
}
