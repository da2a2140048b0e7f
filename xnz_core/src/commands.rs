//! Custom commands and their begin/continue/end handling.

use xnz_traits::{CommandHandle, CommandPhase, Host, PropertyHandle};

use crate::config::BrakeCfg;
use crate::profile::{AircraftProfile, Autobrake, EngineStart, WheelBrakes};

/// Magneto switch positions: OFF, R, L, BOTH, START.
pub const MAGNETO_BOTH: i32 = 3;
pub const MAGNETO_START: i32 = 4;
/// Highest host autobrake level (RTO = 0, OFF = 1).
pub const AUTOBRAKE_MAX_LEVEL: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XnzCommand {
    BrakesRegular,
    BrakesMaximum,
    BrakesRegularAndPark,
    ParkBrakeToggle,
    EngineStart(usize),
    IgnitionOn(usize),
    IgnitionOff(usize),
    MixtureRun(usize),
    MixtureCutoff(usize),
    Toga,
    AutobrakeUp,
    AutobrakeDown,
}

impl XnzCommand {
    /// Every command the host should register, for two engines.
    pub fn all() -> Vec<XnzCommand> {
        let mut out = vec![
            XnzCommand::BrakesRegular,
            XnzCommand::BrakesMaximum,
            XnzCommand::BrakesRegularAndPark,
            XnzCommand::ParkBrakeToggle,
            XnzCommand::Toga,
            XnzCommand::AutobrakeUp,
            XnzCommand::AutobrakeDown,
        ];
        for n in 0..2 {
            out.extend([
                XnzCommand::EngineStart(n),
                XnzCommand::IgnitionOn(n),
                XnzCommand::IgnitionOff(n),
                XnzCommand::MixtureRun(n),
                XnzCommand::MixtureCutoff(n),
            ]);
        }
        out
    }

    /// Host command path, engines numbered from 1.
    pub fn path(&self) -> String {
        match self {
            XnzCommand::BrakesRegular => "xnz/brakes/regular".into(),
            XnzCommand::BrakesMaximum => "xnz/brakes/maximum".into(),
            XnzCommand::BrakesRegularAndPark => "xnz/brakes/regular_and_park".into(),
            XnzCommand::ParkBrakeToggle => "xnz/brakes/park_toggle".into(),
            XnzCommand::EngineStart(n) => format!("xnz/engines/start_{}", n + 1),
            XnzCommand::IgnitionOn(n) => format!("xnz/engines/ignition_on_{}", n + 1),
            XnzCommand::IgnitionOff(n) => format!("xnz/engines/ignition_off_{}", n + 1),
            XnzCommand::MixtureRun(n) => format!("xnz/engines/mixture_run_{}", n + 1),
            XnzCommand::MixtureCutoff(n) => format!("xnz/engines/mixture_cutoff_{}", n + 1),
            XnzCommand::Toga => "xnz/autothrottle/toga".into(),
            XnzCommand::AutobrakeUp => "xnz/autobrake/up".into(),
            XnzCommand::AutobrakeDown => "xnz/autobrake/down".into(),
        }
    }
}

impl std::str::FromStr for XnzCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        XnzCommand::all()
            .into_iter()
            .find(|c| c.path() == s)
            .ok_or_else(|| format!("unknown command '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Handled,
    /// Phase or state does not apply (e.g. `End` for a hold that is not active).
    Ignored,
    /// The aircraft has nothing to drive for this command.
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrakeKind {
    Regular,
    Maximum,
    /// `repark`: the aircraft was stationary when pressed.
    RegularAndPark { repark: bool },
}

impl BrakeKind {
    fn command(self) -> XnzCommand {
        match self {
            BrakeKind::Regular => XnzCommand::BrakesRegular,
            BrakeKind::Maximum => XnzCommand::BrakesMaximum,
            BrakeKind::RegularAndPark { .. } => XnzCommand::BrakesRegularAndPark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrakeHold {
    #[default]
    Idle,
    Active(BrakeKind),
}

/// Signed number of magneto pulses from `current` to `target`; positive is up.
pub fn magneto_pulses(current: i32, target: i32) -> i32 {
    target.clamp(0, MAGNETO_START) - current.clamp(0, MAGNETO_START)
}

#[derive(Debug, Clone)]
pub struct CommandRouter {
    brakes: BrakeCfg,
    hold: BrakeHold,
    /// Lit autobrake button for push-button panels (0 = none).
    autobrake_step: usize,
}

impl CommandRouter {
    pub fn new(mut brakes: BrakeCfg) -> Self {
        brakes.bands.sort_by(|a, b| b.0.total_cmp(&a.0));
        Self {
            brakes,
            hold: BrakeHold::Idle,
            autobrake_step: 0,
        }
    }

    pub fn hold(&self) -> BrakeHold {
        self.hold
    }

    pub fn handle(
        &mut self,
        host: &mut dyn Host,
        profile: &AircraftProfile,
        groundspeed_kts: f32,
        cmd: XnzCommand,
        phase: CommandPhase,
    ) -> CommandOutcome {
        let outcome = match cmd {
            XnzCommand::BrakesRegular => {
                self.brake(host, profile, groundspeed_kts, BrakeKind::Regular, phase)
            }
            XnzCommand::BrakesMaximum => {
                self.brake(host, profile, groundspeed_kts, BrakeKind::Maximum, phase)
            }
            XnzCommand::BrakesRegularAndPark => {
                let kind = BrakeKind::RegularAndPark {
                    repark: groundspeed_kts < self.brakes.stationary_kts,
                };
                self.brake(host, profile, groundspeed_kts, kind, phase)
            }
            XnzCommand::ParkBrakeToggle => on_begin(phase, || {
                if profile.park_brake.toggle(host) {
                    CommandOutcome::Handled
                } else {
                    CommandOutcome::Unsupported
                }
            }),
            XnzCommand::EngineStart(n) => engine_start(host, &profile.engine_start, n, phase),
            XnzCommand::IgnitionOn(n) => {
                on_begin(phase, || ignition(host, &profile.engine_start, n, true))
            }
            XnzCommand::IgnitionOff(n) => {
                on_begin(phase, || ignition(host, &profile.engine_start, n, false))
            }
            XnzCommand::MixtureRun(n) => {
                on_begin(phase, || mixture(host, &profile.engine_start, n, true))
            }
            XnzCommand::MixtureCutoff(n) => {
                on_begin(phase, || mixture(host, &profile.engine_start, n, false))
            }
            XnzCommand::Toga => on_begin(phase, || match profile.autothrottle.toga() {
                Some(cmd) => {
                    host.command_once(cmd);
                    CommandOutcome::Handled
                }
                None => CommandOutcome::Unsupported,
            }),
            XnzCommand::AutobrakeUp => {
                on_begin(phase, || self.autobrake(host, &profile.autobrake, true))
            }
            XnzCommand::AutobrakeDown => {
                on_begin(phase, || self.autobrake(host, &profile.autobrake, false))
            }
        };
        if outcome == CommandOutcome::Unsupported {
            tracing::debug!(
                command = %cmd.path(),
                ?phase,
                profile = profile.name,
                "command unsupported"
            );
        }
        outcome
    }

    /// Let go of any held brake, e.g. on unload or disable.
    pub fn release_all(&mut self, host: &mut dyn Host, profile: &AircraftProfile) {
        if let BrakeHold::Active(kind) = self.hold {
            release_brakes(host, &profile.wheel_brakes, kind);
            self.hold = BrakeHold::Idle;
        }
        self.autobrake_step = 0;
    }

    fn brake(
        &mut self,
        host: &mut dyn Host,
        profile: &AircraftProfile,
        groundspeed_kts: f32,
        kind: BrakeKind,
        phase: CommandPhase,
    ) -> CommandOutcome {
        if !matches!(
            profile.wheel_brakes,
            WheelBrakes::Ratios { .. } | WheelBrakes::HeldCommands { .. }
        ) {
            return CommandOutcome::Unsupported;
        }
        let active = match self.hold {
            BrakeHold::Active(k) if k.command() == kind.command() => Some(k),
            _ => None,
        };
        match phase {
            CommandPhase::Begin => {
                if let BrakeHold::Active(previous) = self.hold {
                    release_brakes(host, &profile.wheel_brakes, previous);
                }
                if matches!(kind, BrakeKind::RegularAndPark { .. })
                    && profile.park_brake.is_set(host)
                {
                    profile.park_brake.set(host, false);
                }
                self.hold = BrakeHold::Active(kind);
                self.apply_brakes(host, &profile.wheel_brakes, kind, groundspeed_kts, true);
                tracing::debug!(?kind, groundspeed_kts, "brake hold started");
                CommandOutcome::Handled
            }
            CommandPhase::Continue => match active {
                Some(k) => {
                    self.apply_brakes(host, &profile.wheel_brakes, k, groundspeed_kts, false);
                    CommandOutcome::Handled
                }
                None => CommandOutcome::Ignored,
            },
            CommandPhase::End => match active {
                Some(k) => {
                    release_brakes(host, &profile.wheel_brakes, k);
                    self.hold = BrakeHold::Idle;
                    if let BrakeKind::RegularAndPark { repark: true } = k {
                        profile.park_brake.set(host, true);
                    }
                    tracing::debug!(kind = ?k, "brake hold released");
                    CommandOutcome::Handled
                }
                None => CommandOutcome::Ignored,
            },
        }
    }

    fn apply_brakes(
        &self,
        host: &mut dyn Host,
        brakes: &WheelBrakes,
        kind: BrakeKind,
        groundspeed_kts: f32,
        begin: bool,
    ) {
        match brakes {
            WheelBrakes::Ratios { left, right } => {
                let ratio = match kind {
                    BrakeKind::Maximum => 1.0,
                    BrakeKind::Regular | BrakeKind::RegularAndPark { .. } => {
                        self.brakes.ratio_for(groundspeed_kts)
                    }
                };
                host.set_f32(*left, ratio);
                host.set_f32(*right, ratio);
            }
            WheelBrakes::HeldCommands { regular, maximum } if begin => {
                host.command_begin(held(kind, *regular, *maximum));
            }
            _ => {}
        }
    }

    fn autobrake(
        &mut self,
        host: &mut dyn Host,
        autobrake: &Autobrake,
        up: bool,
    ) -> CommandOutcome {
        match autobrake {
            Autobrake::Generic { level } => {
                let current = host.get_i32(*level);
                let next = if up {
                    (current + 1).min(AUTOBRAKE_MAX_LEVEL)
                } else {
                    (current - 1).max(0)
                };
                host.set_i32(*level, next);
            }
            Autobrake::Buttons { settings } => {
                if up && self.autobrake_step < settings.len() {
                    self.autobrake_step += 1;
                    host.command_once(settings[self.autobrake_step - 1]);
                } else if !up && self.autobrake_step > 0 {
                    // pressing the lit button again switches it off
                    let press = self.autobrake_step.saturating_sub(2);
                    host.command_once(settings[press]);
                    self.autobrake_step -= 1;
                }
            }
            Autobrake::Knob { up: knob_up, down } => {
                host.command_once(if up { *knob_up } else { *down });
            }
            Autobrake::Unset | Autobrake::Unsupported => return CommandOutcome::Unsupported,
        }
        CommandOutcome::Handled
    }
}

fn on_begin(phase: CommandPhase, f: impl FnOnce() -> CommandOutcome) -> CommandOutcome {
    match phase {
        CommandPhase::Begin => f(),
        CommandPhase::Continue | CommandPhase::End => CommandOutcome::Ignored,
    }
}

fn held(kind: BrakeKind, regular: CommandHandle, maximum: CommandHandle) -> CommandHandle {
    match kind {
        BrakeKind::Maximum => maximum,
        BrakeKind::Regular | BrakeKind::RegularAndPark { .. } => regular,
    }
}

fn release_brakes(host: &mut dyn Host, brakes: &WheelBrakes, kind: BrakeKind) {
    match brakes {
        WheelBrakes::Ratios { left, right } => {
            host.set_f32(*left, 0.0);
            host.set_f32(*right, 0.0);
        }
        WheelBrakes::HeldCommands { regular, maximum } => {
            host.command_end(held(kind, *regular, *maximum));
        }
        WheelBrakes::Unset | WheelBrakes::Unsupported => {}
    }
}

fn read_element(host: &dyn Host, property: PropertyHandle, engine: usize) -> i32 {
    let mut v = [0i32; 1];
    host.get_i32s(property, engine, &mut v);
    v[0]
}

fn pulse_magnetos(
    host: &mut dyn Host,
    up: CommandHandle,
    down: CommandHandle,
    position: PropertyHandle,
    engine: usize,
    target: i32,
) {
    let pulses = magneto_pulses(read_element(host, position, engine), target);
    let cmd = if pulses > 0 { up } else { down };
    for _ in 0..pulses.unsigned_abs() {
        host.command_once(cmd);
    }
}

fn engine_start(
    host: &mut dyn Host,
    start: &EngineStart,
    engine: usize,
    phase: CommandPhase,
) -> CommandOutcome {
    if engine > 1 {
        return CommandOutcome::Unsupported;
    }
    match (start, phase) {
        (EngineStart::Unset | EngineStart::Unsupported, _) => CommandOutcome::Unsupported,
        (_, CommandPhase::Continue) => CommandOutcome::Handled,
        (EngineStart::Generic { starters, .. }, CommandPhase::Begin) => {
            host.command_begin(starters[engine]);
            CommandOutcome::Handled
        }
        (EngineStart::Generic { starters, .. }, CommandPhase::End) => {
            host.command_end(starters[engine]);
            CommandOutcome::Handled
        }
        (
            EngineStart::Magnetos {
                up, down, position, ..
            },
            CommandPhase::Begin,
        ) => {
            // step to BOTH, then hold up into the spring-loaded START position
            pulse_magnetos(host, up[engine], down[engine], *position, engine, MAGNETO_BOTH);
            host.command_begin(up[engine]);
            CommandOutcome::Handled
        }
        (EngineStart::Magnetos { up, .. }, CommandPhase::End) => {
            host.command_end(up[engine]);
            CommandOutcome::Handled
        }
        (
            EngineStart::Toliss {
                master_on,
                mode_start,
                ..
            },
            CommandPhase::Begin,
        ) => {
            host.command_once(*mode_start);
            host.command_once(master_on[engine]);
            CommandOutcome::Handled
        }
        (EngineStart::Toliss { .. }, CommandPhase::End) => CommandOutcome::Handled,
        (EngineStart::Tbm900 { starter, .. }, CommandPhase::Begin) => {
            host.command_begin(*starter);
            CommandOutcome::Handled
        }
        (EngineStart::Tbm900 { starter, .. }, CommandPhase::End) => {
            host.command_end(*starter);
            CommandOutcome::Handled
        }
    }
}

fn ignition(host: &mut dyn Host, start: &EngineStart, engine: usize, on: bool) -> CommandOutcome {
    if engine > 1 {
        return CommandOutcome::Unsupported;
    }
    match start {
        EngineStart::Generic { ignition_key, .. } => {
            host.set_i32s(*ignition_key, engine, &[if on { MAGNETO_BOTH } else { 0 }]);
        }
        EngineStart::Magnetos {
            up, down, position, ..
        } => {
            let target = if on { MAGNETO_BOTH } else { 0 };
            pulse_magnetos(host, up[engine], down[engine], *position, engine, target);
        }
        EngineStart::Toliss {
            mode_start,
            mode_norm,
            ..
        } => host.command_once(if on { *mode_start } else { *mode_norm }),
        EngineStart::Tbm900 { ignition, .. } => host.set_i32(*ignition, if on { 2 } else { 0 }),
        EngineStart::Unset | EngineStart::Unsupported => return CommandOutcome::Unsupported,
    }
    CommandOutcome::Handled
}

fn mixture(host: &mut dyn Host, start: &EngineStart, engine: usize, run: bool) -> CommandOutcome {
    if engine > 1 {
        return CommandOutcome::Unsupported;
    }
    match start {
        EngineStart::Generic { mixture, .. } | EngineStart::Magnetos { mixture, .. } => {
            host.set_f32s(*mixture, engine, &[if run { 1.0 } else { 0.0 }]);
        }
        EngineStart::Toliss {
            master_on,
            master_off,
            ..
        } => host.command_once(if run { master_on[engine] } else { master_off[engine] }),
        EngineStart::Tbm900 { .. } | EngineStart::Unset | EngineStart::Unsupported => {
            return CommandOutcome::Unsupported;
        }
    }
    CommandOutcome::Handled
}
