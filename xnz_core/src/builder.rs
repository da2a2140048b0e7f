//! Type-state builder for [`Engine`].
//!
//! `build()` only exists once a host has been supplied; the overlay defaults
//! to [`NoOverlay`]. All configuration checks live in `validate_and_build`.

use xnz_traits::{Host, NoOverlay, Overlay};

use crate::config::*;
use crate::engine::Engine;
use crate::error::{BuildError, Result};

// ── Type-state markers ───────────────────────────────────────────────────────

/// No host supplied yet.
pub struct Missing;

/// Builder for `Engine`. All fields are validated on `build()`.
pub struct EngineBuilder<H, O> {
    host: H,
    overlay: O,
    calibration: Option<CalibrationCfg>,
    shares: Option<SharesCfg>,
    axes: Option<AxisCfg>,
    throttle: Option<ThrottleCfg>,
    nullzones: Option<NullzoneCfg>,
    brakes: Option<BrakeCfg>,
    overlay_cfg: Option<OverlayCfg>,
}

impl Default for EngineBuilder<Missing, NoOverlay> {
    fn default() -> Self {
        Self {
            host: Missing,
            overlay: NoOverlay,
            calibration: None,
            shares: None,
            axes: None,
            throttle: None,
            nullzones: None,
            brakes: None,
            overlay_cfg: None,
        }
    }
}

impl EngineBuilder<Missing, NoOverlay> {
    pub fn new() -> Self {
        Self::default()
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

/// Detent layout must leave room for every zone plus its deadband gaps.
pub(crate) fn check_calibration(cal: &CalibrationCfg) -> Result<()> {
    xnz_config::check_detents(&xnz_config::CalibrationCfg::from(cal)).map_err(invalid)
}

pub(crate) fn check_shares(shares: &SharesCfg) -> Result<()> {
    let ordered = 0.0 <= shares.climb
        && shares.climb <= shares.flex
        && shares.flex <= shares.takeoff
        && shares.takeoff <= 1.0;
    if !ordered {
        return Err(invalid("shares must satisfy 0 <= climb <= flex <= takeoff <= 1"));
    }
    Ok(())
}

fn validate_and_build<H: Host, O: Overlay>(
    host: H,
    overlay: O,
    mut cfg: EngineCfg,
) -> Result<Engine<H, O>> {
    // ── Validation ───────────────────────────────────────────────────────────
    check_calibration(&cfg.calibration)?;
    check_shares(&cfg.shares)?;
    if cfg.axes.first_id <= 0 || cfg.axes.second_id <= 0 {
        return Err(invalid("axis ids must be > 0"));
    }
    if cfg.axes.first_id == cfg.axes.second_id {
        return Err(invalid("axis ids must differ"));
    }
    if !(1..=200).contains(&cfg.throttle.rate_hz) {
        return Err(invalid("throttle rate_hz must be within 1..=200"));
    }
    if !(0.0..=0.5).contains(&cfg.throttle.sync_band) {
        return Err(invalid("sync_band must be within [0, 0.5]"));
    }
    if cfg.throttle.idle_hold_ticks == 0 {
        return Err(invalid("idle_hold_ticks must be >= 1"));
    }
    let nz = &cfg.nullzones;
    let in_unit = |v: f32| (0.0..=1.0).contains(&v);
    if ![nz.minimum, nz.autopilot, nz.pitch_roll_max, nz.yaw_max]
        .into_iter()
        .all(in_unit)
    {
        return Err(invalid("nullzone values must be within [0, 1]"));
    }
    if nz.minimum > nz.pitch_roll_max || nz.minimum > nz.yaw_max {
        return Err(invalid("nullzone minimum must not exceed the maxima"));
    }
    if nz.airspeed_min_kts >= nz.airspeed_max_kts
        || nz.groundspeed_min_kts >= nz.groundspeed_max_kts
    {
        return Err(invalid("nullzone speed ranges must be increasing"));
    }
    if cfg.brakes.bands.is_empty() {
        return Err(invalid("at least one brake band is required"));
    }
    for (kts, ratio) in &cfg.brakes.bands {
        if !kts.is_finite() || *kts < 0.0 {
            return Err(invalid("brake band threshold must be finite and >= 0"));
        }
        if !in_unit(*ratio) {
            return Err(invalid("brake band ratio must be within [0, 1]"));
        }
    }
    if cfg.overlay.ice_check_secs <= 0.0 {
        return Err(invalid("ice_check_secs must be > 0"));
    }
    if cfg.overlay.ice_off > cfg.overlay.ice_on {
        return Err(invalid("ice_off must not exceed ice_on"));
    }

    // ── Precompute ───────────────────────────────────────────────────────────
    cfg.brakes.bands.sort_by(|a, b| b.0.total_cmp(&a.0));
    Ok(Engine::from_parts(host, overlay, cfg))
}

/// Chainable setters that do not affect type-state.
impl<H, O> EngineBuilder<H, O> {
    /// Take every section from a runtime config at once.
    pub fn with_config(mut self, cfg: EngineCfg) -> Self {
        self.calibration = Some(cfg.calibration);
        self.shares = Some(cfg.shares);
        self.axes = Some(cfg.axes);
        self.throttle = Some(cfg.throttle);
        self.nullzones = Some(cfg.nullzones);
        self.brakes = Some(cfg.brakes);
        self.overlay_cfg = Some(cfg.overlay);
        self
    }
    pub fn with_calibration(mut self, calibration: CalibrationCfg) -> Self {
        self.calibration = Some(calibration);
        self
    }
    pub fn with_shares(mut self, shares: SharesCfg) -> Self {
        self.shares = Some(shares);
        self
    }
    pub fn with_axes(mut self, axes: AxisCfg) -> Self {
        self.axes = Some(axes);
        self
    }
    pub fn with_throttle(mut self, throttle: ThrottleCfg) -> Self {
        self.throttle = Some(throttle);
        self
    }
    pub fn with_nullzones(mut self, nullzones: NullzoneCfg) -> Self {
        self.nullzones = Some(nullzones);
        self
    }
    pub fn with_brakes(mut self, brakes: BrakeCfg) -> Self {
        self.brakes = Some(brakes);
        self
    }
    pub fn with_overlay_cfg(mut self, overlay: OverlayCfg) -> Self {
        self.overlay_cfg = Some(overlay);
        self
    }

    /// Attach the on-screen readout.
    pub fn with_overlay<O2: Overlay>(self, overlay: O2) -> EngineBuilder<H, O2> {
        EngineBuilder {
            host: self.host,
            overlay,
            calibration: self.calibration,
            shares: self.shares,
            axes: self.axes,
            throttle: self.throttle,
            nullzones: self.nullzones,
            brakes: self.brakes,
            overlay_cfg: self.overlay_cfg,
        }
    }
}

// Setter that advances type-state
impl<O> EngineBuilder<Missing, O> {
    pub fn with_host<H: Host>(self, host: H) -> EngineBuilder<H, O> {
        EngineBuilder {
            host,
            overlay: self.overlay,
            calibration: self.calibration,
            shares: self.shares,
            axes: self.axes,
            throttle: self.throttle,
            nullzones: self.nullzones,
            brakes: self.brakes,
            overlay_cfg: self.overlay_cfg,
        }
    }
}

impl<H: Host, O: Overlay> EngineBuilder<H, O> {
    /// Validate and build the engine. Only available once a host is set.
    pub fn build(self) -> Result<Engine<H, O>> {
        let cfg = EngineCfg {
            calibration: self.calibration.unwrap_or_default(),
            shares: self.shares.unwrap_or_default(),
            axes: self.axes.unwrap_or_default(),
            throttle: self.throttle.unwrap_or_default(),
            nullzones: self.nullzones.unwrap_or_default(),
            brakes: self.brakes.unwrap_or_default(),
            overlay: self.overlay_cfg.unwrap_or_default(),
        };
        validate_and_build(self.host, self.overlay, cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_calibration_passes() {
        assert!(check_calibration(&CalibrationCfg::default()).is_ok());
        assert!(check_shares(&SharesCfg::default()).is_ok());
    }

    #[test]
    fn wide_deadband_is_rejected() {
        let cal = CalibrationCfg {
            deadband: 0.11,
            ..CalibrationCfg::default()
        };
        let err = check_calibration(&cal).unwrap_err();
        assert!(err.to_string().contains("deadband"));
    }

    #[test]
    fn unordered_shares_are_rejected() {
        let shares = SharesCfg {
            climb: 0.9,
            flex: 0.8,
            takeoff: 1.0,
        };
        assert!(check_shares(&shares).is_err());
    }
}
