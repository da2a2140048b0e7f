//! `From` implementations bridging `xnz_config` types to `xnz_core` types.

use crate::config::{
    AxisCfg, BrakeCfg, CalibrationCfg, EngineCfg, NullzoneCfg, OverlayCfg, SharesCfg, ThrottleCfg,
};

// ── CalibrationCfg ───────────────────────────────────────────────────────────

impl From<&xnz_config::CalibrationCfg> for CalibrationCfg {
    fn from(c: &xnz_config::CalibrationCfg) -> Self {
        Self {
            idle: c.idle,
            climb: c.climb,
            flex: c.flex,
            deadband: c.deadband,
            invert: c.invert,
        }
    }
}

impl From<&CalibrationCfg> for xnz_config::CalibrationCfg {
    fn from(c: &CalibrationCfg) -> Self {
        Self {
            idle: c.idle,
            climb: c.climb,
            flex: c.flex,
            deadband: c.deadband,
            invert: c.invert,
        }
    }
}

// ── SharesCfg ────────────────────────────────────────────────────────────────

impl From<&xnz_config::SharesCfg> for SharesCfg {
    fn from(c: &xnz_config::SharesCfg) -> Self {
        Self {
            climb: c.climb,
            flex: c.flex,
            takeoff: c.takeoff,
        }
    }
}

// ── AxisCfg ──────────────────────────────────────────────────────────────────

impl From<&xnz_config::AxesCfg> for AxisCfg {
    fn from(c: &xnz_config::AxesCfg) -> Self {
        Self {
            first_id: c.first_axis_id,
            second_id: c.second_axis_id,
        }
    }
}

// ── ThrottleCfg ──────────────────────────────────────────────────────────────

impl From<&xnz_config::ThrottleCfg> for ThrottleCfg {
    fn from(c: &xnz_config::ThrottleCfg) -> Self {
        Self {
            enabled: c.enabled,
            rate_hz: c.rate_hz,
            sync_band: c.sync_band,
            idle_hold_ticks: c.idle_hold_ticks,
        }
    }
}

// ── NullzoneCfg ──────────────────────────────────────────────────────────────

impl From<&xnz_config::NullzonesCfg> for NullzoneCfg {
    fn from(c: &xnz_config::NullzonesCfg) -> Self {
        Self {
            enabled: c.enabled,
            minimum: c.minimum,
            autopilot: c.autopilot,
            pitch_roll_max: c.pitch_roll_max,
            yaw_max: c.yaw_max,
            airspeed_min_kts: c.airspeed_min_kts,
            airspeed_max_kts: c.airspeed_max_kts,
            groundspeed_min_kts: c.groundspeed_min_kts,
            groundspeed_max_kts: c.groundspeed_max_kts,
        }
    }
}

// ── BrakeCfg ─────────────────────────────────────────────────────────────────

impl From<&xnz_config::BrakesCfg> for BrakeCfg {
    fn from(c: &xnz_config::BrakesCfg) -> Self {
        Self {
            bands: c.bands.clone(),
            stationary_kts: c.stationary_kts,
        }
    }
}

// ── OverlayCfg ───────────────────────────────────────────────────────────────

impl From<&xnz_config::OverlayCfg> for OverlayCfg {
    fn from(c: &xnz_config::OverlayCfg) -> Self {
        Self {
            enabled: c.enabled,
            throttle_secs: c.throttle_secs,
            throttle_secs_captured: c.throttle_secs_captured,
            ice_check_secs: c.ice_check_secs,
            ice_on: c.ice_on,
            ice_off: c.ice_off,
            taxi_min_kts: c.taxi_min_kts,
            taxi_max_kts: c.taxi_max_kts,
        }
    }
}

// ── EngineCfg ────────────────────────────────────────────────────────────────

impl From<&xnz_config::Config> for EngineCfg {
    fn from(c: &xnz_config::Config) -> Self {
        Self {
            calibration: (&c.calibration).into(),
            shares: (&c.shares).into(),
            axes: (&c.axes).into(),
            throttle: (&c.throttle).into(),
            nullzones: (&c.nullzones).into(),
            brakes: (&c.brakes).into(),
            overlay: (&c.overlay).into(),
        }
    }
}
