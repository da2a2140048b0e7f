//! Runtime configuration for the engine.
//!
//! Separate from the TOML-deserialized structs in `xnz_config`; see
//! `conversions` for the bridge.

/// Detent centers in mapped input space plus the deadband around each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationCfg {
    pub idle: f32,
    pub climb: f32,
    pub flex: f32,
    pub deadband: f32,
    /// Flip raw axis values (`1 - raw`) before mapping.
    pub invert: bool,
}

impl Default for CalibrationCfg {
    fn default() -> Self {
        Self {
            idle: 0.28,
            climb: 0.52,
            flex: 0.72,
            deadband: 0.04,
            invert: true,
        }
    }
}

/// Cumulative output levels at the top of the climb, flex and takeoff zones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharesCfg {
    pub climb: f32,
    pub flex: f32,
    pub takeoff: f32,
}

impl Default for SharesCfg {
    fn default() -> Self {
        Self {
            climb: 0.5,
            flex: 0.75,
            takeoff: 1.0,
        }
    }
}

/// Axis-assignment IDs the quadrant levers are bound to in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisCfg {
    pub first_id: i32,
    pub second_id: i32,
}

impl Default for AxisCfg {
    fn default() -> Self {
        Self {
            first_id: 26,
            second_id: 27,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleCfg {
    pub enabled: bool,
    /// Mapping tick rate.
    pub rate_hz: u32,
    /// Levers closer than this are treated as one.
    pub sync_band: f32,
    /// Idle ticks written before further idle writes are skipped.
    pub idle_hold_ticks: u8,
}

impl Default for ThrottleCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            rate_hz: 20,
            sync_band: 0.075,
            idle_hold_ticks: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NullzoneCfg {
    pub enabled: bool,
    pub minimum: f32,
    pub autopilot: f32,
    pub pitch_roll_max: f32,
    pub yaw_max: f32,
    pub airspeed_min_kts: f32,
    pub airspeed_max_kts: f32,
    pub groundspeed_min_kts: f32,
    pub groundspeed_max_kts: f32,
}

impl Default for NullzoneCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum: 0.04,
            autopilot: 0.5,
            pitch_roll_max: 0.125,
            yaw_max: 0.25,
            airspeed_min_kts: 50.0,
            airspeed_max_kts: 62.5,
            groundspeed_min_kts: 3.125,
            groundspeed_max_kts: 31.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrakeCfg {
    /// `(above_kts, ratio)`; sorted descending by threshold at build.
    pub bands: Vec<(f32, f32)>,
    pub stationary_kts: f32,
}

impl Default for BrakeCfg {
    fn default() -> Self {
        Self {
            bands: vec![(26.25, 0.75), (2.5, 0.5), (0.0, 0.25)],
            stationary_kts: 1.0,
        }
    }
}

impl BrakeCfg {
    /// First band whose threshold is at or below `groundspeed_kts`; the
    /// lowest band otherwise.
    pub fn ratio_for(&self, groundspeed_kts: f32) -> f32 {
        self.bands
            .iter()
            .find(|(kts, _)| groundspeed_kts >= *kts)
            .or(self.bands.last())
            .map_or(1.0, |(_, ratio)| *ratio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayCfg {
    pub enabled: bool,
    pub throttle_secs: f32,
    pub throttle_secs_captured: f32,
    pub ice_check_secs: f32,
    pub ice_on: f32,
    pub ice_off: f32,
    pub taxi_min_kts: f32,
    pub taxi_max_kts: f32,
}

impl Default for OverlayCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            throttle_secs: 3.0,
            throttle_secs_captured: 1.5,
            ice_check_secs: 10.0,
            ice_on: 0.04,
            ice_off: 0.02,
            taxi_min_kts: 2.5,
            taxi_max_kts: 50.0,
        }
    }
}

/// All runtime settings, as handed to the builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineCfg {
    pub calibration: CalibrationCfg,
    pub shares: SharesCfg,
    pub axes: AxisCfg,
    pub throttle: ThrottleCfg,
    pub nullzones: NullzoneCfg,
    pub brakes: BrakeCfg,
    pub overlay: OverlayCfg,
}
