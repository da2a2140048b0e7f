#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and detent calibration parsing for the lever adapter.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The detent CSV loader enforces headers and averages repeated samples
//!   per detent before producing calibrated detent centers.
use serde::Deserialize;
use serde::de::Deserializer;

/// Detent calibration CSV schema.
///
/// Expected headers:
/// detent,raw
///
/// Example:
/// detent,raw
/// idle,0.7203
/// idle,0.7198
/// climb,0.4810
/// flex,0.2795
#[derive(Debug, Deserialize, Clone)]
pub struct DetentRow {
    pub detent: String,
    pub raw: f32,
}

/// Lever geometry: detent centers in mapped input space (0 = full reverse,
/// 1 = full forward) and the deadband around each.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct CalibrationCfg {
    pub idle: f32,
    pub climb: f32,
    pub flex: f32,
    pub deadband: f32,
    /// Hardware reports 1.0 at the aft stop (Thrustmaster TCA); flip before mapping.
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

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct AxesCfg {
    /// Host axis-assignment ID of the left lever (26 = prop 3).
    pub first_axis_id: i32,
    /// Host axis-assignment ID of the right lever (27 = prop 4).
    pub second_axis_id: i32,
}

impl Default for AxesCfg {
    fn default() -> Self {
        Self {
            first_axis_id: 26,
            second_axis_id: 27,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ThrottleCfg {
    /// Start with lever mapping enabled (the menu toggle can change it at runtime)
    pub enabled: bool,
    pub rate_hz: u32,
    /// Levers closer than this are merged into one symmetric input
    pub sync_band: f32,
    /// Consecutive idle ticks before idle writes are suppressed
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

/// Cumulative output levels reached at the top of the climb, flex and
/// takeoff ranges for continuous curves.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
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

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct NullzonesCfg {
    pub enabled: bool,
    /// Smallest nullzone ever applied (fast flight / fast taxi)
    pub minimum: f32,
    /// Applied on all axes while autopilot servos are engaged
    pub autopilot: f32,
    pub pitch_roll_max: f32,
    pub yaw_max: f32,
    pub airspeed_min_kts: f32,
    pub airspeed_max_kts: f32,
    pub groundspeed_min_kts: f32,
    pub groundspeed_max_kts: f32,
}

impl Default for NullzonesCfg {
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

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BrakesCfg {
    /// Regular-brake pressure table. Accepts either:
    /// - array of tables: [{ above_kts = 26.25, ratio = 0.75 }, ...]
    /// - array of tuples: [[26.25, 0.75], [2.5, 0.5], ...]
    #[serde(deserialize_with = "de_brake_bands")]
    pub bands: Vec<(f32, f32)>,
    /// Below this groundspeed the aircraft counts as stationary for re-parking
    pub stationary_kts: f32,
}

impl Default for BrakesCfg {
    fn default() -> Self {
        Self {
            bands: vec![(26.25, 0.75), (2.5, 0.5), (0.0, 0.25)],
            stationary_kts: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct OverlayCfg {
    pub enabled: bool,
    /// How long a throttle change stays on screen
    pub throttle_secs: f32,
    /// Same, while the lever axes are captured (changes are continuous)
    pub throttle_secs_captured: f32,
    pub ice_check_secs: f32,
    /// Any ice ratio above this raises the ICE readout
    pub ice_on: f32,
    /// All ice ratios below this clear it
    pub ice_off: f32,
    /// Groundspeed readout window while taxiing
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

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub calibration: CalibrationCfg,
    pub axes: AxesCfg,
    pub throttle: ThrottleCfg,
    /// Default shares for continuous curves; aircraft profiles may override
    pub shares: SharesCfg,
    pub nullzones: NullzonesCfg,
    pub brakes: BrakesCfg,
    pub overlay: OverlayCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BandToml {
    Tuple((f32, f32)),
    Table { above_kts: f32, ratio: f32 },
}

fn de_brake_bands<'de, D>(deserializer: D) -> Result<Vec<(f32, f32)>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<Vec<BandToml>> = Option::deserialize(deserializer)?;
    let mut out = Vec::new();
    if let Some(items) = opt {
        for b in items {
            match b {
                BandToml::Tuple((kts, ratio)) => out.push((kts, ratio)),
                BandToml::Table { above_kts, ratio } => out.push((above_kts, ratio)),
            }
        }
    }
    Ok(out)
}

/// Averaged detent centers measured on the physical quadrant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetentCalibration {
    pub idle: f32,
    pub climb: f32,
    pub flex: f32,
}

impl DetentCalibration {
    /// Average samples per detent. Every detent needs at least one sample;
    /// unknown detent names are rejected.
    pub fn from_rows(rows: &[DetentRow]) -> eyre::Result<Self> {
        let mut sums = [(0.0f64, 0usize); 3];
        for (idx, row) in rows.iter().enumerate() {
            if !row.raw.is_finite() || !(0.0..=1.0).contains(&row.raw) {
                eyre::bail!("detent row {}: raw value {} outside [0, 1]", idx, row.raw);
            }
            let slot = match row.detent.trim().to_ascii_lowercase().as_str() {
                "idle" => 0,
                "climb" | "clb" => 1,
                "flex" | "mct" => 2,
                other => eyre::bail!("detent row {idx}: unknown detent '{other}'"),
            };
            sums[slot].0 += f64::from(row.raw);
            sums[slot].1 += 1;
        }
        let mean = |slot: usize, name: &str| -> eyre::Result<f32> {
            let (sum, n) = sums[slot];
            if n == 0 {
                eyre::bail!("detent calibration has no '{name}' samples");
            }
            Ok((sum / n as f64) as f32)
        };
        Ok(Self {
            idle: mean(0, "idle")?,
            climb: mean(1, "climb")?,
            flex: mean(2, "flex")?,
        })
    }

    /// Convert measured hardware positions into mapped-space detent centers.
    pub fn into_calibration(self, deadband: f32, invert: bool) -> CalibrationCfg {
        let flip = |v: f32| if invert { 1.0 - v } else { v };
        CalibrationCfg {
            idle: flip(self.idle),
            climb: flip(self.climb),
            flex: flip(self.flex),
            deadband,
            invert,
        }
    }
}

impl TryFrom<Vec<DetentRow>> for DetentCalibration {
    type Error = eyre::Report;
    fn try_from(rows: Vec<DetentRow>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

pub fn load_detents_csv(path: &std::path::Path) -> eyre::Result<DetentCalibration> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open detent CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["detent", "raw"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "detent CSV must have headers 'detent,raw', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<DetentRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    DetentCalibration::try_from(rows)
}

/// Detent geometry check shared with the engine builder: detents strictly
/// increasing inside (0, 1) and every gap wider than two deadbands.
pub fn check_detents(cal: &CalibrationCfg) -> Result<(), &'static str> {
    let vals = [cal.idle, cal.climb, cal.flex, cal.deadband];
    if vals.iter().any(|v| !v.is_finite()) {
        return Err("calibration values must be finite");
    }
    if cal.deadband <= 0.0 {
        return Err("calibration.deadband must be > 0");
    }
    if !(0.0 < cal.idle && cal.idle < cal.climb && cal.climb < cal.flex && cal.flex < 1.0) {
        return Err("calibration detents must satisfy 0 < idle < climb < flex < 1");
    }
    let gaps = [
        cal.idle,
        cal.climb - cal.idle,
        cal.flex - cal.climb,
        1.0 - cal.flex,
    ];
    let min_gap = gaps.iter().copied().fold(f32::INFINITY, f32::min);
    if cal.deadband * 2.0 >= min_gap {
        return Err("calibration.deadband must be below half the smallest detent spacing");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Calibration
        if let Err(msg) = check_detents(&self.calibration) {
            eyre::bail!("{msg}");
        }

        // Axes
        if self.axes.first_axis_id <= 0 || self.axes.second_axis_id <= 0 {
            eyre::bail!("axes.*_axis_id must be > 0");
        }
        if self.axes.first_axis_id == self.axes.second_axis_id {
            eyre::bail!("axes.first_axis_id and axes.second_axis_id must differ");
        }

        // Throttle
        if self.throttle.rate_hz == 0 || self.throttle.rate_hz > 200 {
            eyre::bail!("throttle.rate_hz must be in [1, 200]");
        }
        if !(0.0..=0.5).contains(&self.throttle.sync_band) {
            eyre::bail!("throttle.sync_band must be in [0.0, 0.5]");
        }
        if self.throttle.idle_hold_ticks == 0 {
            eyre::bail!("throttle.idle_hold_ticks must be >= 1");
        }

        // Shares (cumulative)
        let s = &self.shares;
        if !(0.0 <= s.climb && s.climb <= s.flex && s.flex <= s.takeoff && s.takeoff <= 1.0) {
            eyre::bail!("shares must satisfy 0 <= climb <= flex <= takeoff <= 1");
        }

        // Nullzones
        let n = &self.nullzones;
        for (name, v) in [
            ("minimum", n.minimum),
            ("autopilot", n.autopilot),
            ("pitch_roll_max", n.pitch_roll_max),
            ("yaw_max", n.yaw_max),
        ] {
            if !(0.0..=1.0).contains(&v) {
                eyre::bail!("nullzones.{name} must be in [0.0, 1.0]");
            }
        }
        if n.minimum > n.pitch_roll_max || n.minimum > n.yaw_max {
            eyre::bail!("nullzones.minimum must not exceed pitch_roll_max or yaw_max");
        }
        if n.airspeed_min_kts >= n.airspeed_max_kts {
            eyre::bail!("nullzones.airspeed_min_kts must be < airspeed_max_kts");
        }
        if n.groundspeed_min_kts >= n.groundspeed_max_kts {
            eyre::bail!("nullzones.groundspeed_min_kts must be < groundspeed_max_kts");
        }

        // Brakes
        if self.brakes.bands.is_empty() {
            eyre::bail!("brakes.bands must not be empty");
        }
        for (kts, ratio) in &self.brakes.bands {
            if kts.is_sign_negative() {
                eyre::bail!("brakes.bands thresholds must be >= 0");
            }
            if !(0.0..=1.0).contains(ratio) {
                eyre::bail!("brakes.bands ratios must be in [0.0, 1.0]");
            }
        }
        if self.brakes.stationary_kts.is_sign_negative() {
            eyre::bail!("brakes.stationary_kts must be >= 0");
        }

        // Overlay
        if self.overlay.ice_check_secs <= 0.0 {
            eyre::bail!("overlay.ice_check_secs must be > 0");
        }
        if self.overlay.ice_off > self.overlay.ice_on {
            eyre::bail!("overlay.ice_off must be <= overlay.ice_on");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
