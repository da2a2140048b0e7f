//! Speed-scheduled joystick nullzones.
//!
//! Wide at low speed, narrowing to the configured minimum once flying or
//! taxiing fast. Autopilot servos engaged: every axis gets the autopilot value.

use crate::config::NullzoneCfg;

pub const MPS_TO_KTS: f32 = 3600.0 / 1852.0;

#[inline]
pub fn mps_to_kts(mps: f32) -> f32 {
    mps * MPS_TO_KTS
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nullzones {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

fn progress(value: f32, min: f32, max: f32) -> f32 {
    if max <= min {
        return 1.0;
    }
    (value.clamp(min, max) - min) / (max - min)
}

/// Pitch and roll follow indicated airspeed; yaw (tiller) follows groundspeed.
pub fn schedule(
    cfg: &NullzoneCfg,
    airspeed_kts: f32,
    groundspeed_kts: f32,
    servos_on: bool,
) -> Nullzones {
    if servos_on {
        return Nullzones {
            pitch: cfg.autopilot,
            roll: cfg.autopilot,
            yaw: cfg.autopilot,
        };
    }
    let air = progress(airspeed_kts, cfg.airspeed_min_kts, cfg.airspeed_max_kts);
    let ground = progress(groundspeed_kts, cfg.groundspeed_min_kts, cfg.groundspeed_max_kts);
    let pitch_roll = cfg.pitch_roll_max - (cfg.pitch_roll_max - cfg.minimum) * air;
    let yaw = cfg.yaw_max - (cfg.yaw_max - cfg.minimum) * ground;
    Nullzones {
        pitch: pitch_roll,
        roll: pitch_roll,
        yaw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0, 0.125, 0.25)]
    #[case(50.0, 3.125, 0.125, 0.25)]
    #[case(62.5, 31.25, 0.04, 0.04)]
    #[case(250.0, 0.0, 0.04, 0.25)]
    #[case(56.25, 17.1875, 0.0825, 0.145)]
    fn interpolates_between_limits(
        #[case] ias: f32,
        #[case] gs: f32,
        #[case] pitch_roll: f32,
        #[case] yaw: f32,
    ) {
        let nz = schedule(&NullzoneCfg::default(), ias, gs, false);
        assert!((nz.pitch - pitch_roll).abs() < 1e-5, "pitch {}", nz.pitch);
        assert_eq!(nz.pitch, nz.roll);
        assert!((nz.yaw - yaw).abs() < 1e-5, "yaw {}", nz.yaw);
    }

    #[test]
    fn autopilot_widens_everything() {
        let nz = schedule(&NullzoneCfg::default(), 250.0, 300.0, true);
        assert_eq!(nz, Nullzones { pitch: 0.5, roll: 0.5, yaw: 0.5 });
    }

    #[test]
    fn knots_conversion() {
        assert!((mps_to_kts(1852.0 / 3600.0) - 1.0).abs() < 1e-6);
    }
}
