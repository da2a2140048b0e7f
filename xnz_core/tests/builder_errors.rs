use rstest::rstest;
use xnz_core::config::{BrakeCfg, CalibrationCfg, SharesCfg, ThrottleCfg};
use xnz_core::error::BuildError;
use xnz_core::EngineBuilder;
use xnz_sim::SimHost;

fn invalid_message(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::InvalidConfig(msg)) => msg,
        other => panic!("expected InvalidConfig, got: {other:?}"),
    }
}

#[rstest]
fn defaults_build() {
    let engine = EngineBuilder::new().with_host(SimHost::laminar(2)).build();
    assert!(engine.is_ok());
}

#[rstest]
#[case(CalibrationCfg { idle: 0.52, climb: 0.28, ..CalibrationCfg::default() }, "detents")]
#[case(CalibrationCfg { deadband: 0.12, ..CalibrationCfg::default() }, "deadband")]
#[case(CalibrationCfg { deadband: 0.0, ..CalibrationCfg::default() }, "deadband")]
#[case(CalibrationCfg { flex: f32::NAN, ..CalibrationCfg::default() }, "finite")]
fn implausible_calibration_is_rejected(#[case] cal: CalibrationCfg, #[case] needle: &str) {
    let err = EngineBuilder::new()
        .with_host(SimHost::laminar(2))
        .with_calibration(cal)
        .build()
        .expect_err("calibration should be rejected");
    assert!(invalid_message(&err).contains(needle), "{err}");
}

#[rstest]
fn descending_shares_are_rejected() {
    let err = EngineBuilder::new()
        .with_host(SimHost::laminar(2))
        .with_shares(SharesCfg {
            climb: 0.8,
            flex: 0.7,
            takeoff: 1.0,
        })
        .build()
        .expect_err("shares should be rejected");
    assert!(invalid_message(&err).contains("shares"));
}

#[rstest]
#[case(ThrottleCfg { rate_hz: 0, ..ThrottleCfg::default() })]
#[case(ThrottleCfg { sync_band: 0.6, ..ThrottleCfg::default() })]
#[case(ThrottleCfg { idle_hold_ticks: 0, ..ThrottleCfg::default() })]
fn throttle_limits(#[case] throttle: ThrottleCfg) {
    let res = EngineBuilder::new()
        .with_host(SimHost::laminar(2))
        .with_throttle(throttle)
        .build();
    assert!(res.is_err());
}

#[rstest]
fn empty_brake_bands_are_rejected() {
    let err = EngineBuilder::new()
        .with_host(SimHost::laminar(2))
        .with_brakes(BrakeCfg {
            bands: vec![],
            ..BrakeCfg::default()
        })
        .build()
        .expect_err("no bands");
    assert!(invalid_message(&err).contains("brake band"));
}

#[rstest]
fn brake_bands_are_sorted_at_build() {
    let engine = EngineBuilder::new()
        .with_host(SimHost::laminar(2))
        .with_brakes(BrakeCfg {
            bands: vec![(0.0, 0.25), (26.25, 0.75), (2.5, 0.5)],
            ..BrakeCfg::default()
        })
        .build()
        .unwrap();
    let thresholds: Vec<f32> = engine.cfg().brakes.bands.iter().map(|b| b.0).collect();
    assert_eq!(thresholds, vec![26.25, 2.5, 0.0]);
}
