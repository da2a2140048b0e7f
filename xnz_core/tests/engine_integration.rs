use rstest::rstest;
use xnz_core::error::XnzError;
use xnz_core::profile::{Capability, ThrottleOutput};
use xnz_core::{Engine, EngineBuilder, HostMessage, ProfileLifecycle, TickOutcome};
use xnz_sim::aircraft::{
    AXIS_ASSIGNMENTS, FF320_LEVERS, LEVER_INDEX, PROP_MODE, THROTTLE_RATIO, THROTTLE_RATIO_ALL,
    TOLISS_THROTTLE,
};
use xnz_sim::{CommandKind, Preset, SimHost, SimOverlay};
use xnz_traits::{FlightLoop, HostVersions};

const PITCH_NULLZONE: &str = "sim/joystick/joystick_pitch_nullzone";
const ROLL_NULLZONE: &str = "sim/joystick/joystick_roll_nullzone";
const YAW_NULLZONE: &str = "sim/joystick/joystick_heading_nullzone";

/// Raw lever value (inverted quadrant) resting in the idle detent.
const IDLE_RAW: f32 = 0.72;
/// Raw lever value at the top of the takeoff zone.
const FULL_RAW: f32 = 0.04;

fn loaded(host: &SimHost) -> Engine<SimHost, SimOverlay> {
    let mut engine = EngineBuilder::new()
        .with_host(host.clone())
        .with_overlay(SimOverlay::new())
        .build()
        .expect("default config builds");
    engine.enable().expect("enable");
    engine.handle_message(HostMessage::LiveryLoaded { user: true });
    engine
}

fn axis_pair(host: &SimHost) -> Vec<i32> {
    host.peek_i32s(AXIS_ASSIGNMENTS).unwrap()[LEVER_INDEX..LEVER_INDEX + 2].to_vec()
}

#[rstest]
fn detection_captures_axes_and_schedules_the_mapping_loop() {
    let host = SimHost::laminar(2);
    let engine = loaded(&host);
    let profile = engine.profile().expect("bound");
    assert_eq!(profile.name, "generic");
    assert!(profile.is_complete());
    assert!(profile.asymmetric);
    assert_eq!(axis_pair(&host), vec![0, 0]);
    assert_eq!(host.loop_interval(FlightLoop::Throttle), Some(1.0 / 20.0));
    assert_eq!(host.loop_interval(FlightLoop::Nullzones), Some(1.0 / 20.0));
}

#[rstest]
fn no_output_before_the_hardware_reports() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    host.clear_events();
    assert_eq!(engine.throttle_tick(), TickOutcome::AwaitingInput);
    host.set_levers(0.01, 0.5).unwrap();
    assert_eq!(engine.throttle_tick(), TickOutcome::AwaitingInput);
    assert_eq!(host.writes_to(THROTTLE_RATIO_ALL), 0);

    host.set_levers(FULL_RAW, FULL_RAW).unwrap();
    assert_eq!(
        engine.throttle_tick(),
        TickOutcome::Written {
            values: [1.0, 1.0],
            symmetric: true
        }
    );
    assert_eq!(host.peek_f32s(THROTTLE_RATIO).unwrap(), vec![1.0, 1.0]);
}

#[rstest]
fn idle_writes_stop_after_ten_ticks_and_resume_on_movement() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    host.set_levers(IDLE_RAW, IDLE_RAW).unwrap();
    host.clear_events();

    let outcomes: Vec<TickOutcome> = (0..12).map(|_| engine.throttle_tick()).collect();
    assert!(outcomes[..10]
        .iter()
        .all(|o| matches!(o, TickOutcome::Written { .. })));
    assert_eq!(outcomes[10], TickOutcome::Skipped);
    assert_eq!(outcomes[11], TickOutcome::Skipped);
    assert_eq!(host.writes_to(THROTTLE_RATIO_ALL), 10);

    host.set_levers(0.5, 0.5).unwrap();
    assert!(matches!(engine.throttle_tick(), TickOutcome::Written { .. }));
    host.set_levers(IDLE_RAW, IDLE_RAW).unwrap();
    host.clear_events();
    // the first idle tick still sees the old thrust and resets the count
    for _ in 0..11 {
        assert!(matches!(engine.throttle_tick(), TickOutcome::Written { .. }));
    }
    assert_eq!(engine.throttle_tick(), TickOutcome::Skipped);
}

#[rstest]
fn close_levers_are_merged_and_split_levers_are_not() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);

    host.set_levers(0.40, 0.42).unwrap();
    match engine.throttle_tick() {
        TickOutcome::Written { values, symmetric } => {
            assert!(symmetric);
            assert_eq!(values[0], values[1]);
        }
        other => panic!("expected a write, got {other:?}"),
    }

    host.set_levers(0.40, 0.60).unwrap();
    match engine.throttle_tick() {
        TickOutcome::Written { values, symmetric } => {
            assert!(!symmetric);
            assert!(values[0] > values[1]);
            assert_eq!(host.peek_f32s(THROTTLE_RATIO).unwrap(), values.to_vec());
        }
        other => panic!("expected a write, got {other:?}"),
    }
}

#[rstest]
fn crossing_into_reverse_toggles_once_without_writing() {
    let host = Preset::Turboprop.build();
    let mut engine = loaded(&host);
    assert_eq!(engine.profile().unwrap().name, "turboprop");

    // +0.02 and -0.02 on the w-rev curve with the default detents
    host.set_levers(0.6677, 0.6677).unwrap();
    match engine.throttle_tick() {
        TickOutcome::Written { values, .. } => assert!((values[0] - 0.02).abs() < 0.003),
        other => panic!("expected a forward write, got {other:?}"),
    }

    host.clear_events();
    host.set_levers(0.7679, 0.7679).unwrap();
    assert_eq!(engine.throttle_tick(), TickOutcome::ModeToggled { commands: 1 });
    assert_eq!(
        host.commands_issued(),
        vec![("sim/engines/thrust_reverse_toggle".to_string(), CommandKind::Once)]
    );
    assert_eq!(host.writes_to(THROTTLE_RATIO_ALL), 0);
    assert_eq!(host.writes_to(THROTTLE_RATIO), 0);
    assert_eq!(host.peek_i32s(PROP_MODE).unwrap(), vec![3, 3]);

    match engine.throttle_tick() {
        TickOutcome::Written { values, .. } => assert!((values[0] - 0.02).abs() < 0.003),
        other => panic!("expected an unsigned reverse write, got {other:?}"),
    }
}

#[rstest]
fn unknown_engine_mode_forces_zero() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    host.poke(PROP_MODE, xnz_sim::Value::I32s(vec![0, 0])).unwrap();
    host.set_levers(FULL_RAW, FULL_RAW).unwrap();
    assert_eq!(
        engine.throttle_tick(),
        TickOutcome::Written {
            values: [0.0, 0.0],
            symmetric: true
        }
    );
}

#[rstest]
fn autothrottle_owns_the_levers() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    host.set_levers(FULL_RAW, FULL_RAW).unwrap();
    host.poke_i32("sim/cockpit2/autopilot/autothrottle_on", 1).unwrap();
    host.poke_f32(THROTTLE_RATIO_ALL, 0.8).unwrap();
    host.clear_events();

    assert_eq!(
        engine.throttle_tick(),
        TickOutcome::AutothrottleActive { display: 0.8 }
    );
    assert_eq!(host.writes_to(THROTTLE_RATIO_ALL), 0);
}

#[rstest]
fn toliss_receives_signed_values() {
    let host = Preset::Toliss.build();
    let mut engine = loaded(&host);
    assert!(matches!(
        engine.profile().unwrap().throttle,
        ThrottleOutput::Toliss { .. }
    ));
    host.set_levers(0.98, 0.98).unwrap();
    engine.throttle_tick();
    assert_eq!(host.peek_f32s(TOLISS_THROTTLE).unwrap(), vec![-1.0, -1.0]);
    assert!(host.commands_issued().is_empty());
}

#[rstest]
fn ff320_levers_use_the_angle_scale() {
    let host = Preset::Ff320.build();
    let mut engine = loaded(&host);
    host.set_levers(FULL_RAW, FULL_RAW).unwrap();
    engine.throttle_tick();
    for lever in FF320_LEVERS {
        assert_eq!(host.peek_f32(lever).unwrap(), 65.0);
    }
    host.set_levers(0.98, 0.98).unwrap();
    engine.throttle_tick();
    for lever in FF320_LEVERS {
        assert_eq!(host.peek_f32(lever).unwrap(), 0.0);
    }
}

#[rstest]
fn preference_save_releases_then_recaptures() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    engine.handle_message(HostMessage::WillWritePrefs);
    assert_eq!(axis_pair(&host), vec![26, 27]);
    assert!(engine.axes().recapture_pending());

    engine.throttle_tick();
    assert_eq!(axis_pair(&host), vec![0, 0]);
    assert!(!engine.axes().recapture_pending());
}

#[rstest]
fn preference_save_sees_the_users_nullzones() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    engine.flight_loop(0.05);
    assert!((host.peek_f32(PITCH_NULLZONE).unwrap() - 0.125).abs() < 1e-6);

    engine.handle_message(HostMessage::WillWritePrefs);
    for path in [PITCH_NULLZONE, ROLL_NULLZONE, YAW_NULLZONE] {
        assert_eq!(host.peek_f32(path).unwrap(), 0.1, "{path}");
    }

    engine.flight_loop(0.05);
    assert!((host.peek_f32(PITCH_NULLZONE).unwrap() - 0.125).abs() < 1e-6);
}

#[rstest]
fn menu_toggle_releases_and_recaptures() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    engine.set_throttle_enabled(false);
    assert_eq!(axis_pair(&host), vec![26, 27]);
    assert_eq!(engine.throttle_tick(), TickOutcome::Disabled);
    assert_eq!(host.loop_interval(FlightLoop::Throttle), Some(0.0));

    engine.set_throttle_enabled(true);
    assert_eq!(axis_pair(&host), vec![0, 0]);
    assert_eq!(host.loop_interval(FlightLoop::Throttle), Some(1.0 / 20.0));
}

#[rstest]
fn menu_toggle_leaves_axes_alone_without_a_throttle_binding() {
    let host = Preset::Toliss.build();
    host.remove_property("AirbusFBW/ParkBrake");
    let mut engine = loaded(&host);
    assert_eq!(engine.profile().map(|p| p.name), Some("unsupported"));
    assert_eq!(axis_pair(&host), vec![26, 27]);

    engine.set_throttle_enabled(false);
    engine.set_throttle_enabled(true);
    assert_eq!(axis_pair(&host), vec![26, 27]);
    assert_ne!(host.loop_interval(FlightLoop::Throttle), Some(1.0 / 20.0));
    assert_eq!(engine.throttle_tick(), TickOutcome::Disabled);
}

#[rstest]
fn held_idle_does_not_announce_outside_throttle_changes() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    host.set_levers(IDLE_RAW, IDLE_RAW).unwrap();
    for _ in 0..10 {
        engine.throttle_tick();
    }
    assert_eq!(engine.throttle_tick(), TickOutcome::Skipped);
    engine.flight_loop(0.05);

    // keyboard throttle while the lever rests in the idle detent
    host.poke_f32(THROTTLE_RATIO_ALL, 0.3).unwrap();
    engine.flight_loop(0.05);
    assert_eq!(engine.overlay().text(), None);

    host.set_levers(FULL_RAW, FULL_RAW).unwrap();
    assert!(matches!(engine.throttle_tick(), TickOutcome::Written { .. }));
    engine.flight_loop(0.05);
    assert_eq!(engine.overlay().text().as_deref(), Some("1.00000"));
}

#[rstest]
fn aircraft_change_does_not_wait_for_lever_movement_again() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    host.set_levers(IDLE_RAW, IDLE_RAW).unwrap();
    assert!(matches!(engine.throttle_tick(), TickOutcome::Written { .. }));

    engine.handle_message(HostMessage::PlaneLoaded { user: true });
    engine.handle_message(HostMessage::LiveryLoaded { user: true });
    // full forward reads below the deadband on the inverted quadrant
    host.set_levers(0.02, 0.02).unwrap();
    assert_eq!(
        engine.throttle_tick(),
        TickOutcome::Written {
            values: [1.0, 1.0],
            symmetric: true
        }
    );

    engine.disable();
    engine.enable().unwrap();
    engine.handle_message(HostMessage::LiveryLoaded { user: true });
    assert_eq!(engine.throttle_tick(), TickOutcome::AwaitingInput);
}

#[rstest]
fn unload_and_disable_restore_the_host() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    engine.flight_loop(0.05);
    assert_ne!(host.peek_f32("sim/joystick/joystick_pitch_nullzone").unwrap(), 0.1);

    engine.handle_message(HostMessage::PlaneUnloaded { user: true });
    assert_eq!(engine.lifecycle(), &ProfileLifecycle::Unloaded);
    assert_eq!(axis_pair(&host), vec![26, 27]);

    engine.handle_message(HostMessage::LiveryLoaded { user: true });
    assert!(engine.profile().is_some());

    engine.disable();
    assert!(!engine.is_enabled());
    assert_eq!(engine.lifecycle(), &ProfileLifecycle::Unloaded);
    assert_eq!(axis_pair(&host), vec![26, 27]);
    assert_eq!(host.peek_f32("sim/joystick/joystick_pitch_nullzone").unwrap(), 0.1);
    assert_eq!(host.loop_interval(FlightLoop::Nullzones), Some(0.0));
}

#[rstest]
fn detection_does_not_rerun_while_bound() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    let lookups = host.lookups().len();
    engine.handle_message(HostMessage::LiveryLoaded { user: true });
    engine.handle_message(HostMessage::LiveryLoaded { user: false });
    assert_eq!(host.lookups().len(), lookups);
}

#[rstest]
fn old_plugin_api_refuses_to_enable() {
    let host = SimHost::laminar(2);
    host.set_versions(HostVersions {
        simulator: 10_510,
        api: 200,
    });
    let mut engine = EngineBuilder::new().with_host(host).build().unwrap();
    let err = engine.enable().expect_err("api too old");
    assert!(matches!(
        err.downcast_ref::<XnzError>(),
        Some(XnzError::UnsupportedHost(_))
    ));
}

#[rstest]
fn nullzones_follow_speed_and_autopilot() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    assert_eq!(engine.flight_loop(0.05), 1.0 / 20.0);
    assert!((host.peek_f32("sim/joystick/joystick_pitch_nullzone").unwrap() - 0.125).abs() < 1e-6);
    assert!((host.peek_f32("sim/joystick/joystick_heading_nullzone").unwrap() - 0.25).abs() < 1e-6);

    host.poke_f32("sim/flightmodel/position/indicated_airspeed", 120.0).unwrap();
    host.poke_f32("sim/flightmodel/position/groundspeed", 60.0).unwrap();
    engine.flight_loop(0.05);
    assert!((host.peek_f32("sim/joystick/joystick_roll_nullzone").unwrap() - 0.04).abs() < 1e-6);
    assert!((host.peek_f32("sim/joystick/joystick_heading_nullzone").unwrap() - 0.04).abs() < 1e-6);

    host.poke_i32("sim/cockpit2/autopilot/servos_on", 1).unwrap();
    engine.flight_loop(0.05);
    assert_eq!(host.peek_f32("sim/joystick/joystick_pitch_nullzone").unwrap(), 0.5);
}

#[rstest]
fn icing_is_announced_once() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    host.poke_f32("sim/flightmodel/failures/inlet_ice", 0.1).unwrap();
    engine.flight_loop(10.0);
    engine.flight_loop(10.0);
    assert_eq!(host.spoken(), vec!["ice detected".to_string()]);
    assert_eq!(engine.overlay().text().as_deref(), Some("ICE"));
}

#[rstest]
fn recalibration_moves_the_zones() {
    let host = SimHost::laminar(2);
    let mut engine = loaded(&host);
    let before = engine.zones().zone(xnz_core::Zone::Climb).min;
    let cal = xnz_core::config::CalibrationCfg {
        idle: 0.32,
        ..engine.cfg().calibration
    };
    engine.recalibrate(cal).unwrap();
    assert!(engine.zones().zone(xnz_core::Zone::Climb).min > before);

    let bad = xnz_core::config::CalibrationCfg {
        idle: 0.9,
        ..cal
    };
    assert!(engine.recalibrate(bad).is_err());
    assert_eq!(engine.cfg().calibration, cal);
}

#[rstest]
fn generic_profile_supports_every_axis() {
    let host = SimHost::laminar(2);
    let engine = loaded(&host);
    let profile = engine.profile().unwrap();
    assert!(profile.summary().iter().all(|(_, ok)| *ok));
    assert!(profile.throttle.is_supported());
}
