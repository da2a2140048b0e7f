//! Ready-made simulator states for common aircraft.
//!
//! Paths mirror what the real simulator and add-ons publish. They are spelled
//! out here rather than shared with the engine so a typo on either side shows
//! up as a failed binding in tests.

use xnz_traits::HostVersions;

use crate::{Result, SimError, SimHost, Value};

pub const AXIS_ASSIGNMENTS: &str = "sim/joystick/joystick_axis_assignments";
pub const AXIS_VALUES: &str = "sim/joystick/joystick_axis_values";
pub const THROTTLE_RATIO: &str = "sim/cockpit2/engine/actuators/throttle_ratio";
pub const THROTTLE_RATIO_ALL: &str = "sim/cockpit2/engine/actuators/throttle_ratio_all";
pub const PROP_MODE: &str = "sim/cockpit2/engine/actuators/prop_mode";
pub const TOLISS_THROTTLE: &str = "AirbusFBW/throttle_input";
pub const FF320_LEVERS: [&str; 2] = ["a320/Pedestal/EngineLever1", "a320/Pedestal/EngineLever2"];
pub const MD80_LEVERS: [&str; 2] = [
    "Rotate/md80/controls/throttle_lever_left",
    "Rotate/md80/controls/throttle_lever_right",
];

/// Axis slots 24/25 hold prop 3/4 (ids 26, 27) in every preset.
pub const LEVER_INDEX: usize = 24;
const AXIS_TABLE_LEN: usize = 500;

const JET: i32 = 5;
const FREE_TURBINE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Laminar,
    Toliss,
    Ff320,
    Md80,
    Zibo,
    Ixeg,
    Turboprop,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::Laminar,
        Preset::Toliss,
        Preset::Ff320,
        Preset::Md80,
        Preset::Zibo,
        Preset::Ixeg,
        Preset::Turboprop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Laminar => "laminar",
            Preset::Toliss => "toliss",
            Preset::Ff320 => "ff320",
            Preset::Md80 => "md80",
            Preset::Zibo => "zibo",
            Preset::Ixeg => "ixeg",
            Preset::Turboprop => "turboprop",
        }
    }

    pub fn build(self) -> SimHost {
        let host = SimHost::laminar(2);
        match self {
            Preset::Laminar => {}
            Preset::Toliss => host.with_toliss(),
            Preset::Ff320 => host.with_ff320(),
            Preset::Md80 => host.with_md80(),
            Preset::Zibo => host.with_zibo(),
            Preset::Ixeg => host.with_ixeg(),
            Preset::Turboprop => host.with_engine_types(&[FREE_TURBINE, FREE_TURBINE]),
        }
        host
    }
}

impl std::str::FromStr for Preset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SimError::UnknownPreset(s.to_string()))
    }
}

impl SimHost {
    /// A default-simulator jet with every generic binding present.
    pub fn laminar(engines: usize) -> Self {
        let host = SimHost::new(HostVersions {
            simulator: 11_550,
            api: 301,
        });
        let n = engines.max(1);

        let mut table = vec![0; AXIS_TABLE_LEN];
        table[LEVER_INDEX] = 26;
        table[LEVER_INDEX + 1] = 27;
        host.add_property(AXIS_ASSIGNMENTS, Value::I32s(table));
        host.add_property(AXIS_VALUES, Value::F32s(vec![0.0; AXIS_TABLE_LEN]));
        host.set_lever_index(LEVER_INDEX);

        for path in [
            "sim/joystick/joystick_pitch_nullzone",
            "sim/joystick/joystick_roll_nullzone",
            "sim/joystick/joystick_heading_nullzone",
        ] {
            host.add_property(path, Value::F32(0.1));
        }
        host.add_property("sim/flightmodel/position/groundspeed", Value::F32(0.0));
        host.add_property("sim/flightmodel/position/indicated_airspeed", Value::F32(0.0));
        host.add_property("sim/flightmodel/failures/onground_any", Value::I32(1));
        for path in [
            "sim/flightmodel/failures/pitot_ice",
            "sim/flightmodel/failures/inlet_ice",
            "sim/flightmodel/failures/prop_ice",
            "sim/flightmodel/failures/frm_ice",
        ] {
            host.add_property(path, Value::F32(0.0));
        }

        host.set_aircraft("Laminar Research", "Generic twin jet", "B738");
        host.add_property("sim/aircraft/engine/acf_num_engines", Value::I32(n as i32));
        host.add_property("sim/aircraft/prop/acf_en_type", Value::I32s(vec![JET; n]));

        host.add_property(THROTTLE_RATIO, Value::F32s(vec![0.0; n]));
        host.add_property(THROTTLE_RATIO_ALL, Value::F32(0.0));
        host.add_property(PROP_MODE, Value::I32s(vec![1; n]));
        host.add_command("sim/engines/thrust_reverse_toggle");
        host.add_command("sim/engines/thrust_reverse_toggle_1");
        host.add_command("sim/engines/thrust_reverse_toggle_2");
        host.add_command("sim/engines/beta_toggle");
        host.add_command("sim/engines/beta_toggle_1");
        host.add_command("sim/engines/beta_toggle_2");

        host.add_property("sim/cockpit2/autopilot/servos_on", Value::I32(0));
        host.add_property("sim/cockpit2/autopilot/autothrottle_on", Value::I32(0));
        host.add_command("sim/engines/TOGA_power");
        host.add_property("sim/cockpit2/switches/auto_brake_level", Value::I32(1));

        host.add_property("sim/cockpit2/controls/left_brake_ratio", Value::F32(0.0));
        host.add_property("sim/cockpit2/controls/right_brake_ratio", Value::F32(0.0));
        host.add_command("sim/flight_controls/brakes_regular");
        host.add_command("sim/flight_controls/brakes_max");
        host.add_property("sim/cockpit2/controls/parking_brake_ratio", Value::F32(1.0));

        host.add_command("sim/starters/engage_starter_1");
        host.add_command("sim/starters/engage_starter_2");
        host.add_property("sim/cockpit2/engine/actuators/ignition_key", Value::I32s(vec![0; n]));
        host.add_property("sim/cockpit2/engine/actuators/mixture_ratio", Value::F32s(vec![0.0; n]));
        host.add_command("sim/magnetos/magnetos_up_1");
        host.add_command("sim/magnetos/magnetos_up_2");
        host.add_command("sim/magnetos/magnetos_down_1");
        host.add_command("sim/magnetos/magnetos_down_2");

        host.install_reverse_emulation();
        host
    }

    fn install_reverse_emulation(&self) {
        let wired = self.emulate_prop_mode(PROP_MODE).and_then(|()| {
            self.emulate_mode_toggle("sim/engines/thrust_reverse_toggle", None, 3)?;
            self.emulate_mode_toggle("sim/engines/beta_toggle", None, 2)?;
            for i in 0..2 {
                let (reverse, beta) = (
                    format!("sim/engines/thrust_reverse_toggle_{}", i + 1),
                    format!("sim/engines/beta_toggle_{}", i + 1),
                );
                self.emulate_mode_toggle(&reverse, Some(i), 3)?;
                self.emulate_mode_toggle(&beta, Some(i), 2)?;
            }
            self.mirror(THROTTLE_RATIO_ALL, THROTTLE_RATIO)
        });
        if let Err(e) = wired {
            tracing::warn!(error = %e, "sim reverse emulation incomplete");
        }
    }

    pub fn set_aircraft(&self, author: &str, description: &str, icao: &str) {
        self.add_string("sim/aircraft/view/acf_author", author);
        self.add_string("sim/aircraft/view/acf_descrip", description);
        self.add_string("sim/aircraft/view/acf_ICAO", icao);
    }

    pub fn with_engine_types(&self, types: &[i32]) {
        self.add_property("sim/aircraft/engine/acf_num_engines", Value::I32(types.len() as i32));
        self.add_property("sim/aircraft/prop/acf_en_type", Value::I32s(types.to_vec()));
    }

    pub fn with_toliss(&self) {
        self.add_plugin("XP11.ToLiss.Airbus.systems", true);
        self.set_aircraft("Gliding Kiwi", "ToLiss A321neo", "A21N");
        self.add_property(TOLISS_THROTTLE, Value::F32s(vec![0.0; 2]));
        self.add_property("AirbusFBW/ParkBrake", Value::I32(1));
        for cmd in [
            "AirbusFBW/AutoBrkLo",
            "AirbusFBW/AutoBrkMed",
            "AirbusFBW/AutoBrkMax",
            "toliss_airbus/engcommands/Master1On",
            "toliss_airbus/engcommands/Master2On",
            "toliss_airbus/engcommands/Master1Off",
            "toliss_airbus/engcommands/Master2Off",
            "toliss_airbus/engcommands/EngineModeSwitchToStart",
            "toliss_airbus/engcommands/EngineModeSwitchToNorm",
        ] {
            self.add_command(cmd);
        }
    }

    pub fn with_ff320(&self) {
        self.add_plugin("XP11.FlightFactor.A320U", true);
        self.set_aircraft("FlightFactor", "Airbus A320 Ultimate", "A320");
        for lever in FF320_LEVERS {
            self.add_property(lever, Value::F32(20.0));
        }
    }

    pub fn with_md80(&self) {
        self.add_plugin("rotate.md-80.core", true);
        self.set_aircraft("Rotate", "MD-88", "MD88");
        for lever in MD80_LEVERS {
            self.add_property(lever, Value::F32(0.0));
        }
    }

    pub fn with_zibo(&self) {
        self.set_aircraft("Laminar Research / Zibo", "Boeing 737-800", "B738");
        self.add_property("laminar/B738/fms/v1_set", Value::F32(0.0));
        self.add_property("laminar/B738/autopilot/autothrottle_status", Value::I32(0));
        self.add_command("laminar/B738/autopilot/left_toga_press");
        self.add_command("laminar/B738/push_button/park_brake_on_off");
        self.add_property("laminar/B738/parking_brake_pos", Value::F32(1.0));
        self.add_command("laminar/B738/knob/autobrake_up");
        self.add_command("laminar/B738/knob/autobrake_dn");
    }

    pub fn with_ixeg(&self) {
        self.add_plugin("gizmo.x-plugins.com", true);
        self.set_aircraft("IXEG", "Boeing 737-300", "B733");
        self.add_property("ixeg/733/MCP/mcp_at_arm_act", Value::F32(0.0));
        self.add_property("ixeg/733/hydraulics/park_brake_lever", Value::F32(1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use xnz_traits::Host;

    #[rstest]
    #[case("laminar", Preset::Laminar)]
    #[case("ToLiss", Preset::Toliss)]
    #[case("turboprop", Preset::Turboprop)]
    fn preset_names_parse(#[case] name: &str, #[case] expected: Preset) {
        assert_eq!(name.parse::<Preset>().unwrap(), expected);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        assert_eq!(
            "concorde".parse::<Preset>(),
            Err(SimError::UnknownPreset("concorde".into()))
        );
    }

    #[test]
    fn ratio_all_fans_out() {
        let mut host = SimHost::laminar(2);
        let all = host.find_property(THROTTLE_RATIO_ALL).unwrap();
        host.set_f32(all, 0.4);
        assert_eq!(host.peek_f32s(THROTTLE_RATIO).unwrap(), vec![0.4, 0.4]);
    }

    #[test]
    fn levers_land_on_the_axis_pair() {
        let host = SimHost::laminar(2);
        host.set_levers(0.3, 0.7).unwrap();
        let values = host.peek_f32s(AXIS_VALUES).unwrap();
        assert_eq!(&values[LEVER_INDEX..LEVER_INDEX + 2], &[0.3, 0.7]);
    }
}
