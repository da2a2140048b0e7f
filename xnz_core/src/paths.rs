//! Host property and command paths, grouped by integration.

pub mod sim {
    pub const AXIS_ASSIGNMENTS: &str = "sim/joystick/joystick_axis_assignments";
    pub const AXIS_VALUES: &str = "sim/joystick/joystick_axis_values";
    pub const NULLZONE_PITCH: &str = "sim/joystick/joystick_pitch_nullzone";
    pub const NULLZONE_ROLL: &str = "sim/joystick/joystick_roll_nullzone";
    pub const NULLZONE_YAW: &str = "sim/joystick/joystick_heading_nullzone";
    pub const GROUNDSPEED: &str = "sim/flightmodel/position/groundspeed";
    pub const AIRSPEED: &str = "sim/flightmodel/position/indicated_airspeed";
    pub const ON_GROUND: &str = "sim/flightmodel/failures/onground_any";
    pub const ICE: [&str; 4] = [
        "sim/flightmodel/failures/pitot_ice",
        "sim/flightmodel/failures/inlet_ice",
        "sim/flightmodel/failures/prop_ice",
        "sim/flightmodel/failures/frm_ice",
    ];

    pub const AUTHOR: &str = "sim/aircraft/view/acf_author";
    pub const DESCRIPTION: &str = "sim/aircraft/view/acf_descrip";
    pub const ICAO: &str = "sim/aircraft/view/acf_ICAO";
    pub const ENGINE_COUNT: &str = "sim/aircraft/engine/acf_num_engines";
    pub const ENGINE_TYPES: &str = "sim/aircraft/prop/acf_en_type";

    pub const THROTTLE_RATIO: &str = "sim/cockpit2/engine/actuators/throttle_ratio";
    pub const THROTTLE_RATIO_ALL: &str = "sim/cockpit2/engine/actuators/throttle_ratio_all";
    pub const PROP_MODE: &str = "sim/cockpit2/engine/actuators/prop_mode";
    pub const REVERSE_TOGGLE: &str = "sim/engines/thrust_reverse_toggle";
    pub const REVERSE_TOGGLE_N: [&str; 2] = [
        "sim/engines/thrust_reverse_toggle_1",
        "sim/engines/thrust_reverse_toggle_2",
    ];
    pub const BETA_TOGGLE: &str = "sim/engines/beta_toggle";
    pub const BETA_TOGGLE_N: [&str; 2] = ["sim/engines/beta_toggle_1", "sim/engines/beta_toggle_2"];

    pub const SERVOS_ON: &str = "sim/cockpit2/autopilot/servos_on";
    pub const AUTOTHROTTLE_ON: &str = "sim/cockpit2/autopilot/autothrottle_on";
    pub const TOGA: &str = "sim/engines/TOGA_power";
    pub const AUTOBRAKE_LEVEL: &str = "sim/cockpit2/switches/auto_brake_level";

    pub const LEFT_BRAKE: &str = "sim/cockpit2/controls/left_brake_ratio";
    pub const RIGHT_BRAKE: &str = "sim/cockpit2/controls/right_brake_ratio";
    pub const BRAKES_REGULAR: &str = "sim/flight_controls/brakes_regular";
    pub const BRAKES_MAX: &str = "sim/flight_controls/brakes_max";
    pub const PARK_BRAKE: &str = "sim/cockpit2/controls/parking_brake_ratio";

    pub const STARTER_N: [&str; 2] = [
        "sim/starters/engage_starter_1",
        "sim/starters/engage_starter_2",
    ];
    pub const IGNITION_KEY: &str = "sim/cockpit2/engine/actuators/ignition_key";
    pub const MIXTURE: &str = "sim/cockpit2/engine/actuators/mixture_ratio";
    pub const MAGNETOS_UP_N: [&str; 2] = [
        "sim/magnetos/magnetos_up_1",
        "sim/magnetos/magnetos_up_2",
    ];
    pub const MAGNETOS_DOWN_N: [&str; 2] = [
        "sim/magnetos/magnetos_down_1",
        "sim/magnetos/magnetos_down_2",
    ];
}

pub mod toliss {
    pub const SIGNATURES: [&str; 6] = [
        "XP10.ToLiss.A319.systems",
        "XP10.ToLiss.A321.systems",
        "XP11.ToLiss.A319.systems",
        "XP11.ToLiss.A321.systems",
        "ToLiSs.Airbus.systems",
        "XP11.ToLiss.Airbus.systems",
    ];
    pub const THROTTLE_INPUT: &str = "AirbusFBW/throttle_input";
    pub const PARK_BRAKE: &str = "AirbusFBW/ParkBrake";
    pub const AUTOBRAKE: [&str; 3] = [
        "AirbusFBW/AutoBrkLo",
        "AirbusFBW/AutoBrkMed",
        "AirbusFBW/AutoBrkMax",
    ];
    pub const MASTER_ON_N: [&str; 2] = [
        "toliss_airbus/engcommands/Master1On",
        "toliss_airbus/engcommands/Master2On",
    ];
    pub const MASTER_OFF_N: [&str; 2] = [
        "toliss_airbus/engcommands/Master1Off",
        "toliss_airbus/engcommands/Master2Off",
    ];
    pub const MODE_START: &str = "toliss_airbus/engcommands/EngineModeSwitchToStart";
    pub const MODE_NORM: &str = "toliss_airbus/engcommands/EngineModeSwitchToNorm";
}

pub mod ff320 {
    pub const SIGNATURE: &str = "XP11.FlightFactor.A320U";
    pub const LEVERS: [&str; 2] = [
        "a320/Pedestal/EngineLever1",
        "a320/Pedestal/EngineLever2",
    ];
}

pub mod md80 {
    pub const SIGNATURE: &str = "rotate.md-80.core";
    pub const LEVERS: [&str; 2] = [
        "Rotate/md80/controls/throttle_lever_left",
        "Rotate/md80/controls/throttle_lever_right",
    ];
}

pub mod tbm900 {
    pub const SIGNATURE: &str = "tbm900";
    pub const STARTER: &str = "tbm900/actuators/elec/starter_up";
    pub const IGNITION: &str = "tbm900/switches/engine/ignition";
}

pub mod ixeg {
    pub const SIGNATURE: &str = "gizmo.x-plugins.com";
    pub const AT_ARMED: &str = "ixeg/733/MCP/mcp_at_arm_act";
    pub const PARK_BRAKE: &str = "ixeg/733/hydraulics/park_brake_lever";
}

pub mod zibo {
    pub const MARKER: &str = "laminar/B738/fms/v1_set";
    pub const AT_STATUS: &str = "laminar/B738/autopilot/autothrottle_status";
    pub const TOGA: &str = "laminar/B738/autopilot/left_toga_press";
    pub const PARK_BRAKE_TOGGLE: &str = "laminar/B738/push_button/park_brake_on_off";
    pub const PARK_BRAKE_POS: &str = "laminar/B738/parking_brake_pos";
    pub const AUTOBRAKE_UP: &str = "laminar/B738/knob/autobrake_up";
    pub const AUTOBRAKE_DOWN: &str = "laminar/B738/knob/autobrake_dn";
}

pub mod jardesign {
    pub const SIGNATURE: &str = "jardesign.sasl.a320";
}

pub mod sasl {
    pub const SIGNATURE: &str = "1-sim.sasl";
}
