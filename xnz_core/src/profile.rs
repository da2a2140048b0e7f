//! Aircraft capability profile.
//!
//! One enum per capability axis. Each carries `Unset` (not decided yet) and
//! `Unsupported` (decided: nothing to drive) plus data variants that own every
//! handle the variant needs, so a bound variant is always complete.

use xnz_traits::{CommandHandle, Host, PropertyHandle};

use crate::config::SharesCfg;
use crate::curves::CurveVariant;

pub trait Capability {
    fn is_unset(&self) -> bool;
    fn is_supported(&self) -> bool;
}

macro_rules! capability {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Capability for $ty {
                fn is_unset(&self) -> bool {
                    matches!(self, Self::Unset)
                }
                fn is_supported(&self) -> bool {
                    !matches!(self, Self::Unset | Self::Unsupported)
                }
            }
        )*
    };
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EngineStart {
    #[default]
    Unset,
    Unsupported,
    /// Starter commands plus ignition-key and mixture arrays.
    Generic {
        starters: [CommandHandle; 2],
        ignition_key: PropertyHandle,
        mixture: PropertyHandle,
    },
    /// Rotary magneto switch driven by up/down pulses (OFF, R, L, BOTH, START).
    Magnetos {
        up: [CommandHandle; 2],
        down: [CommandHandle; 2],
        position: PropertyHandle,
        mixture: PropertyHandle,
    },
    /// Airbus engine master switches and mode selector.
    Toliss {
        master_on: [CommandHandle; 2],
        master_off: [CommandHandle; 2],
        mode_start: CommandHandle,
        mode_norm: CommandHandle,
    },
    Tbm900 {
        starter: CommandHandle,
        ignition: PropertyHandle,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Autopilot {
    #[default]
    Unset,
    Unsupported,
    Generic { servos_on: PropertyHandle },
}

impl Autopilot {
    pub fn servos_on(&self, host: &dyn Host) -> bool {
        match self {
            Autopilot::Generic { servos_on } => host.get_i32(*servos_on) > 0,
            Autopilot::Unset | Autopilot::Unsupported => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Autothrottle {
    #[default]
    Unset,
    Unsupported,
    Generic {
        engaged: PropertyHandle,
        toga: CommandHandle,
    },
    /// Airbus autothrust never moves the levers; it never blocks mapping.
    Airbus,
    Ixeg {
        armed: PropertyHandle,
        toga: CommandHandle,
    },
    Zibo {
        status: PropertyHandle,
        toga: CommandHandle,
    },
}

impl Autothrottle {
    /// True while the autothrottle owns the thrust levers.
    pub fn is_driving(&self, host: &dyn Host) -> bool {
        match self {
            Autothrottle::Generic { engaged, .. } => host.get_i32(*engaged) > 0,
            Autothrottle::Ixeg { armed, .. } => host.get_f32(*armed) > 0.5,
            Autothrottle::Zibo { status, .. } => host.get_i32(*status) > 0,
            Autothrottle::Airbus | Autothrottle::Unset | Autothrottle::Unsupported => false,
        }
    }

    pub fn toga(&self) -> Option<CommandHandle> {
        match self {
            Autothrottle::Generic { toga, .. }
            | Autothrottle::Ixeg { toga, .. }
            | Autothrottle::Zibo { toga, .. } => Some(*toga),
            Autothrottle::Airbus | Autothrottle::Unset | Autothrottle::Unsupported => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Autobrake {
    #[default]
    Unset,
    Unsupported,
    /// 0 = RTO, 1 = OFF, 2..=5 = settings.
    Generic { level: PropertyHandle },
    /// Push-buttons LO / MED / MAX; pressing the lit one switches it off.
    Buttons { settings: [CommandHandle; 3] },
    Knob {
        up: CommandHandle,
        down: CommandHandle,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WheelBrakes {
    #[default]
    Unset,
    Unsupported,
    Ratios {
        left: PropertyHandle,
        right: PropertyHandle,
    },
    /// Aircraft that override brake ratios; drive the host's held commands.
    HeldCommands {
        regular: CommandHandle,
        maximum: CommandHandle,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParkBrake {
    #[default]
    Unset,
    Unsupported,
    Ratio { ratio: PropertyHandle },
    Toliss { set: PropertyHandle },
    Zibo {
        toggle: CommandHandle,
        position: PropertyHandle,
    },
    Ixeg { lever: PropertyHandle },
}

impl ParkBrake {
    pub fn is_set(&self, host: &dyn Host) -> bool {
        match self {
            ParkBrake::Ratio { ratio } => host.get_f32(*ratio) > 0.5,
            ParkBrake::Toliss { set } => host.get_i32(*set) != 0,
            ParkBrake::Zibo { position, .. } => host.get_f32(*position) > 0.5,
            ParkBrake::Ixeg { lever } => host.get_f32(*lever) > 0.5,
            ParkBrake::Unset | ParkBrake::Unsupported => false,
        }
    }

    /// Returns `false` when there is nothing to drive.
    pub fn set(&self, host: &mut dyn Host, on: bool) -> bool {
        let ratio = if on { 1.0 } else { 0.0 };
        match self {
            ParkBrake::Ratio { ratio: p } => host.set_f32(*p, ratio),
            ParkBrake::Toliss { set } => host.set_i32(*set, i32::from(on)),
            ParkBrake::Ixeg { lever } => host.set_f32(*lever, ratio),
            ParkBrake::Zibo { toggle, .. } => {
                if self.is_set(host) != on {
                    host.command_once(*toggle);
                }
            }
            ParkBrake::Unset | ParkBrake::Unsupported => return false,
        }
        true
    }

    pub fn toggle(&self, host: &mut dyn Host) -> bool {
        let on = !self.is_set(host);
        self.set(host, on)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ThrottleOutput {
    #[default]
    Unset,
    Unsupported,
    /// Host ratio arrays; sign is carried by `prop_mode`, so the add-on
    /// toggles reverse itself.
    Generic {
        ratio: PropertyHandle,
        ratio_all: PropertyHandle,
        prop_mode: PropertyHandle,
        reverse_all: CommandHandle,
        reverse: [CommandHandle; 2],
    },
    /// Signed `[-1, 1]` two-element array.
    Toliss { input: PropertyHandle },
    /// Lever angles on a 0 (max reverse) / 20 (idle) / 65 (max) scale.
    Ff320 { levers: [PropertyHandle; 2] },
    /// Signed `[-1, 1]` scalar per lever.
    SignedPair { levers: [PropertyHandle; 2] },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReverseCapability {
    #[default]
    None,
    Reverse,
    /// Turboprops: beta range between forward and reverse.
    BetaReverse {
        beta_all: CommandHandle,
        beta: [CommandHandle; 2],
    },
}

capability!(
    EngineStart,
    Autopilot,
    Autothrottle,
    Autobrake,
    WheelBrakes,
    ParkBrake,
    ThrottleOutput,
);

/// Everything the engine drives for the loaded aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftProfile {
    pub name: &'static str,
    pub engine_start: EngineStart,
    pub autopilot: Autopilot,
    pub autothrottle: Autothrottle,
    pub autobrake: Autobrake,
    pub wheel_brakes: WheelBrakes,
    pub park_brake: ParkBrake,
    pub throttle: ThrottleOutput,
    pub curve: CurveVariant,
    /// Overrides the configured shares for continuous curves.
    pub shares: Option<SharesCfg>,
    pub reverse: ReverseCapability,
    pub asymmetric: bool,
    pub engine_count: usize,
}

impl AircraftProfile {
    /// Fresh profile for a probe to fill in; every axis `Unset`.
    pub fn unset(name: &'static str) -> Self {
        Self {
            name,
            engine_start: EngineStart::Unset,
            autopilot: Autopilot::Unset,
            autothrottle: Autothrottle::Unset,
            autobrake: Autobrake::Unset,
            wheel_brakes: WheelBrakes::Unset,
            park_brake: ParkBrake::Unset,
            throttle: ThrottleOutput::Unset,
            curve: CurveVariant::Generic,
            shares: None,
            reverse: ReverseCapability::None,
            asymmetric: false,
            engine_count: 0,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            name: "unsupported",
            engine_start: EngineStart::Unsupported,
            autopilot: Autopilot::Unsupported,
            autothrottle: Autothrottle::Unsupported,
            autobrake: Autobrake::Unsupported,
            wheel_brakes: WheelBrakes::Unsupported,
            park_brake: ParkBrake::Unsupported,
            throttle: ThrottleOutput::Unsupported,
            ..Self::unset("unsupported")
        }
    }

    /// No axis left `Unset`.
    pub fn is_complete(&self) -> bool {
        !(self.engine_start.is_unset()
            || self.autopilot.is_unset()
            || self.autothrottle.is_unset()
            || self.autobrake.is_unset()
            || self.wheel_brakes.is_unset()
            || self.park_brake.is_unset()
            || self.throttle.is_unset())
    }

    /// Per-axis summary for logs and the CLI.
    pub fn summary(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("engine_start", self.engine_start.is_supported()),
            ("autopilot", self.autopilot.is_supported()),
            ("autothrottle", self.autothrottle.is_supported()),
            ("autobrake", self.autobrake.is_supported()),
            ("wheel_brakes", self.wheel_brakes.is_supported()),
            ("park_brake", self.park_brake.is_supported()),
            ("throttle", self.throttle.is_supported()),
        ]
    }
}
