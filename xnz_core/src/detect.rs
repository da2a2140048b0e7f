//! Aircraft profile detection.
//!
//! Probes run in priority order; the first whose `matches` accepts the loaded
//! aircraft binds its handles. A binding failure inside a probe makes the whole
//! profile unsupported. Axes a probe leaves `Unset` (or every axis, when no
//! probe matches) fall back one by one to the host's generic bindings.

use xnz_traits::{CommandHandle, Host, PropertyHandle};

use crate::config::SharesCfg;
use crate::curves::CurveVariant;
use crate::error::XnzError;
use crate::paths;
use crate::profile::{
    AircraftProfile, Autobrake, Autopilot, Autothrottle, Capability, EngineStart, ParkBrake,
    ReverseCapability, ThrottleOutput, WheelBrakes,
};

/// Host engine-type codes for free and fixed turbines (turboprops).
const TURBOPROP_TYPES: [i32; 2] = [2, 8];

/// Metadata of the loaded user aircraft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AircraftInfo {
    pub author: String,
    pub description: String,
    pub icao: String,
    pub engine_count: usize,
    pub engine_types: Vec<i32>,
}

impl AircraftInfo {
    pub fn read(host: &dyn Host) -> Self {
        let text = |path: &str| {
            host.find_property(path)
                .map(|p| host.get_string(p))
                .unwrap_or_default()
        };
        let engine_count = host
            .find_property(paths::sim::ENGINE_COUNT)
            .map(|p| host.get_i32(p).max(0) as usize)
            .unwrap_or(0);
        let mut engine_types = vec![0; engine_count.min(8)];
        if let Some(p) = host.find_property(paths::sim::ENGINE_TYPES) {
            let n = host.get_i32s(p, 0, &mut engine_types);
            engine_types.truncate(n);
        }
        Self {
            author: text(paths::sim::AUTHOR),
            description: text(paths::sim::DESCRIPTION),
            icao: text(paths::sim::ICAO),
            engine_count,
            engine_types,
        }
    }

    pub fn author_is(&self, prefix: &str) -> bool {
        starts_with_ignore_case(&self.author, prefix)
    }

    pub fn description_is(&self, prefix: &str) -> bool {
        starts_with_ignore_case(&self.description, prefix)
    }

    pub fn icao_is(&self, prefix: &str) -> bool {
        starts_with_ignore_case(&self.icao, prefix)
    }

    pub fn is_turboprop(&self) -> bool {
        self.engine_types
            .iter()
            .any(|t| TURBOPROP_TYPES.contains(t))
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Whether the two levers may drive the engines independently.
///
/// Only the last two of at most three engines are compared: two engines of
/// the same type, or three whose last one differs (a special-effects dummy
/// engine), count as a twin.
pub fn asymmetric_capable(engine_count: usize, engine_types: &[i32]) -> bool {
    if engine_count < 2 {
        return false;
    }
    let n = engine_count.min(3);
    if engine_types.len() < n {
        return false;
    }
    let dummy = usize::from(engine_types[n - 1] != engine_types[n - 2]);
    n - dummy == 2
}

/// Resolves paths to handles, failing on the first missing one.
pub struct Binder<'a> {
    host: &'a dyn Host,
}

impl<'a> Binder<'a> {
    pub fn new(host: &'a dyn Host) -> Self {
        Self { host }
    }

    pub fn property(&mut self, path: &str) -> Result<PropertyHandle, XnzError> {
        self.host
            .find_property(path)
            .ok_or_else(|| XnzError::Binding(path.to_string()))
    }

    pub fn command(&mut self, path: &str) -> Result<CommandHandle, XnzError> {
        self.host
            .find_command(path)
            .ok_or_else(|| XnzError::Binding(path.to_string()))
    }

    pub fn properties<const N: usize>(
        &mut self,
        paths: [&str; N],
    ) -> Result<[PropertyHandle; N], XnzError> {
        let mut out = [PropertyHandle(0); N];
        for (slot, path) in out.iter_mut().zip(paths) {
            *slot = self.property(path)?;
        }
        Ok(out)
    }

    pub fn commands<const N: usize>(
        &mut self,
        paths: [&str; N],
    ) -> Result<[CommandHandle; N], XnzError> {
        let mut out = [CommandHandle(0); N];
        for (slot, path) in out.iter_mut().zip(paths) {
            *slot = self.command(path)?;
        }
        Ok(out)
    }
}

type BindFn = fn(&mut Binder<'_>, &AircraftInfo) -> Result<AircraftProfile, XnzError>;

/// One recognised third-party integration.
#[derive(Clone, Copy)]
pub struct Probe {
    pub name: &'static str,
    pub matches: fn(&dyn Host, &AircraftInfo) -> bool,
    pub bind: BindFn,
}

impl core::fmt::Debug for Probe {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Probe").field("name", &self.name).finish()
    }
}

/// Recognised integrations, highest priority first.
pub static PROBES: &[Probe] = &[
    Probe {
        name: "flightfactor-a320",
        matches: |host, _| host.plugin_active(paths::ff320::SIGNATURE),
        bind: bind_ff320,
    },
    Probe {
        name: "toliss",
        matches: |host, _| {
            paths::toliss::SIGNATURES
                .iter()
                .any(|sig| host.plugin_active(sig))
        },
        bind: bind_toliss,
    },
    Probe {
        name: "rotate-md80",
        matches: |host, _| host.plugin_active(paths::md80::SIGNATURE),
        bind: bind_md80,
    },
    Probe {
        name: "tbm900",
        matches: |host, _| host.plugin_active(paths::tbm900::SIGNATURE),
        bind: bind_tbm900,
    },
    Probe {
        name: "ixeg-733",
        matches: |host, info| host.plugin_active(paths::ixeg::SIGNATURE) && info.icao_is("B733"),
        bind: bind_ixeg,
    },
    Probe {
        name: "zibo-738",
        matches: |host, info| {
            host.find_property(paths::zibo::MARKER).is_some() && info.icao_is("B738")
        },
        bind: bind_zibo,
    },
    Probe {
        name: "flightfactor-757-767",
        matches: |_, info| {
            info.author_is("FlightFactor")
                && ["B752", "B753", "B763", "B764"]
                    .iter()
                    .any(|icao| info.icao_is(icao))
        },
        bind: |_, _| {
            Ok(AircraftProfile {
                curve: CurveVariant::NlRev,
                shares: Some(SharesCfg {
                    climb: 0.70,
                    flex: 0.87,
                    takeoff: 0.95,
                }),
                ..AircraftProfile::unset("flightfactor-757-767")
            })
        },
    },
    Probe {
        name: "jardesign",
        matches: |host, _| host.plugin_active(paths::jardesign::SIGNATURE),
        bind: |_, _| {
            Ok(AircraftProfile {
                curve: CurveVariant::Toliss,
                autothrottle: Autothrottle::Airbus,
                ..AircraftProfile::unset("jardesign")
            })
        },
    },
    Probe {
        name: "ssg-748",
        matches: |_, info| info.author_is("SSG"),
        bind: |_, _| {
            Ok(AircraftProfile {
                curve: CurveVariant::NlRev,
                ..AircraftProfile::unset("ssg-748")
            })
        },
    },
    Probe {
        name: "felis-742",
        matches: |_, info| info.author_is("Felis"),
        bind: |b, _| {
            Ok(AircraftProfile {
                curve: CurveVariant::NlRev,
                engine_start: generic_engine_start(b)?,
                ..AircraftProfile::unset("felis-742")
            })
        },
    },
    Probe {
        name: "ddenn-cl300",
        matches: |host, info| {
            host.find_plugin(paths::sasl::SIGNATURE).is_some()
                && info.author_is("Denis 'ddenn' Krupin")
                && info.description_is("Bombardier Challenger 300")
        },
        bind: |_, _| {
            Ok(AircraftProfile {
                curve: CurveVariant::Ddcl30,
                ..AircraftProfile::unset("ddenn-cl300")
            })
        },
    },
    Probe {
        name: "aerobask",
        matches: |_, info| info.author_is("Aerobask"),
        bind: |b, _| {
            Ok(AircraftProfile {
                engine_start: magnetos(b)?,
                ..AircraftProfile::unset("aerobask")
            })
        },
    },
    Probe {
        name: "carenado",
        matches: |host, info| {
            info.author_is("Carenado") && host.find_plugin(paths::sasl::SIGNATURE).is_some()
        },
        bind: |b, info| {
            let mut profile = AircraftProfile {
                engine_start: magnetos(b)?,
                ..AircraftProfile::unset("carenado")
            };
            if info.is_turboprop() {
                profile.curve = CurveVariant::WRev;
                profile.reverse = beta_reverse(b)?;
            }
            Ok(profile)
        },
    },
    Probe {
        name: "torquesim",
        matches: |_, info| info.author_is("Torquesim"),
        bind: |b, _| {
            Ok(AircraftProfile {
                engine_start: magnetos(b)?,
                ..AircraftProfile::unset("torquesim")
            })
        },
    },
    Probe {
        name: "turboprop",
        matches: |_, info| info.is_turboprop(),
        bind: |b, _| {
            Ok(AircraftProfile {
                curve: CurveVariant::WRev,
                reverse: beta_reverse(b)?,
                ..AircraftProfile::unset("turboprop")
            })
        },
    },
];

fn bind_ff320(b: &mut Binder<'_>, _: &AircraftInfo) -> Result<AircraftProfile, XnzError> {
    Ok(AircraftProfile {
        throttle: ThrottleOutput::Ff320 {
            levers: b.properties(paths::ff320::LEVERS)?,
        },
        autothrottle: Autothrottle::Airbus,
        curve: CurveVariant::Toliss,
        reverse: ReverseCapability::None,
        ..AircraftProfile::unset("flightfactor-a320")
    })
}

fn bind_toliss(b: &mut Binder<'_>, _: &AircraftInfo) -> Result<AircraftProfile, XnzError> {
    use paths::toliss;
    Ok(AircraftProfile {
        throttle: ThrottleOutput::Toliss {
            input: b.property(toliss::THROTTLE_INPUT)?,
        },
        engine_start: EngineStart::Toliss {
            master_on: b.commands(toliss::MASTER_ON_N)?,
            master_off: b.commands(toliss::MASTER_OFF_N)?,
            mode_start: b.command(toliss::MODE_START)?,
            mode_norm: b.command(toliss::MODE_NORM)?,
        },
        park_brake: ParkBrake::Toliss {
            set: b.property(toliss::PARK_BRAKE)?,
        },
        autobrake: Autobrake::Buttons {
            settings: b.commands(toliss::AUTOBRAKE)?,
        },
        autothrottle: Autothrottle::Airbus,
        curve: CurveVariant::Toliss,
        reverse: ReverseCapability::None,
        ..AircraftProfile::unset("toliss")
    })
}

fn bind_md80(b: &mut Binder<'_>, _: &AircraftInfo) -> Result<AircraftProfile, XnzError> {
    Ok(AircraftProfile {
        throttle: ThrottleOutput::SignedPair {
            levers: b.properties(paths::md80::LEVERS)?,
        },
        curve: CurveVariant::NlRev,
        reverse: ReverseCapability::None,
        ..AircraftProfile::unset("rotate-md80")
    })
}

fn bind_tbm900(b: &mut Binder<'_>, _: &AircraftInfo) -> Result<AircraftProfile, XnzError> {
    Ok(AircraftProfile {
        engine_start: EngineStart::Tbm900 {
            starter: b.command(paths::tbm900::STARTER)?,
            ignition: b.property(paths::tbm900::IGNITION)?,
        },
        curve: CurveVariant::WRev,
        reverse: beta_reverse(b)?,
        ..AircraftProfile::unset("tbm900")
    })
}

fn bind_ixeg(b: &mut Binder<'_>, _: &AircraftInfo) -> Result<AircraftProfile, XnzError> {
    Ok(AircraftProfile {
        autothrottle: Autothrottle::Ixeg {
            armed: b.property(paths::ixeg::AT_ARMED)?,
            toga: b.command(paths::sim::TOGA)?,
        },
        park_brake: ParkBrake::Ixeg {
            lever: b.property(paths::ixeg::PARK_BRAKE)?,
        },
        curve: CurveVariant::NlRev,
        shares: Some(SharesCfg {
            climb: 0.69,
            flex: 0.87,
            takeoff: 0.94,
        }),
        ..AircraftProfile::unset("ixeg-733")
    })
}

fn bind_zibo(b: &mut Binder<'_>, _: &AircraftInfo) -> Result<AircraftProfile, XnzError> {
    use paths::zibo;
    Ok(AircraftProfile {
        autothrottle: Autothrottle::Zibo {
            status: b.property(zibo::AT_STATUS)?,
            toga: b.command(zibo::TOGA)?,
        },
        park_brake: ParkBrake::Zibo {
            toggle: b.command(zibo::PARK_BRAKE_TOGGLE)?,
            position: b.property(zibo::PARK_BRAKE_POS)?,
        },
        autobrake: Autobrake::Knob {
            up: b.command(zibo::AUTOBRAKE_UP)?,
            down: b.command(zibo::AUTOBRAKE_DOWN)?,
        },
        curve: CurveVariant::NlRev,
        ..AircraftProfile::unset("zibo-738")
    })
}

fn magnetos(b: &mut Binder<'_>) -> Result<EngineStart, XnzError> {
    Ok(EngineStart::Magnetos {
        up: b.commands(paths::sim::MAGNETOS_UP_N)?,
        down: b.commands(paths::sim::MAGNETOS_DOWN_N)?,
        position: b.property(paths::sim::IGNITION_KEY)?,
        mixture: b.property(paths::sim::MIXTURE)?,
    })
}

fn beta_reverse(b: &mut Binder<'_>) -> Result<ReverseCapability, XnzError> {
    Ok(ReverseCapability::BetaReverse {
        beta_all: b.command(paths::sim::BETA_TOGGLE)?,
        beta: b.commands(paths::sim::BETA_TOGGLE_N)?,
    })
}

fn generic_engine_start(b: &mut Binder<'_>) -> Result<EngineStart, XnzError> {
    Ok(EngineStart::Generic {
        starters: b.commands(paths::sim::STARTER_N)?,
        ignition_key: b.property(paths::sim::IGNITION_KEY)?,
        mixture: b.property(paths::sim::MIXTURE)?,
    })
}

fn generic_throttle(b: &mut Binder<'_>) -> Result<ThrottleOutput, XnzError> {
    use paths::sim;
    Ok(ThrottleOutput::Generic {
        ratio: b.property(sim::THROTTLE_RATIO)?,
        ratio_all: b.property(sim::THROTTLE_RATIO_ALL)?,
        prop_mode: b.property(sim::PROP_MODE)?,
        reverse_all: b.command(sim::REVERSE_TOGGLE)?,
        reverse: b.commands(sim::REVERSE_TOGGLE_N)?,
    })
}

fn generic_autothrottle(b: &mut Binder<'_>) -> Result<Autothrottle, XnzError> {
    Ok(Autothrottle::Generic {
        engaged: b.property(paths::sim::AUTOTHROTTLE_ON)?,
        toga: b.command(paths::sim::TOGA)?,
    })
}

/// Brake ratios when the host exposes them, held brake commands otherwise.
fn generic_wheel_brakes(b: &mut Binder<'_>) -> Result<WheelBrakes, XnzError> {
    use paths::sim;
    if let Ok([left, right]) = b.properties([sim::LEFT_BRAKE, sim::RIGHT_BRAKE]) {
        return Ok(WheelBrakes::Ratios { left, right });
    }
    Ok(WheelBrakes::HeldCommands {
        regular: b.command(sim::BRAKES_REGULAR)?,
        maximum: b.command(sim::BRAKES_MAX)?,
    })
}

fn or_unsupported<T>(axis: &'static str, bound: Result<T, XnzError>, unsupported: T) -> T {
    bound.unwrap_or_else(|e| {
        tracing::debug!(axis, error = %e, "no generic binding");
        unsupported
    })
}

/// Replace every `Unset` axis with its generic host binding, or `Unsupported`.
fn fill_generic(b: &mut Binder<'_>, profile: &mut AircraftProfile) {
    use paths::sim;
    if profile.engine_start.is_unset() {
        profile.engine_start = or_unsupported(
            "engine_start",
            generic_engine_start(b),
            EngineStart::Unsupported,
        );
    }
    if profile.autopilot.is_unset() {
        let bound = b
            .property(sim::SERVOS_ON)
            .map(|servos_on| Autopilot::Generic { servos_on });
        profile.autopilot = or_unsupported("autopilot", bound, Autopilot::Unsupported);
    }
    if profile.autothrottle.is_unset() {
        profile.autothrottle = or_unsupported(
            "autothrottle",
            generic_autothrottle(b),
            Autothrottle::Unsupported,
        );
    }
    if profile.autobrake.is_unset() {
        let bound = b
            .property(sim::AUTOBRAKE_LEVEL)
            .map(|level| Autobrake::Generic { level });
        profile.autobrake = or_unsupported("autobrake", bound, Autobrake::Unsupported);
    }
    if profile.wheel_brakes.is_unset() {
        profile.wheel_brakes = or_unsupported(
            "wheel_brakes",
            generic_wheel_brakes(b),
            WheelBrakes::Unsupported,
        );
    }
    if profile.park_brake.is_unset() {
        let bound = b
            .property(sim::PARK_BRAKE)
            .map(|ratio| ParkBrake::Ratio { ratio });
        profile.park_brake = or_unsupported("park_brake", bound, ParkBrake::Unsupported);
    }
    if profile.throttle.is_unset() {
        profile.throttle = or_unsupported(
            "throttle",
            generic_throttle(b),
            ThrottleOutput::Unsupported,
        );
    }
    // A generic ratio output without its own reverse handling gets plain reversers.
    if matches!(profile.throttle, ThrottleOutput::Generic { .. })
        && profile.reverse == ReverseCapability::None
    {
        profile.reverse = ReverseCapability::Reverse;
    }
}

/// Run the default probe table.
pub fn detect(host: &dyn Host) -> AircraftProfile {
    detect_with(host, PROBES)
}

pub fn detect_with(host: &dyn Host, probes: &[Probe]) -> AircraftProfile {
    let info = AircraftInfo::read(host);
    let mut binder = Binder::new(host);

    let mut profile = match probes.iter().find(|p| (p.matches)(host, &info)) {
        Some(probe) => match (probe.bind)(&mut binder, &info) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(
                    probe = probe.name,
                    error = %e,
                    "aircraft binding failed; disabling integration"
                );
                return AircraftProfile::unsupported();
            }
        },
        None => AircraftProfile::unset("generic"),
    };

    fill_generic(&mut binder, &mut profile);
    profile.engine_count = info.engine_count;
    profile.asymmetric = asymmetric_capable(info.engine_count, &info.engine_types);

    tracing::info!(
        profile = profile.name,
        curve = profile.curve.name(),
        engines = profile.engine_count,
        asymmetric = profile.asymmetric,
        "aircraft profile bound"
    );
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asymmetric_rule_is_literal() {
        assert!(!asymmetric_capable(1, &[5]));
        assert!(asymmetric_capable(2, &[5, 5]));
        assert!(!asymmetric_capable(2, &[5, 2]));
        assert!(!asymmetric_capable(3, &[5, 5, 5]));
        assert!(asymmetric_capable(3, &[2, 2, 0]));
        // four identical engines: capped at three, no dummy
        assert!(!asymmetric_capable(4, &[5, 5, 5, 5]));
        assert!(!asymmetric_capable(2, &[5]));
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let info = AircraftInfo {
            author: "Denis 'DDenn' Krupin, 2020".into(),
            icao: "b738".into(),
            ..Default::default()
        };
        assert!(info.author_is("Denis 'ddenn' Krupin"));
        assert!(info.icao_is("B738"));
        assert!(!info.icao_is("B7388"));
    }
}
