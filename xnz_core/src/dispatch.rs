//! Lever input merging and writes to the bound throttle output.

use xnz_traits::Host;

use crate::profile::ThrottleOutput;

/// FlightFactor A320 lever angle at idle.
pub const FF320_IDLE: f32 = 20.0;
/// Degrees of travel from idle to full forward.
pub const FF320_FORWARD_SPAN: f32 = 45.0;
/// Degrees of travel from idle to full reverse.
pub const FF320_REVERSE_SPAN: f32 = 20.0;

/// Result of one mapping tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Mapping off, no aircraft bound, or no lever pair assigned.
    Disabled,
    /// Hardware has not reported a position yet.
    AwaitingInput,
    /// Autothrottle owns the levers; `display` is the host's current setting.
    AutothrottleActive { display: f32 },
    /// Idle write suppressed by the idle hold.
    Skipped,
    /// Reverse or beta toggles issued instead of a write.
    ModeToggled { commands: usize },
    Written { values: [f32; 2], symmetric: bool },
}

/// Average the levers when the aircraft cannot split thrust or the levers
/// sit within `sync_band` of each other.
pub fn merge_symmetric(raw: [f32; 2], asymmetric: bool, sync_band: f32) -> ([f32; 2], bool) {
    if asymmetric && (raw[0] - raw[1]).abs() >= sync_band {
        return (raw, false);
    }
    let avg = (raw[0] + raw[1]) / 2.0;
    ([avg, avg], true)
}

pub fn ff320_lever(ratio: f32) -> f32 {
    if ratio >= 0.0 {
        FF320_IDLE + FF320_FORWARD_SPAN * ratio
    } else {
        FF320_IDLE + FF320_REVERSE_SPAN * ratio
    }
}

pub fn ff320_ratio(lever: f32) -> f32 {
    if lever >= FF320_IDLE {
        (lever - FF320_IDLE) / FF320_FORWARD_SPAN
    } else {
        (lever - FF320_IDLE) / FF320_REVERSE_SPAN
    }
}

/// Current per-engine thrust setting as the host reports it, signed where
/// the output is signed. Returns the values and how many are valid.
pub fn read_back(host: &dyn Host, output: &ThrottleOutput) -> ([f32; 2], usize) {
    let mut buf = [0.0f32; 2];
    let n = match output {
        ThrottleOutput::Generic { ratio, .. } => host.get_f32s(*ratio, 0, &mut buf),
        ThrottleOutput::Toliss { input } => host.get_f32s(*input, 0, &mut buf),
        ThrottleOutput::Ff320 { levers } => {
            for (v, lever) in buf.iter_mut().zip(levers) {
                *v = ff320_ratio(host.get_f32(*lever));
            }
            2
        }
        ThrottleOutput::SignedPair { levers } => {
            for (v, lever) in buf.iter_mut().zip(levers) {
                *v = host.get_f32(*lever);
            }
            2
        }
        ThrottleOutput::Unset | ThrottleOutput::Unsupported => 0,
    };
    (buf, n.min(2))
}

/// Single value for the overlay readout.
pub fn display_value(host: &dyn Host, output: &ThrottleOutput) -> Option<f32> {
    if let ThrottleOutput::Generic { ratio_all, .. } = output {
        return Some(host.get_f32(*ratio_all));
    }
    let (vals, n) = read_back(host, output);
    (n > 0).then(|| vals[..n].iter().sum::<f32>() / n as f32)
}

/// Write final values. Generic outputs expect unsigned ratios.
pub fn write(
    host: &mut dyn Host,
    output: &ThrottleOutput,
    values: [f32; 2],
    symmetric: bool,
) -> bool {
    match output {
        ThrottleOutput::Generic { ratio, ratio_all, .. } => {
            if symmetric {
                host.set_f32(*ratio_all, values[0]);
            } else {
                host.set_f32s(*ratio, 0, &values);
            }
        }
        ThrottleOutput::Toliss { input } => host.set_f32s(*input, 0, &values),
        ThrottleOutput::Ff320 { levers } => {
            for (lever, v) in levers.iter().zip(values) {
                host.set_f32(*lever, ff320_lever(v));
            }
        }
        ThrottleOutput::SignedPair { levers } => {
            for (lever, v) in levers.iter().zip(values) {
                host.set_f32(*lever, v);
            }
        }
        ThrottleOutput::Unset | ThrottleOutput::Unsupported => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_levers_merge() {
        let (vals, symmetric) = merge_symmetric([0.10, 0.11], true, 0.075);
        assert!(symmetric);
        assert!((vals[0] - 0.105).abs() < 1e-6);
        assert_eq!(vals[0], vals[1]);
    }

    #[test]
    fn split_levers_stay_split_only_when_capable() {
        assert_eq!(merge_symmetric([0.1, 0.5], true, 0.075), ([0.1, 0.5], false));
        let (vals, symmetric) = merge_symmetric([0.1, 0.5], false, 0.075);
        assert!(symmetric);
        assert!((vals[0] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn ff320_scale() {
        assert_eq!(ff320_lever(0.0), 20.0);
        assert_eq!(ff320_lever(1.0), 65.0);
        assert_eq!(ff320_lever(-1.0), 0.0);
        for r in [-1.0, -0.4, 0.0, 0.5, 1.0] {
            assert!((ff320_ratio(ff320_lever(r)) - r).abs() < 1e-6);
        }
    }
}
