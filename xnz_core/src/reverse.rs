//! Reverse and beta range switching for ratio outputs.
//!
//! The host ratio arrays are unsigned; the sign lives in the engine's
//! discrete mode. A tick that has to change mode issues the toggle and
//! writes nothing, so the write never races the host's own mode change.

use xnz_traits::{CommandHandle, Host, PropertyHandle};

use crate::profile::ReverseCapability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscreteThrustMode {
    Forward,
    Beta,
    Reverse,
}

impl DiscreteThrustMode {
    /// `None` for feathered (0) or any out-of-range value.
    pub fn from_prop_mode(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Forward),
            2 => Some(Self::Beta),
            3 => Some(Self::Reverse),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    Keep,
    ToggleReverse,
    ToggleBeta,
}

/// Mode change needed for `mapped` given the live mode.
pub fn request(cap: &ReverseCapability, live: DiscreteThrustMode, mapped: f32) -> ModeRequest {
    use DiscreteThrustMode::*;
    if matches!(cap, ReverseCapability::None) {
        return ModeRequest::Keep;
    }
    let want_reverse = mapped < 0.0;
    match (want_reverse, live) {
        (true, Reverse) | (false, Forward) => ModeRequest::Keep,
        (true, _) | (false, Reverse) => ModeRequest::ToggleReverse,
        (false, Beta) => match cap {
            ReverseCapability::BetaReverse { .. } => ModeRequest::ToggleBeta,
            _ => ModeRequest::ToggleReverse,
        },
    }
}

/// Handles of a generic ratio output needed to switch modes.
#[derive(Debug, Clone, Copy)]
pub struct ModeCommands<'a> {
    pub prop_mode: PropertyHandle,
    pub reverse_all: CommandHandle,
    pub reverse: &'a [CommandHandle; 2],
    pub capability: &'a ReverseCapability,
}

impl ModeCommands<'_> {
    fn command(&self, req: ModeRequest, engine: Option<usize>) -> Option<CommandHandle> {
        match (req, self.capability, engine) {
            (ModeRequest::Keep, _, _) => None,
            (ModeRequest::ToggleReverse, _, None) => Some(self.reverse_all),
            (ModeRequest::ToggleReverse, _, Some(i)) => Some(self.reverse[i]),
            (ModeRequest::ToggleBeta, ReverseCapability::BetaReverse { beta_all, .. }, None) => {
                Some(*beta_all)
            }
            (ModeRequest::ToggleBeta, ReverseCapability::BetaReverse { beta, .. }, Some(i)) => {
                Some(beta[i])
            }
            (ModeRequest::ToggleBeta, _, _) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReverseStep {
    /// Toggle commands were issued; skip the write.
    Toggled(usize),
    /// Unsigned ratios to write.
    Write([f32; 2]),
}

/// Resolve signed outputs into mode toggles or unsigned ratios.
pub fn resolve(
    host: &mut dyn Host,
    cmds: &ModeCommands<'_>,
    mapped: [f32; 2],
    symmetric: bool,
) -> ReverseStep {
    let mut modes = [0i32; 2];
    let engines = if symmetric { 1 } else { 2 };
    host.get_i32s(cmds.prop_mode, 0, &mut modes[..engines]);
    if symmetric {
        modes[1] = modes[0];
    }

    let mut toggled = 0;
    let mut out = [0.0f32; 2];
    for i in 0..engines {
        let Some(live) = DiscreteThrustMode::from_prop_mode(modes[i]) else {
            tracing::debug!(
                engine = i,
                prop_mode = modes[i],
                "unknown engine mode; output forced to zero"
            );
            out[i] = 0.0;
            continue;
        };
        let req = request(cmds.capability, live, mapped[i]);
        let engine = (!symmetric).then_some(i);
        if let Some(cmd) = cmds.command(req, engine) {
            host.command_once(cmd);
            toggled += 1;
            tracing::debug!(engine = i, ?live, ?req, "thrust mode toggle");
            continue;
        }
        out[i] = match cmds.capability {
            ReverseCapability::None => mapped[i].max(0.0),
            _ => mapped[i].abs(),
        };
    }
    if symmetric {
        out[1] = out[0];
    }

    if toggled > 0 {
        ReverseStep::Toggled(toggled)
    } else {
        ReverseStep::Write(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const REV: ReverseCapability = ReverseCapability::Reverse;
    const BETA: ReverseCapability = ReverseCapability::BetaReverse {
        beta_all: CommandHandle(1),
        beta: [CommandHandle(2), CommandHandle(3)],
    };

    #[rstest]
    #[case(REV, DiscreteThrustMode::Forward, -0.02, ModeRequest::ToggleReverse)]
    #[case(REV, DiscreteThrustMode::Reverse, -0.50, ModeRequest::Keep)]
    #[case(REV, DiscreteThrustMode::Reverse, 0.0, ModeRequest::ToggleReverse)]
    #[case(REV, DiscreteThrustMode::Beta, 0.3, ModeRequest::ToggleReverse)]
    #[case(BETA, DiscreteThrustMode::Beta, 0.3, ModeRequest::ToggleBeta)]
    #[case(BETA, DiscreteThrustMode::Beta, -0.3, ModeRequest::ToggleReverse)]
    #[case(BETA, DiscreteThrustMode::Forward, 0.3, ModeRequest::Keep)]
    #[case(ReverseCapability::None, DiscreteThrustMode::Forward, -1.0, ModeRequest::Keep)]
    fn mode_requests(
        #[case] cap: ReverseCapability,
        #[case] live: DiscreteThrustMode,
        #[case] mapped: f32,
        #[case] expected: ModeRequest,
    ) {
        assert_eq!(request(&cap, live, mapped), expected);
    }

    #[test]
    fn prop_mode_decoding() {
        assert_eq!(DiscreteThrustMode::from_prop_mode(0), None);
        assert_eq!(DiscreteThrustMode::from_prop_mode(1), Some(DiscreteThrustMode::Forward));
        assert_eq!(DiscreteThrustMode::from_prop_mode(3), Some(DiscreteThrustMode::Reverse));
        assert_eq!(DiscreteThrustMode::from_prop_mode(7), None);
    }
}
