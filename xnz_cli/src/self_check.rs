//! `self-check`: validate the config, then bind the default simulated jet.

use xnz_core::error::{Result, XnzError};
use xnz_core::{EngineBuilder, EngineCfg, HostMessage, ProfileLifecycle};
use xnz_sim::{SimHost, SimOverlay};

#[derive(Debug, Clone, PartialEq)]
pub struct SelfCheckReport {
    pub profile: &'static str,
    pub curve: &'static str,
    pub engines: usize,
    pub asymmetric: bool,
    pub axes_captured: bool,
    pub supported: Vec<(&'static str, bool)>,
}

pub fn run(cfg: EngineCfg) -> Result<SelfCheckReport> {
    let mut engine = EngineBuilder::new()
        .with_config(cfg)
        .with_host(SimHost::laminar(2))
        .with_overlay(SimOverlay::new())
        .build()?;
    engine.enable()?;
    engine.handle_message(HostMessage::LiveryLoaded { user: true });

    let ProfileLifecycle::Bound(profile) = engine.lifecycle() else {
        return Err(XnzError::State(format!(
            "detection did not bind a profile (lifecycle {:?})",
            engine.lifecycle()
        ))
        .into());
    };
    let report = SelfCheckReport {
        profile: profile.name,
        curve: profile.curve.name(),
        engines: profile.engine_count,
        asymmetric: profile.asymmetric,
        axes_captured: engine.axes().is_captured(),
        supported: profile.summary(),
    };
    engine.disable();
    tracing::info!(profile = report.profile, axes = report.axes_captured, "self-check passed");
    Ok(report)
}

pub fn print(report: &SelfCheckReport, json: bool) {
    if json {
        let supported: serde_json::Map<String, serde_json::Value> = report
            .supported
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).into()))
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "profile": report.profile,
                "curve": report.curve,
                "engines": report.engines,
                "asymmetric": report.asymmetric,
                "axes_captured": report.axes_captured,
                "supported": supported,
            })
        );
        return;
    }
    println!("profile:    {}", report.profile);
    println!("curve:      {}", report.curve);
    println!("engines:    {}", report.engines);
    println!("asymmetric: {}", report.asymmetric);
    println!("axes:       {}", if report.axes_captured { "captured" } else { "not captured" });
    for (axis, ok) in &report.supported {
        println!("  {axis:<13} {}", if *ok { "ok" } else { "unsupported" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_jet_binds_generic() {
        let report = run(EngineCfg::default()).unwrap();
        assert_eq!(report.profile, "generic");
        assert_eq!(report.engines, 2);
        assert!(report.axes_captured);
        assert!(report.supported.iter().all(|(_, ok)| *ok));
    }
}
