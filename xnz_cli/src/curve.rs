//! `curve`: sweep one curve variant across the lever travel.

use xnz_core::curves::{self, CurveVariant};
use xnz_core::error::{Result, XnzError};
use xnz_core::{EngineCfg, ZoneModel};

/// Slack for float noise when checking that the table never steps back.
const MONOTONIC_SLACK: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
    /// `None` inside a detent gap or past the end stops.
    pub zone: Option<&'static str>,
}

/// Map `steps + 1` evenly spaced lever positions. Fails on the first
/// backward step.
pub fn sweep(cfg: &EngineCfg, variant: CurveVariant, steps: u32) -> Result<Vec<CurvePoint>> {
    let zones = ZoneModel::recompute(&cfg.calibration).with_shares(&cfg.shares);
    let mut out = Vec::with_capacity(steps as usize + 1);
    let mut prev = f32::NEG_INFINITY;
    for i in 0..=steps {
        let x = i as f32 / steps as f32;
        let y = curves::map(x, &zones, variant);
        if y + MONOTONIC_SLACK < prev {
            return Err(XnzError::State(format!(
                "curve {} steps backwards at x={x:.4} ({prev:.4} -> {y:.4})",
                variant.name()
            ))
            .into());
        }
        prev = y;
        out.push(CurvePoint {
            x,
            y,
            zone: zones.locate(x).map(|z| z.name()),
        });
    }
    tracing::debug!(variant = variant.name(), points = out.len(), "curve swept");
    Ok(out)
}

pub fn print(points: &[CurvePoint], variant: CurveVariant, json: bool) {
    if json {
        for p in points {
            println!(
                "{}",
                serde_json::json!({
                    "variant": variant.name(),
                    "x": p.x,
                    "y": p.y,
                    "zone": p.zone,
                })
            );
        }
        return;
    }
    println!("# {}  x -> thrust", variant.name());
    for p in points {
        println!("{:6.4} {:8.4}  {}", p.x, p.y, p.zone.unwrap_or("-"));
    }
}
