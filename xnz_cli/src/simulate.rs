//! `simulate`: replay a lever trace against a simulated aircraft.

use std::path::Path;

use serde::Deserialize;
use xnz_core::engine::NULLZONE_INTERVAL_S;
use xnz_core::error::Result;
use xnz_core::{EngineBuilder, EngineCfg, HostMessage, TickOutcome};
use xnz_sim::{Preset, SimOverlay};

/// One row of a lever trace CSV: raw axis values as the hardware reports them.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct TraceRow {
    pub left: f32,
    pub right: f32,
}

pub fn load_trace(path: &Path) -> Result<Vec<TraceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<&str> = headers.iter().collect();
    if actual != ["left", "right"] {
        eyre::bail!(
            "trace CSV must have headers 'left,right', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => eyre::bail!("invalid CSV row {}: {}", idx + 2, e),
        }
    }
    Ok(rows)
}

/// Short stable name for logs and JSON.
pub fn outcome_name(outcome: &TickOutcome) -> &'static str {
    match outcome {
        TickOutcome::Disabled => "disabled",
        TickOutcome::AwaitingInput => "awaiting_input",
        TickOutcome::AutothrottleActive { .. } => "autothrottle",
        TickOutcome::Skipped => "skipped",
        TickOutcome::ModeToggled { .. } => "mode_toggled",
        TickOutcome::Written { .. } => "written",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimSummary {
    pub profile: &'static str,
    pub ticks: usize,
    pub writes: usize,
    pub toggles: usize,
    pub skipped: usize,
}

pub fn run(cfg: EngineCfg, preset: Preset, trace: &[TraceRow], json: bool) -> Result<SimSummary> {
    let host = preset.build();
    let overlay = SimOverlay::new();
    let mut engine = EngineBuilder::new()
        .with_config(cfg)
        .with_host(host.clone())
        .with_overlay(overlay.clone())
        .build()?;
    engine.enable()?;
    engine.handle_message(HostMessage::LiveryLoaded { user: true });

    let mut summary = SimSummary {
        profile: engine.profile().map_or("none", |p| p.name),
        ..SimSummary::default()
    };
    tracing::info!(
        preset = preset.name(),
        profile = summary.profile,
        rows = trace.len(),
        "simulation start"
    );

    for (tick, row) in trace.iter().enumerate() {
        host.set_levers(row.left, row.right)?;
        let outcome = engine.throttle_tick();
        engine.flight_loop(NULLZONE_INTERVAL_S);
        summary.ticks += 1;
        match outcome {
            TickOutcome::Written { .. } => summary.writes += 1,
            TickOutcome::ModeToggled { commands } => summary.toggles += commands,
            TickOutcome::Skipped => summary.skipped += 1,
            TickOutcome::Disabled
            | TickOutcome::AwaitingInput
            | TickOutcome::AutothrottleActive { .. } => {}
        }
        print_tick(tick, row, &outcome, overlay.text().as_deref(), json);
    }

    engine.disable();
    tracing::info!(ticks = summary.ticks, writes = summary.writes, "simulation done");
    Ok(summary)
}

fn print_tick(
    tick: usize,
    row: &TraceRow,
    outcome: &TickOutcome,
    overlay: Option<&str>,
    json: bool,
) {
    let values = match outcome {
        TickOutcome::Written { values, .. } => Some(*values),
        TickOutcome::AutothrottleActive { display } => Some([*display, *display]),
        _ => None,
    };
    if json {
        println!(
            "{}",
            serde_json::json!({
                "tick": tick,
                "left": row.left,
                "right": row.right,
                "outcome": outcome_name(outcome),
                "values": values,
                "overlay": overlay,
            })
        );
        return;
    }
    let shown = values.map_or_else(|| "-".to_string(), |v| format!("{:7.4} {:7.4}", v[0], v[1]));
    println!(
        "{tick:>5} {:6.4} {:6.4}  {:<14} {shown}  {}",
        row.left,
        row.right,
        outcome_name(outcome),
        overlay.unwrap_or("")
    );
}

pub fn print_summary(summary: &SimSummary, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "profile": summary.profile,
                "ticks": summary.ticks,
                "writes": summary.writes,
                "toggles": summary.toggles,
                "skipped": summary.skipped,
            })
        );
    } else {
        println!(
            "profile={} ticks={} writes={} toggles={} skipped={}",
            summary.profile, summary.ticks, summary.writes, summary.toggles, summary.skipped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[(f32, f32)]) -> Vec<TraceRow> {
        values.iter().map(|&(left, right)| TraceRow { left, right }).collect()
    }

    #[test]
    fn idle_trace_stops_writing() {
        let trace = rows(&[(0.72, 0.72); 15]);
        let summary = run(EngineCfg::default(), Preset::Laminar, &trace, true).unwrap();
        assert_eq!(summary.profile, "generic");
        assert_eq!(summary.writes, 10);
        assert_eq!(summary.skipped, 5);
    }

    #[test]
    fn turboprop_reverse_toggles_once() {
        let trace = rows(&[(0.6677, 0.6677), (0.7679, 0.7679), (0.7679, 0.7679)]);
        let summary = run(EngineCfg::default(), Preset::Turboprop, &trace, true).unwrap();
        assert_eq!(summary.toggles, 1);
        assert_eq!(summary.writes, 2);
    }
}
