#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `xnz`: offline tools for the throttle quadrant adapter.

mod cli;
mod curve;
mod error_fmt;
mod logging;
mod self_check;
mod simulate;

use std::path::Path;

use clap::Parser;
use eyre::WrapErr;
use xnz_core::error::XnzError;
use xnz_core::{CurveVariant, EngineCfg};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("error reporter not installed: {e}");
    }
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(&cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        tracing::debug!(error = ?err, "command failed");
        std::process::exit(exit_code_for_error(&err));
    }
}

fn run(cli: &Cli) -> eyre::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    logging::init(&cli.log_level, cli.json, &config.logging)?;

    let mut cfg = EngineCfg::from(&config);
    if let Some(path) = cli.calibration.as_deref() {
        let detents = xnz_config::load_detents_csv(path)
            .map_err(|e| XnzError::Config(format!("{e:#}")))?;
        let cal = detents.into_calibration(config.calibration.deadband, config.calibration.invert);
        xnz_config::check_detents(&cal).map_err(|e| XnzError::Config(e.to_string()))?;
        tracing::info!(idle = cal.idle, climb = cal.climb, flex = cal.flex, "detents from CSV");
        cfg.calibration = (&cal).into();
    }

    match &cli.cmd {
        Commands::Curve { variant, steps } => {
            let variant: CurveVariant = variant.parse().map_err(|e: String| eyre::eyre!(e))?;
            let points = curve::sweep(&cfg, variant, *steps)?;
            curve::print(&points, variant, cli.json);
        }
        Commands::Simulate { aircraft, trace } => {
            let preset: xnz_sim::Preset = aircraft.parse()?;
            let rows = simulate::load_trace(trace)?;
            let summary = simulate::run(cfg, preset, &rows, cli.json)?;
            simulate::print_summary(&summary, cli.json);
        }
        Commands::SelfCheck => {
            let report = self_check::run(cfg)?;
            self_check::print(&report, cli.json);
        }
    }
    Ok(())
}

/// Read, parse and validate the TOML config. No path means built-in defaults.
fn load_config(path: Option<&Path>) -> eyre::Result<xnz_config::Config> {
    let Some(path) = path else {
        return Ok(xnz_config::Config::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| XnzError::Config(format!("read {}: {e}", path.display())))?;
    let config = xnz_config::load_toml(&text)
        .map_err(|e| XnzError::Config(format!("parse {}: {e}", path.display())))?;
    config
        .validate()
        .map_err(|e| XnzError::Config(format!("{e:#}")))
        .wrap_err_with(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}
