//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "xnz", version, about = "Throttle quadrant adapter tools")]
pub struct Cli {
    /// Path to config TOML; built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Optional detent calibration CSV (strict `detent,raw` header)
    #[arg(long, value_name = "FILE")]
    pub calibration: Option<PathBuf>,

    /// Print results and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dump the lever-to-thrust table for one curve variant
    Curve {
        /// generic | nl-rev | w-rev | ddcl30 | toliss
        #[arg(long, value_name = "VARIANT", default_value = "generic")]
        variant: String,
        /// Number of intervals between full reverse and full forward
        #[arg(
            long,
            default_value_t = 100,
            value_parser = clap::value_parser!(u32).range(1..=100_000)
        )]
        steps: u32,
    },
    /// Replay a `left,right` lever trace against a simulated aircraft
    Simulate {
        /// laminar | toliss | ff320 | md80 | zibo | ixeg | turboprop
        #[arg(long, value_name = "PRESET", default_value = "laminar")]
        aircraft: String,
        /// CSV with headers `left,right` (raw axis values, 0..1)
        #[arg(long, value_name = "FILE")]
        trace: PathBuf,
    },
    /// Validate the config and run aircraft detection on the default simulated host
    SelfCheck,
}
