#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Thrust-lever adapter core (host-agnostic).
//!
//! Maps a two-lever throttle quadrant with physical detents onto whatever
//! thrust interface the loaded aircraft exposes. Every simulator interaction
//! goes through `xnz_traits::Host` and `xnz_traits::Overlay`.
//!
//! ## Architecture
//!
//! - **Zones**: detent calibration split into reverse/climb/flex/takeoff (`zones`)
//! - **Curves**: lever position to signed thrust ratio per aircraft family (`curves`)
//! - **Detection**: probe table binding an [`AircraftProfile`] (`detect`, `profile`)
//! - **Output**: symmetric merge, idle hold, reverse/beta toggles, writes
//!   (`dispatch`, `hysteresis`, `reverse`)
//! - **Commands**: brake holds, engine start, TOGA, autobrake (`commands`)
//! - **Engine**: lifecycle and the periodic callbacks (`engine`, `builder`)
//!
//! All state lives in one [`Engine`] value; there are no statics.

pub mod axes;
pub mod builder;
pub mod commands;
pub mod config;
pub mod conversions;
pub mod curves;
pub mod detect;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod hysteresis;
pub mod nullzones;
pub mod overlay;
pub mod paths;
pub mod profile;
pub mod reverse;
pub mod zones;

pub use builder::EngineBuilder;
pub use commands::{CommandOutcome, XnzCommand};
pub use config::EngineCfg;
pub use curves::CurveVariant;
pub use dispatch::TickOutcome;
pub use engine::{Engine, HostMessage, ProfileLifecycle};
pub use error::{BuildError, Result, XnzError};
pub use profile::AircraftProfile;
pub use zones::{Zone, ZoneModel};
