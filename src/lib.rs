//! # nightplan
//!
//! Nightly observation-window planner for a ground-based instrument.
//!
//! Given one observing site and one UTC night, the crate samples the
//! altitudes of the Sun, the Moon, and a set of fixed celestial sources,
//! detects the night's rise/set/critical crossings and the Moon's peak, and
//! derives a safe observation window (plus, when the Moon splits the night,
//! a secondary window) together with a per-sample light-safety mask and
//! low-elevation visibility windows for each source.
//!
//! ## Architecture
//!
//! - [`api`]: validated run configuration (site, night, cadence, sources)
//! - [`config`]: TOML deployment configuration for the CLI
//! - [`models`]: series, events, windows, and the night report aggregate
//! - [`ephemeris`]: the position-engine seam and the built-in engine
//! - [`services`]: sampler, event detector, safety mask, target visibility,
//!   window deriver, and the pipeline tying them together
//! - [`error`]: explicit, non-retryable failure types
//!
//! The pipeline is a deterministic one-shot batch computation: identical
//! configuration yields a byte-identical report, and "now" is only consulted
//! at the CLI boundary that picks which night to schedule.

pub mod api;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod models;
pub mod services;

pub use api::{FixedSource, GeographicLocation, RunConfig};
pub use error::{Result, ScheduleError};
pub use models::{NightReport, ObservationPlan};
