//! Core data model: altitude series, events, windows, and the night plan.
//!
//! Every entity here is produced once per run and never mutated afterwards.
//! Series are built by the sampler, events and masks are derived from them,
//! and the [`NightReport`] is the sole artifact handed downstream.

pub mod plan;
pub mod series;

pub use plan::{
    Event, EventKind, NightEvents, NightReport, ObservationPlan, TargetVisibility, Warning, Window,
};
pub use series::{Body, Sample, Series};
