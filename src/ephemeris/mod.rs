//! Topocentric position engines.
//!
//! The sampler consumes positions through the [`PositionEngine`] trait so the
//! astronomy backend can be swapped; tests drive the pipeline with synthetic
//! analytic engines, production uses the built-in [`LowPrecisionEngine`].

pub mod low_precision;

pub use low_precision::{moon_illuminated_fraction, LowPrecisionEngine};

use chrono::{DateTime, Utc};

use crate::api::GeographicLocation;
use crate::models::Body;

/// Capability of returning the apparent altitude of a body for a given
/// observer and instant. Implementations must be deterministic and stateless
/// across calls.
pub trait PositionEngine {
    /// Apparent altitude of `body` in degrees above the local horizon.
    fn altitude_deg(&self, site: &GeographicLocation, body: &Body, at: DateTime<Utc>) -> f64;
}
