//! Ephemeris sampling: altitude time series at fixed cadence.

use chrono::{DateTime, Duration, Utc};

use crate::api::GeographicLocation;
use crate::ephemeris::PositionEngine;
use crate::models::{Body, Sample, Series};

/// Sun and Moon are sampled past the nominal 24 hours so that events of the
/// following morning (critical dawn, late moonset) fall inside the horizon.
pub const SUN_MOON_SPAN_HOURS: u32 = 27;

/// Fixed sources repeat daily; one sidereal-ish day is enough.
pub const SOURCE_SPAN_HOURS: u32 = 24;

/// Produce the altitude series for `body` over `span_hours` starting at
/// `start`, one sample per `interval_minutes`.
///
/// Deterministic for identical inputs; no state persists across calls. The
/// caller (see [`crate::api::RunConfig::validate`]) guarantees a positive,
/// hour-dividing interval.
pub fn sample_altitudes(
    engine: &dyn PositionEngine,
    site: &GeographicLocation,
    body: &Body,
    start: DateTime<Utc>,
    span_hours: u32,
    interval_minutes: u32,
) -> Series {
    debug_assert!(interval_minutes > 0 && 60 % interval_minutes == 0);

    let steps = (span_hours * 60 / interval_minutes) as usize;
    let mut samples = Vec::with_capacity(steps);
    for step in 0..steps {
        let time = start + Duration::minutes((step as u32 * interval_minutes) as i64);
        samples.push(Sample {
            time,
            altitude_deg: engine.altitude_deg(site, body, time),
        });
    }
    Series::new(body.clone(), interval_minutes, samples)
}
