//! Run orchestration: sampling, event detection, masking, and window
//! derivation for one site and one night.

use tracing::{debug, info};

use crate::api::RunConfig;
use crate::ephemeris::PositionEngine;
use crate::error::{Result, ScheduleError};
use crate::models::{Body, EventKind, NightEvents, NightReport, ObservationPlan};
use crate::services::events::{find_crossing, find_peak, Direction};
use crate::services::safety_mask::{build_safety_mask, MOON_DANGER_DEG};
use crate::services::sampler::{sample_altitudes, SOURCE_SPAN_HOURS, SUN_MOON_SPAN_HOURS};
use crate::services::target_visibility::find_visibility_windows;
use crate::services::window_deriver::derive_windows;

/// Sun altitude below which the sky is dark enough to open the window.
pub const CRITICAL_DUSK_DEG: f64 = -18.0;

/// Sun altitude at which the window must already be closed. Asymmetric with
/// the dusk threshold by site policy: closing is stricter than opening.
pub const CRITICAL_DAWN_DEG: f64 = -15.0;

/// The local horizon.
pub const HORIZON_DEG: f64 = 0.0;

/// Compute the full night report for one run.
///
/// Deterministic and idempotent: identical configuration yields an identical
/// report. Fails fast on invalid configuration and fails the run when a
/// critical Sun crossing is absent from the sampled horizon.
pub fn compute_night_report(
    engine: &dyn PositionEngine,
    config: &RunConfig,
) -> Result<NightReport> {
    config.validate()?;
    info!(
        night = %config.night_start,
        latitude = config.site.latitude,
        longitude = config.site.longitude,
        "computing night plan"
    );

    let sun = sample_altitudes(
        engine,
        &config.site,
        &Body::Sun,
        config.night_start,
        SUN_MOON_SPAN_HOURS,
        config.interval_minutes,
    );
    let moon = sample_altitudes(
        engine,
        &config.site,
        &Body::Moon,
        config.night_start,
        SUN_MOON_SPAN_HOURS,
        config.interval_minutes,
    );

    let events = NightEvents {
        sunrise: find_crossing(&sun, HORIZON_DEG, Direction::Rising, EventKind::Rise),
        sunset: find_crossing(&sun, HORIZON_DEG, Direction::Falling, EventKind::Set),
        critical_dusk: find_crossing(
            &sun,
            CRITICAL_DUSK_DEG,
            Direction::Falling,
            EventKind::CriticalDusk,
        ),
        critical_dawn: find_crossing(
            &sun,
            CRITICAL_DAWN_DEG,
            Direction::Rising,
            EventKind::CriticalDawn,
        ),
        moonrise: find_crossing(&moon, HORIZON_DEG, Direction::Rising, EventKind::Rise),
        moonset: find_crossing(
            &moon,
            MOON_DANGER_DEG,
            Direction::Falling,
            EventKind::MoonDangerCross,
        ),
        moon_peak: find_peak(&moon),
    };
    for event in [
        &events.sunrise,
        &events.sunset,
        &events.critical_dusk,
        &events.critical_dawn,
        &events.moonrise,
        &events.moonset,
        &events.moon_peak,
    ]
    .into_iter()
    .flatten()
    {
        debug!(body = %event.body, kind = %event.kind, time = %event.time, "event detected");
    }

    let derived = derive_windows(&events)?;

    let critical_dawn_time = events
        .critical_dawn
        .as_ref()
        .map(|e| e.time)
        .ok_or_else(|| ScheduleError::missing_event("Sun", EventKind::CriticalDawn))?;
    let mask = build_safety_mask(&moon, &sun, critical_dawn_time);

    let mut sources = Vec::with_capacity(config.sources.len());
    let mut targets = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        let series = sample_altitudes(
            engine,
            &config.site,
            &Body::Fixed(source.clone()),
            config.night_start,
            SOURCE_SPAN_HOURS,
            config.interval_minutes,
        );
        targets.push(find_visibility_windows(&series));
        sources.push(series);
    }

    let plan = ObservationPlan {
        primary: derived.primary,
        secondary: derived.secondary,
        data_quality_start: derived.data_quality_start,
        policy_blocked: derived.policy_blocked,
        warnings: derived.warnings,
        targets,
    };
    info!(
        start = %plan.primary.start,
        end = %plan.primary.end,
        warnings = plan.warnings.len(),
        "night plan derived"
    );

    Ok(NightReport {
        plan,
        events,
        sun,
        moon,
        sources,
        mask,
    })
}
