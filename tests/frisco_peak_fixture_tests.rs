//! Regression fixture: the reference site on the night of 2024-04-18 UTC,
//! computed with the built-in engine.
//!
//! The engine is deterministic, so the fixture pins the literal plan to the
//! minute. Any engine or derivation change that moves an event shows up here.

use chrono::{DateTime, TimeZone, Utc};

use nightplan::config::PlannerConfig;
use nightplan::ephemeris::LowPrecisionEngine;
use nightplan::models::{NightReport, Warning, Window};
use nightplan::services::compute_night_report;

fn fixture_report() -> NightReport {
    let night = Utc.with_ymd_and_hms(2024, 4, 18, 0, 0, 0).unwrap();
    let config = PlannerConfig::default()
        .into_run_config(night)
        .expect("default config valid");
    compute_night_report(&LowPrecisionEngine, &config).expect("plan derivable")
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 18, hour, minute, 0).unwrap()
}

#[test]
fn test_fixture_event_timestamps() {
    let report = fixture_report();
    let events = &report.events;

    // Frisco Peak is ~7.5 h of solar time behind Greenwich: the night lands
    // in the early-to-midday UTC hours of the 18th.
    assert_eq!(events.critical_dusk.as_ref().expect("dusk").time, at(3, 48));
    assert_eq!(
        events.critical_dawn.as_ref().expect("dawn").time,
        at(11, 35)
    );
    assert_eq!(events.moon_peak.as_ref().expect("peak").time, at(3, 39));
    assert_eq!(events.moonset.as_ref().expect("moonset").time, at(10, 57));

    // The horizon crossings bracket the twilight crossings.
    let sunset = events.sunset.as_ref().expect("sunset").time;
    let sunrise = events.sunrise.as_ref().expect("sunrise").time;
    assert!(sunset < at(3, 48), "sunset {sunset} after critical dusk");
    assert!(sunrise > at(11, 35), "sunrise {sunrise} before critical dawn");
}

#[test]
fn test_fixture_literal_plan() {
    let report = fixture_report();
    let plan = &report.plan;

    // The moon peaks before critical dusk and sets inside twilight, so the
    // primary window spans the whole dark time and the post-moonset remainder
    // becomes the secondary window.
    assert_eq!(plan.primary, Window::new(at(3, 48), at(11, 35)));
    assert_eq!(plan.secondary, Some(Window::new(at(10, 57), at(11, 35))));
    assert_eq!(plan.data_quality_start, at(3, 16));
    assert_eq!(plan.policy_blocked, None);

    // 38 minutes of secondary time falls short of the 95-minute minimum.
    assert_eq!(
        plan.warnings,
        vec![Warning::WindowTooShort {
            window: Window::new(at(10, 57), at(11, 35)),
            duration_minutes: 38,
        }]
    );
}

#[test]
fn test_fixture_series_shape() {
    let report = fixture_report();

    // Sun/Moon series cover 27 hours at one-minute cadence.
    assert_eq!(report.sun.len(), 27 * 60);
    assert_eq!(report.moon.len(), 27 * 60);
    assert_eq!(report.mask.len(), 27 * 60);
}

#[test]
fn test_fixture_target_visibility_windows() {
    let report = fixture_report();
    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.plan.targets.len(), 2);

    for (series, target) in report.sources.iter().zip(&report.plan.targets) {
        // Both standard sources transit and set daily at this latitude, so a
        // 24-hour span contains at least one descending band passage.
        assert_eq!(series.len(), 24 * 60);
        assert!(
            !target.windows.is_empty(),
            "{} should have a visibility window",
            target.source
        );
        for window in &target.windows {
            assert!(window.end >= window.start);
        }
    }
}

#[test]
fn test_fixture_is_byte_identical_across_runs() {
    let first = fixture_report();
    let second = fixture_report();

    assert_eq!(first, second);
    let a = serde_json::to_string(&first).expect("serializable");
    let b = serde_json::to_string(&second).expect("serializable");
    assert_eq!(a, b);
}

#[test]
fn test_fixture_unsafe_times_cover_daylight() {
    let report = fixture_report();
    // The first sample (00:00 UTC, local afternoon) has the sun well up and
    // must be flagged unsafe.
    assert!(report.sun.altitude(0) > -18.0);
    assert!(report.mask.is_unsafe(0));

    // Every unsafe timestamp lies on the sample grid.
    let unsafe_times = report.mask.unsafe_times();
    assert!(!unsafe_times.is_empty());
    for time in &unsafe_times {
        assert_eq!(time.timestamp() % 60, 0);
    }
}
