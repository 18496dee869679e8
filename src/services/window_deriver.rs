//! Window derivation: combines Sun and Moon events into the night's
//! observation window(s).
//!
//! The instrument needs both bodies dim or below the horizon. Opening is
//! keyed to the Sun falling through -18 degrees and closing to it rising
//! through -15 degrees (closing is stricter than opening, by site policy).
//! A bright Moon peaking during the night truncates or splits the window,
//! because a high Moon dominates sky brightness even when it is nominally
//! past a simple horizon "set".

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ScheduleError};
use crate::models::{EventKind, NightEvents, Warning, Window};

/// Data-quality monitoring starts this many minutes before the window opens.
pub const DATA_QUALITY_LEAD_MINUTES: i64 = 32;

/// Secondary windows shorter than this are flagged advisory-only.
pub const MIN_SECONDARY_WINDOW_MINUTES: i64 = 95;

/// Windows derived from one night's events, before target visibility is
/// attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedWindows {
    pub primary: Window,
    pub secondary: Option<Window>,
    pub data_quality_start: DateTime<Utc>,
    /// Interval closed by policy when the Moon only sets after critical dawn.
    pub policy_blocked: Option<Window>,
    pub warnings: Vec<Warning>,
}

/// Derive the observation window(s) for the night.
///
/// Requires the Sun's critical dusk and critical dawn; their absence is fatal
/// for the run. Absence of the Moon's danger-cross ("moonset") or peak is
/// survivable and degrades to a primary-only plan.
pub fn derive_windows(events: &NightEvents) -> Result<DerivedWindows> {
    let critical_dusk = events
        .critical_dusk
        .as_ref()
        .map(|e| e.time)
        .ok_or_else(|| ScheduleError::missing_event("Sun", EventKind::CriticalDusk))?;
    let critical_dawn = events
        .critical_dawn
        .as_ref()
        .map(|e| e.time)
        .ok_or_else(|| ScheduleError::missing_event("Sun", EventKind::CriticalDawn))?;
    let moon_peak = events.moon_peak.as_ref().map(|e| e.time);
    let moonset = events.moonset.as_ref().map(|e| e.time);

    // The window always opens at critical dusk.
    let start_time = critical_dusk;

    // Named predicates over the event ordering; each case below is driven by
    // these alone.
    let moon_peak_in_twilight = moon_peak
        .is_some_and(|peak| critical_dusk < peak && peak < critical_dawn && start_time <= peak);
    let moonset_in_twilight =
        moonset.is_some_and(|set| critical_dusk < set && set < critical_dawn);
    let moonset_after_critical_dawn = moonset.is_some_and(|set| set > critical_dawn);

    let mut end_time = if moon_peak_in_twilight {
        // A bright Moon peaking mid-night caps the window at the peak.
        moon_peak.unwrap_or(critical_dawn)
    } else {
        critical_dawn
    };
    let data_quality_start = start_time - Duration::minutes(DATA_QUALITY_LEAD_MINUTES);

    let mut secondary = None;
    let mut policy_blocked = None;
    let mut warnings = Vec::new();

    if moon_peak_in_twilight {
        if let Some(peak) = moon_peak {
            if moonset_in_twilight {
                // The Moon sets during the night: the primary window runs to
                // critical dawn and a secondary window covers moonset to peak.
                let moonset_time = moonset.unwrap_or(peak);
                end_time = critical_dawn;
                let second = Window::new(moonset_time, peak);
                push_too_short_warning(&mut warnings, second, second.duration());
                secondary = Some(second);
            } else if moonset_after_critical_dawn {
                // The Moon never gets out of the way: the secondary window
                // shares the primary start and the stretch from moon peak to
                // critical dawn is closed by policy.
                let second = Window::new(start_time, peak);
                end_time = critical_dawn;
                push_too_short_warning(&mut warnings, second, peak - start_time);
                policy_blocked = Some(Window::new(peak, end_time));
                secondary = Some(second);
            }
        }
    } else if moonset_in_twilight {
        // Plain case: window runs dusk to dawn, but data before moonset is
        // moon-contaminated, so a secondary (clean) window starts at moonset.
        if let Some(moonset_time) = moonset {
            let second = Window::new(moonset_time, critical_dawn);
            push_too_short_warning(&mut warnings, second, second.duration());
            secondary = Some(second);
        }
    }

    Ok(DerivedWindows {
        primary: Window::new(start_time, end_time),
        secondary,
        data_quality_start,
        policy_blocked,
        warnings,
    })
}

fn push_too_short_warning(warnings: &mut Vec<Warning>, window: Window, duration: Duration) {
    if duration < Duration::minutes(MIN_SECONDARY_WINDOW_MINUTES) {
        warn!(
            start = %window.start,
            end = %window.end,
            minutes = duration.num_minutes(),
            "observation window too short"
        );
        warnings.push(Warning::WindowTooShort {
            window,
            duration_minutes: duration.num_minutes(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::models::{Body, Event};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 18, hour, minute, 0).unwrap()
    }

    fn sun_event(kind: EventKind, time: DateTime<Utc>) -> Option<Event> {
        Some(Event {
            time,
            kind,
            body: Body::Sun,
        })
    }

    fn moon_event(kind: EventKind, time: DateTime<Utc>) -> Option<Event> {
        Some(Event {
            time,
            kind,
            body: Body::Moon,
        })
    }

    fn night(
        dusk: Option<DateTime<Utc>>,
        dawn: Option<DateTime<Utc>>,
        peak: Option<DateTime<Utc>>,
        moonset: Option<DateTime<Utc>>,
    ) -> NightEvents {
        NightEvents {
            sunrise: None,
            sunset: None,
            critical_dusk: dusk.and_then(|t| sun_event(EventKind::CriticalDusk, t)),
            critical_dawn: dawn.and_then(|t| sun_event(EventKind::CriticalDawn, t)),
            moonrise: None,
            moonset: moonset.and_then(|t| moon_event(EventKind::MoonDangerCross, t)),
            moon_peak: peak.and_then(|t| moon_event(EventKind::Peak, t)),
        }
    }

    #[test]
    fn test_missing_critical_crossing_is_fatal() {
        let err = derive_windows(&night(None, Some(at(11, 30)), None, None)).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::MissingEvent {
                kind: EventKind::CriticalDusk,
                ..
            }
        ));

        let err = derive_windows(&night(Some(at(3, 50)), None, None, None)).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::MissingEvent {
                kind: EventKind::CriticalDawn,
                ..
            }
        ));
    }

    #[test]
    fn test_moon_outside_twilight_gives_plain_window() {
        // Peak before dusk, moonset before dusk: dusk-to-dawn window only.
        let derived =
            derive_windows(&night(Some(at(3, 50)), Some(at(11, 30)), Some(at(2, 0)), Some(at(3, 0))))
                .expect("plan");
        assert_eq!(derived.primary, Window::new(at(3, 50), at(11, 30)));
        assert!(derived.secondary.is_none());
        assert!(derived.policy_blocked.is_none());
        assert!(derived.warnings.is_empty());
        assert_eq!(derived.data_quality_start, at(3, 18));
    }

    #[test]
    fn test_missing_moon_events_degrade_to_primary_only() {
        let derived =
            derive_windows(&night(Some(at(3, 50)), Some(at(11, 30)), None, None)).expect("plan");
        assert_eq!(derived.primary, Window::new(at(3, 50), at(11, 30)));
        assert!(derived.secondary.is_none());
    }

    #[test]
    fn test_data_quality_start_is_fixed_lead() {
        let derived =
            derive_windows(&night(Some(at(4, 0)), Some(at(11, 0)), None, None)).expect("plan");
        assert_eq!(
            derived.primary.start - derived.data_quality_start,
            Duration::minutes(32)
        );
    }

    #[test]
    fn test_peak_and_moonset_in_twilight_split_the_night() {
        // Moonset 04:30, peak 08:00 (a later pass peaks before dawn): primary
        // reassigned to dawn, secondary moonset-to-peak.
        let derived = derive_windows(&night(
            Some(at(3, 50)),
            Some(at(11, 30)),
            Some(at(8, 0)),
            Some(at(4, 30)),
        ))
        .expect("plan");
        assert_eq!(derived.primary, Window::new(at(3, 50), at(11, 30)));
        assert_eq!(derived.secondary, Some(Window::new(at(4, 30), at(8, 0))));
        assert!(derived.policy_blocked.is_none());
        // 3.5 hours is comfortably over the minimum.
        assert!(derived.warnings.is_empty());
    }

    #[test]
    fn test_peak_and_moonset_in_twilight_short_secondary_warns() {
        let derived = derive_windows(&night(
            Some(at(3, 50)),
            Some(at(11, 30)),
            Some(at(6, 0)),
            Some(at(5, 0)),
        ))
        .expect("plan");
        assert_eq!(derived.secondary, Some(Window::new(at(5, 0), at(6, 0))));
        assert_eq!(derived.warnings.len(), 1);
        match &derived.warnings[0] {
            Warning::WindowTooShort {
                duration_minutes, ..
            } => assert_eq!(*duration_minutes, 60),
        }
    }

    #[test]
    fn test_moonset_after_dawn_blocks_tail_by_policy() {
        // Peak 09:00 in twilight, moonset after dawn: secondary shares the
        // primary start and the peak-to-dawn stretch is door-closed.
        let derived = derive_windows(&night(
            Some(at(3, 50)),
            Some(at(11, 30)),
            Some(at(9, 0)),
            Some(at(12, 30)),
        ))
        .expect("plan");
        assert_eq!(derived.primary, Window::new(at(3, 50), at(11, 30)));
        assert_eq!(derived.secondary, Some(Window::new(at(3, 50), at(9, 0))));
        assert_eq!(derived.policy_blocked, Some(Window::new(at(9, 0), at(11, 30))));
        assert!(derived.warnings.is_empty());
    }

    #[test]
    fn test_moonset_after_dawn_short_peak_gap_warns() {
        // Moon peaks 80 minutes after the window opens.
        let derived = derive_windows(&night(
            Some(at(3, 50)),
            Some(at(11, 30)),
            Some(at(5, 10)),
            Some(at(12, 0)),
        ))
        .expect("plan");
        assert_eq!(derived.warnings.len(), 1);
    }

    #[test]
    fn test_moonset_in_twilight_without_peak_gives_clean_secondary() {
        // Peak outside twilight, moonset inside: secondary runs moonset to
        // dawn and shares the primary end.
        let derived = derive_windows(&night(
            Some(at(3, 50)),
            Some(at(11, 30)),
            Some(at(2, 0)),
            Some(at(7, 0)),
        ))
        .expect("plan");
        assert_eq!(derived.primary, Window::new(at(3, 50), at(11, 30)));
        assert_eq!(derived.secondary, Some(Window::new(at(7, 0), at(11, 30))));
        assert!(derived.warnings.is_empty());
    }

    #[test]
    fn test_boundary_exactly_95_minutes_is_not_flagged() {
        // Moonset to dawn exactly 95 minutes.
        let derived = derive_windows(&night(
            Some(at(3, 50)),
            Some(at(11, 30)),
            Some(at(2, 0)),
            Some(at(9, 55)),
        ))
        .expect("plan");
        assert_eq!(derived.secondary, Some(Window::new(at(9, 55), at(11, 30))));
        assert!(derived.warnings.is_empty(), "95 minutes exactly is allowed");

        // One minute shorter is flagged.
        let derived = derive_windows(&night(
            Some(at(3, 50)),
            Some(at(11, 30)),
            Some(at(2, 0)),
            Some(at(9, 56)),
        ))
        .expect("plan");
        assert_eq!(derived.warnings.len(), 1);
    }

    #[test]
    fn test_peak_outside_twilight_never_truncates() {
        // Property: peak not in (dusk, dawn) means the primary end is dawn
        // and no step-4 branch fires.
        for peak_hour in [0, 1, 2, 12, 13] {
            let derived = derive_windows(&night(
                Some(at(3, 50)),
                Some(at(11, 30)),
                Some(at(peak_hour, 0)),
                Some(at(12, 0)),
            ))
            .expect("plan");
            assert_eq!(derived.primary.end, at(11, 30));
            assert!(derived.policy_blocked.is_none());
            assert!(derived.secondary.is_none());
        }
    }
}
