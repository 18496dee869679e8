//! Events, windows, and the observation plan aggregate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Body, Series};
use crate::services::safety_mask::SafetyMask;

/// Kind of a detected event. At most one instance per kind and body per run;
/// absence is a valid value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Rising crossing of the horizon (0 degrees).
    Rise,
    /// Falling crossing of the horizon (0 degrees).
    Set,
    /// Sun falling through -18 degrees; the sky is dark enough to open.
    CriticalDusk,
    /// Sun rising through -15 degrees; the window must be closed.
    CriticalDawn,
    /// Series-wide altitude maximum.
    Peak,
    /// Moon falling through -3 degrees; below this the Moon no longer
    /// threatens the instrument and counts as "set" for scheduling.
    MoonDangerCross,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EventKind::Rise => "rise",
            EventKind::Set => "set",
            EventKind::CriticalDusk => "critical dusk",
            EventKind::CriticalDawn => "critical dawn",
            EventKind::Peak => "peak",
            EventKind::MoonDangerCross => "moon danger cross",
        };
        f.write_str(label)
    }
}

/// A detected threshold crossing or peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub time: DateTime<Utc>,
    pub kind: EventKind,
    pub body: Body,
}

/// A closed time interval. `end` is expected not to precede `start`; the
/// window deriver flags degenerate secondary windows through
/// [`Warning::WindowTooShort`] rather than rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Signed duration of the window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `time` falls strictly inside the window.
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start < time && time < self.end
    }
}

/// Advisory condition attached to the plan; never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// A secondary window shorter than the minimum useful duration.
    WindowTooShort {
        window: Window,
        duration_minutes: i64,
    },
}

/// Low-elevation visibility windows for one fixed source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetVisibility {
    pub source: String,
    pub windows: Vec<Window>,
}

/// The derived schedule for one night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationPlan {
    /// The primary observation window.
    pub primary: Window,
    /// Secondary window, present only when the Moon splits the night.
    pub secondary: Option<Window>,
    /// Data-quality monitoring starts a fixed lead ahead of the window.
    pub data_quality_start: DateTime<Utc>,
    /// Interval blocked by policy (door closed) independent of the safety
    /// mask, when the Moon sets only after critical dawn.
    pub policy_blocked: Option<Window>,
    pub warnings: Vec<Warning>,
    /// Per-source low-elevation visibility windows.
    pub targets: Vec<TargetVisibility>,
}

/// The named events of one run. Each is optional; the pipeline fails before
/// constructing a report only when a critical crossing is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightEvents {
    pub sunrise: Option<Event>,
    pub sunset: Option<Event>,
    pub critical_dusk: Option<Event>,
    pub critical_dawn: Option<Event>,
    pub moonrise: Option<Event>,
    /// The Moon's -3 degree falling crossing, used as moonset.
    pub moonset: Option<Event>,
    pub moon_peak: Option<Event>,
}

/// Aggregate run artifact handed to external collaborators (renderer,
/// reporter, deployment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightReport {
    pub plan: ObservationPlan,
    pub events: NightEvents,
    pub sun: Series,
    pub moon: Series,
    pub sources: Vec<Series>,
    pub mask: SafetyMask,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_duration_and_contains() {
        let start = Utc.with_ymd_and_hms(2024, 4, 18, 3, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 4, 18, 11, 30, 0).unwrap();
        let window = Window::new(start, end);
        assert_eq!(window.duration(), Duration::minutes(510));
        assert!(window.contains(start + Duration::hours(1)));
        assert!(!window.contains(start));
        assert!(!window.contains(end + Duration::minutes(1)));
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::CriticalDusk.to_string(), "critical dusk");
        assert_eq!(EventKind::MoonDangerCross.to_string(), "moon danger cross");
    }
}
