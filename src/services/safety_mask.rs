//! Light-safety mask over the shared Sun/Moon sample grid.
//!
//! Each sample is classified once; downstream consumers index the mask in
//! O(1) to split windows into door-open and door-closed segments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Series, Window};

/// The Moon is dangerous while descending and still above this altitude.
pub const MOON_DANGER_DEG: f64 = -3.0;

/// The Sun is dangerous above this altitude (astronomical twilight).
pub const SUN_DANGER_DEG: f64 = -18.0;

/// Per-sample light-safety classification. Rules are evaluated in order and
/// the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyFlag {
    Safe,
    /// Descending Moon above the danger altitude.
    UnsafeMoon,
    /// Sun above the twilight threshold, not excused by the Moon rule.
    UnsafeSun,
}

impl SafetyFlag {
    pub fn is_unsafe(self) -> bool {
        self != SafetyFlag::Safe
    }
}

/// Classification of every sample on the Sun/Moon grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyMask {
    times: Vec<DateTime<Utc>>,
    flags: Vec<SafetyFlag>,
}

/// Build the safety mask from Moon and Sun series sampled on an identical
/// time grid, using the critical-dawn instant for the Moon-shield exception.
///
/// Per-sample rules, first match wins:
/// 1. UnsafeMoon if the Moon is descending (current altitude below the
///    previous sample's) and still above [`MOON_DANGER_DEG`].
/// 2. UnsafeSun if the Sun is above [`SUN_DANGER_DEG`], unless rule 1 holds
///    and the sample precedes critical dawn.
/// 3. Safe otherwise.
pub fn build_safety_mask(
    moon: &Series,
    sun: &Series,
    critical_dawn: DateTime<Utc>,
) -> SafetyMask {
    debug_assert_eq!(moon.len(), sun.len(), "series must share one grid");

    let mut times = Vec::with_capacity(sun.len());
    let mut flags = Vec::with_capacity(sun.len());
    for i in 0..sun.len() {
        let time = sun.time(i);
        debug_assert_eq!(time, moon.time(i));

        let moon_descending_high =
            i > 0 && moon.altitude(i) < moon.altitude(i - 1) && moon.altitude(i) > MOON_DANGER_DEG;

        let flag = if moon_descending_high {
            SafetyFlag::UnsafeMoon
        } else if sun.altitude(i) > SUN_DANGER_DEG
            && !(moon_descending_high && time < critical_dawn)
        {
            SafetyFlag::UnsafeSun
        } else {
            SafetyFlag::Safe
        };

        times.push(time);
        flags.push(flag);
    }
    SafetyMask { times, flags }
}

impl SafetyMask {
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn flag(&self, index: usize) -> SafetyFlag {
        self.flags[index]
    }

    pub fn time(&self, index: usize) -> DateTime<Utc> {
        self.times[index]
    }

    pub fn is_unsafe(&self, index: usize) -> bool {
        self.flags[index].is_unsafe()
    }

    /// Timestamps of all unsafe samples, in grid order.
    pub fn unsafe_times(&self) -> Vec<DateTime<Utc>> {
        self.times
            .iter()
            .zip(&self.flags)
            .filter(|(_, flag)| flag.is_unsafe())
            .map(|(&time, _)| time)
            .collect()
    }

    /// Split `window` into contiguous door-open (safe) and door-closed
    /// (unsafe) segments, in time order.
    pub fn split_window(&self, window: &Window) -> Vec<DoorSegment> {
        let mut segments: Vec<DoorSegment> = Vec::new();
        for i in 0..self.len() {
            let time = self.times[i];
            if time < window.start || time > window.end {
                continue;
            }
            let open = !self.is_unsafe(i);
            match segments.last_mut() {
                Some(last) if last.open == open => last.window.end = time,
                _ => segments.push(DoorSegment {
                    window: Window::new(time, time),
                    open,
                }),
            }
        }
        segments
    }
}

/// One contiguous sub-period of a window with a single door state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorSegment {
    pub window: Window,
    /// Door open means light-safe data collection.
    pub open: bool,
}
