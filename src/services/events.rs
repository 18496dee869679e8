//! Event detection: directional threshold crossings and the series peak.

use serde::{Deserialize, Serialize};

use crate::models::{Event, EventKind, Series};

/// Direction of a threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Rising,
    Falling,
}

/// Find the first crossing of `threshold_deg` in the requested direction.
///
/// The event is reported at the first index `i >= 1` where `sample[i - 1]`
/// lies on the pre-crossing side (inclusive) and `sample[i]` strictly on the
/// post-crossing side. No interpolation between samples; the event timestamp
/// is the timestamp of sample `i`. Returns `None` when no qualifying
/// transition exists, which downstream code treats as a first-class outcome.
pub fn find_crossing(
    series: &Series,
    threshold_deg: f64,
    direction: Direction,
    kind: EventKind,
) -> Option<Event> {
    (1..series.len())
        .find(|&i| {
            let previous = series.altitude(i - 1);
            let current = series.altitude(i);
            match direction {
                Direction::Rising => current > threshold_deg && previous <= threshold_deg,
                Direction::Falling => current < threshold_deg && previous >= threshold_deg,
            }
        })
        .map(|i| Event {
            time: series.time(i),
            kind,
            body: series.body().clone(),
        })
}

/// Find the series-wide altitude maximum; ties resolve to the earliest index.
pub fn find_peak(series: &Series) -> Option<Event> {
    let mut best: Option<usize> = None;
    for i in 0..series.len() {
        match best {
            Some(b) if series.altitude(i) <= series.altitude(b) => {}
            _ => best = Some(i),
        }
    }
    best.map(|i| Event {
        time: series.time(i),
        kind: EventKind::Peak,
        body: series.body().clone(),
    })
}
