//! Low-elevation visibility windows for fixed sources.
//!
//! The instrument observes fixed sources only while they descend through a
//! narrow band just below the horizon; this module finds those periods.

use crate::models::{Series, TargetVisibility, Window};

/// Open altitude band (degrees) a source must be descending through.
pub const BAND_UPPER_DEG: f64 = 0.0;
pub const BAND_LOWER_DEG: f64 = -10.0;

/// Find the descending low-elevation windows of a fixed-source series.
///
/// Sample index `i` qualifies when `altitude[i]` or `altitude[i + 1]` lies in
/// the open band ([`BAND_LOWER_DEG`], [`BAND_UPPER_DEG`]) and the source is
/// descending (`altitude[i] > altitude[i + 1]`). Contiguous qualifying
/// indices merge into one window spanning the first to the last qualifying
/// timestamp.
pub fn find_visibility_windows(series: &Series) -> TargetVisibility {
    let in_band = |alt: f64| alt > BAND_LOWER_DEG && alt < BAND_UPPER_DEG;

    let mut windows = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut run_end = 0usize;

    for i in 0..series.len().saturating_sub(1) {
        let qualifies = (in_band(series.altitude(i)) || in_band(series.altitude(i + 1)))
            && series.altitude(i) > series.altitude(i + 1);
        if qualifies {
            if run_start.is_none() {
                run_start = Some(i);
            }
            run_end = i;
        } else if let Some(start) = run_start.take() {
            windows.push(Window::new(series.time(start), series.time(run_end)));
        }
    }
    if let Some(start) = run_start {
        windows.push(Window::new(series.time(start), series.time(run_end)));
    }

    TargetVisibility {
        source: series.body().name().to_string(),
        windows,
    }
}
