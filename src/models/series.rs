//! Altitude time series for a single body.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::FixedSource;

/// Celestial body descriptor for sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    /// A source with unchanging right ascension/declination (J2000).
    Fixed(FixedSource),
}

impl Body {
    /// Human-readable body name ("Sun", "Moon", or the source name).
    pub fn name(&self) -> &str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Fixed(source) => &source.name,
        }
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One altitude measurement: a UTC instant and an apparent altitude in
/// degrees (-90 to 90).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: DateTime<Utc>,
    pub altitude_deg: f64,
}

/// Fixed-cadence altitude series for one body over one run.
///
/// Invariant: timestamps are strictly increasing at a fixed interval with no
/// gaps. The sampler is the only production constructor; tests may build
/// synthetic series directly through [`Series::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    body: Body,
    interval_minutes: u32,
    samples: Vec<Sample>,
}

impl Series {
    pub fn new(body: Body, interval_minutes: u32, samples: Vec<Sample>) -> Self {
        debug_assert!(interval_minutes > 0, "interval must be positive");
        debug_assert!(
            samples
                .windows(2)
                .all(|w| w[1].time - w[0].time == Duration::minutes(interval_minutes as i64)),
            "samples must be evenly spaced at the stated interval"
        );
        Self {
            body,
            interval_minutes,
            samples,
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Altitude of sample `index` in degrees.
    pub fn altitude(&self, index: usize) -> f64 {
        self.samples[index].altitude_deg
    }

    /// Timestamp of sample `index`.
    pub fn time(&self, index: usize) -> DateTime<Utc> {
        self.samples[index].time
    }
}
