//! Public configuration surface for the planning pipeline.
//!
//! All inputs are validated before sampling begins; out-of-range coordinates
//! or an unusable cadence fail fast with
//! [`ScheduleError::InvalidConfiguration`]. "Now" is never read here — the
//! night to schedule is injected explicitly by the caller.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Geographic location of the observer (latitude, longitude, elevation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicLocation {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
    /// Elevation in meters above sea level
    #[serde(default)]
    pub elevation_m: f64,
}

impl GeographicLocation {
    pub fn new(latitude: f64, longitude: f64, elevation_m: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "latitude must be between -90 and 90 degrees, got {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "longitude must be between -180 and 180 degrees, got {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            elevation_m,
        })
    }
}

/// A celestial source with unchanging equatorial coordinates (J2000).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedSource {
    pub name: String,
    /// Right ascension in decimal degrees (0 to 360)
    pub ra_deg: f64,
    /// Declination in decimal degrees (-90 to 90)
    pub dec_deg: f64,
}

impl FixedSource {
    pub fn new(name: String, ra_deg: f64, dec_deg: f64) -> Result<Self> {
        if !(0.0..360.0).contains(&ra_deg) {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "right ascension of {name} must be in [0, 360) degrees, got {ra_deg}"
            )));
        }
        if !(-90.0..=90.0).contains(&dec_deg) {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "declination of {name} must be between -90 and 90 degrees, got {dec_deg}"
            )));
        }
        Ok(Self { name, ra_deg, dec_deg })
    }

    /// Build a source from catalog-style sexagesimal coordinates:
    /// RA as `hh:mm:ss.s`, Dec as `[+|-]dd:mm:ss.s`.
    pub fn from_sexagesimal(name: &str, ra: &str, dec: &str) -> Result<Self> {
        let ra_deg = parse_hms(ra)
            .ok_or_else(|| invalid_coordinate(name, "right ascension", ra))?
            * 15.0;
        let dec_deg =
            parse_dms(dec).ok_or_else(|| invalid_coordinate(name, "declination", dec))?;
        Self::new(name.to_string(), ra_deg, dec_deg)
    }
}

fn invalid_coordinate(name: &str, what: &str, raw: &str) -> ScheduleError {
    ScheduleError::InvalidConfiguration(format!("cannot parse {what} of {name} from {raw:?}"))
}

/// Parse `hh:mm:ss.s` into decimal hours.
fn parse_hms(text: &str) -> Option<f64> {
    let mut parts = text.trim().splitn(3, ':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if hours < 0.0 || minutes < 0.0 || seconds < 0.0 {
        return None;
    }
    Some(hours + minutes / 60.0 + seconds / 3600.0)
}

/// Parse `[+|-]dd:mm:ss.s` into decimal degrees. The sign is read from the
/// text so that negative zero degrees ("-00:00:47.9") keeps its sign.
fn parse_dms(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let mut parts = rest.splitn(3, ':');
    let degrees: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if degrees < 0.0 || minutes < 0.0 || seconds < 0.0 {
        return None;
    }
    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;
    Some(if negative { -magnitude } else { magnitude })
}

/// Configuration of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub site: GeographicLocation,
    /// UTC midnight marking the start of the night to schedule.
    pub night_start: DateTime<Utc>,
    /// Sampling cadence in minutes; must be positive and divide 60 so the
    /// grid stays hour-aligned.
    pub interval_minutes: u32,
    /// Fixed sources to compute low-elevation visibility windows for.
    pub sources: Vec<FixedSource>,
}

impl RunConfig {
    pub fn new(
        site: GeographicLocation,
        night_start: DateTime<Utc>,
        interval_minutes: u32,
        sources: Vec<FixedSource>,
    ) -> Result<Self> {
        let config = Self {
            site,
            night_start,
            interval_minutes,
            sources,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-check all invariants. The pipeline calls this before sampling.
    pub fn validate(&self) -> Result<()> {
        // Re-validate the site in case the struct was built literally.
        GeographicLocation::new(self.site.latitude, self.site.longitude, self.site.elevation_m)?;
        for source in &self.sources {
            FixedSource::new(source.name.clone(), source.ra_deg, source.dec_deg)?;
        }
        if self.interval_minutes == 0 {
            return Err(ScheduleError::InvalidConfiguration(
                "sampling interval must be positive".to_string(),
            ));
        }
        if 60 % self.interval_minutes != 0 {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "sampling interval must divide 60 minutes, got {}",
                self.interval_minutes
            )));
        }
        if self.night_start.time().num_seconds_from_midnight() != 0 {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "night start must be a UTC midnight, got {}",
                self.night_start
            )));
        }
        Ok(())
    }
}
