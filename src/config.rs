//! Deployment configuration file support.
//!
//! The CLI reads its site, cadence, and source catalog from a TOML file.
//! Every field has a default describing the reference deployment (the Frisco
//! Peak site and its two standard monitoring sources), so a missing file or
//! a partial file still yields a runnable configuration.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{FixedSource, GeographicLocation, RunConfig};
use crate::error::{Result, ScheduleError};

/// Planner configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceSettings>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            site: SiteSettings::default(),
            interval_minutes: default_interval_minutes(),
            sources: default_sources(),
        }
    }
}

/// Observing site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation_m: f64,
}

impl Default for SiteSettings {
    // Frisco Peak.
    fn default() -> Self {
        Self {
            latitude: 38.5202,
            longitude: -113.2883,
            elevation_m: 3048.0,
        }
    }
}

/// One fixed source, with catalog-style sexagesimal coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    pub name: String,
    /// Right ascension as `hh:mm:ss.s`
    pub ra: String,
    /// Declination as `[+|-]dd:mm:ss.s`
    pub dec: String,
}

fn default_interval_minutes() -> u32 {
    1
}

fn default_sources() -> Vec<SourceSettings> {
    vec![
        SourceSettings {
            name: "NGC 1068".to_string(),
            ra: "02:42:40.71".to_string(),
            dec: "-00:00:47.86".to_string(),
        },
        SourceSettings {
            name: "TXS 0506+056".to_string(),
            ra: "05:09:25.96".to_string(),
            dec: "+05:41:35.33".to_string(),
        },
    ]
}

impl PlannerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            ScheduleError::InvalidConfiguration(format!(
                "cannot read config file {}: {e}",
                path.display()
            ))
        })?;
        toml::from_str(&raw).map_err(|e| {
            ScheduleError::InvalidConfiguration(format!(
                "cannot parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Resolve into a validated [`RunConfig`] for the night starting at
    /// `night_start` (a UTC midnight).
    pub fn into_run_config(self, night_start: DateTime<Utc>) -> Result<RunConfig> {
        let site =
            GeographicLocation::new(self.site.latitude, self.site.longitude, self.site.elevation_m)?;
        let sources = self
            .sources
            .iter()
            .map(|s| FixedSource::from_sexagesimal(&s.name, &s.ra, &s.dec))
            .collect::<Result<Vec<_>>>()?;
        RunConfig::new(site, night_start, self.interval_minutes, sources)
    }
}
