//! nightplan CLI
//!
//! Computes the observation window for the next UTC night and prints the
//! plain-text schedule summary consumed by the site operators.
//!
//! # Usage
//!
//! ```bash
//! # Run with the built-in reference deployment (Frisco Peak)
//! nightplan
//!
//! # Run with a site configuration file
//! nightplan /etc/nightplan/site.toml
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use nightplan::config::PlannerConfig;
use nightplan::ephemeris::{moon_illuminated_fraction, LowPrecisionEngine};
use nightplan::models::{Event, NightReport};
use nightplan::services::compute_night_report;

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => PlannerConfig::load(&path)?,
        None => PlannerConfig::default(),
    };

    // "Now" is consulted only here: schedule the next UTC night so the site
    // sees the posting a day ahead.
    let night_start = next_utc_midnight(Utc::now())?;
    let run = config.into_run_config(night_start)?;
    info!(night = %night_start, "scheduling night");

    let engine = LowPrecisionEngine;
    let report = compute_night_report(&engine, &run)?;
    let illumination = (moon_illuminated_fraction(night_start) * 100.0).round();

    print_summary(&report, illumination);
    Ok(())
}

fn next_utc_midnight(now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let tomorrow = (now + Duration::days(1)).date_naive();
    Ok(tomorrow
        .and_hms_opt(0, 0, 0)
        .context("constructing UTC midnight")?
        .and_utc())
}

fn print_summary(report: &NightReport, illumination: f64) {
    let plan = &report.plan;
    let events = &report.events;

    print_event("Moonrise Time", &events.moonrise);
    print_event("Moonset Time", &events.moonset);
    print_event("Sunrise Time", &events.sunrise);
    print_event("Sunset Time", &events.sunset);
    print_event("Moon Peak Time", &events.moon_peak);

    println!("Start Time: {}", stamp(plan.primary.start));
    println!("End Time: {}", stamp(plan.primary.end));
    println!("Data Quality Start: {}", stamp(plan.data_quality_start));
    if let Some(secondary) = &plan.secondary {
        println!("Start Time 2: {}", stamp(secondary.start));
        println!("End Time 2: {}", stamp(secondary.end));
    }
    if let Some(blocked) = &plan.policy_blocked {
        println!(
            "Door Closed (policy): {} - {}",
            stamp(blocked.start),
            stamp(blocked.end)
        );
    }
    for warning in &plan.warnings {
        println!("Warning: {warning:?}");
    }
    for target in &plan.targets {
        for window in &target.windows {
            println!(
                "{} Obs. Window: {} - {}",
                target.source,
                stamp(window.start),
                stamp(window.end)
            );
        }
    }
    println!("Moonphase: {illumination}%");
}

fn print_event(label: &str, event: &Option<Event>) {
    match event {
        Some(event) => println!("{label}: {}", stamp(event.time)),
        None => println!("{label}: none"),
    }
}

fn stamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}
