//! Built-in low-precision position engine.
//!
//! Closed-form geocentric positions for the Sun and Moon (Astronomical
//! Almanac low-precision series, good to ~0.01 deg for the Sun and ~0.3 deg
//! for the Moon) combined with a GMST-based equatorial-to-horizontal
//! transform. The Moon additionally gets a horizontal-parallax correction,
//! which matters at the -3 degree danger threshold.

use chrono::{DateTime, Utc};

use super::PositionEngine;
use crate::api::GeographicLocation;
use crate::models::Body;

/// Stateless engine computing apparent altitudes from closed-form series.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPrecisionEngine;

impl PositionEngine for LowPrecisionEngine {
    fn altitude_deg(&self, site: &GeographicLocation, body: &Body, at: DateTime<Utc>) -> f64 {
        let jd = julian_day(at);
        match body {
            Body::Sun => {
                let (ra, dec) = sun_ra_dec(jd);
                alt_from_ra_dec(ra, dec, site.latitude, site.longitude, jd)
            }
            Body::Moon => {
                let (ra, dec, parallax_deg) = moon_ra_dec(jd);
                let alt = alt_from_ra_dec(ra, dec, site.latitude, site.longitude, jd);
                // Geocentric to topocentric: the Moon is close enough that the
                // observer's offset from the Earth's center shifts it by up to
                // a degree near the horizon.
                alt - parallax_deg * alt.to_radians().cos()
            }
            Body::Fixed(source) => {
                alt_from_ra_dec(source.ra_deg, source.dec_deg, site.latitude, site.longitude, jd)
            }
        }
    }
}

/// Fraction of the Moon's disc illuminated at `at`, in [0, 1].
pub fn moon_illuminated_fraction(at: DateTime<Utc>) -> f64 {
    let jd = julian_day(at);
    let (sun_ra, sun_dec) = sun_ra_dec(jd);
    let (moon_ra, moon_dec, _) = moon_ra_dec(jd);
    let elongation = angular_separation_deg(sun_ra, sun_dec, moon_ra, moon_dec);
    (1.0 - elongation.to_radians().cos()) / 2.0
}

fn julian_day(t: DateTime<Utc>) -> f64 {
    let seconds = t.timestamp() as f64 + t.timestamp_subsec_nanos() as f64 / 1e9;
    seconds / 86400.0 + 2440587.5
}

fn gmst_deg(jd: f64) -> f64 {
    let d = jd - 2451545.0;
    let t = d / 36525.0;
    unwind_deg(280.46061837 + 360.98564736629 * d + 0.000387933 * t * t - t * t * t / 38710000.0)
}

fn unwind_deg(mut x: f64) -> f64 {
    x %= 360.0;
    if x < 0.0 {
        x += 360.0;
    }
    x
}

fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

/// Altitude of a body at equatorial (ra, dec) for an observer, in degrees.
fn alt_from_ra_dec(ra_deg: f64, dec_deg: f64, lat_deg: f64, lon_deg: f64, jd: f64) -> f64 {
    // Local sidereal time from GMST plus east longitude.
    let lst = unwind_deg(gmst_deg(jd) + lon_deg);
    let hour_angle = unwind_deg(lst - ra_deg).to_radians();
    let lat = lat_deg.to_radians();
    let dec = dec_deg.to_radians();

    (lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos())
        .asin()
        .to_degrees()
}

/// Geocentric equatorial position of the Sun: (ra_deg, dec_deg).
fn sun_ra_dec(jd: f64) -> (f64, f64) {
    let n = jd - 2451545.0;
    let mean_longitude = unwind_deg(280.460 + 0.9856474 * n);
    let mean_anomaly = unwind_deg(357.528 + 0.9856003 * n);
    let ecliptic_longitude =
        mean_longitude + 1.915 * sin_deg(mean_anomaly) + 0.020 * sin_deg(2.0 * mean_anomaly);
    let obliquity = 23.439 - 0.0000004 * n;

    let ra = f64::atan2(
        cos_deg(obliquity) * sin_deg(ecliptic_longitude),
        cos_deg(ecliptic_longitude),
    )
    .to_degrees();
    let dec = (sin_deg(obliquity) * sin_deg(ecliptic_longitude)).asin().to_degrees();
    (unwind_deg(ra), dec)
}

/// Geocentric equatorial position of the Moon:
/// (ra_deg, dec_deg, horizontal_parallax_deg).
fn moon_ra_dec(jd: f64) -> (f64, f64, f64) {
    let t = (jd - 2451545.0) / 36525.0;

    let ecliptic_longitude = 218.32
        + 481267.881 * t
        + 6.29 * sin_deg(135.0 + 477198.87 * t)
        - 1.27 * sin_deg(259.3 - 413335.36 * t)
        + 0.66 * sin_deg(235.7 + 890534.22 * t)
        + 0.21 * sin_deg(269.9 + 954397.74 * t)
        - 0.19 * sin_deg(357.5 + 35999.05 * t)
        - 0.11 * sin_deg(186.5 + 966404.03 * t);
    let ecliptic_latitude = 5.13 * sin_deg(93.3 + 483202.02 * t)
        + 0.28 * sin_deg(228.2 + 960400.89 * t)
        - 0.28 * sin_deg(318.3 + 6003.15 * t)
        - 0.17 * sin_deg(217.6 - 407332.21 * t);
    let parallax = 0.9508
        + 0.0518 * cos_deg(135.0 + 477198.87 * t)
        + 0.0095 * cos_deg(259.3 - 413335.36 * t)
        + 0.0078 * cos_deg(235.7 + 890534.22 * t)
        + 0.0028 * cos_deg(269.9 + 954397.74 * t);

    let obliquity = 23.439 - 0.0000004 * (jd - 2451545.0);
    let (lambda, beta) = (ecliptic_longitude, ecliptic_latitude);

    let ra = f64::atan2(
        sin_deg(lambda) * cos_deg(obliquity) - beta.to_radians().tan() * sin_deg(obliquity),
        cos_deg(lambda),
    )
    .to_degrees();
    let dec = (sin_deg(beta) * cos_deg(obliquity)
        + cos_deg(beta) * sin_deg(obliquity) * sin_deg(lambda))
    .asin()
    .to_degrees();

    (unwind_deg(ra), dec, parallax)
}

fn angular_separation_deg(ra1_deg: f64, dec1_deg: f64, ra2_deg: f64, dec2_deg: f64) -> f64 {
    let cos_sep = sin_deg(dec1_deg) * sin_deg(dec2_deg)
        + cos_deg(dec1_deg) * cos_deg(dec2_deg) * cos_deg(ra1_deg - ra2_deg);
    cos_sep.clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_gmst_at_j2000_epoch() {
        let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let gmst = gmst_deg(julian_day(epoch));
        assert!(
            (gmst - 280.4606).abs() < 0.01,
            "GMST at J2000.0 should be ~280.46 deg, got {gmst}"
        );
    }

    #[test]
    fn test_celestial_pole_altitude_equals_latitude() {
        let site = GeographicLocation::new(38.5202, -113.2883, 3048.0).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 4, 18, 6, 0, 0).unwrap();
        let alt = alt_from_ra_dec(123.4, 90.0, site.latitude, site.longitude, julian_day(at));
        assert!(
            (alt - site.latitude).abs() < 1e-6,
            "pole altitude {alt} should equal latitude {}",
            site.latitude
        );
    }

    #[test]
    fn test_sun_declination_near_zero_at_equinox() {
        let equinox = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
        let (_, dec) = sun_ra_dec(julian_day(equinox));
        assert!(dec.abs() < 0.5, "sun declination at equinox was {dec}");
    }

    #[test]
    fn test_moon_illumination_at_known_phases() {
        // Full moon 2024-04-23 23:49 UTC, new moon 2024-04-08 18:21 UTC.
        let full = moon_illuminated_fraction(Utc.with_ymd_and_hms(2024, 4, 23, 23, 49, 0).unwrap());
        let new = moon_illuminated_fraction(Utc.with_ymd_and_hms(2024, 4, 8, 18, 21, 0).unwrap());
        assert!(full > 0.95, "full moon fraction was {full}");
        assert!(new < 0.05, "new moon fraction was {new}");
    }

    #[test]
    fn test_engine_is_deterministic() {
        let engine = LowPrecisionEngine;
        let site = GeographicLocation::new(38.5202, -113.2883, 3048.0).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 4, 18, 8, 0, 0).unwrap();
        let a = engine.altitude_deg(&site, &Body::Moon, at);
        let b = engine.altitude_deg(&site, &Body::Moon, at);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
