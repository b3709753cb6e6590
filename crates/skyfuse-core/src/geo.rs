//! Geographic distance utilities.
//!
//! Pure great-circle math over WGS-84-ish spherical coordinates. These
//! functions have no side effects and never fail: NaN inputs produce NaN
//! output, and callers are expected to pre-validate coordinates.

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers, via the
/// haversine formula.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    // Rounding can push `a` fractionally past 1.0 near antipodes, where
    // asin would return NaN for a perfectly valid pair of points.
    EARTH_RADIUS_KM * 2.0 * a.sqrt().min(1.0).asin()
}

/// Returns `true` if a distance falls within a tolerance radius.
///
/// A NaN distance is never within tolerance.
#[must_use]
pub fn within_tolerance(distance_km: f64, tolerance_km: f64) -> bool {
    distance_km <= tolerance_km
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance_for_identical_points() {
        assert_relative_eq!(distance_km(39.9, 32.8, 39.9, 32.8), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // One degree of latitude along a meridian is R * pi / 180.
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert_relative_eq!(distance_km(0.0, 0.0, 1.0, 0.0), expected, max_relative = 1e-9);
    }

    #[test]
    fn test_ankara_to_istanbul() {
        let d = distance_km(39.93, 32.86, 41.01, 28.98);
        assert!(d > 330.0 && d < 370.0, "unexpected distance {d}");
    }

    #[test]
    fn test_antipodal_points() {
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI;
        assert_relative_eq!(
            distance_km(0.0, 0.0, 0.0, 180.0),
            expected,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_near_antipodal_points_stay_finite() {
        // (10, 20) and (-10, -160) are exact antipodes; rounding in the
        // haversine intermediate must not turn this into NaN.
        let d = distance_km(10.0, 20.0, -10.0, -160.0);
        assert!(d.is_finite());
        assert!(d <= EARTH_RADIUS_KM * std::f64::consts::PI + 1e-6);
    }

    #[test]
    fn test_symmetry() {
        let forward = distance_km(39.93, 32.86, 41.01, 28.98);
        let back = distance_km(41.01, 28.98, 39.93, 32.86);
        assert_relative_eq!(forward, back);
    }

    #[test]
    fn test_within_tolerance() {
        assert!(within_tolerance(2.9, 3.0));
        assert!(within_tolerance(3.0, 3.0));
        assert!(!within_tolerance(3.1, 3.0));
        assert!(!within_tolerance(f64::NAN, 3.0));
    }
}
