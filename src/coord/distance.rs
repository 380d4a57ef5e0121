//! Great-circle distance
//!
//! Haversine formula on a spherical Earth. Callers pass fully-present
//! `Coordinates`; unlocated records must be filtered out before this point.

use crate::constants::geo::{DISTANCE_DECIMALS, EARTH_RADIUS_KM};
use crate::coord::Coordinates;

/// Calculate the distance between two points in kilometers (Haversine formula)
///
/// # Arguments
/// * `p1` - First point
/// * `p2` - Second point
///
/// # Returns
/// Distance in kilometers. Symmetric in its arguments and exactly zero
/// for coincident points.
pub fn haversine_km(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lng = p2.lng.to_radians() - p1.lng.to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    c * EARTH_RADIUS_KM
}

/// Round a distance to the precision reported to callers
pub fn round_km(km: f64) -> f64 {
    let factor = 10f64.powi(DISTANCE_DECIMALS);
    (km * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    const MADRID: Coordinates = Coordinates { lat: 40.4168, lng: -3.7038 };
    const BARCELONA: Coordinates = Coordinates { lat: 41.3851, lng: 2.1734 };

    #[test]
    fn test_madrid_to_barcelona() {
        let distance = haversine_km(MADRID, BARCELONA);
        assert_abs_diff_eq!(distance, 505.44, epsilon = 0.01);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Coordinates::new(40.0, -3.0);
        let b = Coordinates::new(41.0, -3.0);
        assert_abs_diff_eq!(haversine_km(a, b), 111.19, epsilon = 0.01);
    }

    #[test]
    fn test_coincident_points() {
        assert_eq!(haversine_km(MADRID, MADRID), 0.0);
    }

    #[test]
    fn test_antipodal_points() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert_abs_diff_eq!(haversine_km(a, b), half_circumference, epsilon = 1e-6);
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(504.6049), 504.6);
        assert_eq!(round_km(1.005_1), 1.01);
        assert_eq!(round_km(0.0), 0.0);
    }

    fn coordinates() -> impl Strategy<Value = Coordinates> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinates::new(lat, lng))
    }

    proptest! {
        #[test]
        fn test_distance_is_symmetric(a in coordinates(), b in coordinates()) {
            prop_assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
        }

        #[test]
        fn test_distance_to_self_is_zero(a in coordinates()) {
            prop_assert_eq!(haversine_km(a, a), 0.0);
        }

        #[test]
        fn test_distance_is_bounded(a in coordinates(), b in coordinates()) {
            let d = haversine_km(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }
    }
}
