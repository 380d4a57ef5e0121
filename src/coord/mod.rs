//! Coordinates and distance math
//!
//! This module handles:
//! - Fully-present coordinate pairs and their validation
//! - Optional, both-or-neither geo points attached to addresses
//! - Great-circle distance
//! - Radius filtering and ranking of geotagged records

pub mod distance;
pub mod proximity;

use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude) in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Optional location of an address
///
/// Both components are present or both are absent; a half-populated pair
/// collapses to absent. Absent means "not located yet", which is a valid
/// state rather than an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGeoPoint", into = "RawGeoPoint")]
pub struct GeoPoint(Option<Coordinates>);

impl GeoPoint {
    /// A point that has not been located
    pub const fn absent() -> Self {
        Self(None)
    }

    /// A fully located point
    pub fn located(coords: Coordinates) -> Self {
        Self(Some(coords))
    }

    /// Build from two independently stored components
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Self {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Self(Some(Coordinates::new(lat, lng))),
            _ => Self(None),
        }
    }

    pub fn coords(&self) -> Option<Coordinates> {
        self.0
    }

    pub fn is_located(&self) -> bool {
        self.0.is_some()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.0.map(|c| c.lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.0.map(|c| c.lng)
    }
}

impl From<Option<Coordinates>> for GeoPoint {
    fn from(coords: Option<Coordinates>) -> Self {
        Self(coords)
    }
}

/// Wire shape of a geo point: two nullable columns
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct RawGeoPoint {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

impl From<RawGeoPoint> for GeoPoint {
    fn from(raw: RawGeoPoint) -> Self {
        GeoPoint::from_parts(raw.latitude, raw.longitude)
    }
}

impl From<GeoPoint> for RawGeoPoint {
    fn from(point: GeoPoint) -> Self {
        RawGeoPoint {
            latitude: point.latitude(),
            longitude: point.longitude(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ranges() {
        assert!(Coordinates::new(40.4168, -3.7038).validate().is_ok());
        assert!(Coordinates::new(90.0, 180.0).validate().is_ok());
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -180.5).validate().is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_partial_point_is_absent() {
        assert!(!GeoPoint::from_parts(Some(40.0), None).is_located());
        assert!(!GeoPoint::from_parts(None, Some(-3.0)).is_located());
        assert!(!GeoPoint::from_parts(None, None).is_located());

        let point = GeoPoint::from_parts(Some(40.0), Some(-3.0));
        assert_eq!(point.coords(), Some(Coordinates::new(40.0, -3.0)));
    }

    #[test]
    fn test_zero_coordinates_are_located() {
        // Null Island is a real place, not a missing value
        let point = GeoPoint::from_parts(Some(0.0), Some(0.0));
        assert!(point.is_located());
    }

    #[test]
    fn test_geo_point_wire_shape() {
        let json = serde_json::to_value(GeoPoint::located(Coordinates::new(1.5, 2.5))).unwrap();
        assert_eq!(json, serde_json::json!({"latitude": 1.5, "longitude": 2.5}));

        let json = serde_json::to_value(GeoPoint::absent()).unwrap();
        assert_eq!(json, serde_json::json!({"latitude": null, "longitude": null}));

        let parsed: GeoPoint = serde_json::from_str(r#"{"latitude": 3.0}"#).unwrap();
        assert_eq!(parsed, GeoPoint::absent());
    }
}
