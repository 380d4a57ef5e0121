//! Geocoding module
//!
//! Turns free-text addresses into coordinates, and decides when an
//! address record needs to be (re)located.

pub mod fixed;
pub mod nominatim;
pub mod resolver;

use crate::config::GeocoderConfig;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A geocoded location result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Display name (address or description)
    pub display_name: String,
}

impl GeoLocation {
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Trait for geocoding backends
pub trait Geocoder: Send + Sync {
    /// Backend name as used in config
    fn name(&self) -> &'static str;

    /// Geocode an address to coordinates
    ///
    /// Returns the best match for the query, `None` if nothing matched, or an
    /// error if the service could not be reached.
    fn geocode(&self, address: &str) -> impl std::future::Future<Output = Result<Option<GeoLocation>>> + Send;
}

/// Geocoder selected by configuration
#[derive(Debug)]
pub enum GeocoderBackend {
    Nominatim(nominatim::NominatimBackend),
    Fixed(fixed::FixedGeocoder),
}

impl Geocoder for GeocoderBackend {
    fn name(&self) -> &'static str {
        match self {
            Self::Nominatim(backend) => backend.name(),
            Self::Fixed(backend) => backend.name(),
        }
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeoLocation>> {
        match self {
            Self::Nominatim(backend) => backend.geocode(address).await,
            Self::Fixed(backend) => backend.geocode(address).await,
        }
    }
}

/// Build the geocoding backend named in the config
pub fn get_geocoder(config: &GeocoderConfig) -> Result<GeocoderBackend> {
    match config.backend.as_str() {
        "nominatim" => Ok(GeocoderBackend::Nominatim(nominatim::NominatimBackend::new(
            &config.url,
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )?)),
        "fixed" => Ok(GeocoderBackend::Fixed(fixed::FixedGeocoder::from_places(
            config.places.iter().map(|(address, coords)| (address.as_str(), *coords)),
        ))),
        other => Err(Error::Config(format!("Unknown geocoder backend: {}", other))),
    }
}

/// List the geocoder backend names accepted in config
pub fn available_geocoders() -> Vec<&'static str> {
    vec!["nominatim", "fixed"]
}
