//! Fixed geocoder
//!
//! Answers from an in-memory table instead of a network service. Used for
//! offline runs (`geocoder.backend = "fixed"`) and as a deterministic
//! stand-in for tests.

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{GeoLocation, Geocoder};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Table-driven geocoder
#[derive(Debug, Default)]
pub struct FixedGeocoder {
    places: HashMap<String, GeoLocation>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

/// Lookup key: case and surrounding whitespace are ignored
fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

impl FixedGeocoder {
    /// Create an empty geocoder (nothing resolves)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a geocoder from (address, coordinates) pairs
    pub fn from_places<'a>(places: impl IntoIterator<Item = (&'a str, Coordinates)>) -> Self {
        places
            .into_iter()
            .fold(Self::new(), |geocoder, (address, coords)| geocoder.with_place(address, coords))
    }

    /// Add a known address
    pub fn with_place(mut self, address: &str, coords: Coordinates) -> Self {
        self.places.insert(
            normalize(address),
            GeoLocation {
                lat: coords.lat,
                lng: coords.lng,
                display_name: address.to_string(),
            },
        );
        self
    }

    /// Simulate the service being down (every lookup errors)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of lookups performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for FixedGeocoder {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeoLocation>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Geocoding("fixed geocoder marked unavailable".to_string()));
        }

        Ok(self.places.get(&normalize(address)).cloned())
    }
}
