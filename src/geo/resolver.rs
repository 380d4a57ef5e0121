//! Address-to-coordinate resolution
//!
//! Decides when a `Location` needs geocoding and how lookup failures are
//! treated on each write path:
//!
//! - **Save path** (`resolve_missing`, `apply_update`): failures leave the
//!   point absent and the write goes ahead. An unlocated record is a valid
//!   record.
//! - **Edit path** (`resolve_edit`): a user-initiated address change that
//!   cannot be located is rejected and nothing is modified.

use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use crate::geo::Geocoder;
use crate::model::Location;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What the save path does when the address text changes but the old
/// coordinates are still present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Keep the old coordinates; only unlocated records are geocoded
    Keep,
    /// Drop the old coordinates and geocode the new address
    #[default]
    Refresh,
}

impl std::fmt::Display for StalePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

impl std::str::FromStr for StalePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "refresh" => Ok(Self::Refresh),
            _ => Err(format!("Unknown stale policy: {}", s)),
        }
    }
}

/// Resolves addresses through a geocoder
#[derive(Debug)]
pub struct Resolver<G> {
    geocoder: G,
    policy: StalePolicy,
}

impl<G: Geocoder> Resolver<G> {
    pub fn new(geocoder: G, policy: StalePolicy) -> Self {
        Self { geocoder, policy }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    /// Geocode an address, folding "no match" and "service down" into an
    /// absent point
    pub async fn lookup(&self, address: &str) -> GeoPoint {
        match self.geocoder.geocode(address).await {
            Ok(Some(found)) => {
                debug!(address, lat = found.lat, lng = found.lng, "address located");
                GeoPoint::located(found.coords())
            }
            Ok(None) => {
                warn!(address, "no geocoding match");
                GeoPoint::absent()
            }
            Err(e) => {
                warn!(address, error = %e, "geocoder unavailable");
                GeoPoint::absent()
            }
        }
    }

    /// Locate an address that has no point yet
    ///
    /// Blank addresses and already-located points are left untouched.
    /// Returns true if the geocoder was consulted.
    pub async fn resolve_missing(&self, location: &mut Location) -> bool {
        if location.is_blank() || location.point.is_located() {
            return false;
        }
        location.point = self.lookup(&location.address).await;
        true
    }

    /// Store a new address through the save path
    ///
    /// Under `StalePolicy::Refresh` a changed address discards the old
    /// point first; under `StalePolicy::Keep` it is kept. A blank address
    /// never touches the point. Either way the update itself never fails.
    pub async fn apply_update(&self, location: &mut Location, address: String) {
        let changed = location.address != address;
        location.address = address;

        if location.is_blank() {
            return;
        }
        if changed && self.policy == StalePolicy::Refresh {
            location.point = GeoPoint::absent();
        }
        self.resolve_missing(location).await;
    }

    /// Store a user-edited address, rejecting it if it cannot be located
    ///
    /// An address equal to the stored one is a no-op. A different address
    /// is always geocoded, even if a point is present; on failure the
    /// location is left exactly as it was.
    pub async fn resolve_edit(&self, location: &mut Location, address: &str) -> Result<()> {
        if location.address == address {
            return Ok(());
        }

        let point = self.lookup(address).await;
        if !point.is_located() {
            return Err(Error::UnresolvableAddress(address.to_string()));
        }

        location.address = address.to_string();
        location.point = point;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::geo::fixed::FixedGeocoder;

    const SOL: Coordinates = Coordinates { lat: 40.4168, lng: -3.7038 };
    const CIBELES: Coordinates = Coordinates { lat: 40.4193, lng: -3.6931 };

    fn resolver(policy: StalePolicy) -> Resolver<FixedGeocoder> {
        let geocoder = FixedGeocoder::new()
            .with_place("Puerta del Sol", SOL)
            .with_place("Plaza de Cibeles", CIBELES);
        Resolver::new(geocoder, policy)
    }

    fn located(address: &str, coords: Coordinates) -> Location {
        Location {
            address: address.to_string(),
            point: GeoPoint::located(coords),
        }
    }

    #[tokio::test]
    async fn test_resolve_missing_locates() {
        let resolver = resolver(StalePolicy::Refresh);
        let mut location = Location::new("Puerta del Sol");

        assert!(resolver.resolve_missing(&mut location).await);
        assert_eq!(location.point.coords(), Some(SOL));
    }

    #[tokio::test]
    async fn test_empty_address_never_touched() {
        let resolver = resolver(StalePolicy::Refresh);

        let mut empty = Location::new("");
        assert!(!resolver.resolve_missing(&mut empty).await);
        assert_eq!(empty.point, GeoPoint::absent());

        let mut blank_but_located = located("  ", CIBELES);
        assert!(!resolver.resolve_missing(&mut blank_but_located).await);
        assert_eq!(blank_but_located.point.coords(), Some(CIBELES));

        assert_eq!(resolver.geocoder().calls(), 0);
    }

    #[tokio::test]
    async fn test_located_point_not_regeocoded() {
        let resolver = resolver(StalePolicy::Refresh);
        // Deliberately mismatched: the stored point wins on the save path
        let mut location = located("Puerta del Sol", CIBELES);

        assert!(!resolver.resolve_missing(&mut location).await);
        assert_eq!(location.point.coords(), Some(CIBELES));
        assert_eq!(resolver.geocoder().calls(), 0);
    }

    #[tokio::test]
    async fn test_no_match_leaves_point_absent() {
        let resolver = resolver(StalePolicy::Refresh);
        let mut location = Location::new("asdkjaskjd123");

        assert!(resolver.resolve_missing(&mut location).await);
        assert_eq!(location.point, GeoPoint::absent());
        assert_eq!(location.point.latitude(), None);
        assert_eq!(location.point.longitude(), None);
    }

    #[tokio::test]
    async fn test_unavailable_geocoder_is_not_fatal() {
        let resolver = resolver(StalePolicy::Refresh);
        resolver.geocoder().set_unavailable(true);
        let mut location = Location::new("Puerta del Sol");

        resolver.resolve_missing(&mut location).await;

        assert_eq!(location.point, GeoPoint::absent());
    }

    #[tokio::test]
    async fn test_apply_update_refresh_relocates() {
        let resolver = resolver(StalePolicy::Refresh);
        let mut location = located("Puerta del Sol", SOL);

        resolver.apply_update(&mut location, "Plaza de Cibeles".to_string()).await;

        assert_eq!(location.address, "Plaza de Cibeles");
        assert_eq!(location.point.coords(), Some(CIBELES));
    }

    #[tokio::test]
    async fn test_apply_update_blank_address_keeps_point() {
        for policy in [StalePolicy::Refresh, StalePolicy::Keep] {
            let resolver = resolver(policy);
            let mut location = located("Puerta del Sol", SOL);

            resolver.apply_update(&mut location, String::new()).await;
            assert_eq!(location.address, "");
            assert_eq!(location.point.coords(), Some(SOL), "policy {}", policy);

            resolver.apply_update(&mut location, "   ".to_string()).await;
            assert_eq!(location.point.coords(), Some(SOL), "policy {}", policy);

            let mut unlocated = Location::new("asdkjaskjd123");
            resolver.apply_update(&mut unlocated, String::new()).await;
            assert_eq!(unlocated.point, GeoPoint::absent());

            assert_eq!(resolver.geocoder().calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_apply_update_refresh_unresolvable_clears_point() {
        let resolver = resolver(StalePolicy::Refresh);
        let mut location = located("Puerta del Sol", SOL);

        resolver.apply_update(&mut location, "asdkjaskjd123".to_string()).await;

        assert_eq!(location.address, "asdkjaskjd123");
        assert_eq!(location.point, GeoPoint::absent());
    }

    #[tokio::test]
    async fn test_apply_update_keep_preserves_stale_point() {
        let resolver = resolver(StalePolicy::Keep);
        let mut location = located("Puerta del Sol", SOL);

        resolver.apply_update(&mut location, "Plaza de Cibeles".to_string()).await;

        assert_eq!(location.address, "Plaza de Cibeles");
        assert_eq!(location.point.coords(), Some(SOL));
        assert_eq!(resolver.geocoder().calls(), 0);
    }

    #[tokio::test]
    async fn test_apply_update_unchanged_address_is_noop() {
        for policy in [StalePolicy::Keep, StalePolicy::Refresh] {
            let resolver = resolver(policy);
            let mut location = located("Puerta del Sol", CIBELES);

            resolver.apply_update(&mut location, "Puerta del Sol".to_string()).await;

            assert_eq!(location.point.coords(), Some(CIBELES), "policy {}", policy);
            assert_eq!(resolver.geocoder().calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_resolve_edit_forces_relocation() {
        let resolver = resolver(StalePolicy::Keep);
        let mut location = located("Puerta del Sol", SOL);

        resolver.resolve_edit(&mut location, "Plaza de Cibeles").await.unwrap();

        assert_eq!(location.address, "Plaza de Cibeles");
        assert_eq!(location.point.coords(), Some(CIBELES));
    }

    #[tokio::test]
    async fn test_resolve_edit_rejects_unresolvable() {
        let resolver = resolver(StalePolicy::Refresh);
        let mut location = located("Puerta del Sol", SOL);
        let before = location.clone();

        let result = resolver.resolve_edit(&mut location, "asdkjaskjd123").await;

        assert!(matches!(result, Err(Error::UnresolvableAddress(_))));
        assert_eq!(location, before);
    }

    #[tokio::test]
    async fn test_resolve_edit_rejects_when_unavailable() {
        let resolver = resolver(StalePolicy::Refresh);
        resolver.geocoder().set_unavailable(true);
        let mut location = Location::new("");

        let result = resolver.resolve_edit(&mut location, "Plaza de Cibeles").await;

        assert!(matches!(result, Err(Error::UnresolvableAddress(_))));
        assert_eq!(location, Location::new(""));
    }

    #[tokio::test]
    async fn test_resolve_edit_same_address_is_noop() {
        let resolver = resolver(StalePolicy::Refresh);
        let mut location = Location::new("asdkjaskjd123");

        resolver.resolve_edit(&mut location, "asdkjaskjd123").await.unwrap();

        assert_eq!(resolver.geocoder().calls(), 0);
    }

    #[test]
    fn test_stale_policy_parse() {
        assert_eq!("keep".parse::<StalePolicy>().unwrap(), StalePolicy::Keep);
        assert_eq!("Refresh".parse::<StalePolicy>().unwrap(), StalePolicy::Refresh);
        assert!("sometimes".parse::<StalePolicy>().is_err());
        assert_eq!(StalePolicy::default(), StalePolicy::Refresh);
    }
}
