//! Server shared state
//!
//! Holds configuration, the address resolver and the data store.

use crate::config::Config;
use crate::error::Result;
use crate::geo::resolver::Resolver;
use crate::geo::{get_geocoder, GeocoderBackend};
use crate::store::Store;
use tokio::sync::RwLock;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Address resolver
    pub resolver: Resolver<GeocoderBackend>,

    /// Players and announcements
    pub store: RwLock<Store>,
}

impl AppState {
    /// Build state from config, loading the store from disk
    pub fn from_config(config: Config) -> Result<Self> {
        let geocoder = get_geocoder(&config.geocoder)?;
        let resolver = Resolver::new(geocoder, config.stale_policy()?);
        let store = Store::load_from(config.store_path()?)?;
        Ok(Self::new(config, resolver, store))
    }

    /// Create new application state from parts
    pub fn new(config: Config, resolver: Resolver<GeocoderBackend>, store: Store) -> Self {
        Self {
            config,
            resolver,
            store: RwLock::new(store),
        }
    }
}
