//! Centralized constants for the hoopmatch crate
//!
//! Values shared by more than one module live here.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers (spherical approximation)
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Decimal places kept on reported distances
    pub const DISTANCE_DECIMALS: i32 = 2;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// User agent sent to Nominatim (its usage policy requires one)
    pub const USER_AGENT: &str = concat!("hoopmatch/", env!("CARGO_PKG_VERSION"));
}

/// On-disk locations
pub mod paths {
    /// Application directory name (for XDG paths)
    pub const APP_DIR_NAME: &str = "hoopmatch";

    /// Config file name
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// Store file name
    pub const STORE_FILE_NAME: &str = "store.json";
}
