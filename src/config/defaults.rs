//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default proximity radius in kilometers
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Default ordering of ranked results
pub const DEFAULT_ORDER: &str = "input";

/// Default announcement site to rank against
pub const DEFAULT_SITE: &str = "match";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Default geocoding backend
pub const DEFAULT_GEOCODER: &str = "nominatim";

/// Default geocoder request timeout in seconds
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;

/// Default handling of addresses that change while still located
pub const DEFAULT_STALE_POLICY: &str = "refresh";
