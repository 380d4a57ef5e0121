//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/hoopmatch/config.toml

pub mod defaults;

use crate::constants::api::{NOMINATIM_URL, USER_AGENT};
use crate::constants::paths::{APP_DIR_NAME, CONFIG_FILE_NAME, STORE_FILE_NAME};
use crate::coord::proximity::{validate_radius, ResultOrder};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::available_geocoders;
use crate::geo::resolver::StalePolicy;
use crate::model::Site;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Defaults for proximity queries
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Geocoding service
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Address resolution
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Data storage
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Defaults for proximity queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Radius in kilometers when a query gives none
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Result ordering: "input" or "distance"
    #[serde(default = "default_order")]
    pub order: String,

    /// Announcement site: "match" or "training"
    #[serde(default = "default_site")]
    pub site: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Backend: "nominatim" or "fixed"
    #[serde(default = "default_geocoder")]
    pub backend: String,

    /// Nominatim base URL
    #[serde(default = "default_geocoder_url")]
    pub url: String,

    /// User agent sent to Nominatim
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,

    /// Known addresses for the "fixed" backend
    #[serde(default)]
    pub places: BTreeMap<String, Coordinates>,
}

/// Address resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// "refresh" re-geocodes changed addresses, "keep" leaves old points
    #[serde(default = "default_stale_policy")]
    pub stale_policy: String,
}

/// Data storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store file; empty means the XDG data directory
    #[serde(default)]
    pub path: String,
}

// Default value functions for serde
fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}
fn default_order() -> String {
    DEFAULT_ORDER.to_string()
}
fn default_site() -> String {
    DEFAULT_SITE.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_geocoder() -> String {
    DEFAULT_GEOCODER.to_string()
}
fn default_geocoder_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_geocoder_timeout() -> u64 {
    DEFAULT_GEOCODER_TIMEOUT_SECS
}
fn default_stale_policy() -> String {
    DEFAULT_STALE_POLICY.to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
            order: default_order(),
            site: default_site(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            backend: default_geocoder(),
            url: default_geocoder_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout(),
            places: BTreeMap::new(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            stale_policy: default_stale_policy(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "radius_km"] => Some(self.defaults.radius_km.to_string()),
            ["defaults", "order"] => Some(self.defaults.order.clone()),
            ["defaults", "site"] => Some(self.defaults.site.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["geocoder", "backend"] => Some(self.geocoder.backend.clone()),
            ["geocoder", "url"] => Some(self.geocoder.url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),
            ["geocoder", "timeout_secs"] => Some(self.geocoder.timeout_secs.to_string()),

            ["resolver", "stale_policy"] => Some(self.resolver.stale_policy.clone()),

            ["storage", "path"] => Some(self.storage.path.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "radius_km"] => {
                let radius: f64 = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid radius value: {}", value)))?;
                validate_radius(radius).map_err(|e| Error::Config(e.to_string()))?;
                self.defaults.radius_km = radius;
            }
            ["defaults", "order"] => {
                value.parse::<ResultOrder>().map_err(Error::Config)?;
                self.defaults.order = value.to_string();
            }
            ["defaults", "site"] => {
                value.parse::<Site>().map_err(Error::Config)?;
                self.defaults.site = value.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid port value: {}", value)))?;
            }

            ["geocoder", "backend"] => {
                if !available_geocoders().iter().any(|name| *name == value) {
                    return Err(Error::Config(format!("Unknown geocoder backend: {}", value)));
                }
                self.geocoder.backend = value.to_string();
            }
            ["geocoder", "url"] => {
                self.geocoder.url = value.to_string();
            }
            ["geocoder", "user_agent"] => {
                self.geocoder.user_agent = value.to_string();
            }
            ["geocoder", "timeout_secs"] => {
                self.geocoder.timeout_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid timeout value: {}", value)))?;
            }

            ["resolver", "stale_policy"] => {
                value.parse::<StalePolicy>().map_err(Error::Config)?;
                self.resolver.stale_policy = value.to_string();
            }

            ["storage", "path"] => {
                self.storage.path = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "defaults.radius_km",
            "defaults.order",
            "defaults.site",
            "server.host",
            "server.port",
            "geocoder.backend",
            "geocoder.url",
            "geocoder.user_agent",
            "geocoder.timeout_secs",
            "resolver.stale_policy",
            "storage.path",
        ]
    }

    /// Default result ordering
    pub fn order(&self) -> Result<ResultOrder> {
        self.defaults.order.parse().map_err(Error::Config)
    }

    /// Default announcement site
    pub fn site(&self) -> Result<Site> {
        self.defaults.site.parse().map_err(Error::Config)
    }

    /// Configured stale-address policy
    pub fn stale_policy(&self) -> Result<StalePolicy> {
        self.resolver.stale_policy.parse().map_err(Error::Config)
    }

    /// Path of the data store
    pub fn store_path(&self) -> Result<PathBuf> {
        if !self.storage.path.is_empty() {
            return Ok(PathBuf::from(&self.storage.path));
        }
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME).join(STORE_FILE_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
