//! Error types for hoopmatch

use thiserror::Error;

/// Main error type for hoopmatch operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    /// The address could not be turned into coordinates (no match or
    /// geocoder unavailable)
    #[error("Address could not be located: {0}")]
    UnresolvableAddress(String),

    /// The querying player has no coordinates registered
    #[error("Missing coordinates: {0}")]
    MissingOrigin(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Transport or decoding failure talking to the geocoding service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),
}

/// Result type alias for hoopmatch operations
pub type Result<T> = std::result::Result<T, Error>;
