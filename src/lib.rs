//! hoopmatch: proximity matching for pickup basketball
//!
//! A library and CLI tool that matches players with team announcements
//! by great-circle distance between their geocoded addresses.
//!
//! ## Features
//!
//! - Address geocoding (Nominatim, or a fixed table for offline use)
//! - Address-to-coordinate resolution with a configurable stale policy
//! - Haversine distance on a 6371 km sphere
//! - Radius filtering and ranking of announcements around a player
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use hoopmatch::coord::proximity::{rank_by, ResultOrder};
//! use hoopmatch::coord::{Coordinates, GeoPoint};
//!
//! let origin = GeoPoint::located(Coordinates::new(40.4168, -3.7038)); // Madrid
//! let courts = vec![
//!     ("Barcelona", GeoPoint::located(Coordinates::new(41.3851, 2.1734))),
//!     ("Sol", GeoPoint::located(Coordinates::new(40.4168, -3.7038))),
//!     ("Unknown", GeoPoint::absent()),
//! ];
//!
//! let ranking = rank_by(origin, &courts, 5.0, ResultOrder::Input, |c| c.1).unwrap();
//! assert_eq!(ranking.within.len(), 1);
//! assert_eq!(ranking.all.len(), 2);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod geo;
pub mod model;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use coord::proximity::{Geotagged, Ranking, ResultOrder};
pub use coord::{Coordinates, GeoPoint};
pub use error::{Error, Result};
pub use geo::resolver::{Resolver, StalePolicy};
