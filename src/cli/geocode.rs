//! Geocode command handler
//!
//! Resolves a single address with the configured geocoder.

use crate::cli::init_tracing;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::{available_geocoders, get_geocoder, Geocoder};
use clap::Args;

/// Geocode command arguments
#[derive(Args)]
pub struct GeocodeArgs {
    /// Free-text address
    #[arg(required_unless_present = "list_backends")]
    pub address: Option<String>,

    /// Geocoder backend (overrides config)
    #[arg(long, short = 'b')]
    pub backend: Option<String>,

    /// Print the match as JSON
    #[arg(long)]
    pub json: bool,

    /// List available geocoder backends
    #[arg(long = "list-backends")]
    pub list_backends: bool,
}

/// Run the geocode command
pub async fn run(args: GeocodeArgs) -> Result<()> {
    init_tracing("warn");

    if args.list_backends {
        for name in available_geocoders() {
            println!("{}", name);
        }
        return Ok(());
    }

    let address = args
        .address
        .ok_or_else(|| Error::Config("An address is required".to_string()))?;

    let mut config = Config::load()?;
    if let Some(backend) = args.backend {
        config.geocoder.backend = backend;
    }
    let geocoder = get_geocoder(&config.geocoder)?;

    let found = geocoder
        .geocode(&address)
        .await?
        .ok_or_else(|| Error::UnresolvableAddress(address.clone()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
    } else {
        println!("{:.6}, {:.6}", found.lat, found.lng);
        println!("{}", found.display_name);
    }

    Ok(())
}
