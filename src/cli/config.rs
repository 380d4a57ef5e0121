//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "defaults.radius_km")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (args.key, args.value) {
        (None, None) => show_all_config(&config),

        (Some(key), None) => {
            let value = config.get(&key).ok_or_else(|| {
                Error::Config(format!(
                    "Unknown config key: {} (available: {})",
                    key,
                    Config::available_keys().join(", ")
                ))
            })?;
            println!("{}", value);
        }

        (Some(key), Some(value)) => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[defaults]");
    println!("radius_km = {}", config.defaults.radius_km);
    println!("order = \"{}\"", config.defaults.order);
    println!("site = \"{}\"", config.defaults.site);
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[geocoder]");
    println!("backend = \"{}\"", config.geocoder.backend);
    println!("url = \"{}\"", config.geocoder.url);
    println!("user_agent = \"{}\"", config.geocoder.user_agent);
    println!("timeout_secs = {}", config.geocoder.timeout_secs);
    println!();

    if !config.geocoder.places.is_empty() {
        println!("[geocoder.places]");
        for (address, coords) in &config.geocoder.places {
            println!("\"{}\" = {{ lat = {}, lng = {} }}", address, coords.lat, coords.lng);
        }
        println!();
    }

    println!("[resolver]");
    println!("stale_policy = \"{}\"", config.resolver.stale_policy);
    println!();

    println!("[storage]");
    if config.storage.path.is_empty() {
        println!("path = \"\" # XDG data directory");
    } else {
        println!("path = \"{}\"", config.storage.path);
    }
}
