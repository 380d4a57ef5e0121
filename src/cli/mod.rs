//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod distance;
pub mod geocode;
pub mod nearby;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Match basketball players with nearby teams
#[derive(Parser)]
#[command(name = "hoopmatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Look up the coordinates of an address
    Geocode(geocode::GeocodeArgs),

    /// Great-circle distance between two points
    Distance(distance::DistanceArgs),

    /// Rank announcements around a player's residence
    Nearby(nearby::NearbyArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Geocode(args) => geocode::run(args).await,
        Commands::Distance(args) => distance::run(args),
        Commands::Nearby(args) => nearby::run(args),
    }
}

/// Install the log subscriber; `RUST_LOG` overrides `default_filter`
pub(crate) fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
