//! hoopmatch CLI entry point
//!
//! Player/team proximity matching - CLI + web API

use hoopmatch::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
