//! Nearby command handler
//!
//! Ranks stored announcements around a player's residence, the same query
//! the server answers on /api/nearby.

use crate::cli::init_tracing;
use crate::config::Config;
use crate::coord::proximity::{rank_by, ResultOrder};
use crate::error::{Error, Result};
use crate::model::Site;
use crate::store::Store;
use clap::Args;

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    /// User whose player profile is the origin
    pub user: String,

    /// Radius in kilometers
    #[arg(long, short = 'd')]
    pub distance: Option<f64>,

    /// Result order: input or distance
    #[arg(long, short = 'o')]
    pub order: Option<String>,

    /// Announcement site: match or training
    #[arg(long, short = 's')]
    pub site: Option<String>,

    /// Print the full ranking as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the nearby command
pub fn run(args: NearbyArgs) -> Result<()> {
    init_tracing("warn");

    let config = Config::load()?;
    let store = Store::load_from(config.store_path()?)?;

    let radius_km = args.distance.unwrap_or(config.defaults.radius_km);
    let order: ResultOrder = match args.order {
        Some(order) => order.parse().map_err(Error::Config)?,
        None => config.order()?,
    };
    let site: Site = match args.site {
        Some(site) => site.parse().map_err(Error::Config)?,
        None => config.site()?,
    };

    let player = store
        .player_by_user(&args.user)
        .ok_or_else(|| Error::NotFound(format!("no player profile for user '{}'", args.user)))?;

    let ranking = rank_by(
        player.residence.point,
        store.announcements(),
        radius_km,
        order,
        |a| a.point(site),
    )
    .map_err(|e| match e {
        Error::MissingOrigin(_) => Error::MissingOrigin(format!(
            "player '{}' has no coordinates registered; update the address first",
            args.user
        )),
        other => other,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranking)?);
        return Ok(());
    }

    println!(
        "{} of {} located announcements within {} km ({} total)",
        ranking.stats.within, ranking.stats.located, ranking.stats.radius_km, ranking.stats.total
    );
    for result in &ranking.all {
        let inside = ranking.within.iter().any(|w| w.record.id == result.record.id);
        let marker = if inside { "*" } else { " " };
        println!(
            "{} {:>9.2} km  {}  ({})",
            marker,
            result.distance_km,
            result.record.team_name,
            result.record.location(site).map(|l| l.address.as_str()).unwrap_or("")
        );
    }

    Ok(())
}
