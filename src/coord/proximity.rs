//! Radius filtering and ranking
//!
//! Annotates geotagged records with their distance from an origin and
//! splits them into "within radius" and "all located" lists.
//!
//! ## Ordering
//! Results keep the order in which candidates were supplied. They are NOT
//! sorted by distance unless `ResultOrder::Distance` is requested.

use crate::coord::distance::{haversine_km, round_km};
use crate::coord::{Coordinates, GeoPoint};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Anything with a location that can be ranked
pub trait Geotagged {
    /// The point used for ranking (may be absent)
    fn geo_point(&self) -> GeoPoint;
}

/// Output ordering of a ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrder {
    /// Candidate order is preserved
    #[default]
    Input,
    /// Nearest first; ties keep candidate order
    Distance,
}

impl std::fmt::Display for ResultOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Distance => write!(f, "distance"),
        }
    }
}

impl std::str::FromStr for ResultOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input" | "none" => Ok(Self::Input),
            "distance" | "nearest" => Ok(Self::Distance),
            _ => Err(format!("Unknown result order: {}", s)),
        }
    }
}

/// A record annotated with its distance from the origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult<T> {
    #[serde(flatten)]
    pub record: T,
    /// Distance in kilometers, rounded to 2 decimals
    pub distance_km: f64,
    /// Coordinates the distance was measured from
    pub origin: Coordinates,
    /// Coordinates of the record
    pub position: Coordinates,
}

/// Counters describing a ranking run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingStats {
    /// Candidates supplied
    pub total: usize,
    /// Candidates that had coordinates
    pub located: usize,
    /// Candidates within the radius
    pub within: usize,
    /// Radius used, in kilometers
    pub radius_km: f64,
}

/// Result of ranking candidates around an origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ranking<T> {
    /// Located candidates at most `radius_km` away
    pub within: Vec<RankedResult<T>>,
    /// Every located candidate
    pub all: Vec<RankedResult<T>>,
    pub stats: RankingStats,
}

/// Check that a radius is usable
pub fn validate_radius(radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(Error::InvalidRadius(format!(
            "Radius must be a non-negative number of kilometers, got {}",
            radius_km
        )));
    }
    Ok(())
}

/// Rank candidates by distance from `origin`
///
/// # Arguments
/// * `origin` - Point to measure from; must be located
/// * `candidates` - Records to rank
/// * `radius_km` - Inclusive radius for the `within` list
/// * `order` - Output ordering
/// * `locate` - Picks the point of each candidate
///
/// # Errors
/// `MissingOrigin` if the origin has no coordinates, `InvalidRadius` for a
/// negative or non-finite radius. Unlocated candidates are skipped, not
/// reported.
pub fn rank_by<T, F>(
    origin: GeoPoint,
    candidates: &[T],
    radius_km: f64,
    order: ResultOrder,
    locate: F,
) -> Result<Ranking<T>>
where
    T: Clone,
    F: Fn(&T) -> GeoPoint,
{
    let origin = origin
        .coords()
        .ok_or_else(|| Error::MissingOrigin("origin is not located".to_string()))?;
    validate_radius(radius_km)?;

    let mut scored: Vec<(f64, Coordinates, &T)> = candidates
        .iter()
        .filter_map(|candidate| {
            locate(candidate)
                .coords()
                .map(|position| (haversine_km(origin, position), position, candidate))
        })
        .collect();

    if order == ResultOrder::Distance {
        // Stable, so equal distances keep candidate order
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    let mut within = Vec::new();
    let mut all = Vec::with_capacity(scored.len());

    for (distance, position, candidate) in scored {
        let ranked = RankedResult {
            record: candidate.clone(),
            distance_km: round_km(distance),
            origin,
            position,
        };
        if distance <= radius_km {
            within.push(ranked.clone());
        }
        all.push(ranked);
    }

    let stats = RankingStats {
        total: candidates.len(),
        located: all.len(),
        within: within.len(),
        radius_km,
    };
    debug!(
        total = stats.total,
        located = stats.located,
        within = stats.within,
        radius_km,
        "ranked candidates"
    );

    Ok(Ranking { within, all, stats })
}

/// Rank records that carry their own location
pub fn rank<T>(origin: GeoPoint, candidates: &[T], radius_km: f64, order: ResultOrder) -> Result<Ranking<T>>
where
    T: Geotagged + Clone,
{
    rank_by(origin, candidates, radius_km, order, |candidate: &T| candidate.geo_point())
}

/// Keep the candidates at most `radius_km` from `origin`, in input order
///
/// Unlike [`rank_by`] nothing is annotated; unlocated candidates are dropped.
pub fn within_radius<'a, T, F>(
    origin: Coordinates,
    candidates: &'a [T],
    radius_km: f64,
    locate: F,
) -> Result<Vec<&'a T>>
where
    F: Fn(&T) -> GeoPoint,
{
    validate_radius(radius_km)?;

    Ok(candidates
        .iter()
        .filter(|candidate| {
            locate(*candidate)
                .coords()
                .is_some_and(|position| haversine_km(origin, position) <= radius_km)
        })
        .collect())
}
