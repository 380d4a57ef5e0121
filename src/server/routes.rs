//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::coord::proximity::{rank_by, validate_radius, within_radius, Ranking, ResultOrder};
use crate::coord::Coordinates;
use crate::error::Error;
use crate::geo::Geocoder;
use crate::model::{
    AnnouncementUpdate, Location, NewAnnouncement, NewPlayer, Player, PlayerUpdate, Site,
    TeamAnnouncement,
};
use crate::server::state::AppState;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/players", post(create_player_handler))
        .route("/api/players/:id", get(player_handler).patch(update_player_handler))
        .route(
            "/api/announcements",
            get(list_announcements_handler).post(create_announcement_handler),
        )
        .route(
            "/api/announcements/:id",
            get(announcement_handler)
                .patch(update_announcement_handler)
                .delete(delete_announcement_handler),
        )
        .route("/api/nearby", get(nearby_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "INVALID_COORDINATES" | "INVALID_RADIUS" | "MISSING_COORDINATES" => {
                StatusCode::BAD_REQUEST
            }
            "UNRESOLVABLE_ADDRESS" => StatusCode::UNPROCESSABLE_ENTITY,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidRadius(_) => "INVALID_RADIUS",
            Error::MissingOrigin(_) => "MISSING_COORDINATES",
            Error::UnresolvableAddress(_) => "UNRESOLVABLE_ADDRESS",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Conflict(_) => "CONFLICT",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Geocoder backend in use
    pub geocoder: String,
    /// Stale-address policy in use
    pub stale_policy: String,
    /// Radius used when a query gives none
    pub default_radius_km: f64,
    pub players: usize,
    pub announcements: usize,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let store = state.store.read().await;

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoder: state.resolver.geocoder().name().to_string(),
        stale_policy: state.resolver.policy().to_string(),
        default_radius_km: state.config.defaults.radius_km,
        players: store.players().len(),
        announcements: store.announcements().len(),
    })
}

/// Create a player profile
///
/// POST /api/players
///
/// The residence is geocoded if possible; an address that cannot be
/// located still creates the profile, just without coordinates.
async fn create_player_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewPlayer>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    if state.store.read().await.player_by_user(&req.user).is_some() {
        return Err(Error::Conflict(format!("User '{}' already has a player profile", req.user)).into());
    }

    let mut player = req.into_player();
    state.resolver.resolve_missing(&mut player.residence).await;

    state.store.write().await.insert_player(player.clone())?;

    info!(
        id = %player.id,
        user = %player.user,
        located = player.residence.point.is_located(),
        "player created"
    );
    Ok((StatusCode::CREATED, Json(player)))
}

/// Get a player profile
///
/// GET /api/players/:id
async fn player_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let store = state.store.read().await;
    let player = store
        .player(&id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("player {}", id)))?;
    Ok(Json(player))
}

/// Update a player profile
///
/// PATCH /api/players/:id
///
/// A changed address must be locatable, otherwise the whole update is
/// rejected and the stored profile is untouched. The address is geocoded
/// outside the store lock; only the fields present in the request are
/// merged into the current record afterwards.
async fn update_player_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<PlayerUpdate>,
) -> Result<Json<Player>, ApiError> {
    let residence = state
        .store
        .read()
        .await
        .player(&id)
        .map(|p| p.residence.clone())
        .ok_or_else(|| Error::NotFound(format!("player {}", id)))?;

    let residence = match &req.address {
        Some(address) => {
            let mut residence = residence;
            if let Err(e) = state.resolver.resolve_edit(&mut residence, address).await {
                warn!(id = %id, address = %address, "player address edit rejected");
                return Err(e.into());
            }
            Some(residence)
        }
        None => None,
    };

    let player = state.store.write().await.update_player(&id, |player| {
        req.apply_details(player);
        if let Some(residence) = residence {
            player.residence = residence;
        }
    })?;

    info!(id = %player.id, "player updated");
    Ok(Json(player))
}

/// Create a team announcement
///
/// POST /api/announcements
async fn create_announcement_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewAnnouncement>,
) -> Result<(StatusCode, Json<TeamAnnouncement>), ApiError> {
    let mut announcement = req.into_announcement();
    state.resolver.resolve_missing(&mut announcement.match_location).await;
    if let Some(training) = announcement.training_location.as_mut() {
        state.resolver.resolve_missing(training).await;
    }

    state
        .store
        .write()
        .await
        .insert_announcement(announcement.clone())?;

    info!(
        id = %announcement.id,
        team = %announcement.team_id,
        located = announcement.match_location.point.is_located(),
        "announcement created"
    );
    Ok((StatusCode::CREATED, Json(announcement)))
}

/// Announcement list filter
///
/// The radius filter applies only when `lat`, `lng` and `distance` are all
/// given; otherwise every announcement is returned.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Radius in kilometers
    pub distance: Option<f64>,
    pub site: Option<Site>,
}

/// List announcements
///
/// GET /api/announcements
async fn list_announcements_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TeamAnnouncement>>, ApiError> {
    let store = state.store.read().await;

    let announcements: Vec<TeamAnnouncement> = match (query.lat, query.lng, query.distance) {
        (Some(lat), Some(lng), Some(distance)) => {
            let origin = Coordinates::new(lat, lng);
            origin.validate()?;
            let site = match query.site {
                Some(site) => site,
                None => state.config.site()?,
            };
            within_radius(origin, store.announcements(), distance, |a| a.point(site))?
                .into_iter()
                .cloned()
                .collect()
        }
        _ => store.announcements().to_vec(),
    };

    Ok(Json(announcements))
}

/// Get an announcement
///
/// GET /api/announcements/:id
async fn announcement_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TeamAnnouncement>, ApiError> {
    let store = state.store.read().await;
    let announcement = store
        .announcement(&id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("announcement {}", id)))?;
    Ok(Json(announcement))
}

/// Update an announcement
///
/// PATCH /api/announcements/:id
///
/// Addresses go through the save path: a changed address is handled by the
/// configured stale policy and never fails the update. An empty training
/// address removes the training location. Locations are resolved outside
/// the store lock and merged into the current record with the other
/// requested fields.
async fn update_announcement_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(mut req): Json<AnnouncementUpdate>,
) -> Result<Json<TeamAnnouncement>, ApiError> {
    let (match_location, training_location) = state
        .store
        .read()
        .await
        .announcement(&id)
        .map(|a| (a.match_location.clone(), a.training_location.clone()))
        .ok_or_else(|| Error::NotFound(format!("announcement {}", id)))?;

    let match_location = match req.match_address.take() {
        Some(address) => {
            let mut location = match_location;
            state.resolver.apply_update(&mut location, address).await;
            Some(location)
        }
        None => None,
    };

    // Outer `None`: leave the training location alone
    let training_location: Option<Option<Location>> = match req.training_address.take() {
        Some(address) if address.trim().is_empty() => Some(None),
        Some(address) => {
            let location = match training_location {
                Some(mut location) => {
                    state.resolver.apply_update(&mut location, address).await;
                    location
                }
                None => {
                    let mut location = Location::new(address);
                    state.resolver.resolve_missing(&mut location).await;
                    location
                }
            };
            Some(Some(location))
        }
        None => None,
    };

    let announcement = state.store.write().await.update_announcement(&id, |announcement| {
        req.apply_details(announcement);
        if let Some(location) = match_location {
            announcement.match_location = location;
        }
        if let Some(location) = training_location {
            announcement.training_location = location;
        }
    })?;

    info!(id = %announcement.id, "announcement updated");
    Ok(Json(announcement))
}

/// Delete an announcement
///
/// DELETE /api/announcements/:id
async fn delete_announcement_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.store.write().await.remove_announcement(&id)?.is_none() {
        return Err(Error::NotFound(format!("announcement {}", id)).into());
    }

    info!(id = %id, "announcement deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Proximity query
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    /// User whose player profile is the origin
    pub user: String,
    /// Radius in kilometers
    pub distance: Option<f64>,
    pub order: Option<ResultOrder>,
    pub site: Option<Site>,
}

/// Announcements near the querying player
///
/// GET /api/nearby
///
/// Results keep store order unless `order=distance` is given.
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Ranking<TeamAnnouncement>>, ApiError> {
    let radius_km = query.distance.unwrap_or(state.config.defaults.radius_km);
    validate_radius(radius_km)?;
    let order = match query.order {
        Some(order) => order,
        None => state.config.order()?,
    };
    let site = match query.site {
        Some(site) => site,
        None => state.config.site()?,
    };

    let store = state.store.read().await;
    let player = store
        .player_by_user(&query.user)
        .ok_or_else(|| Error::NotFound(format!("no player profile for user '{}'", query.user)))?;

    if !player.residence.point.is_located() {
        return Err(Error::MissingOrigin(format!(
            "player '{}' has no coordinates registered; update the address first",
            query.user
        ))
        .into());
    }

    let ranking = rank_by(
        player.residence.point,
        store.announcements(),
        radius_km,
        order,
        |a| a.point(site),
    )?;

    Ok(Json(ranking))
}
