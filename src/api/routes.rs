//! API route handlers.
//!
//! All endpoints return JSON. Errors come back as `{ "error": message }`
//! with a status picked from the error's kind.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use crate::scoring::ScoringEngine;
use crate::storage::SnapshotStore;
use crate::types::{
    ErrorKind, LeaderboardResponse, ScoringError, StandingsScoring, TeamLeaderboardEntry,
    TourStandings,
};

pub type AppState = Arc<ScoringEngine<SnapshotStore>>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Wraps a [`ScoringError`] for the HTTP layer.
#[derive(Debug)]
pub struct ApiError(pub ScoringError);

impl From<ScoringError> for ApiError {
    fn from(err: ScoringError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
            ErrorKind::DomainValidation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /api/competitions/:id/leaderboard
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    Ok(Json(state.leaderboard(id)?))
}

/// GET /api/competitions/:id/team-leaderboard
pub async fn get_team_leaderboard(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<TeamLeaderboardEntry>>, ApiError> {
    Ok(Json(state.team_leaderboard(id)?))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandingsParams {
    pub category: Option<i64>,
    pub scoring: Option<String>,
}

/// GET /api/tours/:id/standings?category=&scoring=
pub async fn get_tour_standings(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<StandingsParams>,
) -> Result<Json<TourStandings>, ApiError> {
    let scoring = params
        .scoring
        .as_deref()
        .map(str::parse::<StandingsScoring>)
        .transpose()?;
    let today = chrono::Local::now().date_naive();
    Ok(Json(state.tour_standings(id, params.category, scoring, today)?))
}
