//! REST endpoint handlers for the Observer server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/state` | Current world snapshot |
//! | `POST` | `/commands/missions` | Start a mission, returns the mission |
//! | `POST` | `/commands/ticks` | Advance `minutes`, returns the clock view |
//!
//! JSON bodies are taken as `Result<Json<_>, JsonRejection>` so a malformed
//! body comes back in the same error envelope as every other failure.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use hunters_core::clock::GameClock;
use hunters_types::{ClockView, Mission, StartMissionRequest, TickRequest, WorldSnapshot};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /state
// ---------------------------------------------------------------------------

/// Return the current snapshot.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<WorldSnapshot> {
    Json(state.world.snapshot().await)
}

// ---------------------------------------------------------------------------
// POST /commands/missions
// ---------------------------------------------------------------------------

/// Validate and start a mission.
///
/// 400 for malformed bodies and validation failures, 409 for conflicts.
pub async fn start_mission(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StartMissionRequest>, JsonRejection>,
) -> Result<Json<Mission>, ApiError> {
    let Json(request) = body?;
    let mission = state.world.start_mission(&request).await?;
    Ok(Json(mission))
}

// ---------------------------------------------------------------------------
// POST /commands/ticks
// ---------------------------------------------------------------------------

/// Run one tick of `minutes` simulated minutes.
///
/// `minutes` must be within `1..=server.max_tick_minutes`.
pub async fn advance_tick(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TickRequest>, JsonRejection>,
) -> Result<Json<ClockView>, ApiError> {
    let Json(request) = body?;
    let max = state.world.config().server.max_tick_minutes;
    if !(1..=max).contains(&request.minutes) {
        return Err(ApiError::BadRequest(format!(
            "minutes must be between 1 and {max}, got {}",
            request.minutes
        )));
    }

    let summary = state.world.tick(request.minutes).await?;
    Ok(Json(GameClock::at(summary.minute).view(summary.version)))
}
