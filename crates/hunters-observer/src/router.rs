//! Axum router construction for the Observer API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::sse;
use crate::state::AppState;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /state` -- current snapshot
/// - `GET /state/stream` -- SSE snapshot stream
/// - `POST /commands/missions` -- start a mission
/// - `POST /commands/ticks` -- advance the clock
///
/// CORS allows any origin so a separately served display can connect.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/state/stream", get(sse::state_stream))
        .route("/commands/missions", post(handlers::start_mission))
        .route("/commands/ticks", post(handlers::advance_tick))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
