//! Observer API server for the Hollow Vale hunters simulation.
//!
//! This crate puts an Axum HTTP server in front of a shared
//! [`World`](hunters_core::World):
//!
//! - **`GET /state`** -- the current snapshot
//! - **`GET /state/stream`** -- server-sent `state` events, one per
//!   committed mutation, starting with the current snapshot
//! - **`POST /commands/missions`** -- start a mission
//! - **`POST /commands/ticks`** -- advance the clock on demand
//!
//! Every handler goes through the world's single lock, so reads and
//! commands see the same serialised timeline as the tick driver.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod sse;
pub mod startup;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_observer};
pub use state::AppState;
