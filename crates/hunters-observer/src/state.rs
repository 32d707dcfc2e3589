//! Shared application state for the Observer API server.

use std::sync::Arc;

use hunters_core::World;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The running world. Also driven by the tick driver.
    pub world: Arc<World>,
}

impl AppState {
    /// Create application state around a world handle.
    pub const fn new(world: Arc<World>) -> Self {
        Self { world }
    }
}
