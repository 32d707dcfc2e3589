//! Server-sent events stream of world snapshots.
//!
//! Clients connect to `GET /state/stream` and receive one `state` event
//! with the current snapshot, then one per committed mutation. Each event
//! carries the snapshot version as its SSE `id`. The stream ends when the
//! subscription reaches its maximum lifetime; clients reconnect.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use tracing::{debug, warn};

use crate::state::AppState;

/// Name of the SSE event carrying a snapshot.
pub const STATE_EVENT: &str = "state";

/// Subscribe the caller to the world's snapshot stream.
///
/// # Route
///
/// `GET /state/stream`
pub async fn state_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.world.subscribe().await;
    debug!(subscriber = subscription.id(), "SSE client connected");

    let events = stream::unfold(subscription, |mut subscription| async move {
        loop {
            let Some(snapshot) = subscription.next().await else {
                debug!(subscriber = subscription.id(), "SSE subscription ended");
                return None;
            };
            match Event::default()
                .event(STATE_EVENT)
                .id(snapshot.version().to_string())
                .json_data(&*snapshot)
            {
                Ok(event) => return Some((Ok::<_, Infallible>(event), subscription)),
                Err(e) => {
                    warn!(error = %e, version = snapshot.version(), "Failed to encode snapshot");
                }
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
