//! The `World` service: one lock around the store, one hub after it.
//!
//! Every read and every mutation of [`WorldState`] goes through a single
//! [`tokio::sync::Mutex`]. A mutation builds its snapshot while still
//! holding the lock, releases it, and only then hands the snapshot to the
//! [`BroadcastHub`]. A slow observer therefore never holds up the world.
//!
//! `World` is meant to be shared as `Arc<World>` between the tick driver
//! and the HTTP layer.

use std::sync::Arc;
use std::time::Duration;

use hunters_types::{Mission, StartMissionRequest, WorldSnapshot};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::command::{self, CommandError};
use crate::config::SimulationConfig;
use crate::hub::{BroadcastHub, Subscription};
use crate::store::WorldState;
use crate::tick::{self, TickError, TickSummary};

struct Inner {
    state: WorldState,
    rng: Box<dyn RngCore + Send>,
}

/// Shared handle to the running world.
pub struct World {
    inner: Mutex<Inner>,
    hub: BroadcastHub,
    config: SimulationConfig,
}

impl World {
    /// Wrap a seeded state. Capture rolls draw from a generator seeded with
    /// `world.seed`, or from OS entropy if no seed is configured.
    pub fn new(state: WorldState, config: SimulationConfig) -> Self {
        let rng: Box<dyn RngCore + Send> = match config.world.seed {
            Some(seed) => {
                info!(seed, "Capture rolls use a fixed seed");
                Box::new(StdRng::seed_from_u64(seed))
            }
            None => Box::new(StdRng::from_os_rng()),
        };
        Self::with_rng(state, config, rng)
    }

    /// Wrap a seeded state with an explicit random source.
    pub fn with_rng(
        state: WorldState,
        config: SimulationConfig,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        let hub = BroadcastHub::new(
            config.server.subscriber_buffer,
            Duration::from_secs(config.server.max_subscription_secs),
        );
        Self {
            inner: Mutex::new(Inner { state, rng }),
            hub,
            config,
        }
    }

    /// The configuration the world was built with.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// A consistent snapshot of the current state.
    pub async fn snapshot(&self) -> WorldSnapshot {
        let inner = self.inner.lock().await;
        inner.state.snapshot(self.config.missions.scout_radius)
    }

    /// Advance the world by `minutes` and publish the result.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the clock cannot advance; nothing is
    /// mutated or published in that case.
    pub async fn tick(&self, minutes: u64) -> Result<TickSummary, TickError> {
        let (summary, snapshot) = {
            let mut guard = self.inner.lock().await;
            let Inner { state, rng } = &mut *guard;
            let summary = tick::run_tick(state, minutes, &self.config, rng)?;
            let snapshot = Arc::new(state.snapshot(self.config.missions.scout_radius));
            (summary, snapshot)
        };
        let report = self.hub.publish(&snapshot).await;
        debug!(version = summary.version, ?report, "Tick snapshot published");
        Ok(summary)
    }

    /// Validate and start a mission, then publish the result.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the request is rejected; nothing is
    /// mutated or published in that case.
    pub async fn start_mission(&self, request: &StartMissionRequest) -> Result<Mission, CommandError> {
        let (mission, snapshot) = {
            let mut guard = self.inner.lock().await;
            let mission = command::start_mission(&mut guard.state, request, &self.config.missions)?;
            let snapshot = Arc::new(guard.state.snapshot(self.config.missions.scout_radius));
            (mission, snapshot)
        };
        let report = self.hub.publish(&snapshot).await;
        debug!(version = snapshot.version(), ?report, "Command snapshot published");
        Ok(mission)
    }

    /// Register an observer. Its first snapshot is the current state.
    ///
    /// The initial snapshot is taken and the observer registered under the
    /// store lock, so no mutation can slip between the two.
    pub async fn subscribe(&self) -> Subscription {
        let inner = self.inner.lock().await;
        let initial = Arc::new(inner.state.snapshot(self.config.missions.scout_radius));
        self.hub.subscribe(initial).await
    }

    /// Run a read-only closure against the locked state.
    pub async fn inspect<T>(&self, f: impl FnOnce(&WorldState) -> T) -> T {
        let inner = self.inner.lock().await;
        f(&inner.state)
    }
}
