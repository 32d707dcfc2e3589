//! Periodic tick driver.
//!
//! [`TickDriver`] calls [`World::tick`] on a fixed wall-clock cadence until
//! a shutdown future resolves. Ticks that fall behind are delayed rather
//! than bunched up. A failed tick stops the driver and is returned to the
//! caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::tick::TickError;
use crate::world::World;

/// Errors that can stop the driver.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Drives the world forward on a timer.
pub struct TickDriver {
    world: Arc<World>,
    interval: Duration,
    minutes_per_tick: u64,
}

impl TickDriver {
    /// Create a driver with an explicit cadence.
    pub const fn new(world: Arc<World>, interval: Duration, minutes_per_tick: u64) -> Self {
        Self {
            world,
            interval,
            minutes_per_tick,
        }
    }

    /// Create a driver from the world's `world.tick_interval_ms` and
    /// `world.minutes_per_tick`.
    pub fn from_config(world: Arc<World>) -> Self {
        let interval = Duration::from_millis(world.config().world.tick_interval_ms.max(1));
        let minutes = world.config().world.minutes_per_tick;
        Self::new(world, interval, minutes)
    }

    /// Tick until `shutdown` resolves. Returns the number of ticks run.
    ///
    /// The first tick fires one interval after the call.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if a tick fails.
    pub async fn run<F>(self, shutdown: F) -> Result<u64, RunnerError>
    where
        F: Future<Output = ()> + Send,
    {
        let start = Instant::now().checked_add(self.interval).unwrap_or_else(Instant::now);
        let mut ticker = tokio::time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_ms = self.interval.as_millis(),
            minutes_per_tick = self.minutes_per_tick,
            "Tick driver starting"
        );

        tokio::pin!(shutdown);
        let mut total: u64 = 0;
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!(total_ticks = total, "Tick driver stopping");
                    return Ok(total);
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.world.tick(self.minutes_per_tick).await {
                        warn!(error = %e, total_ticks = total, "Tick failed, driver stopping");
                        return Err(e.into());
                    }
                    total = total.saturating_add(1);
                }
            }
        }
    }
}
