//! Engine binary for the Hollow Vale hunters simulation.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `hunters-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Seed the starting world and wrap it in a [`World`]
//! 4. Spawn the Observer HTTP/SSE server
//! 5. Run the tick driver until Ctrl-C
//! 6. Stop the Observer server

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use hunters_core::config::{LogFormat, LoggingConfig, SimulationConfig};
use hunters_core::{TickDriver, World, create_starting_world};
use hunters_observer::{AppState, ServerConfig, spawn_observer};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const CONFIG_PATH: &str = "hunters-config.yaml";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the tick driver fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging depends on it, so errors here go to
    //    stderr through the returned error.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(from_file, path = CONFIG_PATH, "hunters-engine starting");
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        map_width = config.world.map_width,
        map_height = config.world.map_height,
        tick_interval_ms = config.world.tick_interval_ms,
        minutes_per_tick = config.world.minutes_per_tick,
        "Configuration loaded"
    );

    // 3. Seed the starting world.
    let (state, ids) = create_starting_world(config.map());
    info!(
        hunters = state.hunters().count(),
        monsters = state.monsters().count(),
        first_hunter = %ids.edric,
        "Starting world created"
    );
    let server_config = ServerConfig::from(&config.server);
    let world = Arc::new(World::new(state, config));

    // 4. Start the Observer server.
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let observer = spawn_observer(
        &server_config,
        Arc::new(AppState::new(Arc::clone(&world))),
        async move {
            let _ = stop_rx.wait_for(|stop| *stop).await;
        },
    )
    .await?;

    // 5. Run the tick driver until Ctrl-C.
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C, stopping");
        }
        info!("Shutdown requested");
    };
    let result = TickDriver::from_config(Arc::clone(&world)).run(shutdown).await;

    // 6. Stop the Observer server, giving in-flight requests a grace period.
    //    Event streams never finish on their own, so a timeout is expected
    //    while observers are still connected.
    let _ = stop_tx.send(true);
    stop_observer(observer, SHUTDOWN_GRACE).await;
    let final_version = world.snapshot().await.version();

    match result {
        Ok(total_ticks) => {
            info!(total_ticks, final_version, "hunters-engine stopped");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Wait up to `grace` for the observer task to finish, then abort it.
/// Returns whether it finished on its own.
async fn stop_observer(observer: JoinHandle<()>, grace: Duration) -> bool {
    let abort = observer.abort_handle();
    match tokio::time::timeout(grace, observer).await {
        Ok(Ok(())) => {
            info!("Observer server stopped");
            true
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Observer task failed");
            true
        }
        Err(_) => {
            let grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX);
            warn!(grace_ms, "Observer did not stop in time, aborting");
            abort.abort();
            false
        }
    }
}

/// Load `hunters-config.yaml` if present, otherwise defaults. Returns the
/// config and whether it came from the file.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::parse("{}")?, false))
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| EngineError::Logging {
            message: format!("invalid log level {:?}: {e}", logging.level),
        })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = match logging.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}
