//! World-state engine for the Hollow Vale hunters simulation.
//!
//! Owns the store, the tick pipeline that mutates it (clock, decay, expiry,
//! mission resolution), the command gateway, visibility, and the broadcast
//! hub that keeps observers in step with one serialised timeline.
//!
//! # Modules
//!
//! - [`clock`] -- Simulated minute counter and its day/hour view.
//! - [`config`] -- Configuration loading from `hunters-config.yaml` into
//!   strongly-typed structs.
//! - [`store`] -- [`WorldState`], the single source of truth.
//! - [`visibility`] -- Which presences active scouts reveal.
//! - [`mission`] -- Mission lifecycle and the capture roll.
//! - [`tick`] -- The tick pipeline.
//! - [`command`] -- Validation and application of mission commands.
//! - [`hub`] -- Snapshot fan-out to observers.
//! - [`world`] -- [`World`], the locked service wrapping all of the above.
//! - [`runner`] -- Periodic tick driver.
//! - [`starting_world`] -- Default seed.
//!
//! [`WorldState`]: store::WorldState
//! [`World`]: world::World

pub mod clock;
pub mod command;
pub mod config;
pub mod hub;
pub mod mission;
pub mod runner;
pub mod starting_world;
pub mod store;
pub mod tick;
pub mod visibility;
pub mod world;

pub use command::{CommandError, ErrorKind};
pub use config::SimulationConfig;
pub use hub::{BroadcastHub, PublishReport, Subscription};
pub use runner::TickDriver;
pub use starting_world::{StartingIds, create_starting_world};
pub use store::WorldState;
pub use world::World;
