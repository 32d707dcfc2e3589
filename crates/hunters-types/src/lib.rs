//! Shared type definitions for the Hollow Vale hunters simulation.
//!
//! Every crate in the workspace speaks these types, and the display layer
//! consumes them as JSON (and as `TypeScript` via `ts-rs`).
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for hunters, monsters, missions
//! - [`enums`] -- Closed status and kind enumerations
//! - [`structs`] -- Entities, the clock view, and [`WorldSnapshot`]
//! - [`commands`] -- Request payloads for the command gateway

pub mod commands;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use commands::{StartMissionRequest, TickRequest};
pub use enums::{HunterStatus, MissionStatus, MissionType, MonsterType};
pub use ids::{HunterId, MissionId, MonsterId};
pub use structs::{
    CapturedMonster, Cell, ClockView, GameMap, Hunter, MAX_SKILL, MIN_SKILL, Mission, Monster,
    MonsterPresence, WorldSnapshot,
};
