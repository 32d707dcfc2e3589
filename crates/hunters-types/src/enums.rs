//! Closed enumerations for hunter, monster, and mission state.
//!
//! Every status domain is its own enum so transitions are matched
//! exhaustively. Wire names are `SCREAMING_SNAKE_CASE` (`ON_MISSION`,
//! `IN_PROGRESS`, ...).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Whether a hunter is free to take a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum HunterStatus {
    /// Available for a new mission.
    Idle,
    /// Assigned to exactly one in-progress mission.
    OnMission,
}

/// The kind of creature behind a presence record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum MonsterType {
    /// A restless spirit bound to ruins.
    Wraith,
    /// A corpse-eater haunting graveyards.
    Ghoul,
    /// A wailing omen that drifts between villages.
    Banshee,
    /// A starving horror of the winter woods.
    Wendigo,
}

/// What a mission sets out to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum MissionType {
    /// Move to a cell and reveal presences around it.
    Scout,
    /// Watch a revealed monster.
    Observe,
    /// Attempt to take a revealed monster out of the world.
    Capture,
}

impl MissionType {
    /// Whether this mission type targets a monster rather than a cell.
    pub const fn targets_monster(self) -> bool {
        match self {
            Self::Scout => false,
            Self::Observe | Self::Capture => true,
        }
    }
}

/// Lifecycle state of a mission.
///
/// The only legal transitions are out of [`MissionStatus::InProgress`];
/// every other variant is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum MissionStatus {
    /// Running; the assigned hunter is busy.
    InProgress,
    /// Finished with its objective met.
    Succeeded,
    /// Finished without meeting its objective.
    Failed,
    /// Finished; used for missions with no success criterion (scouting).
    Completed,
}

impl MissionStatus {
    /// Whether no further transitions can happen.
    pub const fn is_terminal(self) -> bool {
        match self {
            Self::InProgress => false,
            Self::Succeeded | Self::Failed | Self::Completed => true,
        }
    }
}
