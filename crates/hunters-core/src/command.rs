//! Command gateway: validate and apply `start mission` requests.
//!
//! Validation runs to completion before anything is written, so a rejected
//! command leaves the store exactly as it was. Input problems (unknown ids,
//! missing fields, out-of-bounds cells) are checked before state conflicts
//! (busy hunter, unrevealed monster).

use hunters_types::{
    Cell, GameMap, HunterId, HunterStatus, Mission, MissionId, MissionStatus, MissionType,
    MonsterId, StartMissionRequest,
};
use tracing::info;

use crate::config::MissionConfig;
use crate::store::WorldState;

/// The two families of command failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or referentially invalid input.
    Validation,
    /// Well-formed input that the current state does not allow.
    Conflict,
}

/// Why a command was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// No hunter with this id.
    #[error("unknown hunter {0}")]
    UnknownHunter(HunterId),

    /// No monster with this id.
    #[error("unknown monster {0}")]
    UnknownMonster(MonsterId),

    /// A scout mission was requested without a target cell.
    #[error("targetCell is required for SCOUT missions")]
    MissingTargetCell,

    /// An observe or capture mission was requested without a monster.
    #[error("monsterId is required for OBSERVE and CAPTURE missions")]
    MissingMonsterId(MissionType),

    /// The target cell lies outside the map.
    #[error("cell ({}, {}) is outside the {}x{} map", cell.x, cell.y, map.width, map.height)]
    CellOutOfBounds {
        /// Requested cell.
        cell: Cell,
        /// Map it was checked against.
        map: GameMap,
    },

    /// The hunter already has a mission in progress.
    #[error("hunter {0} is not idle")]
    HunterBusy(HunterId),

    /// No active scout currently reveals the monster.
    #[error("monster {0} is not revealed")]
    MonsterNotRevealed(MonsterId),
}

impl CommandError {
    /// Which family this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownHunter(_)
            | Self::UnknownMonster(_)
            | Self::MissingTargetCell
            | Self::MissingMonsterId(_)
            | Self::CellOutOfBounds { .. } => ErrorKind::Validation,
            Self::HunterBusy(_) | Self::MonsterNotRevealed(_) => ErrorKind::Conflict,
        }
    }
}

/// A request that passed validation, reduced to what the apply step needs.
#[derive(Clone, Copy)]
enum Target {
    Cell(Cell),
    Monster(MonsterId),
}

/// Validate `request` and, if it passes, create the mission.
///
/// On success the hunter becomes `ON_MISSION` (a scout is also moved to its
/// target cell), the mission is appended `IN_PROGRESS` at the current
/// minute, and the store revision is bumped.
///
/// # Errors
///
/// Returns a [`CommandError`] and mutates nothing if validation fails.
pub fn start_mission(
    state: &mut WorldState,
    request: &StartMissionRequest,
    missions: &MissionConfig,
) -> Result<Mission, CommandError> {
    let target = validate(state, request, missions.scout_radius)?;

    let now = state.clock.minute();
    let (target_cell, monster_id) = match target {
        Target::Cell(cell) => (Some(cell), None),
        Target::Monster(id) => (None, Some(id)),
    };

    if let Some(hunter) = state.hunters.get_mut(&request.hunter_id) {
        hunter.status = HunterStatus::OnMission;
        if let Some(cell) = target_cell {
            hunter.cell = cell;
        }
    }

    let mission = Mission {
        id: MissionId::new(),
        mission_type: request.mission_type,
        hunter_id: request.hunter_id,
        monster_id,
        target_cell,
        status: MissionStatus::InProgress,
        started_at_minute: now,
        finished_at_minute: None,
    };
    state.missions.push(mission.clone());
    let version = state.bump_revision();

    info!(
        mission_id = %mission.id,
        mission_type = ?mission.mission_type,
        hunter_id = %mission.hunter_id,
        minute = now,
        version,
        "Mission started"
    );
    Ok(mission)
}

fn validate(
    state: &WorldState,
    request: &StartMissionRequest,
    scout_radius: u32,
) -> Result<Target, CommandError> {
    let hunter = state
        .hunter(request.hunter_id)
        .ok_or(CommandError::UnknownHunter(request.hunter_id))?;

    let target = match request.mission_type {
        MissionType::Scout => {
            let cell = request.target_cell.ok_or(CommandError::MissingTargetCell)?;
            let map = state.map();
            if !map.contains(cell) {
                return Err(CommandError::CellOutOfBounds { cell, map });
            }
            Target::Cell(cell)
        }
        MissionType::Observe | MissionType::Capture => {
            let id = request
                .monster_id
                .ok_or(CommandError::MissingMonsterId(request.mission_type))?;
            if state.monster(id).is_none() {
                return Err(CommandError::UnknownMonster(id));
            }
            Target::Monster(id)
        }
    };

    if hunter.status != HunterStatus::Idle {
        return Err(CommandError::HunterBusy(hunter.id));
    }
    match target {
        Target::Monster(id) if !state.is_revealed(id, scout_radius) => {
            Err(CommandError::MonsterNotRevealed(id))
        }
        Target::Monster(_) | Target::Cell(_) => Ok(target),
    }
}
