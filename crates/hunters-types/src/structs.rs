//! Core entity structs and the published world snapshot.
//!
//! Field names go over the wire in `camelCase` (`hunterId`,
//! `startedAtMinute`, ...) to match what the display layer reads.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{HunterStatus, MissionStatus, MissionType, MonsterType};
use crate::ids::{HunterId, MissionId, MonsterId};

/// Lowest hunter skill rating.
pub const MIN_SKILL: u8 = 1;

/// Highest hunter skill rating.
pub const MAX_SKILL: u8 = 10;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A grid cell. Signed so that out-of-range requests parse and are then
/// rejected by bounds checks instead of by the JSON decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Cell {
    /// Column, 0-based.
    pub x: i32,
    /// Row, 0-based.
    pub y: i32,
}

impl Cell {
    /// Create a cell from coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: `max(|dx|, |dy|)`.
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }
}

/// Dimensions of the rectangular world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameMap {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl GameMap {
    /// Whether `cell` lies inside `0..width` x `0..height`.
    pub fn contains(&self, cell: Cell) -> bool {
        let x_ok = u32::try_from(cell.x).is_ok_and(|x| x < self.width);
        let y_ok = u32::try_from(cell.y).is_ok_and(|y| y < self.height);
        x_ok && y_ok
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A hunter who can be sent on missions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Hunter {
    /// Unique identifier.
    pub id: HunterId,
    /// Display name.
    pub name: String,
    /// Skill rating in `MIN_SKILL..=MAX_SKILL`.
    pub skill: u8,
    /// Idle or busy.
    pub status: HunterStatus,
    /// Current grid position.
    pub cell: Cell,
}

impl Hunter {
    /// Create an idle hunter. Skill is clamped into `MIN_SKILL..=MAX_SKILL`.
    pub fn new(name: impl Into<String>, skill: u8, cell: Cell) -> Self {
        Self {
            id: HunterId::new(),
            name: name.into(),
            skill: skill.clamp(MIN_SKILL, MAX_SKILL),
            status: HunterStatus::Idle,
            cell,
        }
    }
}

/// A monster. Exists only while its [`MonsterPresence`] does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Monster {
    /// Unique identifier.
    pub id: MonsterId,
    /// What kind of monster this is.
    #[serde(rename = "type")]
    pub monster_type: MonsterType,
    /// Danger rating, at least 1.
    pub threat: u8,
}

impl Monster {
    /// Create a monster. A threat of zero is raised to one.
    pub fn new(monster_type: MonsterType, threat: u8) -> Self {
        Self {
            id: MonsterId::new(),
            monster_type,
            threat: threat.max(1),
        }
    }
}

/// Where a monster is and how strongly it can still be detected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MonsterPresence {
    /// The monster this record belongs to.
    pub monster_id: MonsterId,
    /// Detectability in `[0.0, 1.0]`.
    pub presence: f64,
    /// Grid position.
    pub cell: Cell,
}

impl MonsterPresence {
    /// Create a presence record, clamping `presence` into `[0, 1]`.
    pub fn new(monster_id: MonsterId, presence: f64, cell: Cell) -> Self {
        Self {
            monster_id,
            presence: presence.clamp(0.0, 1.0),
            cell,
        }
    }
}

/// A unit of work assigned to one hunter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Mission {
    /// Unique identifier.
    pub id: MissionId,
    /// What the mission does.
    #[serde(rename = "type")]
    pub mission_type: MissionType,
    /// The assigned hunter.
    pub hunter_id: HunterId,
    /// Target monster (observe and capture only).
    pub monster_id: Option<MonsterId>,
    /// Target cell (scout only).
    pub target_cell: Option<Cell>,
    /// Lifecycle state.
    pub status: MissionStatus,
    /// Simulated minute the mission was created.
    pub started_at_minute: u64,
    /// Simulated minute the mission reached a terminal state.
    pub finished_at_minute: Option<u64>,
}

/// Record of a monster removed from the world by a successful capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CapturedMonster {
    /// The captured monster's id.
    pub id: MonsterId,
    /// What kind of monster it was.
    #[serde(rename = "type")]
    pub monster_type: MonsterType,
    /// Its threat rating.
    pub threat: u8,
    /// Simulated minute of the capture.
    pub captured_at_minute: u64,
    /// The hunter who made the capture.
    pub captured_by: HunterId,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Derived calendar view of the simulated clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ClockView {
    /// Store revision; strictly increases with every committed mutation.
    pub version: u64,
    /// Simulated minutes since the world started.
    pub total_minutes: u64,
    /// Day number, starting at 1.
    pub day: u64,
    /// Hour of day, `0..24`.
    pub hour: u8,
    /// Minute of hour, `0..60`.
    pub minute: u8,
}

/// Immutable point-in-time view of the whole world.
///
/// `presences` contains only the records revealed by active scouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// Clock and version.
    pub time: ClockView,
    /// Grid dimensions.
    pub map: GameMap,
    /// All hunters.
    pub hunters: Vec<Hunter>,
    /// All monsters still in play.
    pub monsters: Vec<Monster>,
    /// Presence records currently revealed.
    pub presences: Vec<MonsterPresence>,
    /// All retained missions, oldest first.
    pub missions: Vec<Mission>,
    /// Monsters taken out of the world by captures.
    pub captured_monsters: Vec<CapturedMonster>,
}

impl WorldSnapshot {
    /// The snapshot's ordering key.
    pub const fn version(&self) -> u64 {
        self.time.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_distance_is_max_axis_delta() {
        let origin = Cell::new(2, 2);
        assert_eq!(origin.chebyshev_distance(Cell::new(3, 3)), 1);
        assert_eq!(origin.chebyshev_distance(Cell::new(2, 2)), 0);
        assert_eq!(origin.chebyshev_distance(Cell::new(0, 3)), 2);
        assert_eq!(origin.chebyshev_distance(Cell::new(-1, 2)), 3);
    }

    #[test]
    fn map_bounds_are_half_open() {
        let map = GameMap {
            width: 6,
            height: 6,
        };
        assert!(map.contains(Cell::new(0, 0)));
        assert!(map.contains(Cell::new(5, 5)));
        assert!(!map.contains(Cell::new(6, 0)));
        assert!(!map.contains(Cell::new(10, 10)));
        assert!(!map.contains(Cell::new(-1, 3)));
    }

    #[test]
    fn constructors_clamp_ranges() {
        let hunter = Hunter::new("Edric", 40, Cell::new(0, 0));
        assert_eq!(hunter.skill, MAX_SKILL);
        assert_eq!(hunter.status, HunterStatus::Idle);

        let monster = Monster::new(MonsterType::Ghoul, 0);
        assert_eq!(monster.threat, 1);

        let presence = MonsterPresence::new(monster.id, 1.7, Cell::new(1, 1));
        assert!((presence.presence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn monster_type_serializes_under_type_key() {
        let monster = Monster::new(MonsterType::Wraith, 3);
        let json = serde_json::to_value(&monster).ok();
        let kind = json.as_ref().and_then(|v| v.get("type")).cloned();
        assert_eq!(kind, Some(serde_json::json!("WRAITH")));
    }
}
