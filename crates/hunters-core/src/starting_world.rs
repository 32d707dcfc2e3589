//! Default starting world for the Hollow Vale.
//!
//! Two idle hunters and one wraith. No missions are seeded, so the
//! hunter/mission invariants hold from minute 0.

use hunters_types::{Cell, GameMap, Hunter, HunterId, Monster, MonsterId, MonsterType};

use crate::store::WorldState;

/// Identifiers for the seeded entities, so callers (and tests) can refer to
/// them without searching the store.
#[derive(Debug, Clone, Copy)]
pub struct StartingIds {
    /// Edric the Grey: skill 3, starts at (1, 1).
    pub edric: HunterId,
    /// Mara Blackthorn: skill 4, starts at (4, 2).
    pub mara: HunterId,
    /// A threat-3 wraith at (2, 2) with presence 0.8.
    pub wraith: MonsterId,
}

/// Create the default starting world on `map`.
pub fn create_starting_world(map: GameMap) -> (WorldState, StartingIds) {
    let mut state = WorldState::new(map);

    let edric = state.add_hunter(Hunter::new("Edric the Grey", 3, Cell::new(1, 1)));
    let mara = state.add_hunter(Hunter::new("Mara Blackthorn", 4, Cell::new(4, 2)));
    let wraith = state.add_monster(
        Monster::new(MonsterType::Wraith, 3),
        0.8,
        Cell::new(2, 2),
    );

    (state, StartingIds { edric, mara, wraith })
}
