//! World state store: the single source of truth for the simulation.
//!
//! [`WorldState`] owns every hunter, monster, presence record, mission,
//! and the clock. Outside this crate it is read-only once seeded; the tick
//! pipeline and the command gateway mutate it through crate-private
//! helpers, and the [`World`](crate::world::World) service serialises
//! access behind one lock.
//!
//! Two couplings are enforced here rather than by callers:
//!
//! - a monster and its presence record are inserted and removed together;
//! - a presence that reaches `0.0` removes its monster on the spot.

use std::collections::BTreeMap;

use hunters_types::{
    CapturedMonster, Cell, GameMap, Hunter, HunterId, HunterStatus, Mission, MissionStatus,
    Monster, MonsterId, MonsterPresence, WorldSnapshot,
};

use crate::clock::GameClock;
use crate::visibility;

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// All mutable world entities plus the clock and revision counter.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub(crate) clock: GameClock,
    pub(crate) revision: u64,
    pub(crate) map: GameMap,
    pub(crate) hunters: BTreeMap<HunterId, Hunter>,
    pub(crate) monsters: BTreeMap<MonsterId, Monster>,
    pub(crate) presences: BTreeMap<MonsterId, MonsterPresence>,
    pub(crate) missions: Vec<Mission>,
    pub(crate) captured: Vec<CapturedMonster>,
}

impl WorldState {
    /// Create an empty world on the given grid at minute 0, revision 0.
    pub const fn new(map: GameMap) -> Self {
        Self {
            clock: GameClock::new(),
            revision: 0,
            map,
            hunters: BTreeMap::new(),
            monsters: BTreeMap::new(),
            presences: BTreeMap::new(),
            missions: Vec::new(),
            captured: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    /// Add a hunter. Seeded hunters always start idle.
    pub fn add_hunter(&mut self, mut hunter: Hunter) -> HunterId {
        hunter.status = HunterStatus::Idle;
        let id = hunter.id;
        self.hunters.insert(id, hunter);
        id
    }

    /// Add a monster together with its presence record.
    ///
    /// `presence` is clamped into `[0, 1]`. A monster seeded at zero is
    /// removed by the next tick's expiry step.
    pub fn add_monster(&mut self, monster: Monster, presence: f64, cell: Cell) -> MonsterId {
        let id = monster.id;
        self.presences
            .insert(id, MonsterPresence::new(id, presence, cell));
        self.monsters.insert(id, monster);
        id
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The simulated clock.
    pub const fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Current revision; bumped once per committed mutation.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Grid dimensions.
    pub const fn map(&self) -> GameMap {
        self.map
    }

    /// Look up a hunter.
    pub fn hunter(&self, id: HunterId) -> Option<&Hunter> {
        self.hunters.get(&id)
    }

    /// All hunters in id order.
    pub fn hunters(&self) -> impl Iterator<Item = &Hunter> {
        self.hunters.values()
    }

    /// Look up a monster.
    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    /// All monsters in id order.
    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    /// Look up the presence record for a monster.
    pub fn presence(&self, id: MonsterId) -> Option<&MonsterPresence> {
        self.presences.get(&id)
    }

    /// All presence records, revealed or not.
    pub fn presences(&self) -> impl Iterator<Item = &MonsterPresence> {
        self.presences.values()
    }

    /// Retained missions, oldest first.
    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    /// Capture ledger, oldest first.
    pub fn captured(&self) -> &[CapturedMonster] {
        &self.captured
    }

    /// The in-progress mission assigned to a hunter, if any.
    pub fn active_mission_for(&self, hunter_id: HunterId) -> Option<&Mission> {
        self.missions
            .iter()
            .find(|m| m.hunter_id == hunter_id && m.status == MissionStatus::InProgress)
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    /// Cells of hunters on an in-progress scout mission.
    pub fn scout_positions(&self) -> Vec<Cell> {
        visibility::scout_positions(&self.missions, |id| self.hunters.get(&id).map(|h| h.cell))
    }

    /// Presence records currently revealed by scouts.
    pub fn visible_presences(&self, radius: u32) -> Vec<MonsterPresence> {
        let scouts = self.scout_positions();
        visibility::visible_presences(self.presences.values(), &scouts, radius)
    }

    /// Whether the monster's presence is currently revealed.
    pub fn is_revealed(&self, monster_id: MonsterId, radius: u32) -> bool {
        self.presences.get(&monster_id).is_some_and(|p| {
            let scouts = self.scout_positions();
            visibility::is_revealed(p.cell, &scouts, radius)
        })
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Build an immutable view of the current state.
    pub fn snapshot(&self, scout_radius: u32) -> WorldSnapshot {
        WorldSnapshot {
            time: self.clock.view(self.revision),
            map: self.map,
            hunters: self.hunters.values().cloned().collect(),
            monsters: self.monsters.values().cloned().collect(),
            presences: self.visible_presences(scout_radius),
            missions: self.missions.clone(),
            captured_monsters: self.captured.clone(),
        }
    }

    /// Check the cross-entity invariants:
    ///
    /// - a hunter is `OnMission` iff exactly one in-progress mission names it;
    /// - every presence is within `[0, 1]` and strictly positive;
    /// - monsters and presence records cover the same ids.
    pub fn is_consistent(&self) -> bool {
        let hunters_ok = self.hunters.values().all(|hunter| {
            let active = self
                .missions
                .iter()
                .filter(|m| m.hunter_id == hunter.id && m.status == MissionStatus::InProgress)
                .count();
            match hunter.status {
                HunterStatus::Idle => active == 0,
                HunterStatus::OnMission => active == 1,
            }
        });
        let presence_ok = self
            .presences
            .values()
            .all(|p| p.presence > 0.0 && p.presence <= 1.0);
        let coupled = self.monsters.len() == self.presences.len()
            && self.monsters.keys().all(|id| self.presences.contains_key(id));
        hunters_ok && presence_ok && coupled
    }

    // -----------------------------------------------------------------------
    // Crate-private mutation helpers
    // -----------------------------------------------------------------------

    /// Bump the revision. Returns the new value.
    pub(crate) const fn bump_revision(&mut self) -> u64 {
        self.revision = self.revision.saturating_add(1);
        self.revision
    }

    /// Remove a monster and its presence record together.
    pub(crate) fn remove_monster(&mut self, id: MonsterId) -> Option<Monster> {
        self.presences.remove(&id);
        self.monsters.remove(&id)
    }

    /// Set a presence value (rounded, floored at zero). Reaching zero
    /// removes the monster. Returns `true` if the monster was removed.
    pub(crate) fn set_presence(&mut self, id: MonsterId, value: f64) -> bool {
        let value = round2(value.clamp(0.0, 1.0));
        if value <= 0.0 {
            return self.remove_monster(id).is_some();
        }
        if let Some(p) = self.presences.get_mut(&id) {
            p.presence = value;
        }
        false
    }

    /// Release a hunter back to idle. Missing hunters are ignored.
    pub(crate) fn release_hunter(&mut self, id: HunterId) {
        if let Some(h) = self.hunters.get_mut(&id) {
            h.status = HunterStatus::Idle;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hunters_types::{MissionId, MissionType, MonsterType};

    use super::*;

    fn small_world() -> (WorldState, HunterId, MonsterId) {
        let mut state = WorldState::new(GameMap {
            width: 6,
            height: 6,
        });
        let hunter = state.add_hunter(Hunter::new("Edric", 3, Cell::new(1, 1)));
        let monster = state.add_monster(
            Monster::new(MonsterType::Wraith, 3),
            0.8,
            Cell::new(2, 2),
        );
        (state, hunter, monster)
    }

    #[test]
    fn round2_rounds_half_away() {
        assert!((round2(0.700_000_000_1) - 0.7).abs() < 1e-12);
        assert!((round2(0.005) - 0.01).abs() < 1e-12);
        assert!((round2(0.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn seeded_world_is_consistent() {
        let (state, hunter, monster) = small_world();
        assert!(state.is_consistent());
        assert_eq!(state.revision(), 0);
        assert_eq!(state.hunter(hunter).unwrap().status, HunterStatus::Idle);
        assert!(state.monster(monster).is_some());
        assert!(state.presence(monster).is_some());
    }

    #[test]
    fn seeding_forces_idle() {
        let mut state = WorldState::new(GameMap {
            width: 2,
            height: 2,
        });
        let mut busy = Hunter::new("Mara", 4, Cell::new(0, 0));
        busy.status = HunterStatus::OnMission;
        let id = state.add_hunter(busy);
        assert_eq!(state.hunter(id).unwrap().status, HunterStatus::Idle);
    }

    #[test]
    fn presence_reaching_zero_removes_monster() {
        let (mut state, _, monster) = small_world();
        assert!(!state.set_presence(monster, 0.3));
        assert!((state.presence(monster).unwrap().presence - 0.3).abs() < 1e-12);

        assert!(state.set_presence(monster, -0.2));
        assert!(state.monster(monster).is_none());
        assert!(state.presence(monster).is_none());
        assert!(state.is_consistent());
    }

    #[test]
    fn snapshot_hides_unrevealed_presences() {
        let (mut state, hunter, monster) = small_world();
        let snap = state.snapshot(1);
        assert_eq!(snap.monsters.len(), 1);
        assert!(snap.presences.is_empty());

        state.missions.push(Mission {
            id: MissionId::new(),
            mission_type: MissionType::Scout,
            hunter_id: hunter,
            monster_id: None,
            target_cell: Some(Cell::new(1, 1)),
            status: MissionStatus::InProgress,
            started_at_minute: 0,
            finished_at_minute: None,
        });
        state.hunters.get_mut(&hunter).unwrap().status = HunterStatus::OnMission;

        let snap = state.snapshot(1);
        assert_eq!(snap.presences.len(), 1);
        assert!(state.is_revealed(monster, 1));
        assert!(state.is_consistent());
    }

    #[test]
    fn busy_hunter_without_mission_is_inconsistent() {
        let (mut state, hunter, _) = small_world();
        state.hunters.get_mut(&hunter).unwrap().status = HunterStatus::OnMission;
        assert!(!state.is_consistent());
    }

    #[test]
    fn revision_bumps_by_one() {
        let (mut state, _, _) = small_world();
        assert_eq!(state.bump_revision(), 1);
        assert_eq!(state.bump_revision(), 2);
        assert_eq!(state.snapshot(1).version(), 2);
    }
}
