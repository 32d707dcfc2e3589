//! Mission lifecycle engine.
//!
//! Runs once per tick after presence decay and expiry. Every in-progress
//! mission whose fixed duration has elapsed moves to a terminal status and
//! releases its hunter:
//!
//! | Type | Outcome |
//! |------|---------|
//! | `SCOUT` | `COMPLETED` |
//! | `OBSERVE` | `SUCCEEDED` |
//! | `CAPTURE` | `SUCCEEDED` or `FAILED` by one capture roll |
//!
//! A mission whose hunter is gone, or whose target monster is gone (expired
//! or captured earlier in the same pass), resolves `FAILED` without a roll.
//!
//! The random source is a parameter. Production passes the world's seeded
//! generator; tests pass a fixed one.

use hunters_types::{
    CapturedMonster, HunterId, MissionId, MissionStatus, MissionType, MonsterId,
};
use rand::Rng;
use tracing::{debug, info};

use crate::config::{CaptureConfig, MissionConfig};
use crate::store::WorldState;

/// The one capture roll made for a capture mission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRoll {
    /// Clamped success chance.
    pub chance: f64,
    /// Uniform draw in `[0, 1)`; success iff `draw < chance`.
    pub draw: f64,
}

impl CaptureRoll {
    /// Whether the roll succeeded.
    pub const fn succeeded(self) -> bool {
        self.draw < self.chance
    }
}

/// What happened to one mission during a lifecycle pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The mission that finished.
    pub mission_id: MissionId,
    /// Its type.
    pub mission_type: MissionType,
    /// The hunter released by it.
    pub hunter_id: HunterId,
    /// The terminal status it reached.
    pub status: MissionStatus,
    /// The capture roll, for capture missions that got to roll.
    pub capture: Option<CaptureRoll>,
}

/// Success chance for a capture attempt.
///
/// `clamp(base + skill_bonus*skill + presence_bonus*presence
/// - threat_penalty*threat, min_chance, max_chance)`.
pub fn capture_chance(config: &CaptureConfig, skill: u8, threat: u8, presence: f64) -> f64 {
    let raw = config.base + config.skill_bonus * f64::from(skill)
        + config.presence_bonus * presence
        - config.threat_penalty * f64::from(threat);
    raw.clamp(config.min_chance, config.max_chance)
}

/// Resolve every in-progress mission whose duration has elapsed.
///
/// Missions are visited oldest first, so two captures racing for one
/// monster are settled in creation order.
pub fn resolve_missions<R: Rng + ?Sized>(
    state: &mut WorldState,
    missions: &MissionConfig,
    capture: &CaptureConfig,
    rng: &mut R,
) -> Vec<Resolution> {
    let now = state.clock.minute();

    let due: Vec<MissionId> = state
        .missions
        .iter()
        .filter(|m| m.status == MissionStatus::InProgress)
        .filter(|m| now.saturating_sub(m.started_at_minute) >= missions.duration(m.mission_type))
        .map(|m| m.id)
        .collect();

    let mut resolutions = Vec::with_capacity(due.len());
    for mission_id in due {
        if let Some(resolution) = resolve_one(state, mission_id, capture, rng) {
            resolutions.push(resolution);
        }
    }
    resolutions
}

fn resolve_one<R: Rng + ?Sized>(
    state: &mut WorldState,
    mission_id: MissionId,
    capture: &CaptureConfig,
    rng: &mut R,
) -> Option<Resolution> {
    let mission = state.missions.iter().find(|m| m.id == mission_id)?;
    let (mission_type, hunter_id, monster_id) =
        (mission.mission_type, mission.hunter_id, mission.monster_id);

    let hunter_present = state.hunters.contains_key(&hunter_id);
    let target_present = monster_id.is_some_and(|id| state.monsters.contains_key(&id));

    let participants_present =
        hunter_present && (target_present || !mission_type.targets_monster());

    let (status, roll) = if participants_present {
        match mission_type {
            MissionType::Scout => (MissionStatus::Completed, None),
            MissionType::Observe => (MissionStatus::Succeeded, None),
            MissionType::Capture => {
                match monster_id.and_then(|id| attempt_capture(state, hunter_id, id, capture, rng)) {
                    Some(roll) if roll.succeeded() => (MissionStatus::Succeeded, Some(roll)),
                    Some(roll) => (MissionStatus::Failed, Some(roll)),
                    None => (MissionStatus::Failed, None),
                }
            }
        }
    } else {
        debug!(%mission_id, ?mission_type, hunter_present, target_present,
            "Mission participant gone, resolving as failed");
        (MissionStatus::Failed, None)
    };

    let now = state.clock.minute();
    if let Some(m) = state.missions.iter_mut().find(|m| m.id == mission_id) {
        m.status = status;
        m.finished_at_minute = Some(now);
    }
    state.release_hunter(hunter_id);

    info!(%mission_id, ?mission_type, %hunter_id, ?status, minute = now, "Mission resolved");

    Some(Resolution {
        mission_id,
        mission_type,
        hunter_id,
        status,
        capture: roll,
    })
}

/// Roll once and apply the consequences. `None` if any participant is
/// missing (no roll is made).
fn attempt_capture<R: Rng + ?Sized>(
    state: &mut WorldState,
    hunter_id: HunterId,
    monster_id: MonsterId,
    config: &CaptureConfig,
    rng: &mut R,
) -> Option<CaptureRoll> {
    let skill = state.hunters.get(&hunter_id)?.skill;
    let monster = state.monsters.get(&monster_id)?;
    let (monster_type, threat) = (monster.monster_type, monster.threat);
    let presence = state.presences.get(&monster_id)?.presence;

    let roll = CaptureRoll {
        chance: capture_chance(config, skill, threat, presence),
        draw: rng.random::<f64>(),
    };
    debug!(%monster_id, chance = roll.chance, draw = roll.draw, "Capture roll");

    if roll.succeeded() {
        state.remove_monster(monster_id);
        state.captured.push(CapturedMonster {
            id: monster_id,
            monster_type,
            threat,
            captured_at_minute: state.clock.minute(),
            captured_by: hunter_id,
        });
    } else {
        let escaped = presence - config.failure_presence_penalty;
        if state.set_presence(monster_id, escaped) {
            info!(%monster_id, "Monster vanished after escaping capture");
        }
    }
    Some(roll)
}
