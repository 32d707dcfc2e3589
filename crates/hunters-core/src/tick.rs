//! Tick pipeline: the one atomic step that moves the world forward.
//!
//! Each tick runs these phases in a fixed order, never interleaved:
//!
//! 1. **Clock** -- advance the simulated clock by `minutes`.
//! 2. **Decay** -- lower every presence by `decay_per_minute * minutes`,
//!    floored at 0 and rounded to two decimals.
//! 3. **Expiry** -- remove every monster whose presence reached 0, together
//!    with its presence record.
//! 4. **Resolution** -- run the [mission lifecycle](crate::mission) against
//!    the post-expiry state.
//! 5. **Prune** -- drop the oldest terminal missions beyond the retained
//!    history.
//!
//! The clock advance is the only fallible phase and runs first, so a failed
//! tick leaves the state untouched. A successful tick bumps the store
//! revision exactly once.

use hunters_types::MonsterId;
use rand::Rng;
use tracing::{debug, info};

use crate::clock::ClockError;
use crate::config::SimulationConfig;
use crate::mission::{self, Resolution};
use crate::store::{WorldState, round2};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// Simulated minute after the advance.
    pub minute: u64,
    /// Store revision after the tick.
    pub version: u64,
    /// Monsters removed because their presence decayed to zero.
    pub expired: Vec<MonsterId>,
    /// Missions that reached a terminal status this tick.
    pub resolutions: Vec<Resolution>,
    /// Terminal missions dropped from the retained history.
    pub pruned: usize,
}

/// Execute one tick against `state`.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the clock would overflow; nothing is
/// mutated in that case.
pub fn run_tick<R: Rng + ?Sized>(
    state: &mut WorldState,
    minutes: u64,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<TickSummary, TickError> {
    // --- Phase 1: Clock ---
    let minute = state.clock.advance(minutes)?;

    // --- Phase 2: Decay ---
    phase_decay(state, config.presence.decay_per_minute, minutes);

    // --- Phase 3: Expiry ---
    let expired = phase_expiry(state);

    // --- Phase 4: Resolution ---
    let resolutions = mission::resolve_missions(state, &config.missions, &config.capture, rng);

    // --- Phase 5: Prune ---
    let pruned = prune_history(state, config.missions.finished_history);

    let version = state.bump_revision();

    info!(
        minute,
        version,
        expired = expired.len(),
        resolved = resolutions.len(),
        "Tick complete"
    );

    Ok(TickSummary {
        minute,
        version,
        expired,
        resolutions,
        pruned,
    })
}

/// New presence after `minutes` of decay: `max(0, round2(p - rate*minutes))`.
pub fn decayed(presence: f64, rate: f64, minutes: u64) -> f64 {
    let minutes = f64::from(u32::try_from(minutes).unwrap_or(u32::MAX));
    round2(presence - rate * minutes).max(0.0)
}

fn phase_decay(state: &mut WorldState, rate: f64, minutes: u64) {
    for presence in state.presences.values_mut() {
        presence.presence = decayed(presence.presence, rate, minutes);
    }
}

fn phase_expiry(state: &mut WorldState) -> Vec<MonsterId> {
    let expired: Vec<MonsterId> = state
        .presences
        .values()
        .filter(|p| p.presence <= 0.0)
        .map(|p| p.monster_id)
        .collect();

    for id in &expired {
        state.remove_monster(*id);
        info!(monster_id = %id, "Monster presence faded, removed from the world");
    }
    expired
}

/// Drop the oldest terminal missions so that at most `keep` remain.
/// In-progress missions are never dropped.
fn prune_history(state: &mut WorldState, keep: usize) -> usize {
    let terminal = state
        .missions
        .iter()
        .filter(|m| m.status.is_terminal())
        .count();
    let mut excess = terminal.saturating_sub(keep);
    if excess == 0 {
        return 0;
    }
    let pruned = excess;
    state.missions.retain(|m| {
        if excess > 0 && m.status.is_terminal() {
            excess = excess.saturating_sub(1);
            false
        } else {
            true
        }
    });
    debug!(pruned, "Pruned finished missions");
    pruned
}
