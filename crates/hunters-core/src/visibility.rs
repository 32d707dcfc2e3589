//! Visibility engine: which presence records active scouts reveal.
//!
//! A presence is revealed iff some hunter on an in-progress scout mission
//! stands within Chebyshev distance `radius` of it. With no active scout
//! nothing is revealed. These functions are pure; nothing here is cached,
//! visibility is recomputed from the store for every snapshot and every
//! command check.

use hunters_types::{Cell, HunterId, Mission, MissionStatus, MissionType, MonsterPresence};

/// Cells occupied by hunters currently running a scout mission.
///
/// `hunter_cell` resolves a hunter id to its position; hunters it cannot
/// resolve are skipped.
pub fn scout_positions<'a, F>(missions: impl IntoIterator<Item = &'a Mission>, hunter_cell: F) -> Vec<Cell>
where
    F: Fn(HunterId) -> Option<Cell>,
{
    missions
        .into_iter()
        .filter(|m| m.mission_type == MissionType::Scout && m.status == MissionStatus::InProgress)
        .filter_map(|m| hunter_cell(m.hunter_id))
        .collect()
}

/// Whether `target` is within `radius` of any scout.
pub fn is_revealed(target: Cell, scouts: &[Cell], radius: u32) -> bool {
    scouts
        .iter()
        .any(|scout| scout.chebyshev_distance(target) <= radius)
}

/// Presence records revealed by the given scouts, in input order.
pub fn visible_presences<'a>(
    presences: impl IntoIterator<Item = &'a MonsterPresence>,
    scouts: &[Cell],
    radius: u32,
) -> Vec<MonsterPresence> {
    if scouts.is_empty() {
        return Vec::new();
    }
    presences
        .into_iter()
        .filter(|p| is_revealed(p.cell, scouts, radius))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use hunters_types::{MissionId, MonsterId};

    use super::*;

    fn mission(hunter_id: HunterId, mission_type: MissionType, status: MissionStatus) -> Mission {
        Mission {
            id: MissionId::new(),
            mission_type,
            hunter_id,
            monster_id: None,
            target_cell: None,
            status,
            started_at_minute: 0,
            finished_at_minute: None,
        }
    }

    #[test]
    fn only_in_progress_scouts_count() {
        let scout = HunterId::new();
        let done = HunterId::new();
        let watcher = HunterId::new();
        let missions = vec![
            mission(scout, MissionType::Scout, MissionStatus::InProgress),
            mission(done, MissionType::Scout, MissionStatus::Completed),
            mission(watcher, MissionType::Observe, MissionStatus::InProgress),
        ];

        let cells = scout_positions(&missions, |id| {
            if id == scout {
                Some(Cell::new(1, 1))
            } else {
                Some(Cell::new(4, 4))
            }
        });
        assert_eq!(cells, vec![Cell::new(1, 1)]);
    }

    #[test]
    fn unresolvable_scout_is_skipped() {
        let missions = vec![mission(
            HunterId::new(),
            MissionType::Scout,
            MissionStatus::InProgress,
        )];
        let cells = scout_positions(&missions, |_| None);
        assert!(cells.is_empty());
    }

    #[test]
    fn radius_one_covers_the_surrounding_ring() {
        let scouts = [Cell::new(2, 2)];
        assert!(is_revealed(Cell::new(1, 1), &scouts, 1));
        assert!(is_revealed(Cell::new(3, 3), &scouts, 1));
        assert!(is_revealed(Cell::new(2, 2), &scouts, 1));
        assert!(!is_revealed(Cell::new(4, 2), &scouts, 1));
        assert!(!is_revealed(Cell::new(0, 0), &scouts, 1));
    }

    #[test]
    fn no_scouts_means_nothing_visible() {
        let presences = [MonsterPresence::new(MonsterId::new(), 0.5, Cell::new(0, 0))];
        assert!(visible_presences(&presences, &[], 5).is_empty());
    }

    #[test]
    fn visible_presences_filters_by_any_scout() {
        let near_a = MonsterPresence::new(MonsterId::new(), 0.5, Cell::new(0, 0));
        let near_b = MonsterPresence::new(MonsterId::new(), 0.6, Cell::new(5, 5));
        let hidden = MonsterPresence::new(MonsterId::new(), 0.7, Cell::new(0, 5));
        let presences = [near_a, near_b, hidden];
        let scouts = [Cell::new(1, 1), Cell::new(4, 4)];

        let visible = visible_presences(&presences, &scouts, 1);
        let ids: Vec<MonsterId> = visible.iter().map(|p| p.monster_id).collect();
        assert_eq!(ids, vec![near_a.monster_id, near_b.monster_id]);
    }
}
