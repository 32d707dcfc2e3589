//! Request payloads accepted by the command gateway.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::MissionType;
use crate::ids::{HunterId, MonsterId};
use crate::structs::Cell;

/// Body of `POST /commands/missions`.
///
/// `target_cell` is required for [`MissionType::Scout`]; `monster_id` is
/// required for [`MissionType::Observe`] and [`MissionType::Capture`].
/// Presence of the right field is checked by the gateway, not the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct StartMissionRequest {
    /// Mission kind.
    #[serde(rename = "type")]
    pub mission_type: MissionType,
    /// Hunter to send.
    pub hunter_id: HunterId,
    /// Scout destination.
    pub target_cell: Option<Cell>,
    /// Observe / capture target.
    pub monster_id: Option<MonsterId>,
}

/// Body of `POST /commands/ticks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickRequest {
    /// Simulated minutes to advance.
    pub minutes: u64,
}
