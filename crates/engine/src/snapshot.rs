//! Snapshot module - persisted placement and progress records
//!
//! These are the only shapes the engine hands to storage. Field names follow the
//! browser game's saved data, so existing saves load unchanged.

use serde::{Deserialize, Serialize};

use crate::types::{CellPos, PieceId};

/// Where one piece sits on the grid
///
/// Serialized as `{"id": .., "c": row, "r": col}`. The browser game writes the
/// row under `"c"` and the column under `"r"`; the names are kept swapped so its
/// saves decode to the right cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementRecord {
    #[serde(rename = "id")]
    pub piece_id: PieceId,
    #[serde(rename = "c")]
    pub row: usize,
    #[serde(rename = "r")]
    pub col: usize,
}

impl PlacementRecord {
    pub fn new(piece_id: PieceId, anchor: CellPos) -> Self {
        Self {
            piece_id,
            row: anchor.row,
            col: anchor.col,
        }
    }

    pub fn anchor(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }
}

/// Daily challenge progress for one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyProgress {
    pub mistakes: u32,
    pub elapsed_ms: u64,
    pub completed: bool,
}
