//! Piece module - a colored polyomino and its placement state

use crate::shapes::Shape;
use crate::types::{CellPos, ColorId, PieceId};

/// One polyomino of a level instance
///
/// Pure data: rendering state (element handles, drag offsets) belongs to the
/// presentation layer, which looks pieces up by [`Piece::id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    /// Shape with the generator's rotation already applied.
    pub shape: Shape,
    pub color: ColorId,
    /// Anchor the generator stamped this piece at when building the target.
    pub target: CellPos,
    /// Anchor on the player's grid; `None` while the piece is in the tray.
    pub placement: Option<CellPos>,
}

impl Piece {
    /// Create an unplaced piece
    pub fn new(id: PieceId, shape: Shape, color: ColorId, target: CellPos) -> Self {
        Self {
            id,
            shape,
            color,
            target,
            placement: None,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    /// Current grid anchor, if placed
    pub fn anchor(&self) -> Option<CellPos> {
        self.placement
    }

    /// Grid cells this piece covers when anchored at `anchor`
    pub fn cells_at(&self, anchor: CellPos) -> impl Iterator<Item = CellPos> + '_ {
        self.shape
            .occupied_offsets()
            .into_iter()
            .map(move |(row, col)| anchor.offset(row, col))
    }

    /// Grid cells covered at the generator's target anchor
    pub fn target_cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.cells_at(self.target)
    }
}
