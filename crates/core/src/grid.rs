//! Grid module - per-cell piece stacks
//!
//! Every cell holds the ids of the pieces covering it, in placement order. The
//! last id is the topmost, visible piece. Overlap is always allowed here; the
//! no-overlap rule of easy tiers only applies while generating the target.
//!
//! The grid also owns the geometric mapping between screen coordinates and cells
//! once the presentation layer reports where the grid is drawn.

use thiserror::Error;

use crate::piece::Piece;
use crate::shapes::Shape;
use crate::types::{CellPos, CellRect, PieceId};

/// Rejected grid mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("piece {id} does not fit at ({row}, {col})")]
    OutOfBounds { id: PieceId, row: usize, col: usize },
}

/// A rows x cols grid of piece stacks
#[derive(Debug, Clone, PartialEq)]
pub struct StackGrid {
    rows: usize,
    cols: usize,
    /// Flat row-major stacks (`row * cols + col`)
    stacks: Vec<Vec<PieceId>>,
    /// Screen rectangle the grid is drawn in, once known
    bounds: Option<CellRect>,
}

impl StackGrid {
    /// Create an empty grid
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut grid = Self {
            rows: 0,
            cols: 0,
            stacks: Vec::new(),
            bounds: None,
        };
        grid.init(rows, cols);
        grid
    }

    /// Reallocate as `rows x cols` empty stacks, discarding all prior state
    pub fn init(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.stacks.clear();
        self.stacks.resize_with(rows * cols, Vec::new);
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether `shape` anchored at `(row, col)` lies fully inside the grid
    ///
    /// Anchors are signed so callers can pass raw drop positions.
    pub fn can_place(&self, shape: &Shape, row: i64, col: i64) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        row + shape.rows() <= self.rows && col + shape.cols() <= self.cols
    }

    fn fits(&self, shape: &Shape, anchor: CellPos) -> bool {
        anchor.row + shape.rows() <= self.rows && anchor.col + shape.cols() <= self.cols
    }

    /// Push `piece.id` onto every stack its shape covers at `anchor`
    ///
    /// Nothing is modified if any part of the piece would fall outside the grid.
    pub fn place_piece(&mut self, piece: &Piece, anchor: CellPos) -> Result<(), PlacementError> {
        if !self.fits(&piece.shape, anchor) {
            return Err(PlacementError::OutOfBounds {
                id: piece.id,
                row: anchor.row,
                col: anchor.col,
            });
        }
        for cell in piece.cells_at(anchor) {
            let idx = cell.row * self.cols + cell.col;
            self.stacks[idx].push(piece.id);
        }
        Ok(())
    }

    /// Remove the first occurrence of `piece.id` from every stack it covers at `anchor`
    ///
    /// The id need not be on top. Stacks that don't contain it are left alone.
    pub fn remove_piece(&mut self, piece: &Piece, anchor: CellPos) -> Result<(), PlacementError> {
        if !self.fits(&piece.shape, anchor) {
            return Err(PlacementError::OutOfBounds {
                id: piece.id,
                row: anchor.row,
                col: anchor.col,
            });
        }
        for cell in piece.cells_at(anchor) {
            let idx = cell.row * self.cols + cell.col;
            let stack = &mut self.stacks[idx];
            if let Some(pos) = stack.iter().position(|&id| id == piece.id) {
                stack.remove(pos);
            }
        }
        Ok(())
    }

    /// True if any cell of the piece at `anchor` has a different piece on top
    ///
    /// A covered piece is locked: the player may not lift it.
    pub fn is_covered(&self, piece: &Piece, anchor: CellPos) -> bool {
        piece.cells_at(anchor).any(|cell| match self.top(cell.row, cell.col) {
            Some(top) => top != piece.id,
            None => false,
        })
    }

    /// Stack at `(row, col)`, bottom first; empty slice if out of range
    pub fn stack(&self, row: usize, col: usize) -> &[PieceId] {
        match self.index(row, col) {
            Some(idx) => &self.stacks[idx],
            None => &[],
        }
    }

    /// Topmost piece id at `(row, col)`
    pub fn top(&self, row: usize, col: usize) -> Option<PieceId> {
        self.stack(row, col).last().copied()
    }

    /// True if no cell holds any piece
    pub fn is_empty(&self) -> bool {
        self.stacks.iter().all(|s| s.is_empty())
    }

    /// Row-major view of every stack
    pub fn stacks(&self) -> &[Vec<PieceId>] {
        &self.stacks
    }

    /// Empty every stack, keeping dimensions and bounds
    pub fn clear(&mut self) {
        for stack in &mut self.stacks {
            stack.clear();
        }
    }

    // ============== Geometry ==============

    /// Record where the grid is drawn on screen
    pub fn set_bounds(&mut self, bounds: CellRect) {
        self.bounds = Some(bounds);
    }

    pub fn bounds(&self) -> Option<CellRect> {
        self.bounds
    }

    /// Cell under screen point `(x, y)`, or `None` outside the grid
    ///
    /// The right and bottom edges belong to the last column and row.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<CellPos> {
        let rect = self.bounds?;
        if self.rows == 0 || self.cols == 0 || !rect.contains(x, y) {
            return None;
        }
        let cell_width = rect.width / self.cols as f32;
        let cell_height = rect.height / self.rows as f32;
        if cell_width <= 0.0 || cell_height <= 0.0 {
            return None;
        }
        let col = ((x - rect.x) / cell_width).floor() as usize;
        let row = ((y - rect.y) / cell_height).floor() as usize;
        Some(CellPos::new(row.min(self.rows - 1), col.min(self.cols - 1)))
    }

    /// Screen rectangle of cell `(row, col)`, for rendering and snapping
    pub fn cell_coordinates(&self, row: usize, col: usize) -> Option<CellRect> {
        let rect = self.bounds?;
        if self.rows == 0 || self.cols == 0 {
            return None;
        }
        let cell_width = rect.width / self.cols as f32;
        let cell_height = rect.height / self.rows as f32;
        Some(CellRect::new(
            rect.x + col as f32 * cell_width,
            rect.y + row as f32 * cell_height,
            cell_width,
            cell_height,
        ))
    }
}

impl Default for StackGrid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
