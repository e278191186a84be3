//! Pattern module - a rows x cols matrix of optional colors
//!
//! Used for both the immutable target a level is generated with and the
//! visible top-of-stack pattern derived from the player's grid.

use crate::types::{CellPos, ColorId};

/// Flat row-major color matrix (`row * cols + col`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorPattern {
    rows: usize,
    cols: usize,
    cells: Vec<Option<ColorId>>,
}

impl ColorPattern {
    /// All-empty pattern
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    #[inline]
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

    /// Color at `(row, col)`; `None` both for empty and out-of-range cells
    pub fn get(&self, row: usize, col: usize) -> Option<ColorId> {
        self.index(row, col).and_then(|idx| self.cells[idx])
    }

    pub fn at(&self, pos: CellPos) -> Option<ColorId> {
        self.get(pos.row, pos.col)
    }

    /// Set a cell; returns false if out of range
    pub fn set(&mut self, row: usize, col: usize, color: Option<ColorId>) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = color;
                true
            }
            None => false,
        }
    }

    /// Number of non-empty cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Row-major view of every cell
    pub fn cells(&self) -> &[Option<ColorId>] {
        &self.cells
    }

    /// Iterate rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Option<ColorId>]> {
        // chunks(0) panics; an empty-column pattern simply has no rows to yield
        self.cells.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Build from nested rows; `None` if the rows are ragged
    pub fn from_rows(rows: Vec<Vec<Option<ColorId>>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Self {
            rows: height,
            cols: width,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Convert to nested rows
    pub fn to_rows(&self) -> Vec<Vec<Option<ColorId>>> {
        self.iter_rows().map(|row| row.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pattern_is_empty() {
        let pattern = ColorPattern::new(3, 4);
        assert_eq!(pattern.rows(), 3);
        assert_eq!(pattern.cols(), 4);
        assert_eq!(pattern.filled_count(), 0);
        assert_eq!(pattern.cells().len(), 12);
    }

    #[test]
    fn test_set_and_get() {
        let mut pattern = ColorPattern::new(2, 2);
        assert!(pattern.set(1, 0, Some(ColorId::Blue)));
        assert_eq!(pattern.get(1, 0), Some(ColorId::Blue));
        assert_eq!(pattern.at(CellPos::new(1, 0)), Some(ColorId::Blue));
        assert!(!pattern.set(2, 0, Some(ColorId::Red)));
        assert_eq!(pattern.get(5, 5), None);
        assert_eq!(pattern.filled_count(), 1);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let ragged = vec![vec![None, None], vec![None]];
        assert!(ColorPattern::from_rows(ragged).is_none());

        let rows = vec![
            vec![Some(ColorId::Red), None],
            vec![None, Some(ColorId::Yellow)],
        ];
        let pattern = ColorPattern::from_rows(rows.clone()).unwrap();
        assert_eq!(pattern.get(1, 1), Some(ColorId::Yellow));
        assert_eq!(pattern.to_rows(), rows);
    }
}
