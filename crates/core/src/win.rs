//! Win module - visible pattern derivation and target comparison

use crate::grid::StackGrid;
use crate::pattern::ColorPattern;
use crate::piece::Piece;

/// Top-of-stack color for every cell of `grid`
///
/// Empty stacks yield `None`. An id with no matching piece also yields `None`;
/// that can only happen if the grid and piece set were mixed up between levels.
pub fn current_pattern(grid: &StackGrid, pieces: &[Piece]) -> ColorPattern {
    let mut pattern = ColorPattern::new(grid.rows(), grid.cols());
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let color = grid
                .top(row, col)
                .and_then(|id| pieces.iter().find(|p| p.id == id))
                .map(|p| p.color);
            pattern.set(row, col, color);
        }
    }
    pattern
}

/// Cell-wise equality, stopping at the first mismatch
///
/// Patterns of different dimensions never match. An empty target cell only
/// matches an empty current cell.
pub fn matches(current: &ColorPattern, target: &ColorPattern) -> bool {
    if current.rows() != target.rows() || current.cols() != target.cols() {
        return false;
    }
    current
        .cells()
        .iter()
        .zip(target.cells())
        .all(|(have, want)| have == want)
}

/// Whether the grid currently shows `target`
pub fn is_solved(grid: &StackGrid, pieces: &[Piece], target: &ColorPattern) -> bool {
    matches(&current_pattern(grid, pieces), target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;
    use crate::types::{CellPos, ColorId};

    fn piece(id: u32, rows: &[&[u8]], color: ColorId) -> Piece {
        Piece::new(id, Shape::from_rows(rows).unwrap(), color, CellPos::default())
    }

    #[test]
    fn test_current_pattern_uses_top_piece() {
        let pieces = vec![
            piece(0, &[&[1, 1], &[1, 1]], ColorId::Red),
            piece(1, &[&[1]], ColorId::Blue),
        ];
        let mut grid = StackGrid::new(2, 3);
        grid.place_piece(&pieces[0], CellPos::new(0, 0)).unwrap();
        grid.place_piece(&pieces[1], CellPos::new(0, 0)).unwrap();

        let pattern = current_pattern(&grid, &pieces);
        assert_eq!(pattern.get(0, 0), Some(ColorId::Blue));
        assert_eq!(pattern.get(1, 1), Some(ColorId::Red));
        assert_eq!(pattern.get(0, 2), None);
    }

    #[test]
    fn test_matches_requires_empty_cells_to_stay_empty() {
        let target = ColorPattern::from_rows(vec![vec![Some(ColorId::Green), None]]).unwrap();
        let mut current = target.clone();
        assert!(matches(&current, &target));

        current.set(0, 1, Some(ColorId::Green));
        assert!(!matches(&current, &target));
    }

    #[test]
    fn test_matches_rejects_dimension_mismatch() {
        assert!(!matches(&ColorPattern::new(2, 2), &ColorPattern::new(2, 3)));
        assert!(matches(&ColorPattern::new(0, 0), &ColorPattern::new(0, 0)));
    }

    #[test]
    fn test_is_solved() {
        let pieces = vec![piece(4, &[&[1, 1]], ColorId::Yellow)];
        let mut target = ColorPattern::new(1, 3);
        target.set(0, 1, Some(ColorId::Yellow));
        target.set(0, 2, Some(ColorId::Yellow));

        let mut grid = StackGrid::new(1, 3);
        assert!(!is_solved(&grid, &pieces, &target));
        grid.place_piece(&pieces[0], CellPos::new(0, 1)).unwrap();
        assert!(is_solved(&grid, &pieces, &target));
    }
}
