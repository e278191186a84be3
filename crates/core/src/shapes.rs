//! Shapes module - polyomino matrices, the shape catalog and rotation
//!
//! A [`Shape`] is a small rectangular 0/1 matrix. Storage is a fixed
//! `MAX_SHAPE_SIDE x MAX_SHAPE_SIDE` array so shapes are `Copy` and rotating or
//! iterating one never allocates.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::types::MAX_SHAPE_SIDE;

/// Capacity of a shape's cell storage
pub const MAX_SHAPE_AREA: usize = MAX_SHAPE_SIDE * MAX_SHAPE_SIDE;

/// Local `(row, col)` offsets of a shape's occupied cells
pub type ShapeOffsets = ArrayVec<(usize, usize), MAX_SHAPE_AREA>;

/// Reasons a matrix is not a valid shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape has no rows or no columns")]
    Empty,
    #[error("shape row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("shape has no occupied cells")]
    NoCells,
    #[error("shape is {rows}x{cols}, larger than {max}x{max}", max = MAX_SHAPE_SIDE)]
    TooLarge { rows: usize, cols: usize },
    #[error("shape cell ({row}, {col}) is {value}, expected 0 or 1")]
    BadCell { row: usize, col: usize, value: u8 },
}

/// A rectangular polyomino matrix with at least one occupied cell
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    /// Row-major, stride = `cols`; entries past `rows * cols` stay false.
    cells: [bool; MAX_SHAPE_AREA],
}

impl Shape {
    /// Build a shape from 0/1 rows, rejecting anything downstream code could not handle.
    ///
    /// ```
    /// use box_puzzle_core::shapes::{Shape, ShapeError};
    ///
    /// let t = Shape::from_rows(&[&[1, 1, 1], &[0, 1, 0]]).unwrap();
    /// assert_eq!((t.rows(), t.cols()), (2, 3));
    ///
    /// assert_eq!(Shape::from_rows(&[&[0, 0]]), Err(ShapeError::NoCells));
    /// ```
    pub fn from_rows(rows: &[&[u8]]) -> Result<Self, ShapeError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(ShapeError::Empty);
        }
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(ShapeError::Ragged {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
        }
        if height > MAX_SHAPE_SIDE || width > MAX_SHAPE_SIDE {
            return Err(ShapeError::TooLarge {
                rows: height,
                cols: width,
            });
        }

        let mut cells = [false; MAX_SHAPE_AREA];
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                cells[row * width + col] = match value {
                    0 => false,
                    1 => true,
                    _ => return Err(ShapeError::BadCell { row, col, value }),
                };
            }
        }
        if !cells.iter().any(|&c| c) {
            return Err(ShapeError::NoCells);
        }

        Ok(Self {
            rows: height as u8,
            cols: width as u8,
            cells,
        })
    }

    /// Height of the bounding box
    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    /// Width of the bounding box
    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Whether local cell `(row, col)` is occupied; false outside the box
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.cells[row * self.cols() + col]
    }

    /// Occupied offsets in row-major order
    pub fn occupied_offsets(&self) -> ShapeOffsets {
        let mut out = ShapeOffsets::new();
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                if self.get(row, col) {
                    out.push((row, col));
                }
            }
        }
        out
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Apply `quarter_turns` clockwise rotations
    pub fn rotated(&self, quarter_turns: u32) -> Self {
        (0..quarter_turns % 4).fold(*self, |shape, _| rotate(&shape))
    }

    /// Rows as 0/1 vectors (display and test helper)
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows())
            .map(|row| (0..self.cols()).map(|col| self.get(row, col) as u8).collect())
            .collect()
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Shape").field(&self.to_rows()).finish()
    }
}

/// Rotate a shape 90 degrees clockwise
///
/// For an `N x M` input the output is `M x N` with
/// `result[j][N - 1 - i] = shape[i][j]`.
pub fn rotate(shape: &Shape) -> Shape {
    let n = shape.rows();
    let m = shape.cols();
    let mut cells = [false; MAX_SHAPE_AREA];
    for i in 0..n {
        for j in 0..m {
            // output stride is n
            cells[j * n + (n - 1 - i)] = shape.get(i, j);
        }
    }
    Shape {
        rows: m as u8,
        cols: n as u8,
        cells,
    }
}

/// The built-in catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Single cell
    Dot,
    /// Two in a row
    Bar2,
    /// Three in a row
    Bar3,
    /// 2x2 square
    Square,
    /// T-shape, 2x3
    T,
    /// Z-shape, 2x3
    Z,
    /// L-shape, 3x2
    L,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Dot,
        ShapeKind::Bar2,
        ShapeKind::Bar3,
        ShapeKind::Square,
        ShapeKind::T,
        ShapeKind::Z,
        ShapeKind::L,
    ];

    fn rows(&self) -> &'static [&'static [u8]] {
        match self {
            ShapeKind::Dot => &[&[1]],
            ShapeKind::Bar2 => &[&[1, 1]],
            ShapeKind::Bar3 => &[&[1, 1, 1]],
            ShapeKind::Square => &[&[1, 1], &[1, 1]],
            ShapeKind::T => &[&[1, 1, 1], &[0, 1, 0]],
            ShapeKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            ShapeKind::L => &[&[1, 0], &[1, 0], &[1, 1]],
        }
    }

    /// Unrotated shape for this kind
    pub fn shape(&self) -> Result<Shape, ShapeError> {
        Shape::from_rows(self.rows())
    }
}

/// A validated, non-empty list of shapes the generator draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeCatalog {
    shapes: Vec<Shape>,
}

impl ShapeCatalog {
    /// Catalog from already-validated shapes; `None` if empty.
    pub fn new(shapes: Vec<Shape>) -> Option<Self> {
        if shapes.is_empty() {
            None
        } else {
            Some(Self { shapes })
        }
    }

    /// Catalog from raw matrices, validating each one
    pub fn from_matrices(matrices: &[&[&[u8]]]) -> Result<Self, ShapeError> {
        let shapes = matrices
            .iter()
            .map(|rows| Shape::from_rows(rows))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(shapes).ok_or(ShapeError::Empty)
    }

    /// The seven built-in shapes
    pub fn standard() -> Result<Self, ShapeError> {
        let shapes = ShapeKind::ALL
            .iter()
            .map(|kind| kind.shape())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(shapes).ok_or(ShapeError::Empty)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(rows: &[&[u8]]) -> Shape {
        Shape::from_rows(rows).unwrap()
    }

    #[test]
    fn test_rotate_t_shape() {
        let t = shape(&[&[1, 1, 1], &[0, 1, 0]]);
        let r = rotate(&t);
        assert_eq!(r.to_rows(), vec![vec![0, 1], vec![1, 1], vec![0, 1]]);
        assert_eq!((r.rows(), r.cols()), (3, 2));
    }

    #[test]
    fn test_rotate_bar_becomes_column() {
        let bar = shape(&[&[1, 1, 1]]);
        let r = rotate(&bar);
        assert_eq!(r.to_rows(), vec![vec![1], vec![1], vec![1]]);
    }

    #[test]
    fn test_rotated_wraps_full_turns() {
        let l = shape(&[&[1, 0], &[1, 0], &[1, 1]]);
        assert_eq!(l.rotated(4), l);
        assert_eq!(l.rotated(5), rotate(&l));
        assert_eq!(l.rotated(0), l);
    }

    #[test]
    fn test_occupied_offsets_row_major() {
        let z = shape(&[&[1, 1, 0], &[0, 1, 1]]);
        let offsets: Vec<_> = z.occupied_offsets().into_iter().collect();
        assert_eq!(offsets, vec![(0, 0), (0, 1), (1, 1), (1, 2)]);
        assert_eq!(z.cell_count(), 4);
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        assert_eq!(Shape::from_rows(&[]), Err(ShapeError::Empty));
        assert_eq!(Shape::from_rows(&[&[]]), Err(ShapeError::Empty));
        assert_eq!(
            Shape::from_rows(&[&[1, 1], &[1]]),
            Err(ShapeError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(Shape::from_rows(&[&[0], &[0]]), Err(ShapeError::NoCells));
        assert_eq!(
            Shape::from_rows(&[&[1, 1, 1, 1, 1]]),
            Err(ShapeError::TooLarge { rows: 1, cols: 5 })
        );
        assert_eq!(
            Shape::from_rows(&[&[1, 2]]),
            Err(ShapeError::BadCell {
                row: 0,
                col: 1,
                value: 2
            })
        );
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = ShapeCatalog::standard().unwrap();
        assert_eq!(catalog.len(), 7);
        assert!(!catalog.is_empty());
        assert!(catalog
            .shapes()
            .iter()
            .any(|s| s.rows() > 1 && s.cols() > 1 && s.cell_count() < s.rows() * s.cols()));
    }

    #[test]
    fn test_catalog_from_matrices() {
        let catalog = ShapeCatalog::from_matrices(&[&[&[1]], &[&[1, 1]]]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            ShapeCatalog::from_matrices(&[&[&[1]], &[&[0]]]),
            Err(ShapeError::NoCells)
        );
        assert_eq!(ShapeCatalog::from_matrices(&[]), Err(ShapeError::Empty));
        assert!(ShapeCatalog::new(Vec::new()).is_none());
    }
}
