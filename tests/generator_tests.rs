//! Generator tests - determinism, solvability and tier schedule

use std::collections::HashSet;

use box_puzzle::core::generator::{extra_pieces, select_tier};
use box_puzzle::core::{
    is_solved, level_params, GenerateError, GeneratorConfig, LevelGenerator, LevelParams,
    RandomSource, SeededRng, ShapeCatalog, StackGrid,
};
use box_puzzle::types::CellPos;

/// Always returns the same float
struct Constant(f64);

impl RandomSource for Constant {
    fn next_float(&mut self) -> f64 {
        self.0
    }
}

fn generator() -> LevelGenerator {
    LevelGenerator::standard().unwrap()
}

#[test]
fn test_same_seed_same_level() {
    let generator = generator();
    for level in [1, 5, 20, 40, 80, 150, 300] {
        let a = generator.generate(level, &mut SeededRng::new(1234)).unwrap();
        let b = generator.generate(level, &mut SeededRng::new(1234)).unwrap();
        assert_eq!(a, b, "level {} differs between identical seeds", level);
    }
}

#[test]
fn test_daily_is_deterministic() {
    let generator = generator();
    let a = generator.generate_daily(20250115);
    let b = generator.generate_daily(20250115);
    assert_eq!(a, b);
    assert_ne!(a, generator.generate_daily(20250116));
}

#[test]
fn test_level_one_seed_42() {
    let level = generator().generate(1, &mut SeededRng::new(42)).unwrap();
    assert_eq!(level.grid_size(), 3);
    assert!(!level.params.allow_overlap);
    assert_eq!(level.requested_pieces(), 3);
    assert_eq!(
        level.pieces.len() as u32 + level.dropped_pieces(),
        level.requested_pieces()
    );

    // no-overlap tier: every cell belongs to at most one piece
    let mut seen = HashSet::new();
    for piece in &level.pieces {
        for cell in piece.target_cells() {
            assert!(seen.insert(cell), "cell {:?} used twice", cell);
        }
    }

    let mut grid = StackGrid::new(3, 3);
    for piece in &level.pieces {
        grid.place_piece(piece, piece.target).unwrap();
    }
    assert!(is_solved(&grid, &level.pieces, &level.target));
}

#[test]
fn test_every_generated_level_is_solvable() {
    let generator = generator();
    for seed in 1..60u32 {
        for level in [1, 4, 10, 14, 25, 40, 60, 100, 120, 200] {
            let instance = generator
                .generate(level, &mut SeededRng::new(seed * 7919))
                .unwrap();
            assert_eq!(instance.solution_pattern(), instance.target);

            let size = instance.grid_size();
            let mut grid = StackGrid::new(size, size);
            for piece in &instance.pieces {
                grid.place_piece(piece, piece.target).unwrap();
            }
            assert!(
                is_solved(&grid, &instance.pieces, &instance.target),
                "seed {} level {} not solvable",
                seed,
                level
            );
        }
    }
}

#[test]
fn test_target_cells_match_piece_colors_when_no_overlap() {
    let generator = generator();
    let instance = generator.generate(2, &mut SeededRng::new(99)).unwrap();
    for piece in &instance.pieces {
        for cell in piece.target_cells() {
            assert_eq!(instance.target.at(cell), Some(piece.color));
        }
    }
    let covered: usize = instance.pieces.iter().map(|p| p.shape.cell_count()).sum();
    assert_eq!(instance.target.filled_count(), covered);
}

#[test]
fn test_level_zero_rejected() {
    assert_eq!(
        generator().generate(0, &mut SeededRng::new(1)),
        Err(GenerateError::InvalidLevel)
    );
}

#[test]
fn test_fixed_tier_bands() {
    for (level, tier) in [(1, 1), (3, 1), (14, 2), (23, 2), (54, 4), (113, 4)] {
        assert_eq!(select_tier(level, &mut Constant(0.0)), tier, "level {}", level);
        assert_eq!(select_tier(level, &mut Constant(0.99)), tier, "level {}", level);
    }
}

#[test]
fn test_transition_bands() {
    // progress below the draw promotes
    assert_eq!(select_tier(13, &mut Constant(0.0)), 2);
    assert_eq!(select_tier(13, &mut Constant(0.99)), 1);
    assert_eq!(select_tier(53, &mut Constant(0.0)), 4);
    assert_eq!(select_tier(300, &mut Constant(0.5)), 5);
    assert_eq!(select_tier(114, &mut Constant(0.99)), 4);
}

#[test]
fn test_piece_count_grows_every_twenty_levels() {
    assert_eq!(extra_pieces(19), 0);
    assert_eq!(extra_pieces(20), 1);
    assert_eq!(extra_pieces(59), 2);
    assert_eq!(extra_pieces(60), 3);
    assert_eq!(extra_pieces(1000), 3);

    let params = level_params(60, &mut Constant(0.0)).unwrap();
    assert_eq!(params.tier, 4);
    assert_eq!(params.num_pieces, 5 + 3);
}

#[test]
fn test_daily_params() {
    let params = LevelParams::daily();
    assert_eq!(params.size, 4);
    assert!(params.allow_overlap);
    assert_eq!(params.num_pieces, 8);

    let daily = generator().generate_daily(20240301);
    assert_eq!(daily.grid_size(), 4);
    // overlap tiers always place on the first attempt
    assert_eq!(daily.pieces.len(), 8);
}

#[test]
fn test_crowded_no_overlap_level_is_partial() {
    // any two 2x2 squares on a 3x3 grid share the centre cell
    let catalog = ShapeCatalog::from_matrices(&[&[&[1, 1], &[1, 1]]]).unwrap();
    let generator = LevelGenerator::new(catalog, GeneratorConfig::default());
    let params = LevelParams {
        tier: 1,
        size: 3,
        allow_overlap: false,
        num_pieces: 3,
    };
    let instance = generator.generate_with_params(params, &mut SeededRng::new(5));
    assert_eq!(instance.pieces.len(), 1);
    assert_eq!(instance.pieces[0].id, 0);
    assert_eq!(instance.dropped_pieces(), 2);
    assert!(instance.is_partial());
    assert_eq!(instance.target.filled_count(), 4);
}

#[test]
fn test_shapes_larger_than_grid_are_dropped() {
    let catalog = ShapeCatalog::from_matrices(&[&[&[1, 1, 1]]]).unwrap();
    let generator = LevelGenerator::new(catalog, GeneratorConfig::default());
    let params = LevelParams {
        tier: 1,
        size: 2,
        allow_overlap: true,
        num_pieces: 4,
    };
    let instance = generator.generate_with_params(params, &mut SeededRng::new(11));
    assert!(instance.pieces.is_empty());
    assert_eq!(instance.target.filled_count(), 0);
    assert_eq!(instance.dropped_pieces(), 4);
}

#[test]
fn test_piece_ids_are_unique_and_targets_fit() {
    let generator = generator();
    let mut rng = SeededRng::new(31337);
    for level in 1..150 {
        let instance = generator.generate(level, &mut rng).unwrap();
        let ids: HashSet<_> = instance.pieces.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), instance.pieces.len());

        let size = instance.grid_size();
        for piece in &instance.pieces {
            let CellPos { row, col } = piece.target;
            assert!(row + piece.shape.rows() <= size);
            assert!(col + piece.shape.cols() <= size);
            assert!(!piece.is_placed());
        }
    }
}
