//! Integration tests encoding the concrete scenarios from spec §8 that
//! don't fit naturally as a unit test colocated with a single module
//! (S2, S3, S4, S5 are colocated in `propagator.rs`, `logical_solver.rs`,
//! `exhaustive_solver.rs`, and `grid.rs` respectively).

use battleships_engine::config::Parameters;
use battleships_engine::logical_solver::{self, Difficulty, SolveStatus};
use battleships_engine::rng::StdPuzzleRng;
use battleships_engine::{exhaustive_solver, generator, validator};

/// S1: a 7x7 puzzle always gets the fixed `{4,4,3,3,2,2,2}` ship
/// multiset, and the exhaustive solver proves it has exactly one
/// solution with 20 occupied cells and no diagonal adjacency.
#[test]
fn scenario_s1_trivial_seven_by_seven() {
    let params = Parameters::validate(7, 7, 0).unwrap();
    let mut rng = StdPuzzleRng::from_seed(1234);
    let puzzle = generator::generate(&params, &mut rng);

    assert_eq!(puzzle.clues.ships, vec![4, 4, 3, 3, 2, 2, 2]);
    assert_eq!(puzzle.clues.ships_sum(), 20);

    let solution = exhaustive_solver::solve(&puzzle.clues, 1_000_000)
        .expect("a generated puzzle must have exactly one solution");
    let board = solution.to_board(&puzzle.clues);
    assert_eq!(board.occupied_count(), 20);

    for y in 0..7 {
        for x in 0..7 {
            if !board.get(y, x).is_occupied() {
                continue;
            }
            for (ny, nx, state) in board.neighbors(y, x) {
                let is_diagonal = ny != y && nx != x;
                if is_diagonal {
                    assert!(!state.is_occupied(), "diagonal touch at ({y},{x})-({ny},{nx})");
                }
            }
        }
    }
}

/// S6: an Advanced instance must need the advanced rules to reach a full
/// solve; with them disabled (Intermediate), the logical solver reaches a
/// fixed point short of `ships_sum`, unless the generator had to fall
/// back to fast-return.
#[test]
fn scenario_s6_advanced_grading_needs_advanced_rules() {
    let params = Parameters::validate(10, 10, 2).unwrap();
    let mut rng = StdPuzzleRng::from_seed(777);
    let puzzle = generator::generate(&params, &mut rng);

    let with_advanced = logical_solver::solve(&puzzle.clues, Difficulty::Advanced);
    let without_advanced = logical_solver::solve(&puzzle.clues, Difficulty::Intermediate);

    assert_eq!(with_advanced.occ_count, puzzle.clues.ships_sum());
    if !puzzle.fast_return_used {
        assert_eq!(with_advanced.status, SolveStatus::SolvedUsingAdvanced);
        assert!(without_advanced.occ_count < puzzle.clues.ships_sum());
    }
}

/// §8: the validator reports `solved = true` with no flags when run on
/// the ground-truth solution of any generated puzzle.
#[test]
fn validator_accepts_ground_truth_of_generated_puzzles() {
    for (seed, h, w, level) in [(1u64, 7, 7, 0), (2, 9, 11, 1), (3, 8, 8, 2)] {
        let params = Parameters::validate(h, w, level).unwrap();
        let mut rng = StdPuzzleRng::from_seed(seed);
        let puzzle = generator::generate(&params, &mut rng);
        let board = puzzle.solution.to_board(&puzzle.clues);
        let report = validator::validate(&puzzle.clues, &board);
        assert!(report.solved, "seed {seed}: {report:?}");
    }
}

/// §8: row/column sums of a generated puzzle's ground truth agree with
/// the ship multiset's total.
#[test]
fn row_and_col_sums_agree_with_ships_sum() {
    let params = Parameters::validate(9, 9, 1).unwrap();
    let mut rng = StdPuzzleRng::from_seed(55);
    let puzzle = generator::generate(&params, &mut rng);
    let board = puzzle.solution.to_board(&puzzle.clues);

    let mut row_total = 0usize;
    for y in 0..puzzle.clues.h {
        let count = (0..puzzle.clues.w).filter(|&x| board.get(y, x).is_occupied()).count();
        row_total += count;
    }
    let mut col_total = 0usize;
    for x in 0..puzzle.clues.w {
        let count = (0..puzzle.clues.h).filter(|&y| board.get(y, x).is_occupied()).count();
        col_total += count;
    }
    assert_eq!(row_total, puzzle.clues.ships_sum());
    assert_eq!(col_total, puzzle.clues.ships_sum());
}
