//! Property-based tests for the quantified invariants of §8, driven by
//! `proptest` (grounded in `BattleZips-BattleZipsV2`, the one repo in the
//! retrieval pack that depends on it). Grids are kept small (7..=10) so
//! every case stays inside the exhaustive solver's call budget.

use proptest::prelude::*;

use battleships_engine::config::Parameters;
use battleships_engine::exhaustive_solver;
use battleships_engine::propagator;
use battleships_engine::rng::StdPuzzleRng;
use battleships_engine::{generator, validator};

fn arb_params() -> impl Strategy<Value = (usize, usize, i32, u64)> {
    (7usize..=10, 7usize..=10, 0i32..=3, any::<u64>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Every puzzle the generator produces has exactly one solution under
    /// the exhaustive solver, and that solution's row/column occupancy
    /// totals agree with the declared ship multiset's sum.
    #[test]
    fn generated_puzzles_have_a_unique_solution_matching_ship_sum((h, w, level, seed) in arb_params()) {
        let params = Parameters::validate(h, w, level).unwrap();
        let mut rng = StdPuzzleRng::from_seed(seed);
        let puzzle = generator::generate(&params, &mut rng);

        let solved = exhaustive_solver::solve(&puzzle.clues, 2_000_000);
        prop_assert!(solved.is_ok(), "expected a unique solution, got {:?}", solved.err());

        let board = solved.unwrap().to_board(&puzzle.clues);
        prop_assert_eq!(board.occupied_count(), puzzle.clues.ships_sum());
    }

    /// The validator accepts the ground-truth solution of any generated
    /// puzzle with no flags raised.
    #[test]
    fn validator_accepts_every_generated_ground_truth((h, w, level, seed) in arb_params()) {
        let params = Parameters::validate(h, w, level).unwrap();
        let mut rng = StdPuzzleRng::from_seed(seed);
        let puzzle = generator::generate(&params, &mut rng);
        let board = puzzle.solution.to_board(&puzzle.clues);
        let report = validator::validate(&puzzle.clues, &board);
        prop_assert!(report.solved);
        prop_assert!(!report.ships_err);
        for y in 0..puzzle.clues.h {
            prop_assert!(!report.row_errors[y]);
        }
        for x in 0..puzzle.clues.w {
            prop_assert!(!report.col_errors[x]);
        }
    }

    /// No two occupied cells in a generated solution touch diagonally.
    #[test]
    fn no_diagonal_adjacency_in_generated_solutions((h, w, level, seed) in arb_params()) {
        let params = Parameters::validate(h, w, level).unwrap();
        let mut rng = StdPuzzleRng::from_seed(seed);
        let puzzle = generator::generate(&params, &mut rng);
        let board = puzzle.solution.to_board(&puzzle.clues);

        for y in 0..h {
            for x in 0..w {
                if !board.get(y, x).is_occupied() {
                    continue;
                }
                for (ny, nx, state) in board.neighbors(y, x) {
                    if ny != y && nx != x {
                        prop_assert!(!state.is_occupied());
                    }
                }
            }
        }
    }

    /// Running the propagator to its own fixed point is idempotent: one
    /// more pass after the loop reports "no change" changes nothing.
    #[test]
    fn propagator_reaches_a_stable_fixed_point((h, w, level, seed) in arb_params()) {
        let params = Parameters::validate(h, w, level).unwrap();
        let mut rng = StdPuzzleRng::from_seed(seed);
        let puzzle = generator::generate(&params, &mut rng);

        let mut board = puzzle.clues.init.clone();
        while propagator::propagate_once(&mut board) {}
        let before = board.checksum();
        propagator::propagate_once(&mut board);
        prop_assert_eq!(board.checksum(), before);
    }
}
