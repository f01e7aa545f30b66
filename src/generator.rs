//! Puzzle generator: chooses a ship multiset, samples a random board,
//! derives a clue set from it, then tunes that clue set against the
//! logical and exhaustive solvers until it meets the requested
//! difficulty's acceptance contract. Tuning-loop progress is logged
//! through `tracing`.

use std::collections::HashSet;

use tracing::info;

use crate::cell::CellState;
use crate::clues::{Clues, Solution};
use crate::config::Parameters;
use crate::error::SolveError;
use crate::exhaustive_solver;
use crate::grid::Board;
use crate::logical_solver::{self, Difficulty, SolveStatus};
use crate::random_placer::place_random;
use crate::rng::PuzzleRng;

/// Recursive-call budget handed to [`place_random`] per sampling attempt.
const PLACEMENT_CALL_LIMIT: usize = 50_000;
/// Recursive-call budget handed to the exhaustive solver during
/// Unreasonable-tier grading.
const EXHAUSTIVE_CALL_LIMIT: usize = 200_000;
/// Hard cap on tuning-loop iterations; difficulty tuning is bounded in
/// expectation but this backstops against a pathological RNG seed.
const MAX_TUNING_ITERATIONS: usize = 500;
/// Lower bound on the exhaustive solver's call count for a puzzle to
/// count as Unreasonable.
const UNREASONABLE_CALL_FLOOR: usize = 50;

/// A freshly generated puzzle: the clues handed to the player plus the
/// ground-truth solution they disclose.
#[derive(Debug, Clone)]
pub struct GeneratedPuzzle {
    pub clues: Clues,
    pub solution: Solution,
    /// Whether the tuning loop accepted this instance under "fast-return"
    /// (accept the first acceptable result even if easier than target,
    /// enabled after a too-hard adjustment) rather than hitting the
    /// difficulty's contract exactly.
    pub fast_return_used: bool,
}

/// Generate a puzzle meeting `params`.
pub fn generate(params: &Parameters, rng: &mut impl PuzzleRng) -> GeneratedPuzzle {
    let h = params.h;
    let w = params.w;
    let difficulty = params.difficulty;

    let mut ships = choose_ships(h, w, difficulty, rng);
    let solution = sample_board(h, w, &mut ships, rng);
    let full_board = solution.to_board(&Clues {
        h,
        w,
        ships: ships.clone(),
        rows: vec![None; h],
        cols: vec![None; w],
        init: Board::new(h, w),
    });

    let mut row_sums = vec![0usize; h];
    let mut col_sums = vec![0usize; w];
    for y in 0..h {
        for x in 0..w {
            if full_board.get(y, x).is_occupied() {
                row_sums[y] += 1;
                col_sums[x] += 1;
            }
        }
    }

    let mut clues = derive_initial_clues(h, w, &ships, &row_sums, &col_sums, &full_board, difficulty, rng);
    let mut fast_return = false;

    for iteration in 0..MAX_TUNING_ITERATIONS {
        let logical = logical_solver::solve(&clues, difficulty);
        info!(iteration, status = ?logical.status, fast_return, "generator tuning iteration");

        // `fast_return` only ever widens the acceptance contract to the
        // difficulty's weaker state (§4.F Glossary: "accept the first
        // acceptable result even if easier than target"); it is never a
        // license to return a still-`Stuck`/non-unique instance. Every
        // branch below re-checks the (possibly widened) contract against
        // this iteration's freshly computed `logical`/exhaustive result
        // before returning.
        match difficulty {
            Difficulty::Basic | Difficulty::Intermediate => {
                if logical.status == SolveStatus::SolvedBySimple {
                    return GeneratedPuzzle {
                        clues,
                        solution,
                        fast_return_used: fast_return,
                    };
                }
                too_hard_adjust(&mut clues, &full_board, &logical.board, &row_sums, &col_sums, rng);
                fast_return = true;
            }
            Difficulty::Advanced => match logical.status {
                SolveStatus::SolvedUsingAdvanced => {
                    return GeneratedPuzzle {
                        clues,
                        solution,
                        fast_return_used: fast_return,
                    };
                }
                SolveStatus::SolvedBySimple if fast_return => {
                    // Weaker acceptable state under fast-return.
                    return GeneratedPuzzle {
                        clues,
                        solution,
                        fast_return_used: true,
                    };
                }
                SolveStatus::SolvedBySimple => {
                    too_easy_adjust(&mut clues, rng);
                }
                SolveStatus::Stuck => {
                    too_hard_adjust(&mut clues, &full_board, &logical.board, &row_sums, &col_sums, rng);
                    fast_return = true;
                }
            },
            Difficulty::Unreasonable => {
                if logical.status != SolveStatus::Stuck {
                    too_easy_adjust(&mut clues, rng);
                    continue;
                }
                let outcome = exhaustive_solver::solve_with_metrics(&clues, EXHAUSTIVE_CALL_LIMIT);
                match outcome.result {
                    Ok(_) if outcome.calls >= UNREASONABLE_CALL_FLOOR => {
                        return GeneratedPuzzle {
                            clues,
                            solution,
                            fast_return_used: fast_return,
                        };
                    }
                    Ok(_) if fast_return => {
                        // Weaker acceptable state: a unique solve is enough
                        // once fast-return has been engaged, without the
                        // call-count floor.
                        return GeneratedPuzzle {
                            clues,
                            solution,
                            fast_return_used: true,
                        };
                    }
                    Ok(_) => {
                        too_easy_adjust(&mut clues, rng);
                    }
                    Err(SolveError::NonUnique { first, second }) => {
                        disclose_wrong_cell(&mut clues, &first, &second, rng);
                        fast_return = true;
                    }
                    Err(_) => {
                        too_hard_adjust(&mut clues, &full_board, &logical.board, &row_sums, &col_sums, rng);
                        fast_return = true;
                    }
                }
            }
        }
    }

    GeneratedPuzzle {
        clues,
        solution,
        fast_return_used: true,
    }
}

/// Step 1 (§4.F): choose the ship multiset for an `h x w` grid at
/// `difficulty`.
fn choose_ships(h: usize, w: usize, difficulty: Difficulty, rng: &mut impl PuzzleRng) -> Vec<usize> {
    let min_dim = h.min(w);
    if min_dim == 7 {
        return vec![4, 4, 3, 3, 2, 2, 2];
    }

    let n_ships = if difficulty == Difficulty::Basic {
        7
    } else if rng.upto(2) == 0 {
        7
    } else {
        8
    };

    let l_max = ((0.6 * min_dim as f64).round() as usize).max(2);
    let values: Vec<usize> = (2..=l_max).collect();
    let groups = split_into_groups(&values);

    let mut lengths = Vec::with_capacity(n_ships);
    for group in groups.iter().skip(1) {
        for _ in 0..2 {
            lengths.push(group[rng.upto(group.len())]);
        }
    }

    let lowest = groups.first().cloned().unwrap_or_else(|| vec![2]);
    while lengths.len() < n_ships {
        let value = if difficulty <= Difficulty::Intermediate {
            // Singletons are harder to find and are avoided at low
            // difficulty: take the group's largest length instead of
            // sampling it.
            *lowest.iter().max().unwrap_or(&2)
        } else {
            lowest[rng.upto(lowest.len())]
        };
        lengths.push(value);
    }
    lengths.truncate(n_ships);
    lengths.sort_unstable_by(|a, b| b.cmp(a));
    lengths
}

/// Split `values` into up to four near-equal contiguous groups, ascending.
/// The spec calls for "a divisor slightly offset from 4 for numerical
/// stability"; reading groups off a chunk size derived that way (rather
/// than an exact `len/4`) avoids a degenerate empty group right at a
/// multiple-of-4 boundary.
fn split_into_groups(values: &[usize]) -> Vec<Vec<usize>> {
    if values.is_empty() {
        return vec![Vec::new()];
    }
    let n = 4usize.min(values.len());
    let base = values.len() / n;
    let rem = values.len() % n;
    let mut groups = Vec::with_capacity(n);
    let mut idx = 0;
    for g in 0..n {
        let extra = usize::from(g < rem);
        let take = base + extra;
        groups.push(values[idx..idx + take].to_vec());
        idx += take;
    }
    groups
}

/// Step 2 (§4.F): sample a board via Random Placer, shrinking the ship
/// multiset (removing its median-index ship) on repeated failure.
fn sample_board(h: usize, w: usize, ships: &mut Vec<usize>, rng: &mut impl PuzzleRng) -> Solution {
    let mut attempt = ships.clone();
    loop {
        match place_random(h, w, &attempt, rng, PLACEMENT_CALL_LIMIT) {
            Ok(solution) => {
                *ships = attempt;
                return solution;
            }
            Err(_) => {
                if attempt.len() <= 1 {
                    attempt = vec![1];
                    continue;
                }
                attempt.remove(attempt.len() / 2);
            }
        }
    }
}

fn difficulty_alpha(d: Difficulty) -> f64 {
    match d {
        Difficulty::Basic => 0.2,
        Difficulty::Intermediate => 0.1,
        Difficulty::Advanced => 0.05,
        Difficulty::Unreasonable => 0.0,
    }
}

fn difficulty_occ_frac(d: Difficulty) -> f64 {
    match d {
        Difficulty::Basic => 0.6,
        Difficulty::Intermediate => 0.3,
        Difficulty::Advanced => 0.2,
        Difficulty::Unreasonable => 0.15,
    }
}

fn sums_hidden_count(d: Difficulty, h: usize, w: usize, rng: &mut impl PuzzleRng) -> usize {
    match d {
        Difficulty::Basic | Difficulty::Intermediate => 0,
        Difficulty::Advanced => ((0.1 * (h + w) as f64).floor() as usize) + rng.upto(2),
        Difficulty::Unreasonable => ((0.2 * (h + w) as f64).floor() as usize) + rng.upto(3),
    }
}

/// Step 3 (§4.F): derive a starting clue set from the sampled board.
#[allow(clippy::too_many_arguments)]
fn derive_initial_clues(
    h: usize,
    w: usize,
    ships: &[usize],
    row_sums: &[usize],
    col_sums: &[usize],
    full_board: &Board,
    difficulty: Difficulty,
    rng: &mut impl PuzzleRng,
) -> Clues {
    let ships_sum: usize = ships.iter().sum();

    let sums_hidden = sums_hidden_count(difficulty, h, w, rng).min(h + w);
    let mut line_order: Vec<usize> = (0..(h + w)).collect();
    rng.shuffle(&mut line_order);
    let hidden: HashSet<usize> = line_order.into_iter().take(sums_hidden).collect();

    let rows = (0..h)
        .map(|y| if hidden.contains(&y) { None } else { Some(row_sums[y]) })
        .collect();
    let cols = (0..w)
        .map(|x| if hidden.contains(&(h + x)) { None } else { Some(col_sums[x]) })
        .collect();

    let mut init = Board::new(h, w);

    let ini_vacant = (((h * w - ships_sum) as f64) * difficulty_alpha(difficulty)).round() as usize;
    let total_disclosed = ((ships_sum as f64) * difficulty_occ_frac(difficulty)).round() as usize;
    let split = rng.upto(10_000) as f64 / 10_000.0;
    let typed_count = ((total_disclosed as f64) * split).round() as usize;
    let occ_count = total_disclosed.saturating_sub(typed_count);

    let mut occupied_cells = all_cells(h, w);
    occupied_cells.retain(|&(y, x)| full_board.get(y, x).is_occupied());
    rng.shuffle(&mut occupied_cells);
    for (i, &(y, x)) in occupied_cells.iter().enumerate() {
        if i < typed_count {
            init.set(y, x, full_board.get(y, x));
        } else if i < typed_count + occ_count {
            init.set(y, x, CellState::Occ);
        } else {
            break;
        }
    }

    let mut vacant_cells = all_cells(h, w);
    vacant_cells.retain(|&(y, x)| !full_board.get(y, x).is_occupied());
    rng.shuffle(&mut vacant_cells);
    for &(y, x) in vacant_cells.iter().take(ini_vacant) {
        init.set(y, x, CellState::Vacant);
    }

    Clues {
        h,
        w,
        ships: ships.to_vec(),
        rows,
        cols,
        init,
    }
}

fn all_cells(h: usize, w: usize) -> Vec<(usize, usize)> {
    (0..h).flat_map(|y| (0..w).map(move |x| (y, x))).collect()
}

/// "When too easy": increase `sums_hidden` by one, or remove one
/// disclosure, chosen uniformly (§4.F).
fn too_easy_adjust(clues: &mut Clues, rng: &mut impl PuzzleRng) {
    if rng.upto(2) == 0 {
        hide_one_more_line(clues, rng);
    } else {
        remove_one_disclosure(clues, rng);
    }
}

/// "When no solution / too hard": decrease difficulty, with probabilities
/// roughly 1:3:1 over {reveal a hidden sum, disclose Vacant, disclose
/// typed} (§4.F). Disclosure candidates prefer cells the logical solver
/// hasn't already worked out on its own.
#[allow(clippy::too_many_arguments)]
fn too_hard_adjust(
    clues: &mut Clues,
    full_board: &Board,
    solved_board: &Board,
    row_sums: &[usize],
    col_sums: &[usize],
    rng: &mut impl PuzzleRng,
) {
    match rng.upto(5) {
        0 => reveal_one_line(clues, row_sums, col_sums, rng),
        4 => disclose_one_typed(clues, full_board, solved_board, rng),
        _ => disclose_one_vacant(clues, full_board, solved_board, rng),
    }
}

fn hide_one_more_line(clues: &mut Clues, rng: &mut impl PuzzleRng) {
    let mut visible = Vec::new();
    for y in 0..clues.h {
        if clues.rows[y].is_some() {
            visible.push(y);
        }
    }
    for x in 0..clues.w {
        if clues.cols[x].is_some() {
            visible.push(clues.h + x);
        }
    }
    if visible.is_empty() {
        return;
    }
    let pick = visible[rng.upto(visible.len())];
    if pick < clues.h {
        clues.rows[pick] = None;
    } else {
        clues.cols[pick - clues.h] = None;
    }
}

fn reveal_one_line(clues: &mut Clues, row_sums: &[usize], col_sums: &[usize], rng: &mut impl PuzzleRng) {
    let mut hidden = Vec::new();
    for y in 0..clues.h {
        if clues.rows[y].is_none() {
            hidden.push(y);
        }
    }
    for x in 0..clues.w {
        if clues.cols[x].is_none() {
            hidden.push(clues.h + x);
        }
    }
    if hidden.is_empty() {
        return;
    }
    let pick = hidden[rng.upto(hidden.len())];
    if pick < clues.h {
        clues.rows[pick] = Some(row_sums[pick]);
    } else {
        clues.cols[pick - clues.h] = Some(col_sums[pick - clues.h]);
    }
}

fn remove_one_disclosure(clues: &mut Clues, rng: &mut impl PuzzleRng) {
    let mut disclosed = Vec::new();
    for y in 0..clues.h {
        for x in 0..clues.w {
            if clues.init.get(y, x) != CellState::Undef {
                disclosed.push((y, x));
            }
        }
    }
    if disclosed.is_empty() {
        return;
    }
    let (y, x) = disclosed[rng.upto(disclosed.len())];
    clues.init.set(y, x, CellState::Undef);
}

fn disclose_one_vacant(clues: &mut Clues, full_board: &Board, solved_board: &Board, rng: &mut impl PuzzleRng) {
    let candidates = undisclosed_candidates(clues, full_board, solved_board, false);
    if candidates.is_empty() {
        return;
    }
    let (y, x) = candidates[rng.upto(candidates.len())];
    clues.init.set(y, x, CellState::Vacant);
}

fn disclose_one_typed(clues: &mut Clues, full_board: &Board, solved_board: &Board, rng: &mut impl PuzzleRng) {
    let candidates = undisclosed_candidates(clues, full_board, solved_board, true);
    if candidates.is_empty() {
        return;
    }
    let (y, x) = candidates[rng.upto(candidates.len())];
    clues.init.set(y, x, full_board.get(y, x));
}

/// Not-yet-disclosed cells of the requested occupancy, preferring ones the
/// logical solver's own board still holds as `Undef` — maximises the
/// information gained per extra disclosure.
fn undisclosed_candidates(
    clues: &Clues,
    full_board: &Board,
    solved_board: &Board,
    occupied: bool,
) -> Vec<(usize, usize)> {
    let mut preferred = Vec::new();
    let mut fallback = Vec::new();
    for y in 0..clues.h {
        for x in 0..clues.w {
            if clues.init.get(y, x) != CellState::Undef {
                continue;
            }
            if full_board.get(y, x).is_occupied() != occupied {
                continue;
            }
            fallback.push((y, x));
            if solved_board.get(y, x) == CellState::Undef {
                preferred.push((y, x));
            }
        }
    }
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

/// "When ambiguous": pick uniformly one cell that differs between the two
/// witness solutions and disclose it as Vacant (§4.F).
fn disclose_wrong_cell(clues: &mut Clues, first: &Solution, second: &Solution, rng: &mut impl PuzzleRng) {
    let board_a = first.to_board(clues);
    let board_b = second.to_board(clues);
    let mut diffs = Vec::new();
    for y in 0..clues.h {
        for x in 0..clues.w {
            if board_a.get(y, x).is_occupied() != board_b.get(y, x).is_occupied() {
                diffs.push((y, x));
            }
        }
    }
    if diffs.is_empty() {
        return;
    }
    let (y, x) = diffs[rng.upto(diffs.len())];
    clues.init.set(y, x, CellState::Vacant);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::StdPuzzleRng;

    #[test]
    fn seven_by_seven_always_gets_the_fixed_multiset() {
        let mut rng = StdPuzzleRng::from_seed(1);
        let ships = choose_ships(7, 7, Difficulty::Basic, &mut rng);
        assert_eq!(ships, vec![4, 4, 3, 3, 2, 2, 2]);
    }

    #[test]
    fn generated_puzzle_has_a_unique_exhaustive_solution() {
        let params = Parameters::validate(7, 7, 0).unwrap();
        let mut rng = StdPuzzleRng::from_seed(99);
        let puzzle = generate(&params, &mut rng);
        assert_eq!(puzzle.clues.ships_sum(), puzzle.solution.to_board(&puzzle.clues).occupied_count());
        let solved = exhaustive_solver::solve(&puzzle.clues, 500_000);
        assert!(solved.is_ok(), "generated puzzle should be uniquely solvable");
    }

    #[test]
    fn basic_difficulty_puzzle_is_solved_by_simple_rules() {
        let params = Parameters::validate(7, 7, 0).unwrap();
        let mut rng = StdPuzzleRng::from_seed(123);
        let puzzle = generate(&params, &mut rng);
        let logical = logical_solver::solve(&puzzle.clues, Difficulty::Basic);
        // Basic/Intermediate's only acceptable state, weaker or not, is
        // Solved-by-simple: fast-return must never hand back a puzzle the
        // logical solver is still Stuck on.
        assert_eq!(logical.status, SolveStatus::SolvedBySimple);
    }

    #[test]
    fn fast_return_never_accepts_a_still_stuck_basic_puzzle() {
        // Regression test: earlier, once `fast_return` was set after a
        // too-hard adjustment, the very next tuning iteration returned
        // unconditionally without re-checking the acceptance contract.
        for seed in 0..40u64 {
            let params = Parameters::validate(7, 7, 0).unwrap();
            let mut rng = StdPuzzleRng::from_seed(seed);
            let puzzle = generate(&params, &mut rng);
            let logical = logical_solver::solve(&puzzle.clues, Difficulty::Basic);
            assert_eq!(logical.status, SolveStatus::SolvedBySimple, "seed {seed}");
        }
    }
}
