//! Exhaustive solver: proves uniqueness by DFS over ship placements,
//! backtracking so each branch's row/column counters and claimed-cell
//! bookkeeping unwind in lockstep with the recursion.

use std::collections::HashSet;

use crate::cell::CellState;
use crate::clues::{Clues, Solution};
use crate::error::SolveError;
use crate::grid::{Board, Orientation, ShipPlacement};

/// Find the unique solution consistent with `clues`, or a tagged failure.
/// Stops as soon as a second solution is found — the second witness is
/// never fully explored beyond what's needed to prove non-uniqueness.
pub fn solve(clues: &Clues, call_limit: usize) -> Result<Solution, SolveError> {
    solve_with_metrics(clues, call_limit).result
}

/// The outcome of [`solve`] together with the recursive call count, which
/// the generator's Unreasonable-difficulty tuning loop uses as a lower
/// bound on search difficulty.
pub struct SolveOutcome {
    pub result: Result<Solution, SolveError>,
    pub calls: usize,
}

pub fn solve_with_metrics(clues: &Clues, call_limit: usize) -> SolveOutcome {
    let mut search = Search::new(clues);
    let run_result = search.run(0, call_limit);
    let result = match run_result {
        Err(e) => Err(e),
        Ok(_) => match (search.first.take(), search.second.take()) {
            (None, _) => Err(SolveError::NoSolution),
            (Some(first), Some(second)) => Err(SolveError::NonUnique {
                first: Box::new(first),
                second: Box::new(second),
            }),
            (Some(first), None) => Ok(first),
        },
    };
    SolveOutcome {
        result,
        calls: search.calls,
    }
}

struct Search<'a> {
    clues: &'a Clues,
    board: Board,
    row_occ: Vec<usize>,
    col_occ: Vec<usize>,
    /// Cells claimed by some already-committed ship placement, used to
    /// make sure every disclosed occupied cell ends up explained by the
    /// final solution rather than merely agreeing on row/column totals.
    claimed: HashSet<(usize, usize)>,
    placements: Vec<ShipPlacement>,
    first: Option<Solution>,
    second: Option<Solution>,
    calls: usize,
}

impl<'a> Search<'a> {
    fn new(clues: &'a Clues) -> Self {
        let board = clues.init.clone();
        // `row_occ`/`col_occ` only ever count cells claimed by a
        // committed ship placement (see `try_place`), never disclosed
        // cells directly — every disclosed occupied cell must end up
        // claimed by exactly one placement (`all_disclosed_claimed`), so
        // counting it again here would double-count it once that
        // placement commits.
        let row_occ = vec![0usize; clues.h];
        let col_occ = vec![0usize; clues.w];
        Search {
            clues,
            board,
            row_occ,
            col_occ,
            claimed: HashSet::new(),
            placements: Vec::with_capacity(clues.ships.len()),
            first: None,
            second: None,
            calls: 0,
        }
    }

    /// `true` once a second solution has been found and the caller should
    /// unwind without exploring further.
    fn run(&mut self, idx: usize, call_limit: usize) -> Result<bool, SolveError> {
        self.calls += 1;
        if self.calls > call_limit {
            return Err(SolveError::LimitExceeded);
        }

        if idx == self.clues.ships.len() {
            if !self.totals_exactly_satisfied() || !self.all_disclosed_claimed() {
                return Ok(false);
            }
            let solution = Solution::new(self.placements.clone());
            if self.first.is_none() {
                self.first = Some(solution);
                return Ok(false);
            }
            self.second = Some(solution);
            return Ok(true);
        }

        let len = self.clues.ships[idx];
        // Ships of equal length are interchangeable; only try placements
        // at or after the previous same-length ship's to avoid exploring
        // every permutation of an otherwise-identical group.
        let floor = if idx > 0 && self.clues.ships[idx - 1] == len {
            Some(self.placements[idx - 1])
        } else {
            None
        };

        for placement in self.candidate_placements(len, floor) {
            if !self.try_place(placement, len) {
                continue;
            }
            self.placements.push(placement);
            let done = self.run(idx + 1, call_limit)?;
            self.placements.pop();
            self.undo_place(placement, len);
            if done {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether every visible row/column total, and both hidden-row and
    /// hidden-column aggregate budgets, are matched exactly once all
    /// ships are down and the rest of the board is `Vacant`.
    fn totals_exactly_satisfied(&self) -> bool {
        let mut hidden_row_occ = 0usize;
        let mut hidden_col_occ = 0usize;
        for y in 0..self.clues.h {
            match self.clues.rows[y] {
                Some(total) if self.row_occ[y] != total => return false,
                Some(_) => {}
                None => hidden_row_occ += self.row_occ[y],
            }
        }
        for x in 0..self.clues.w {
            match self.clues.cols[x] {
                Some(total) if self.col_occ[x] != total => return false,
                Some(_) => {}
                None => hidden_col_occ += self.col_occ[x],
            }
        }
        if self.clues.hidden_row_count() > 0 && hidden_row_occ != self.clues.hidden_rows_budget() {
            return false;
        }
        if self.clues.hidden_col_count() > 0 && hidden_col_occ != self.clues.hidden_cols_budget() {
            return false;
        }
        true
    }

    /// Every cell disclosed as occupied in `clues.init` must be part of
    /// some committed ship, not merely compatible with the row/column
    /// totals (two disclosed singletons in the same row could otherwise
    /// "net out" against a ship placed in neither of them).
    fn all_disclosed_claimed(&self) -> bool {
        for y in 0..self.clues.h {
            for x in 0..self.clues.w {
                if self.clues.init.get(y, x).is_occupied() && !self.claimed.contains(&(y, x)) {
                    return false;
                }
            }
        }
        true
    }

    /// Every placement of a ship of length `len` that is geometrically
    /// lexicographically at or after `floor` (the previous same-length
    /// ship's placement, if any), without validity-checking yet — that
    /// happens in `try_place` so bookkeeping only needs to roll back
    /// placements that were actually committed.
    fn candidate_placements(&self, len: usize, floor: Option<ShipPlacement>) -> Vec<ShipPlacement> {
        let h = self.clues.h;
        let w = self.clues.w;
        let mut out = Vec::new();
        if w >= len {
            for y in 0..h {
                for x in 0..=(w - len) {
                    out.push(ShipPlacement::new(Orientation::Horizontal, y, x));
                }
            }
        }
        // A length-1 ship's orientation is not a distinct board state
        // (always recorded as canonical `Horizontal`); enumerating
        // `Vertical` too would make every singleton placement its own
        // spurious "second solution" for the uniqueness check below.
        if h >= len && len > 1 {
            for y in 0..=(h - len) {
                for x in 0..w {
                    out.push(ShipPlacement::new(Orientation::Vertical, y, x));
                }
            }
        }
        // Lexicographic on (orientation, y, x), per §4.D.1/§5.
        out.sort_by_key(|p| (p.orientation == Orientation::Vertical, p.y, p.x));
        if let Some(floor) = floor {
            let floor_key = (floor.orientation == Orientation::Vertical, floor.y, floor.x);
            out.retain(|p| (p.orientation == Orientation::Vertical, p.y, p.x) >= floor_key);
        }
        out
    }

    /// Attempt to commit `placement` (cells typed, row/col counters
    /// bumped). Returns `false` without mutating anything on conflict.
    fn try_place(&mut self, placement: ShipPlacement, len: usize) -> bool {
        let states = placement.cell_states(len);

        for &(y, x, state) in &states {
            let existing = self.board.get(y, x);
            if existing == CellState::Vacant {
                return false;
            }
            if existing.is_typed() && existing != state {
                return false;
            }
            for (ny, nx, n_state) in self.board.neighbors(y, x) {
                if n_state.is_occupied() && !states.iter().any(|&(sy, sx, _)| (sy, sx) == (ny, nx)) {
                    return false;
                }
            }
        }
        for y in 0..self.clues.h {
            if let Some(total) = self.clues.rows[y] {
                let added = states.iter().filter(|&&(sy, _, _)| sy == y).count();
                if self.row_occ[y] + added > total {
                    return false;
                }
            }
        }
        for x in 0..self.clues.w {
            if let Some(total) = self.clues.cols[x] {
                let added = states.iter().filter(|&&(_, sx, _)| sx == x).count();
                if self.col_occ[x] + added > total {
                    return false;
                }
            }
        }

        for &(y, x, state) in &states {
            self.board.set(y, x, state);
            self.row_occ[y] += 1;
            self.col_occ[x] += 1;
            self.claimed.insert((y, x));
        }
        true
    }

    fn undo_place(&mut self, placement: ShipPlacement, len: usize) {
        for (y, x, _) in placement.cell_states(len) {
            let original = self.clues.init.get(y, x);
            self.board.set(y, x, original);
            self.row_occ[y] -= 1;
            self.col_occ[x] -= 1;
            self.claimed.remove(&(y, x));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellState;

    /// A trivial fully-disclosed 1x1 board with a single length-1 ship.
    #[test]
    fn trivial_unique_solve() {
        let mut init = Board::new(1, 1);
        init.set(0, 0, CellState::One);
        let clues = Clues {
            h: 1,
            w: 1,
            ships: vec![1],
            rows: vec![Some(1)],
            cols: vec![Some(1)],
            init,
        };
        let solution = solve(&clues, 10_000).unwrap();
        assert_eq!(solution.placements.len(), 1);
        assert_eq!(solution.placements[0].orientation, Orientation::Horizontal);
    }

    /// A single-cell ship can occupy either of two isolated candidate
    /// cells, making the clues ambiguous.
    #[test]
    fn two_symmetric_placements_report_non_unique() {
        // 1x3, one length-1 ship, both end cells disclosed Undef (hidden
        // row total so both placements satisfy it).
        let clues = Clues {
            h: 1,
            w: 3,
            ships: vec![1],
            rows: vec![None],
            cols: vec![None, Some(0), None],
            init: Board::new(1, 3),
        };
        let err = solve(&clues, 10_000).unwrap_err();
        assert!(matches!(err, SolveError::NonUnique { .. }));
    }

    #[test]
    fn unsatisfiable_clues_report_no_solution() {
        let clues = Clues {
            h: 1,
            w: 1,
            ships: vec![1],
            rows: vec![Some(0)],
            cols: vec![Some(0)],
            init: Board::new(1, 1),
        };
        let err = solve(&clues, 10_000).unwrap_err();
        assert!(matches!(err, SolveError::NoSolution));
    }
}
