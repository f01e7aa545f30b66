//! Logical (deductive) solver: a fixed-point loop over rules R1-R5, used
//! to grade puzzle difficulty. Iterates propagation, row/column counting,
//! and run-length rules until nothing changes, with a fifth "advanced"
//! rule and a toggle for when to turn it on.

use tracing::trace;

use crate::cell::CellState;
use crate::clues::Clues;
use crate::grid::{Axis, Board};
use crate::propagator::propagate_once;

/// Difficulty level requested of the logical solver / generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
    Unreasonable,
}

impl Difficulty {
    pub fn from_level(level: i32) -> Option<Difficulty> {
        match level {
            0 => Some(Difficulty::Basic),
            1 => Some(Difficulty::Intermediate),
            2 => Some(Difficulty::Advanced),
            3 => Some(Difficulty::Unreasonable),
            _ => None,
        }
    }

    pub fn level(self) -> i32 {
        match self {
            Difficulty::Basic => 0,
            Difficulty::Intermediate => 1,
            Difficulty::Advanced => 2,
            Difficulty::Unreasonable => 3,
        }
    }
}

/// Outcome of a logical-solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// All occupied cells found using only R1-R3.
    SolvedBySimple,
    /// Required at least one application of R4 or R5.
    SolvedUsingAdvanced,
    /// Fixed point reached with occupied count still short of `ships_sum`.
    Stuck,
}

#[derive(Debug, Clone)]
pub struct LogicalSolveResult {
    pub board: Board,
    pub occ_count: usize,
    pub vac_count: usize,
    pub status: SolveStatus,
}

/// Run the logical solver to a fixed point. Uses a 32-bit checksum of the
/// whole board, taken before and after a round of rules, to detect "no
/// further change" rather than diffing the grid cell by cell (§4.C).
pub fn solve(clues: &Clues, difficulty: Difficulty) -> LogicalSolveResult {
    let mut board = crate::propagator::solver_init(clues);
    let mut advanced_enabled = false;
    let mut used_advanced = false;

    loop {
        if board.occupied_count() >= clues.ships_sum() {
            break;
        }

        let before_basic = board.checksum();
        propagate_once(&mut board);
        rule_row_col_counting(&mut board, clues);
        rule_run_length_cap(&mut board, clues);
        let basic_changed = board.checksum() != before_basic;

        let mut advanced_changed = false;
        if advanced_enabled {
            let before_advanced = board.checksum();
            rule_gap_too_small(&mut board, clues);
            rule_forced_placement(&mut board, clues);
            advanced_changed = board.checksum() != before_advanced;
            if advanced_changed {
                used_advanced = true;
            }
        }

        if !basic_changed && !advanced_changed {
            if difficulty >= Difficulty::Advanced && !advanced_enabled {
                advanced_enabled = true;
                continue;
            }
            break;
        }
    }

    let occ_count = board.occupied_count();
    let vac_count = board.vacant_count();
    let status = if occ_count >= clues.ships_sum() {
        if used_advanced {
            SolveStatus::SolvedUsingAdvanced
        } else {
            SolveStatus::SolvedBySimple
        }
    } else {
        SolveStatus::Stuck
    };

    LogicalSolveResult {
        board,
        occ_count,
        vac_count,
        status,
    }
}

/// Required count of each ship length, `required[len-1]`, for
/// `len in 1..=max_size`.
fn required_counts(ships: &[usize], max_size: usize) -> Vec<usize> {
    let mut required = vec![0usize; max_size];
    for &len in ships {
        if len >= 1 && len <= max_size {
            required[len - 1] += 1;
        }
    }
    required
}

/// `required - completed` per length, or `None` if the board is currently
/// structurally inconsistent (an unterminated ship run) — the rules below
/// then simply skip this iteration rather than treat a transient
/// contradiction as fatal; the exhaustive solver's own consistency check
/// is authoritative.
fn remaining_distr(board: &Board, clues: &Clues) -> Option<Vec<usize>> {
    let max_size = clues.longest_ship();
    if max_size == 0 {
        return Some(Vec::new());
    }
    let completed = crate::grid::compl_ships_distr(board, max_size).ok()?;
    let required = required_counts(&clues.ships, max_size);
    Some(
        required
            .iter()
            .zip(completed.iter())
            .map(|(&r, &c)| r.saturating_sub(c))
            .collect(),
    )
}

/// Longest ship length with `remaining[len-1] > 0`, or 0 if every ship is
/// already accounted for.
fn longest_unfinished(remaining: &[usize]) -> usize {
    remaining
        .iter()
        .enumerate()
        .rev()
        .find(|&(_, &c)| c > 0)
        .map(|(i, _)| i + 1)
        .unwrap_or(0)
}

/// Shortest ship length with `remaining[len-1] > 0`, or `None`.
fn shortest_unfinished(remaining: &[usize]) -> Option<usize> {
    remaining.iter().position(|&c| c > 0).map(|i| i + 1)
}

/// Rule R2: per-line (row or column) counting, plus the aggregate version
/// for hidden lines ("uses ships_sum - rows_sum as the aggregate budget").
fn rule_row_col_counting(board: &mut Board, clues: &Clues) -> bool {
    let mut changed = false;
    for axis in [Axis::Row, Axis::Col] {
        let totals: &[Option<usize>] = match axis {
            Axis::Row => &clues.rows,
            Axis::Col => &clues.cols,
        };
        let n = board.line_count(axis);

        for i in 0..n {
            if let Some(total) = totals[i] {
                let line = board.line(axis, i);
                let occ = line
                    .iter()
                    .filter(|&&(y, x)| board.get(y, x).is_occupied())
                    .count();
                let undef: Vec<(usize, usize)> = line
                    .iter()
                    .copied()
                    .filter(|&(y, x)| board.get(y, x) == CellState::Undef)
                    .collect();
                if occ == total {
                    for (y, x) in undef {
                        if board.promote(y, x, CellState::Vacant) {
                            changed = true;
                            trace!(rule = "R2", axis = ?axis, line = i, y, x, "vacant (row/col full)");
                        }
                    }
                } else if occ + undef.len() == total {
                    for (y, x) in undef {
                        if board.promote(y, x, CellState::Occ) {
                            changed = true;
                            trace!(rule = "R2", axis = ?axis, line = i, y, x, "occ (row/col exact)");
                        }
                    }
                }
            }
        }

        let hidden_indices: Vec<usize> = (0..n).filter(|&i| totals[i].is_none()).collect();
        if hidden_indices.is_empty() {
            continue;
        }
        let budget = match axis {
            Axis::Row => clues.hidden_rows_budget(),
            Axis::Col => clues.hidden_cols_budget(),
        };
        let mut occ_total = 0usize;
        let mut undef_all: Vec<(usize, usize)> = Vec::new();
        for &i in &hidden_indices {
            for (y, x) in board.line(axis, i) {
                match board.get(y, x) {
                    s if s.is_occupied() => occ_total += 1,
                    CellState::Undef => undef_all.push((y, x)),
                    _ => {}
                }
            }
        }
        if occ_total == budget {
            for (y, x) in undef_all {
                changed |= board.promote(y, x, CellState::Vacant);
            }
        } else if occ_total + undef_all.len() == budget {
            for (y, x) in undef_all {
                changed |= board.promote(y, x, CellState::Occ);
            }
        }
    }
    changed
}

/// Rule R3: runs of occupied cells at least as long as the longest
/// unfinished ship cannot extend further, so their ends are sealed.
/// Deliberately preserves the L=1 short-circuit below verbatim rather
/// than "fixing" it — see the Open Question decisions in DESIGN.md.
fn rule_run_length_cap(board: &mut Board, clues: &Clues) -> bool {
    let Some(remaining) = remaining_distr(board, clues) else {
        return false;
    };
    let l = longest_unfinished(&remaining);
    if l == 0 {
        return false;
    }
    let mut changed = false;
    for axis in [Axis::Row, Axis::Col] {
        let n = board.line_count(axis);
        for i in 0..n {
            let line = board.line(axis, i);
            let mut j = 0;
            while j < line.len() {
                let (y, x) = line[j];
                if !board.get(y, x).is_occupied() {
                    j += 1;
                    continue;
                }
                let start = j;
                while j < line.len() && board.get(line[j].0, line[j].1).is_occupied() {
                    j += 1;
                }
                let run = &line[start..j];
                if run.len() >= l {
                    let mut apply = true;
                    if l == 1 {
                        // Avoid falsely capping a cell that might still be
                        // the cross-section of a still-growing ship on
                        // the other axis.
                        apply = !run.iter().any(|&(ry, rx)| {
                            let (py, nx2) = match axis {
                                Axis::Row => (ry.checked_sub(1), ry + 1),
                                Axis::Col => (rx.checked_sub(1), rx + 1),
                            };
                            let prev_occ = py.is_some_and(|p| match axis {
                                Axis::Row => board.get(p, rx).is_occupied(),
                                Axis::Col => board.get(ry, p).is_occupied(),
                            });
                            let next_occ = match axis {
                                Axis::Row => nx2 < board.h() && board.get(nx2, rx).is_occupied(),
                                Axis::Col => nx2 < board.w() && board.get(ry, nx2).is_occupied(),
                            };
                            prev_occ || next_occ
                        });
                    }
                    if apply {
                        if start > 0 {
                            let (y, x) = line[start - 1];
                            changed |= board.promote(y, x, CellState::Vacant);
                        }
                        if j < line.len() {
                            let (y, x) = line[j];
                            changed |= board.promote(y, x, CellState::Vacant);
                        }
                    }
                }
            }
        }
    }
    changed
}

/// Rule R4 (advanced): cells too far from any run that could fit the
/// shortest unfinished ship can't be part of any remaining ship.
fn rule_gap_too_small(board: &mut Board, clues: &Clues) -> bool {
    let Some(remaining) = remaining_distr(board, clues) else {
        return false;
    };
    let Some(m) = shortest_unfinished(&remaining) else {
        return false;
    };
    let mut to_vacate = Vec::new();
    for y in 0..board.h() {
        for x in 0..board.w() {
            if board.get(y, x) != CellState::Undef {
                continue;
            }
            let h_run = non_vacant_run_length(board, Axis::Row, y, x);
            let v_run = non_vacant_run_length(board, Axis::Col, y, x);
            if h_run.max(v_run) < m {
                to_vacate.push((y, x));
            }
        }
    }
    let mut changed = false;
    for (y, x) in to_vacate {
        changed |= board.promote(y, x, CellState::Vacant);
    }
    changed
}

fn non_vacant_run_length(board: &Board, axis: Axis, y: usize, x: usize) -> usize {
    match axis {
        Axis::Row => {
            let mut left = x;
            while left > 0 && board.get(y, left - 1) != CellState::Vacant {
                left -= 1;
            }
            let mut right = x;
            while right + 1 < board.w() && board.get(y, right + 1) != CellState::Vacant {
                right += 1;
            }
            right - left + 1
        }
        Axis::Col => {
            let mut up = y;
            while up > 0 && board.get(up - 1, x) != CellState::Vacant {
                up -= 1;
            }
            let mut down = y;
            while down + 1 < board.h() && board.get(down + 1, x) != CellState::Vacant {
                down += 1;
            }
            down - up + 1
        }
    }
}

/// Rule R5 (advanced): when the number of longest-unfinished-ship
/// candidate slots across every eligible gap exactly equals how many such
/// ships remain, every slot's nonogram overlap cells are forced `Occ`.
fn rule_forced_placement(board: &mut Board, clues: &Clues) -> bool {
    let Some(remaining) = remaining_distr(board, clues) else {
        return false;
    };
    let l = longest_unfinished(&remaining);
    if l <= 1 {
        return false; // R5 is skipped if L = 1
    }
    let n_l = remaining[l - 1];
    if n_l == 0 {
        return false;
    }

    struct Gap {
        axis: Axis,
        line: usize,
        start: usize,
        len: usize,
    }

    let mut gaps = Vec::new();
    let mut total_capacity = 0usize;
    for axis in [Axis::Row, Axis::Col] {
        let totals: &[Option<usize>] = match axis {
            Axis::Row => &clues.rows,
            Axis::Col => &clues.cols,
        };
        let n = board.line_count(axis);
        for i in 0..n {
            if let Some(t) = totals[i] {
                if t < l {
                    continue;
                }
            }
            let line = board.line(axis, i);
            let mut j = 0;
            while j < line.len() {
                let (y, x) = line[j];
                if board.get(y, x) == CellState::Vacant {
                    j += 1;
                    continue;
                }
                let start = j;
                while j < line.len() && board.get(line[j].0, line[j].1) != CellState::Vacant {
                    j += 1;
                }
                let len = j - start;
                if len >= l {
                    let capacity = (len + 1) / (l + 1);
                    if capacity > 0 {
                        total_capacity += capacity;
                        gaps.push(Gap {
                            axis,
                            line: i,
                            start,
                            len,
                        });
                    }
                }
            }
        }
    }

    if total_capacity != n_l {
        return false;
    }

    let mut changed = false;
    for gap in &gaps {
        let capacity = (gap.len + 1) / (l + 1);
        let k = (gap.len + 1) % (l + 1);
        if k >= l {
            continue;
        }
        let line = board.line(gap.axis, gap.line);
        for p in 0..capacity {
            let block_start = p * (l + 1);
            for j in k..l {
                let idx = gap.start + block_start + j;
                if idx < line.len() {
                    let (y, x) = line[idx];
                    if board.promote(y, x, CellState::Occ) {
                        changed = true;
                        trace!(rule = "R5", y, x, "forced overlap");
                    }
                }
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Board;

    /// H=1, W=5, rows=[3], cols=[1,0,1,0,1], ships={1,1,1}.
    #[test]
    fn row_col_counting_solves_a_fully_determined_row() {
        let clues = Clues {
            h: 1,
            w: 5,
            ships: vec![1, 1, 1],
            rows: vec![Some(3)],
            cols: vec![Some(1), Some(0), Some(1), Some(0), Some(1)],
            init: Board::new(1, 5),
        };
        let result = solve(&clues, Difficulty::Basic);
        // R2 (row/column counting) only determines occupancy, not the
        // full N/E/S/W/One/Inner typing — that's the placement-level
        // concern of `write_ship`/the exhaustive solver.
        assert!(result.board.get(0, 0).is_occupied());
        assert_eq!(result.board.get(0, 1), CellState::Vacant);
        assert!(result.board.get(0, 2).is_occupied());
        assert_eq!(result.board.get(0, 3), CellState::Vacant);
        assert!(result.board.get(0, 4).is_occupied());
        assert_eq!(result.status, SolveStatus::SolvedBySimple);
    }
}
