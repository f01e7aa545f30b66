//! Validator (§4.G): checks a player-supplied [`Board`] against every
//! structural invariant of the puzzle, independent of any solver. Grounded
//! on the teacher's `is_solved()` (row/column count comparison), extended
//! with the propagator's own neighbour rules (`propagator.rs`) run in
//! "check" mode instead of "write" mode, and on [`crate::grid::compl_ships_distr`]
//! for the completed-ship multiset check.

use crate::cell::CellState;
use crate::clues::Clues;
use crate::grid::{compl_ships_distr, Board, Direction, DIAGONAL_OFFSETS, NEIGHBOR_OFFSETS};

/// Full validation report for one board against one set of clues.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    h: usize,
    w: usize,
    /// Flat `h*w` flags, `true` where the cell violates some neighbour or
    /// adjacency rule.
    cell_errors: Vec<bool>,
    /// `true` for each row whose visible total is violated.
    pub row_errors: Vec<bool>,
    /// `true` for each column whose visible total is violated.
    pub col_errors: Vec<bool>,
    /// `true` if the completed-ship multiset exceeds `clues.ships` in any
    /// length bucket, or the board contains a malformed (unterminated)
    /// ship run.
    pub ships_err: bool,
    /// One flag per entry of `clues.ships` (same order/indexing), `true`
    /// once a completed ship of that length has been matched to it.
    pub ship_done: Vec<bool>,
    /// `true` iff every invariant holds and every ship is accounted for.
    pub solved: bool,
}

impl ValidationResult {
    pub fn cell_error(&self, y: usize, x: usize) -> bool {
        self.cell_errors[y * self.w + x]
    }
}

/// Validate `board` (a player's in-progress or completed board) against
/// `clues` (§4.G).
pub fn validate(clues: &Clues, board: &Board) -> ValidationResult {
    let h = clues.h;
    let w = clues.w;
    let mut cell_errors = vec![false; h * w];

    for y in 0..h {
        for x in 0..w {
            check_cell_rules(board, y, x, &mut cell_errors);
        }
    }

    let mut row_errors = vec![false; h];
    for y in 0..h {
        if let Some(total) = clues.rows[y] {
            let (occ, vac) = line_counts(board, |x| (y, x), w);
            if occ > total || vac > w - total {
                row_errors[y] = true;
            }
        }
    }
    let mut col_errors = vec![false; w];
    for x in 0..w {
        if let Some(total) = clues.cols[x] {
            let (occ, vac) = line_counts(board, |y| (y, x), h);
            if occ > total || vac > h - total {
                col_errors[x] = true;
            }
        }
    }

    let max_len = clues.longest_ship().max(1);
    let (completed, run_err) = match compl_ships_distr(board, max_len) {
        Ok(distr) => (distr, false),
        Err(_) => (vec![0usize; max_len], true),
    };
    let mut required = vec![0usize; max_len];
    for &len in &clues.ships {
        required[len - 1] += 1;
    }
    let mut ships_err = run_err;
    for len in 1..=max_len {
        if completed[len - 1] > required[len - 1] {
            ships_err = true;
        }
    }

    let mut remaining_done = completed.clone();
    let ship_done: Vec<bool> = clues
        .ships
        .iter()
        .map(|&len| {
            if remaining_done[len - 1] > 0 {
                remaining_done[len - 1] -= 1;
                true
            } else {
                false
            }
        })
        .collect();

    let totals_match = completed == required;
    let occupied_total = board.occupied_count();
    let all_rows_exact = row_errors.iter().all(|&e| !e);
    let all_cols_exact = col_errors.iter().all(|&e| !e);
    let no_cell_errors = cell_errors.iter().all(|&e| !e);

    let solved = no_cell_errors
        && all_rows_exact
        && all_cols_exact
        && !ships_err
        && totals_match
        && occupied_total == clues.ships_sum();

    ValidationResult {
        h,
        w,
        cell_errors,
        row_errors,
        col_errors,
        ships_err,
        ship_done,
        solved,
    }
}

fn line_counts(board: &Board, coord: impl Fn(usize) -> (usize, usize), len: usize) -> (usize, usize) {
    let mut occ = 0;
    let mut vac = 0;
    for i in 0..len {
        let (y, x) = coord(i);
        match board.get(y, x) {
            s if s.is_occupied() => occ += 1,
            CellState::Vacant => vac += 1,
            _ => {}
        }
    }
    (occ, vac)
}

/// Flag `(y, x)` (and, where applicable, the offending neighbour) when its
/// state contradicts what its own rotation-symmetric rule set permits
/// (§4.G's "each symbol has a rotation-symmetric rule set").
fn check_cell_rules(board: &Board, y: usize, x: usize, errors: &mut [bool]) {
    let w = board.w();
    let idx = |yy: usize, xx: usize| yy * w + xx;
    let state = board.get(y, x);

    let mut flag = |yy: usize, xx: usize, errors: &mut [bool]| {
        errors[idx(yy, xx)] = true;
    };

    match state {
        CellState::Undef | CellState::Vacant => {}
        CellState::N | CellState::E | CellState::S | CellState::W => {
            let dir = match state {
                CellState::N => Direction::N,
                CellState::E => Direction::E,
                CellState::S => Direction::S,
                CellState::W => Direction::W,
                _ => unreachable!(),
            };
            let (body_dy, body_dx) = dir.body_offset();
            for &(dy, dx) in &NEIGHBOR_OFFSETS {
                if (dy, dx) == (body_dy, body_dx) {
                    continue;
                }
                if let Some(n) = board.get_signed(y as i32 + dy, x as i32 + dx) {
                    if n.is_occupied() {
                        flag(y, x, errors);
                        flag((y as i32 + dy) as usize, (x as i32 + dx) as usize, errors);
                    }
                }
            }
            let body_occupied = board
                .get_signed(y as i32 + body_dy, x as i32 + body_dx)
                .is_some_and(|s| s.is_occupied());
            if !body_occupied {
                flag(y, x, errors);
            }
        }
        CellState::One => {
            for &(dy, dx) in &NEIGHBOR_OFFSETS {
                if let Some(n) = board.get_signed(y as i32 + dy, x as i32 + dx) {
                    if n.is_occupied() {
                        flag(y, x, errors);
                        flag((y as i32 + dy) as usize, (x as i32 + dx) as usize, errors);
                    }
                }
            }
        }
        CellState::Inner => {
            for &(dy, dx) in &DIAGONAL_OFFSETS {
                if let Some(n) = board.get_signed(y as i32 + dy, x as i32 + dx) {
                    if n.is_occupied() {
                        flag(y, x, errors);
                        flag((y as i32 + dy) as usize, (x as i32 + dx) as usize, errors);
                    }
                }
            }
            let straight_occupied = [(-1, 0), (1, 0), (0, -1), (0, 1)].iter().any(|&(dy, dx)| {
                board
                    .get_signed(y as i32 + dy, x as i32 + dx)
                    .is_some_and(|s| s.is_occupied())
            });
            if !straight_occupied {
                // An Inner cell with no occupied straight-line neighbour
                // cannot be the interior of any ship.
                flag(y, x, errors);
            }
        }
        CellState::Occ => {
            for &(dy, dx) in &DIAGONAL_OFFSETS {
                if let Some(n) = board.get_signed(y as i32 + dy, x as i32 + dx) {
                    if n.is_occupied() {
                        flag(y, x, errors);
                        flag((y as i32 + dy) as usize, (x as i32 + dx) as usize, errors);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clues::Solution;
    use crate::grid::{Orientation, ShipPlacement};

    fn trivial_clues() -> Clues {
        Clues {
            h: 5,
            w: 5,
            ships: vec![3, 1],
            rows: vec![Some(0), Some(3), Some(0), Some(0), Some(1)],
            cols: vec![Some(0), Some(1), Some(1), Some(1), Some(1)],
            init: Board::new(5, 5),
        }
    }

    #[test]
    fn ground_truth_solution_is_solved_with_no_flags() {
        let clues = trivial_clues();
        let solution = Solution::new(vec![
            ShipPlacement::new(Orientation::Horizontal, 1, 1),
            ShipPlacement::new(Orientation::Horizontal, 4, 4),
        ]);
        let board = solution.to_board(&clues);
        let result = validate(&clues, &board);
        assert!(result.solved, "{result:?}");
        assert!((0..5).all(|i| !result.row_errors[i]));
        assert!((0..5).all(|i| !result.col_errors[i]));
        assert!(!result.ships_err);
        assert!(result.ship_done.iter().all(|&d| d));
    }

    #[test]
    fn diagonal_adjacency_is_flagged() {
        let mut board = Board::new(3, 3);
        board.set(0, 0, CellState::One);
        board.set(1, 1, CellState::One);
        let clues = Clues {
            h: 3,
            w: 3,
            ships: vec![1, 1],
            rows: vec![None; 3],
            cols: vec![None; 3],
            init: Board::new(3, 3),
        };
        let result = validate(&clues, &board);
        assert!(result.cell_error(0, 0));
        assert!(result.cell_error(1, 1));
        assert!(!result.solved);
    }

    #[test]
    fn excess_completed_ships_set_ships_err() {
        let mut board = Board::new(3, 3);
        board.set(0, 0, CellState::One);
        board.set(2, 2, CellState::One);
        let clues = Clues {
            h: 3,
            w: 3,
            ships: vec![1],
            rows: vec![None; 3],
            cols: vec![None; 3],
            init: Board::new(3, 3),
        };
        let result = validate(&clues, &board);
        assert!(result.ships_err);
        assert!(!result.solved);
    }
}
