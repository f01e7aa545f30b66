//! The immutable puzzle description (`Clues`), and a solved arrangement
//! of ships (`Solution`).

use crate::cell::CellState;
use crate::grid::{Board, Orientation, ShipPlacement};

/// An immutable puzzle description. Produced by the [`crate::generator`]
/// or decoded from a puzzle description string, then shared read-only by
/// every solver and the validator.
#[derive(Debug, Clone)]
pub struct Clues {
    pub h: usize,
    pub w: usize,
    /// Descending-sorted ship lengths, each in `1..=min(h, w)`.
    pub ships: Vec<usize>,
    /// `rows[i]` is `Some(count)` when visible, `None` when hidden.
    pub rows: Vec<Option<usize>>,
    /// `cols[j]` is `Some(count)` when visible, `None` when hidden.
    pub cols: Vec<Option<usize>>,
    /// Disclosed cells; `Undef` where nothing is disclosed.
    pub init: Board,
}

impl Clues {
    /// Total occupied cells in any valid solution, `sum(ships)`.
    pub fn ships_sum(&self) -> usize {
        self.ships.iter().sum()
    }

    /// Sum of the non-hidden row totals.
    pub fn rows_sum(&self) -> usize {
        self.rows.iter().filter_map(|r| *r).sum()
    }

    /// Sum of the non-hidden column totals.
    pub fn cols_sum(&self) -> usize {
        self.cols.iter().filter_map(|c| *c).sum()
    }

    /// The aggregate budget for all hidden rows together:
    /// `ships_sum - rows_sum`.
    pub fn hidden_rows_budget(&self) -> usize {
        self.ships_sum().saturating_sub(self.rows_sum())
    }

    /// The aggregate budget for all hidden columns together.
    pub fn hidden_cols_budget(&self) -> usize {
        self.ships_sum().saturating_sub(self.cols_sum())
    }

    /// The length of the longest ship, or 0 if there are none.
    pub fn longest_ship(&self) -> usize {
        self.ships.first().copied().unwrap_or(0)
    }

    /// How many ships in `ships` share the longest length.
    pub fn longest_ship_count(&self) -> usize {
        let longest = self.longest_ship();
        self.ships.iter().filter(|&&l| l == longest).count()
    }

    /// Number of hidden rows.
    pub fn hidden_row_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_none()).count()
    }

    /// Number of hidden columns.
    pub fn hidden_col_count(&self) -> usize {
        self.cols.iter().filter(|c| c.is_none()).count()
    }
}

/// A solved arrangement: one [`ShipPlacement`] per entry of `Clues::ships`,
/// in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub placements: Vec<ShipPlacement>,
}

impl Solution {
    pub fn new(placements: Vec<ShipPlacement>) -> Self {
        Solution { placements }
    }

    /// Render this solution as a fully-typed board (every occupied cell
    /// is `N`/`E`/`S`/`W`/`One`/`Inner`, never the generic `Occ`). Used by
    /// the exhaustive solver's final check, the validator's ground-truth
    /// tests, and the solver move string encoder.
    pub fn to_board(&self, clues: &Clues) -> Board {
        let mut board = Board::new(clues.h, clues.w);
        for (placement, &len) in self.placements.iter().zip(clues.ships.iter()) {
            write_ship(&mut board, *placement, len);
        }
        for y in 0..clues.h {
            for x in 0..clues.w {
                if board.get(y, x) == CellState::Undef {
                    board.set(y, x, CellState::Vacant);
                }
            }
        }
        board
    }

    /// Every cell occupied by some ship in this solution, as `(y, x)`.
    pub fn occupied_cells(&self, ships: &[usize]) -> Vec<(usize, usize)> {
        self.placements
            .iter()
            .zip(ships.iter())
            .flat_map(|(p, &len)| p.cells(len))
            .collect()
    }
}

/// Write a single ship's typed cells into `board`.
pub fn write_ship(board: &mut Board, placement: ShipPlacement, len: usize) {
    for (y, x, state) in placement.cell_states(len) {
        board.set(y, x, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ShipPlacement;

    #[test]
    fn solution_to_board_types_ends_and_interior() {
        let clues = Clues {
            h: 5,
            w: 5,
            ships: vec![3, 1],
            rows: vec![None; 5],
            cols: vec![None; 5],
            init: Board::new(5, 5),
        };
        let solution = Solution::new(vec![
            ShipPlacement::new(Orientation::Horizontal, 0, 0),
            ShipPlacement::new(Orientation::Horizontal, 4, 4),
        ]);
        let board = solution.to_board(&clues);
        assert_eq!(board.get(0, 0), CellState::W);
        assert_eq!(board.get(0, 1), CellState::Inner);
        assert_eq!(board.get(0, 2), CellState::E);
        assert_eq!(board.get(4, 4), CellState::One);
        assert_eq!(board.get(1, 1), CellState::Vacant);
    }
}
