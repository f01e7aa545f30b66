//! One-pass enrichment of a board from its own already-known cells:
//! ship-end/singleton/inner-axis geometry rules plus the generic
//! diagonal-blocking pass.

use crate::cell::CellState;
use crate::clues::Clues;
use crate::grid::{Board, Direction, DIAGONAL_OFFSETS};

/// Build the initial scratch board for a puzzle: a copy of `clues.init`
/// with one propagation pass applied.
pub fn solver_init(clues: &Clues) -> Board {
    let mut board = clues.init.clone();
    propagate_once(&mut board);
    board
}

/// Apply one enrichment pass to `board` in place. Returns whether
/// anything changed, so callers can use this as a rule inside a
/// fixed-point loop. Idempotent: a second call with no intervening
/// changes returns `false`.
pub fn propagate_once(board: &mut Board) -> bool {
    let mut changed = false;

    // Pass 1: ship-end / singleton / inner-axis rules, read from a
    // snapshot so that cells created by this very pass don't get
    // reprocessed within it.
    let typed: Vec<(usize, usize, CellState)> = (0..board.h())
        .flat_map(|y| (0..board.w()).map(move |x| (y, x)))
        .filter_map(|(y, x)| {
            let s = board.get(y, x);
            s.is_typed().then_some((y, x, s))
        })
        .collect();

    for (y, x, state) in typed {
        changed |= match state {
            CellState::N => propagate_ship_end(board, y, x, Direction::N),
            CellState::E => propagate_ship_end(board, y, x, Direction::E),
            CellState::S => propagate_ship_end(board, y, x, Direction::S),
            CellState::W => propagate_ship_end(board, y, x, Direction::W),
            CellState::One => propagate_one(board, y, x),
            CellState::Inner => propagate_inner_axis(board, y, x),
            _ => unreachable!("filtered to typed cells above"),
        };
    }

    // Pass 2: any occupied cell (including ones this very propagation just
    // created) blocks its diagonals. Run after pass 1 since earlier steps
    // may create more Occ cells.
    let occupied: Vec<(usize, usize)> = (0..board.h())
        .flat_map(|y| (0..board.w()).map(move |x| (y, x)))
        .filter(|&(y, x)| board.get(y, x).is_occupied())
        .collect();

    for (y, x) in occupied {
        for &(dy, dx) in &DIAGONAL_OFFSETS {
            let (ny, nx) = (y as i32 + dy, x as i32 + dx);
            if board.in_bounds(ny, nx) {
                changed |= board.promote(ny as usize, nx as usize, CellState::Vacant);
            }
        }
    }

    changed
}

/// N/E/S/W rule: all eight neighbors except the one the ship's body
/// extends into become `Vacant`; that one neighbor becomes at least `Occ`.
fn propagate_ship_end(board: &mut Board, y: usize, x: usize, dir: Direction) -> bool {
    let mut changed = false;
    let body = dir.body_offset();
    for &(dy, dx) in &crate::grid::NEIGHBOR_OFFSETS {
        let (ny, nx) = (y as i32 + dy, x as i32 + dx);
        if !board.in_bounds(ny, nx) {
            continue;
        }
        let target = if (dy, dx) == body {
            CellState::Occ
        } else {
            CellState::Vacant
        };
        changed |= board.promote(ny as usize, nx as usize, target);
    }
    changed
}

/// `One` rule: all eight neighbors become `Vacant`.
fn propagate_one(board: &mut Board, y: usize, x: usize) -> bool {
    let mut changed = false;
    for &(dy, dx) in &crate::grid::NEIGHBOR_OFFSETS {
        let (ny, nx) = (y as i32 + dy, x as i32 + dx);
        if board.in_bounds(ny, nx) {
            changed |= board.promote(ny as usize, nx as usize, CellState::Vacant);
        }
    }
    changed
}

/// Whether the neighbor at `(y + dy, x + dx)` counts as "known occupied"
/// for the Inner-axis rule, treating off-board as not occupied.
fn is_occupied_or_border(board: &Board, y: i32, x: i32) -> bool {
    board
        .get_signed(y, x)
        .map(|s| s.is_occupied())
        .unwrap_or(false)
}

/// `Inner` rule's axis-disambiguation half (the diagonal-vacant half is
/// subsumed by the generic occupied-cell pass). If exactly one of the two
/// neighbors along one axis is known occupied, the perpendicular axis's
/// neighbors become `Vacant` and the still-unknown neighbor on the known
/// axis becomes at least `Occ`.
fn propagate_inner_axis(board: &mut Board, y: usize, x: usize) -> bool {
    let mut changed = false;
    let (iy, ix) = (y as i32, x as i32);

    let left = is_occupied_or_border(board, iy, ix - 1);
    let right = is_occupied_or_border(board, iy, ix + 1);
    if left ^ right {
        if board.in_bounds(iy - 1, ix) {
            changed |= board.promote((iy - 1) as usize, ix as usize, CellState::Vacant);
        }
        if board.in_bounds(iy + 1, ix) {
            changed |= board.promote((iy + 1) as usize, ix as usize, CellState::Vacant);
        }
        let (ty, tx) = if left { (iy, ix + 1) } else { (iy, ix - 1) };
        if board.in_bounds(ty, tx) {
            changed |= board.promote(ty as usize, tx as usize, CellState::Occ);
        }
    }

    let up = is_occupied_or_border(board, iy - 1, ix);
    let down = is_occupied_or_border(board, iy + 1, ix);
    if up ^ down {
        if board.in_bounds(iy, ix - 1) {
            changed |= board.promote(iy as usize, (ix - 1) as usize, CellState::Vacant);
        }
        if board.in_bounds(iy, ix + 1) {
            changed |= board.promote(iy as usize, (ix + 1) as usize, CellState::Vacant);
        }
        let (ty, tx) = if up { (iy + 1, ix) } else { (iy - 1, ix) };
        if board.in_bounds(ty, tx) {
            changed |= board.promote(ty as usize, tx as usize, CellState::Occ);
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Board;

    /// A single `N` at (2,3) on a 7x7 board.
    #[test]
    fn single_ship_end_enriches_its_neighbourhood() {
        let mut board = Board::new(7, 7);
        board.set(2, 3, CellState::N);
        propagate_once(&mut board);

        let expect_vacant = [
            (1, 2),
            (1, 3),
            (1, 4),
            (2, 2),
            (2, 4),
            (3, 2),
            (3, 4),
        ];
        for (y, x) in expect_vacant {
            assert_eq!(board.get(y, x), CellState::Vacant, "({y},{x})");
        }
        assert_eq!(board.get(3, 3), CellState::Occ);

        for y in 0..7 {
            for x in 0..7 {
                if (y, x) == (2, 3) || (y, x) == (3, 3) || expect_vacant.contains(&(y, x)) {
                    continue;
                }
                assert_eq!(board.get(y, x), CellState::Undef, "({y},{x})");
            }
        }
    }

    #[test]
    fn idempotent() {
        let mut board = Board::new(7, 7);
        board.set(2, 3, CellState::N);
        board.set(5, 5, CellState::Inner);
        board.set(5, 4, CellState::Occ);
        propagate_once(&mut board);
        let after_first = board.render();
        propagate_once(&mut board);
        assert_eq!(board.render(), after_first);
    }
}
