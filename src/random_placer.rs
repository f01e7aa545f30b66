//! Samples one uniformly-random valid arrangement of a ship multiset on
//! an empty `h x w` board, for the generator to turn into a puzzle.
//! Recursive placement with backtracking: pick a random remaining ship,
//! try each open placement in random order, recurse.

use crate::clues::Solution;
use crate::error::SolveError;
use crate::grid::{Board, Orientation, ShipPlacement};
use crate::rng::PuzzleRng;

/// Sample a random solution on an `h x w` board containing exactly the
/// ships in `ships` (descending-sorted lengths), respecting the no-touch
/// rule. Backtracks on dead ends; gives up with
/// [`SolveError::LimitExceeded`] once `call_limit` recursive calls have
/// been made without success.
pub fn place_random(
    h: usize,
    w: usize,
    ships: &[usize],
    rng: &mut impl PuzzleRng,
    call_limit: usize,
) -> Result<Solution, SolveError> {
    let mut board = Board::new(h, w);
    let mut placements = Vec::with_capacity(ships.len());
    let mut calls = 0usize;
    match place_recursive(&mut board, ships, 0, &mut placements, rng, &mut calls, call_limit)? {
        true => Ok(Solution::new(placements)),
        false => Err(SolveError::NoSolution),
    }
}

fn place_recursive(
    board: &mut Board,
    ships: &[usize],
    idx: usize,
    placements: &mut Vec<ShipPlacement>,
    rng: &mut impl PuzzleRng,
    calls: &mut usize,
    limit: usize,
) -> Result<bool, SolveError> {
    *calls += 1;
    if *calls > limit {
        return Err(SolveError::LimitExceeded);
    }
    if idx == ships.len() {
        return Ok(true);
    }

    let len = ships[idx];
    let mut candidates = candidate_placements(board, len);
    rng.shuffle(&mut candidates);

    for placement in candidates {
        let cells = placement.cells(len);
        write_occupied(board, &cells);
        // Canonical-orientation rule for singletons: whichever
        // orientation the random draw landed on, record it as
        // `Horizontal` — see candidate_placements' doc comment.
        let recorded = if len == 1 {
            ShipPlacement::new(Orientation::Horizontal, placement.y, placement.x)
        } else {
            placement
        };
        placements.push(recorded);

        match place_recursive(board, ships, idx + 1, placements, rng, calls, limit) {
            Ok(true) => return Ok(true),
            Ok(false) => {
                placements.pop();
                clear_cells(board, &cells);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(false)
}

fn write_occupied(board: &mut Board, cells: &[(usize, usize)]) {
    for &(y, x) in cells {
        board.set(y, x, crate::cell::CellState::Occ);
    }
}

fn clear_cells(board: &mut Board, cells: &[(usize, usize)]) {
    for &(y, x) in cells {
        board.set(y, x, crate::cell::CellState::Undef);
    }
}

/// Every placement of a ship of length `len` that fits on the board
/// without overlapping or touching an already-placed ship.
///
/// Length-1 ships are geometrically orientation-less (the canonical
/// orientation is `Horizontal`), but this enumerates both `Horizontal`
/// and `Vertical` candidates at every single-cell position regardless of
/// `len`, rather than special-casing `len == 1` down to one entry. For
/// `len == 1` this means every open cell appears twice in the candidate
/// list, double-weighting it in the random draw below — kept as an
/// intentional quirk rather than fixed, since it only perturbs the
/// already-approximate "uniform" sampling of singleton placement (see
/// DESIGN.md).
fn candidate_placements(board: &Board, len: usize) -> Vec<ShipPlacement> {
    let mut out = Vec::new();
    let h = board.h();
    let w = board.w();

    if w >= len {
        for y in 0..h {
            for x in 0..=(w - len) {
                let p = ShipPlacement::new(Orientation::Horizontal, y, x);
                if valid_placement(board, p, len) {
                    out.push(p);
                }
            }
        }
    }
    if h >= len {
        for y in 0..=(h - len) {
            for x in 0..w {
                let p = ShipPlacement::new(Orientation::Vertical, y, x);
                if valid_placement(board, p, len) {
                    out.push(p);
                }
            }
        }
    }
    out
}

fn valid_placement(board: &Board, placement: ShipPlacement, len: usize) -> bool {
    let cells = placement.cells(len);
    for &(y, x) in &cells {
        if board.get(y, x).is_occupied() {
            return false;
        }
    }
    for &(y, x) in &cells {
        for (ny, nx, state) in board.neighbors(y, x) {
            if state.is_occupied() && !cells.contains(&(ny, nx)) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::StdPuzzleRng;

    #[test]
    fn places_every_ship_without_touching() {
        let mut rng = StdPuzzleRng::from_seed(7);
        let ships = vec![3, 2, 2, 1];
        let solution = place_random(6, 6, &ships, &mut rng, 10_000).unwrap();
        assert_eq!(solution.placements.len(), ships.len());

        let board = solution.to_board(&crate::clues::Clues {
            h: 6,
            w: 6,
            ships: ships.clone(),
            rows: vec![None; 6],
            cols: vec![None; 6],
            init: Board::new(6, 6),
        });
        let occupied: Vec<(usize, usize)> = (0..6)
            .flat_map(|y| (0..6).map(move |x| (y, x)))
            .filter(|&(y, x)| board.get(y, x).is_occupied())
            .collect();
        for &(y, x) in &occupied {
            for (ny, nx, state) in board.neighbors(y, x) {
                if !occupied.contains(&(ny, nx)) {
                    assert!(!state.is_occupied(), "touching ships at ({y},{x})-({ny},{nx})");
                }
            }
        }
        assert_eq!(occupied.len(), ships.iter().sum::<usize>());
    }

    #[test]
    fn singleton_candidates_are_recorded_horizontal() {
        let board = Board::new(3, 3);
        let candidates = candidate_placements(&board, 1);
        // Preserved quirk: both orientations enumerated at every cell.
        assert_eq!(candidates.len(), 18);
        let mut rng = StdPuzzleRng::from_seed(1);
        let solution = place_random(3, 3, &[1], &mut rng, 1_000).unwrap();
        assert_eq!(solution.placements[0].orientation, Orientation::Horizontal);
    }
}
