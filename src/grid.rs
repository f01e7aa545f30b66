//! Grid primitives: the `Board` scratch grid, ship-end direction offsets,
//! row/column line iteration, and the completed-ships scanner.
//!
//! `Board` is a flat `Vec<CellState>` indexed by `iy * width + ix` with
//! bounds-checked accessors. [`Direction`] factors the four ship-end
//! orientations into one offset table, and [`Axis`] factors row/column
//! scans into one line-iteration helper instead of duplicated code for
//! each direction.

use crate::cell::CellState;

/// A ship's orientation. Length-1 ships are always recorded as
/// `Horizontal`, the canonical orientation for singletons.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// `(orientation, y, x)` giving a ship's top-left cell.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ShipPlacement {
    pub orientation: Orientation,
    pub y: usize,
    pub x: usize,
}

impl ShipPlacement {
    pub fn new(orientation: Orientation, y: usize, x: usize) -> Self {
        ShipPlacement { orientation, y, x }
    }

    /// The cells a ship of `len` placed here occupies, in order from the
    /// placement's top-left cell.
    pub fn cells(&self, len: usize) -> Vec<(usize, usize)> {
        (0..len)
            .map(|i| match self.orientation {
                Orientation::Horizontal => (self.y, self.x + i),
                Orientation::Vertical => (self.y + i, self.x),
            })
            .collect()
    }

    /// The fully-typed `(y, x, state)` triples for a ship of `len` placed
    /// here: `N`/`W` at the head, `S`/`E` at the tail, `Inner` in between,
    /// or a single `One` when `len == 1`. Shared by the `Solution`
    /// renderer and the exhaustive solver's placement validity check.
    pub fn cell_states(&self, len: usize) -> Vec<(usize, usize, CellState)> {
        let cells = self.cells(len);
        if len == 1 {
            let (y, x) = cells[0];
            return vec![(y, x, CellState::One)];
        }
        cells
            .iter()
            .enumerate()
            .map(|(i, &(y, x))| {
                let state = if i == 0 {
                    match self.orientation {
                        Orientation::Horizontal => CellState::W,
                        Orientation::Vertical => CellState::N,
                    }
                } else if i == len - 1 {
                    match self.orientation {
                        Orientation::Horizontal => CellState::E,
                        Orientation::Vertical => CellState::S,
                    }
                } else {
                    CellState::Inner
                };
                (y, x, state)
            })
            .collect()
    }
}

/// Which way a ship-end triangle points. The arrow points *away* from the
/// ship body, e.g. `N` means the triangle points up and the ship's body
/// extends downward from the cell.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    N,
    E,
    S,
    W,
}

impl Direction {
    /// Offset (dy, dx) of the one neighbor the ship's body extends into —
    /// the cell that must become at least `Occ`.
    pub fn body_offset(self) -> (i32, i32) {
        match self {
            Direction::N => (1, 0),
            Direction::S => (-1, 0),
            Direction::E => (0, -1),
            Direction::W => (0, 1),
        }
    }

    pub fn end_state(self) -> CellState {
        match self {
            Direction::N => CellState::N,
            Direction::E => CellState::E,
            Direction::S => CellState::S,
            Direction::W => CellState::W,
        }
    }
}

/// All eight Chebyshev-adjacent offsets, in a fixed order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The four purely-diagonal offsets.
pub const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Row vs. column, used to write each counting/run rule once and apply it
/// under both axes (the spec's "mirror rule for columns").
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Axis {
    Row,
    Col,
}

/// H x W scratch grid of [`CellState`], used by every solver and the
/// validator. Mirrors the teacher's `Board`: flat storage, bounds-checked
/// accessors, row/column indexing helpers.
#[derive(Debug, Clone)]
pub struct Board {
    h: usize,
    w: usize,
    cells: Vec<CellState>,
}

impl Board {
    pub fn new(h: usize, w: usize) -> Self {
        Board {
            h,
            w,
            cells: vec![CellState::Undef; h * w],
        }
    }

    pub fn h(&self) -> usize {
        self.h
    }

    pub fn w(&self) -> usize {
        self.w
    }

    fn index(&self, y: usize, x: usize) -> usize {
        assert!(y < self.h && x < self.w, "cell ({y},{x}) out of bounds");
        y * self.w + x
    }

    pub fn get(&self, y: usize, x: usize) -> CellState {
        self.cells[self.index(y, x)]
    }

    pub fn set(&mut self, y: usize, x: usize, state: CellState) {
        let i = self.index(y, x);
        self.cells[i] = state;
    }

    /// Bounds-checked read for signed, possibly out-of-range coordinates;
    /// used by neighbour rules that look just past the border.
    pub fn get_signed(&self, y: i32, x: i32) -> Option<CellState> {
        if y < 0 || x < 0 || y as usize >= self.h || x as usize >= self.w {
            None
        } else {
            Some(self.get(y as usize, x as usize))
        }
    }

    pub fn in_bounds(&self, y: i32, x: i32) -> bool {
        y >= 0 && x >= 0 && (y as usize) < self.h && (x as usize) < self.w
    }

    /// Write `state` into `(y, x)` unless that would demote the cell.
    /// Returns whether the board actually changed, for fixed-point
    /// detection.
    pub fn promote(&mut self, y: usize, x: usize, state: CellState) -> bool {
        let current = self.get(y, x);
        if current == state {
            return false;
        }
        if !current.admits_promotion_to(state) {
            return false;
        }
        self.set(y, x, state);
        true
    }

    /// The 8 neighbors of `(y, x)` that lie on the board, as `(y, x, state)`.
    pub fn neighbors(&self, y: usize, x: usize) -> Vec<(usize, usize, CellState)> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dy, dx)| {
                let ny = y as i32 + dy;
                let nx = x as i32 + dx;
                self.get_signed(ny, nx).map(|s| (ny as usize, nx as usize, s))
            })
            .collect()
    }

    /// The coordinates of line `index` along `axis`, in increasing order.
    pub fn line(&self, axis: Axis, index: usize) -> Vec<(usize, usize)> {
        match axis {
            Axis::Row => (0..self.w).map(|x| (index, x)).collect(),
            Axis::Col => (0..self.h).map(|y| (y, index)).collect(),
        }
    }

    /// Number of lines along `axis` (rows: `h`; columns: `w`).
    pub fn line_count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.h,
            Axis::Col => self.w,
        }
    }

    /// A cheap rolling checksum over the whole board, used by the logical
    /// solver to detect "no further change" without diffing the whole
    /// grid on every rule application.
    pub fn checksum(&self) -> u32 {
        let mut acc: u32 = 2166136261; // FNV-1a offset basis
        for &cell in &self.cells {
            let tag = match cell {
                CellState::Undef => 0u8,
                CellState::Vacant => 1,
                CellState::Occ => 2,
                CellState::N => 3,
                CellState::E => 4,
                CellState::S => 5,
                CellState::W => 6,
                CellState::One => 7,
                CellState::Inner => 8,
            };
            acc ^= tag as u32;
            acc = acc.wrapping_mul(16777619); // FNV-1a prime
        }
        acc
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    pub fn vacant_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c == CellState::Vacant)
            .count()
    }

    /// Single-character rendering of the whole board (no hints), one row
    /// per line. Used by the demo binary and by tests encoding literal
    /// grids.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.h * (self.w + 1));
        for y in 0..self.h {
            for x in 0..self.w {
                out.push(self.get(y, x).rep());
            }
            out.push('\n');
        }
        out
    }

    /// Parse the format produced by [`Board::render`] (ignoring a trailing
    /// newline). Panics on malformed input; used only by tests.
    pub fn parse(h: usize, w: usize, text: &str) -> Board {
        let mut board = Board::new(h, w);
        for (y, line) in text.lines().enumerate() {
            for (x, c) in line.chars().enumerate() {
                let state = CellState::from_rep(c).unwrap_or_else(|| panic!("bad cell char {c:?}"));
                board.set(y, x, state);
            }
        }
        board
    }
}

/// Error from [`compl_ships_distr`]: an `Inner` run that never reaches its
/// terminating end cell, or a ship longer than `max_size`.
#[derive(Debug, PartialEq, Eq)]
pub struct ShipRunError;

/// Scan the board for completed ships: an `N` cell followed by `k`
/// `Inner` cells and then an `S` cell is a vertical ship of length `k+2`;
/// the horizontal analogue starts at `W` and ends at `E`; a standalone
/// `One` cell is a length-1 ship. Returns the count of completed ships
/// per length (`distr[len-1]`), indexed `1..=max_size`.
///
/// A run that is still growing (it trails off into `Undef` cells) is not
/// yet a *completed* ship and is silently skipped, since logical-solver
/// rules call this mid-solve, when most ships aren't finished yet. A run
/// that trails off the board edge, or into `Vacant`/another end cell
/// before reaching its terminator, is a structurally broken board and is
/// reported as an error.
pub fn compl_ships_distr(board: &Board, max_size: usize) -> Result<Vec<usize>, ShipRunError> {
    let mut distr = vec![0usize; max_size];
    let mut record = |distr: &mut Vec<usize>, len: usize| -> Result<(), ShipRunError> {
        if len == 0 || len > max_size {
            return Err(ShipRunError);
        }
        distr[len - 1] += 1;
        Ok(())
    };

    for y in 0..board.h() {
        for x in 0..board.w() {
            match board.get(y, x) {
                CellState::One => record(&mut distr, 1)?,
                CellState::N => {
                    if let Some(len) = scan_run(board, (y, x), (1, 0), CellState::S)? {
                        record(&mut distr, len)?;
                    }
                }
                CellState::W => {
                    if let Some(len) = scan_run(board, (y, x), (0, 1), CellState::E)? {
                        record(&mut distr, len)?;
                    }
                }
                _ => {}
            }
        }
    }
    Ok(distr)
}

/// Walk from `start` in direction `step`, counting `Inner` cells until
/// `terminator` is reached. `Ok(Some(len))` on a completed run,
/// `Ok(None)` if the run trails into `Undef` (still being determined),
/// `Err` if it falls off the board or hits a cell that can't belong to
/// this run.
fn scan_run(
    board: &Board,
    start: (usize, usize),
    step: (i32, i32),
    terminator: CellState,
) -> Result<Option<usize>, ShipRunError> {
    let mut len = 1usize;
    let mut y = start.0 as i32;
    let mut x = start.1 as i32;
    loop {
        y += step.0;
        x += step.1;
        let cell = board.get_signed(y, x).ok_or(ShipRunError)?;
        len += 1;
        if cell == terminator {
            return Ok(Some(len));
        }
        if cell == CellState::Undef {
            return Ok(None);
        }
        if cell != CellState::Inner {
            return Err(ShipRunError);
        }
        if len > board.h().max(board.w()) {
            // A well-formed board can never have a run longer than the
            // larger board dimension.
            return Err(ShipRunError);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_a_completed_vertical_ship() {
        // N at (0,1), Inner at (1,1),(2,1), S at (3,1), 5x5, rest Vacant.
        let mut board = Board::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                board.set(y, x, CellState::Vacant);
            }
        }
        board.set(0, 1, CellState::N);
        board.set(1, 1, CellState::Inner);
        board.set(2, 1, CellState::Inner);
        board.set(3, 1, CellState::S);

        let distr = compl_ships_distr(&board, 4).unwrap();
        assert_eq!(distr, vec![0, 0, 0, 1]);

        board.set(3, 1, CellState::Inner);
        assert!(compl_ships_distr(&board, 4).is_err());
    }

    #[test]
    fn promote_never_demotes() {
        let mut board = Board::new(3, 3);
        board.set(0, 0, CellState::N);
        assert!(!board.promote(0, 0, CellState::Occ));
        assert_eq!(board.get(0, 0), CellState::N);
        assert!(board.promote(1, 1, CellState::Occ));
        assert!(board.promote(1, 1, CellState::Inner));
        assert_eq!(board.get(1, 1), CellState::Inner);
    }
}
