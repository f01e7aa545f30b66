//! Per-cell state of a Battleships board.
//!
//! A small `Copy` enum that drives every rule in the engine, plus a
//! partial order so promotions ("this cell is occupied" -> "this cell is
//! specifically a north-pointing ship end") can be expressed as "raise,
//! never lower".

use std::fmt;

/// The state of a single grid cell.
///
/// `N`/`E`/`S`/`W` name the direction the ship's *end triangle* points,
/// i.e. `N` means the ship extends downward from this cell (away from the
/// arrow). `One` is a length-1 ship occupying a single cell on its own.
/// `Inner` is an interior cell of a ship of length >= 3.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum CellState {
    /// Unknown.
    Undef,
    /// Known empty.
    Vacant,
    /// Known occupied, subtype not yet determined.
    Occ,
    /// Ship end, pointing up (ship extends downward).
    N,
    /// Ship end, pointing right (ship extends leftward).
    E,
    /// Ship end, pointing down (ship extends upward).
    S,
    /// Ship end, pointing left (ship extends rightward).
    W,
    /// A singleton (length-1) ship.
    One,
    /// Interior cell of a ship of length >= 3.
    Inner,
}

impl CellState {
    /// True for any variant other than `Undef`/`Vacant`, i.e. the cell is
    /// known to hold part of a ship.
    pub fn is_occupied(self) -> bool {
        !matches!(self, CellState::Undef | CellState::Vacant)
    }

    /// True for a fully-typed occupied cell (everything but the generic
    /// `Occ` placeholder).
    pub fn is_typed(self) -> bool {
        matches!(
            self,
            CellState::N
                | CellState::E
                | CellState::S
                | CellState::W
                | CellState::One
                | CellState::Inner
        )
    }

    /// Rank used by the "never demote" promotion rule: `Vacant < Occ <
    /// {N,E,S,W,One,Inner}`. `Undef` has no defined rank relative to
    /// `Vacant`/`Occ` — callers must not compare it this way.
    fn occ_rank(self) -> u8 {
        match self {
            CellState::Undef => 0,
            CellState::Vacant => 0,
            CellState::Occ => 1,
            CellState::N
            | CellState::E
            | CellState::S
            | CellState::W
            | CellState::One
            | CellState::Inner => 2,
        }
    }

    /// Would writing `new` into a cell currently holding `self` be a
    /// promotion (or no-op), as opposed to a demotion? A write that would
    /// lower a cell's state is suppressed.
    pub fn admits_promotion_to(self, new: CellState) -> bool {
        if self == CellState::Undef {
            return true;
        }
        if self == new {
            return true;
        }
        // Vacant can never become occupied-typed via promotion, and vice
        // versa; only ranks within the occupied ladder promote upward.
        match (self, new) {
            (CellState::Vacant, CellState::Vacant) => true,
            (CellState::Vacant, _) => false,
            (_, CellState::Vacant) => false,
            (_, CellState::Undef) => false,
            _ => new.occ_rank() >= self.occ_rank(),
        }
    }

    /// Single-character rendering, used by the demo binary and tests.
    /// `.`=Vacant, `#`=Occ, `^v<>`=N/S/W/E ends, `o`=One, `x`=Inner,
    /// `?`=Undef.
    pub fn rep(self) -> char {
        match self {
            CellState::Undef => '?',
            CellState::Vacant => '.',
            CellState::Occ => '#',
            CellState::N => '^',
            CellState::S => 'v',
            CellState::W => '<',
            CellState::E => '>',
            CellState::One => 'o',
            CellState::Inner => 'x',
        }
    }

    /// Parse the single-character rendering produced by [`CellState::rep`].
    pub fn from_rep(c: char) -> Option<CellState> {
        Some(match c {
            '?' => CellState::Undef,
            '.' => CellState::Vacant,
            '#' => CellState::Occ,
            '^' => CellState::N,
            'v' => CellState::S,
            '<' => CellState::W,
            '>' => CellState::E,
            'o' => CellState::One,
            'x' => CellState::Inner,
            _ => return None,
        })
    }

    /// The wire-protocol state code (`z<int>`): -1 = Vacant, 0 = Occ,
    /// 1..4 = N/E/S/W, 5 = One, 6 = Inner. `Undef` has no code: it is
    /// never a disclosed cell.
    pub fn to_code(self) -> Option<i32> {
        Some(match self {
            CellState::Undef => return None,
            CellState::Vacant => -1,
            CellState::Occ => 0,
            CellState::N => 1,
            CellState::E => 2,
            CellState::S => 3,
            CellState::W => 4,
            CellState::One => 5,
            CellState::Inner => 6,
        })
    }

    /// Inverse of [`CellState::to_code`].
    pub fn from_code(code: i32) -> Option<CellState> {
        Some(match code {
            -1 => CellState::Vacant,
            0 => CellState::Occ,
            1 => CellState::N,
            2 => CellState::E,
            3 => CellState::S,
            4 => CellState::W,
            5 => CellState::One,
            6 => CellState::Inner,
            _ => return None,
        })
    }
}

impl Default for CellState {
    fn default() -> Self {
        CellState::Undef
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rep())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_is_monotone() {
        assert!(CellState::Occ.admits_promotion_to(CellState::N));
        assert!(!CellState::N.admits_promotion_to(CellState::Occ));
        assert!(CellState::Undef.admits_promotion_to(CellState::Vacant));
        assert!(!CellState::Vacant.admits_promotion_to(CellState::Occ));
        assert!(!CellState::Occ.admits_promotion_to(CellState::Vacant));
    }

    #[test]
    fn rep_roundtrips() {
        for state in [
            CellState::Undef,
            CellState::Vacant,
            CellState::Occ,
            CellState::N,
            CellState::E,
            CellState::S,
            CellState::W,
            CellState::One,
            CellState::Inner,
        ] {
            assert_eq!(CellState::from_rep(state.rep()), Some(state));
            if let Some(code) = state.to_code() {
                assert_eq!(CellState::from_code(code), Some(state));
            }
        }
    }
}
