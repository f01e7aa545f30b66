//! Typed errors for the two places the engine rejects input:
//! `Parameters`/description-string validation, and the exhaustive solver's
//! tagged outcomes. Derived with `thiserror` rather than a hand-rolled
//! `impl Error`.

use crate::clues::Solution;
use thiserror::Error;

/// Rejects a `Parameters` value or a malformed puzzle/move description
/// string. `Display` renders the human-readable message the host shows
/// verbatim.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ClueError {
    #[error("grid dimension {0} out of range 7..=25")]
    DimensionOutOfRange(usize),

    #[error("difficulty {0} out of range 0..=3")]
    DifficultyOutOfRange(i32),

    #[error("tag '{tag}' at position {pos} has no digits following it")]
    MissingDigits { tag: char, pos: usize },

    #[error("tag '{tag}' at position {pos} has an integer too large to represent")]
    IntegerTooLarge { tag: char, pos: usize },

    #[error("ship length {0} out of range 1..={max}", max = .1)]
    ShipLengthOutOfRange(i64, usize),

    #[error("row total {0} out of range -1..={w}", w = .1)]
    RowTotalOutOfRange(i64, usize),

    #[error("column total {0} out of range -1..={h}", h = .1)]
    ColTotalOutOfRange(i64, usize),

    #[error("disclosed cell state code {0} out of range -1..=6")]
    StateCodeOutOfRange(i64),

    #[error("expected {expected} row totals, found {found}")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("expected {expected} column totals, found {found}")]
    ColCountMismatch { expected: usize, found: usize },

    #[error("disclosure is missing its '{0}' component")]
    DisclosureArityMismatch(char),

    #[error("disclosed cell ({y}, {x}) is out of bounds for a {h}x{w} grid")]
    DisclosureOutOfBounds { y: i64, x: i64, h: usize, w: usize },

    #[error("total ship count must be at least 1, found {0}")]
    NoShips(usize),

    #[error("move token '{0}' is not recognized in this context")]
    UnrecognizedMove(char),
}

/// Outcome of the exhaustive solver: `Ok(Solution)` on a unique solve, one
/// of these tagged failures otherwise. `LimitExceeded` is used only
/// internally during generation and is never surfaced to the host.
#[derive(Debug, Error, Clone)]
pub enum SolveError {
    /// The caller-supplied recursive-call budget was exhausted before a
    /// verdict was reached.
    #[error("recursive call limit exceeded")]
    LimitExceeded,

    /// No arrangement of ships satisfies the clues.
    #[error("no solution exists")]
    NoSolution,

    /// More than one arrangement satisfies the clues; both witnesses are
    /// retained so the generator can pick a disambiguating disclosure.
    #[error("multiple solutions exist")]
    NonUnique {
        first: Box<Solution>,
        second: Box<Solution>,
    },
}
