//! Configuration / validation layer: `Parameters`, the generator's request
//! shape, and its `validate()`.
//!
//! There is no on-disk config file — the engine performs no I/O — so this
//! layer is a validated-construction type rather than a file loader.

use crate::error::ClueError;
use crate::logical_solver::Difficulty;

/// Minimum grid dimension accepted by the generator.
pub const MIN_DIM: usize = 7;
/// Maximum grid dimension accepted by the generator.
pub const MAX_DIM: usize = 25;

/// Request to generate a new puzzle: `{H, W, difficulty}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    pub h: usize,
    pub w: usize,
    pub difficulty: Difficulty,
}

impl Parameters {
    /// Validate `h`, `w` against `7..=25` and `difficulty_level` against
    /// `0..=3`. Returns the human-readable `ClueError` the host displays
    /// verbatim on rejection.
    pub fn validate(h: usize, w: usize, difficulty_level: i32) -> Result<Parameters, ClueError> {
        if !(MIN_DIM..=MAX_DIM).contains(&h) {
            return Err(ClueError::DimensionOutOfRange(h));
        }
        if !(MIN_DIM..=MAX_DIM).contains(&w) {
            return Err(ClueError::DimensionOutOfRange(w));
        }
        let difficulty = Difficulty::from_level(difficulty_level)
            .ok_or(ClueError::DifficultyOutOfRange(difficulty_level))?;
        Ok(Parameters { h, w, difficulty })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_dimension_out_of_range() {
        assert_eq!(
            Parameters::validate(6, 10, 0),
            Err(ClueError::DimensionOutOfRange(6))
        );
        assert_eq!(
            Parameters::validate(10, 26, 0),
            Err(ClueError::DimensionOutOfRange(26))
        );
    }

    #[test]
    fn rejects_difficulty_out_of_range() {
        assert_eq!(
            Parameters::validate(10, 10, 4),
            Err(ClueError::DifficultyOutOfRange(4))
        );
    }

    #[test]
    fn accepts_boundary_values() {
        let p = Parameters::validate(7, 25, 3).unwrap();
        assert_eq!(p.h, 7);
        assert_eq!(p.w, 25);
        assert_eq!(p.difficulty, Difficulty::Unreasonable);
    }
}
