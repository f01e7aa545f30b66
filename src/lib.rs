//! Engine for a Battleships logic puzzle on a rectangular grid: given
//! per-row/per-column occupancy totals (some possibly hidden), a declared
//! multiset of ship lengths, and a set of disclosed cells, reconstruct
//! the hidden arrangement of ships.
//!
//! Three tightly coupled subsystems make up the core: the exhaustive
//! solver ([`exhaustive_solver`], exact and uniqueness-proving), the
//! logical solver ([`logical_solver`], used to grade difficulty), and the
//! generator ([`generator`], which samples instances and tunes their
//! clue sets against both solvers). [`validator`] checks a player's board
//! independently of either solver; [`protocol`] is the host-facing wire
//! format for all four of them.

pub mod cell;
pub mod clues;
pub mod config;
pub mod error;
pub mod exhaustive_solver;
pub mod generator;
pub mod grid;
pub mod logical_solver;
pub mod propagator;
pub mod protocol;
pub mod random_placer;
pub mod rng;
pub mod validator;

pub use cell::CellState;
pub use clues::{Clues, Solution};
pub use config::Parameters;
pub use error::{ClueError, SolveError};
pub use generator::GeneratedPuzzle;
pub use grid::{Board, Orientation, ShipPlacement};
pub use logical_solver::{Difficulty, SolveStatus};
pub use validator::ValidationResult;
