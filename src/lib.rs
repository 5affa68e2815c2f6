//! A move-selection agent for the board game 'Connect 4'
//!
//! This agent runs an iterative-deepening minimax search with alpha-beta
//! pruning, ordering moves by a static "blocked lines" heuristic, and
//! returns the best column found before it is told to stop.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_alphabeta::{arrayboard::ArrayBoard, solver::{Solver, SolverConfig}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let config = SolverConfig {
//!     max_depth: Some(5),
//!     ..SolverConfig::default()
//! };
//! let mut solver = Solver::with_config(config)?;
//! let best_move = solver.select_move(&ArrayBoard::from_moves("112233")?)?;
//!
//! assert_eq!(best_move, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod arrayboard;

pub mod lines;

pub mod eval;

pub mod ordering;

pub mod tree;

pub mod cancel;

pub mod solver;

mod test;

pub use board::{Board, GameState, Player};
pub use cancel::CancelToken;
pub use solver::{Selection, Solver, SolverConfig};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of tiles in a row needed to win
pub const CONNECT: usize = 4;

// a winning line must fit on the board in every direction
const_assert!(CONNECT <= WIDTH && CONNECT <= HEIGHT);
// columns are parsed from single digits
const_assert!(WIDTH <= 9);
