//! # Othello Corners Library
//!
//! This library models Othello (Reversi) positions and recasts them as search problems
//! whose goal is to get pieces onto the board's corners.
//!
//! It is used by two binaries:
//! - `corner_search`: Builds or loads a starting board, then runs breadth-first,
//!   depth-first, uniform-cost and A* searches towards a one, two or four corner goal.
//! - `method_comparison`: Runs every search method over a batch of seeded random
//!   boards and reports average path lengths and expansions.
//!
//! ## Modules
//! - `engine`: Board representation (`Board`, `Position`, `Side`), immutable game
//!   states (`GameState`) with legal-move generation, capture resolution, corner goals,
//!   ASCII rendering and seeded random boards.
//! - `problem`: The `SearchProblem` contract and `OthelloSearchProblem`.
//! - `solver`: Graph search over any `SearchProblem`.
//! - `heuristics`: Corner-distance heuristics for A*.
//! - `methods`: The named search methods the binaries choose from.
//! - `utils`: Conversion between text rows and position-to-label maps.
//! - `error`: Error types.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod methods;
pub mod problem;
pub mod solver;
pub mod utils;
