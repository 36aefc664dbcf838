//! A concurrent grid maze solver: a pool of worker threads explores a maze
//! in parallel via distributed depth-first search, synchronized by a
//! region-locked exploration map and a bounded bifurcation queue.

pub mod cli;
pub mod direction;
pub mod error;
pub mod exploration;
pub mod generate;
pub mod grid;
pub mod maze;
pub mod queue;
pub mod render;
pub mod solver;

pub use direction::{Coord, Direction, DirectionMask};
pub use error::MazeError;
pub use maze::{Maze, MazeView};
pub use solver::{solve, Solution};
