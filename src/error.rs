//! Error types (spec §7): allocation failure, invalid configuration, and a
//! malformed exploration tree are the only error kinds the solver can
//! surface. An unsolvable maze is not an error — `solve` simply returns
//! `found: false`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MazeError {
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("malformed exploration tree at {cell:?}: visited but no came_from")]
    MalformedTree { cell: (usize, usize) },

    #[error("allocation failure: {0}")]
    Allocation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
