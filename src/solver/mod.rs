//! The concurrent solver: shared state, the per-worker state machine, and
//! the driver that spawns workers and reconstructs the solution path.

mod driver;
mod state;
mod worker;

pub use driver::{solve, Solution};
pub use state::WorkerSlot;
