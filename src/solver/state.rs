//! Solver state: the maze view, exploration map, bifurcation queue, goal,
//! and (optionally) the per-worker live-position slots used for
//! visualisation (spec §2.5, §6).

use parking_lot::Mutex;

use crate::direction::Coord;
use crate::exploration::ExplorationMap;
use crate::maze::MazeView;
use crate::queue::BifurcationQueue;

/// A worker's last-known position, as read by an external visualiser
/// polling under the viz lock (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSlot {
    pub position: Coord,
    pub is_active: bool,
}

/// Everything workers need shared by reference: immutable maze, mutable
/// exploration map, bifurcation queue, and (if enabled) the worker-position
/// slots for visualisation. Passed to all workers by reference — there is
/// no process-wide singleton (spec §9).
pub struct SolverState<'a, M: MazeView> {
    maze: &'a M,
    pub(crate) exploration: ExplorationMap,
    pub(crate) queue: BifurcationQueue,
    goal: Coord,
    worker_positions: Option<Mutex<Vec<WorkerSlot>>>,
    pub(crate) speed_us: u32,
}

impl<'a, M: MazeView> SolverState<'a, M> {
    pub fn new(maze: &'a M, num_workers: usize, enable_viz: bool, speed_us: u32) -> Self {
        let (w, h) = maze.dimensions();
        // Bifurcation queue capacity (spec §9 Open Question, resolved in
        // DESIGN.md): sized to the upper bound on live bifurcations rather
        // than the W*H/4 baseline, to eliminate the silent-drop path.
        let capacity = (w * h).max(1);

        SolverState {
            maze,
            exploration: ExplorationMap::new(w, h),
            queue: BifurcationQueue::new(capacity),
            goal: maze.goal(),
            worker_positions: enable_viz.then(|| {
                Mutex::new(vec![WorkerSlot { position: Coord::new(0, 0), is_active: false }; num_workers])
            }),
            speed_us,
        }
    }

    pub fn maze(&self) -> &'a M {
        self.maze
    }

    pub fn goal(&self) -> Coord {
        self.goal
    }

    pub fn enable_viz(&self) -> bool {
        self.worker_positions.is_some()
    }

    /// Idle→Exploring transition (spec §6's visualiser interface).
    pub fn mark_worker_active_at(&self, worker_id: usize, position: Coord) {
        if let Some(slots) = &self.worker_positions {
            slots.lock()[worker_id] = WorkerSlot { position, is_active: true };
        }
    }

    /// Called after every local move.
    pub fn update_worker_position(&self, worker_id: usize, position: Coord) {
        if let Some(slots) = &self.worker_positions {
            slots.lock()[worker_id].position = position;
        }
    }

    /// Exploring→Idle transition, or termination.
    pub fn mark_worker_inactive(&self, worker_id: usize) {
        if let Some(slots) = &self.worker_positions {
            slots.lock()[worker_id].is_active = false;
        }
    }

    /// A snapshot of all worker positions, for a visualiser to render.
    pub fn worker_positions_snapshot(&self) -> Vec<WorkerSlot> {
        self.worker_positions.as_ref().map(|slots| slots.lock().clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Maze;

    #[test]
    fn viz_slots_track_active_workers_when_enabled() {
        let maze = Maze::empty(4, 4);
        let state = SolverState::new(&maze, 2, true, 0);
        state.mark_worker_active_at(0, Coord::new(1, 1));
        let snapshot = state.worker_positions_snapshot();
        assert_eq!(snapshot[0], WorkerSlot { position: Coord::new(1, 1), is_active: true });
        assert!(!snapshot[1].is_active);

        state.mark_worker_inactive(0);
        assert!(!state.worker_positions_snapshot()[0].is_active);
    }

    #[test]
    fn viz_slots_stay_empty_when_disabled() {
        let maze = Maze::empty(4, 4);
        let state = SolverState::new(&maze, 2, false, 0);
        assert!(state.worker_positions_snapshot().is_empty());
    }
}
