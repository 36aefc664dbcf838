//! The solver driver: validates configuration, spawns `workers` worker
//! threads via a scoped thread pool, joins them, then reconstructs the
//! path (spec §2.7, §4.5, §6).

use std::thread;

use crate::direction::Coord;
use crate::error::MazeError;
use crate::grid::Matrix;
use crate::maze::MazeView;

use super::state::SolverState;
use super::worker;

/// The outcome of a [`solve`] call.
#[derive(Debug, Clone)]
pub struct Solution {
    pub found: bool,
    pub path: Option<Vec<Coord>>,
    /// A snapshot of every cell a worker visited, for rendering the
    /// explored set when no solution was found (spec §4.9).
    pub explored: Matrix<bool>,
}

/// Solves `maze` with a pool of `workers` cooperating threads.
///
/// `enable_viz` turns on the worker-position bookkeeping described in spec
/// §6 (and, when on, makes each local move sleep `speed_us` microseconds —
/// spec §9's open question on coupling animation speed to worker logic is
/// resolved by only paying that cost when visualisation is actually
/// enabled). With `enable_viz` off, `speed_us` is ignored and workers never
/// sleep.
pub fn solve<M>(maze: &M, workers: usize, enable_viz: bool, speed_us: u32) -> Result<Solution, MazeError>
where
    M: MazeView + Sync,
{
    let (width, height) = maze.dimensions();
    validate_config(workers, width, height)?;

    tracing::info!(workers, width, height, "starting maze solver");

    let state = SolverState::new(maze, workers, enable_viz, speed_us);

    thread::scope(|scope| {
        for worker_id in 0..workers {
            let state = &state;
            scope.spawn(move || worker::run(state, worker_id));
        }
    });

    let explored = state.exploration.visited_snapshot();

    if state.queue.solution_found() {
        let path = reconstruct_path(&state)?;
        tracing::info!(path_len = path.len(), "solution found");
        Ok(Solution { found: true, path: Some(path), explored })
    } else {
        tracing::info!("no solution: exploration reached quiescence");
        Ok(Solution { found: false, path: None, explored })
    }
}

fn validate_config(workers: usize, width: usize, height: usize) -> Result<(), MazeError> {
    if !(1..=64).contains(&workers) {
        return Err(MazeError::InvalidConfig { reason: format!("workers must be in [1, 64], got {workers}") });
    }
    if width == 0 || height == 0 {
        return Err(MazeError::InvalidConfig {
            reason: format!("maze dimensions must be non-zero, got {width}x{height}"),
        });
    }
    Ok(())
}

/// Walks the `came_from` tree from the goal back to the start (spec §4.5).
///
/// Terminates in at most `width * height` steps if the exploration tree is
/// well-formed (invariant I2); a non-start cell with no recorded
/// `came_from` is treated as a fatal internal error, as is exceeding that
/// step bound (which can only happen if the tree contains a cycle).
fn reconstruct_path<M: MazeView>(state: &SolverState<'_, M>) -> Result<Vec<Coord>, MazeError> {
    let start = Coord::new(0, 0);
    let (width, height) = state.maze().dimensions();
    let bound = width * height;

    let mut path = vec![state.goal()];
    let mut current = state.goal();

    while current != start {
        if path.len() > bound {
            return Err(MazeError::MalformedTree { cell: (current.x, current.y) });
        }
        let dir = state
            .exploration
            .came_from_hint(current)
            .ok_or(MazeError::MalformedTree { cell: (current.x, current.y) })?;
        current = dir.step(current, width, height).ok_or(MazeError::MalformedTree { cell: (current.x, current.y) })?;
        path.push(current);
    }

    path.reverse();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::maze::Maze;

    #[test]
    fn rejects_too_few_workers() {
        let maze = Maze::empty(3, 3);
        let err = solve(&maze, 0, false, 0).unwrap_err();
        assert!(matches!(err, MazeError::InvalidConfig { .. }));
    }

    #[test]
    fn rejects_too_many_workers() {
        let maze = Maze::empty(3, 3);
        let err = solve(&maze, 65, false, 0).unwrap_err();
        assert!(matches!(err, MazeError::InvalidConfig { .. }));
    }

    #[test]
    fn rejects_zero_sized_maze() {
        let maze = Maze::empty(0, 5);
        let err = solve(&maze, 1, false, 0).unwrap_err();
        assert!(matches!(err, MazeError::InvalidConfig { .. }));
    }

    #[test]
    fn s1_single_cell_maze_starts_solved() {
        // spec §8 S1: 1x1 maze, start == goal, found=true, path=[(0,0)].
        let maze = Maze::empty(1, 1);
        let solution = solve(&maze, 1, false, 0).unwrap();
        assert!(solution.found);
        assert_eq!(solution.path.unwrap(), vec![Coord::new(0, 0)]);
    }

    #[test]
    fn s2_straight_corridor() {
        // spec §8 S2: 5x1 corridor, every cell linked E/W to its neighbour.
        let mut maze = Maze::empty(5, 1);
        for x in 0..4 {
            maze.carve(Coord::new(x, 0), Direction::EAST);
        }
        let solution = solve(&maze, 4, false, 0).unwrap();
        assert!(solution.found);
        let path = solution.path.unwrap();
        assert_eq!(
            path,
            vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0), Coord::new(3, 0), Coord::new(4, 0)]
        );
    }

    #[test]
    fn s3_small_branching_maze() {
        // spec §8 S3: 2x2, (0,0)<->(1,0) and (1,0)<->(1,1) open, else closed.
        let mut maze = Maze::empty(2, 2);
        maze.carve(Coord::new(0, 0), Direction::EAST);
        maze.carve(Coord::new(1, 0), Direction::SOUTH);
        let solution = solve(&maze, 2, false, 0).unwrap();
        assert!(solution.found);
        assert_eq!(solution.path.unwrap(), vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(1, 1)]);
    }
}
