//! The per-worker exploration state machine (spec §4.3): an Idle/Exploring
//! loop that claims cells under the region lock grid, enumerates unexplored
//! exits, and either continues locally or defers branches to the
//! bifurcation queue.

use std::thread;
use std::time::Duration;

use crate::direction::{Coord, Direction, DirectionMask};
use crate::exploration::TileGuard;
use crate::maze::MazeView;
use crate::queue::{Bifurcation, PopOutcome};

use super::state::SolverState;

enum Substate {
    Idle,
    Exploring { pos: Coord, entry: Option<Direction> },
}

/// Runs one worker's main loop to completion (success, shutdown, or this
/// worker going idle permanently at quiescence).
///
/// Worker 0 starts Exploring at `(0, 0)` with no predecessor; every other
/// worker starts Idle (spec §4.3 "Startup").
pub fn run<M: MazeView>(state: &SolverState<'_, M>, worker_id: usize) {
    let mut substate = if worker_id == 0 {
        state.queue.enter_exploring();
        state.mark_worker_active_at(worker_id, Coord::new(0, 0));
        Substate::Exploring { pos: Coord::new(0, 0), entry: None }
    } else {
        Substate::Idle
    };

    let mut held_lock: Option<TileGuard<'_>> = None;

    loop {
        // Step 1: termination check (spec §4.3.1).
        if state.queue.should_terminate() {
            if matches!(substate, Substate::Exploring { .. }) {
                state.queue.leave_exploring();
                state.mark_worker_inactive(worker_id);
            }
            break;
        }

        // Step 2: if Idle, wait for a bifurcation (or termination).
        let (pos, entry) = match substate {
            Substate::Idle => match state.queue.pop() {
                PopOutcome::Terminate => break,
                PopOutcome::Work(Bifurcation { position, came_from }) => {
                    state.queue.enter_exploring();
                    state.mark_worker_active_at(worker_id, position);
                    (position, Some(came_from))
                }
            },
            Substate::Exploring { pos, entry } => (pos, entry),
        };

        // Step 3: acquire the region lock for `pos`, releasing the
        // previously held one first if it covers a different tile.
        if held_lock.as_ref().map_or(true, |g| !state.exploration.covers(g, pos)) {
            held_lock = None;
            held_lock = Some(state.exploration.acquire(pos));
        }

        // Step 4: claim check.
        let already_visited = state.exploration.is_visited(held_lock.as_ref().expect("lock just acquired"), pos);
        if already_visited {
            held_lock = None;
            state.queue.leave_exploring();
            state.mark_worker_inactive(worker_id);
            substate = Substate::Idle;
            continue;
        }
        state.exploration.mark_visited(held_lock.as_ref().expect("lock held"), pos, entry);

        // Step 5: goal check.
        if pos == state.goal() {
            held_lock = None;
            state.mark_worker_inactive(worker_id);
            state.queue.declare_solution_found();
            break;
        }

        // Step 6: enumerate unexplored exits.
        let unexplored = unexplored_exits(state, pos);

        // Step 7: dispatch on |D|.
        substate = match unexplored.len() {
            0 => {
                held_lock = None;
                state.queue.leave_exploring();
                state.mark_worker_inactive(worker_id);
                Substate::Idle
            }
            1 => {
                let dir = unexplored.first().expect("len == 1");
                let (w, h) = state.maze().dimensions();
                let next = dir.step(pos, w, h).expect("open direction stays in bounds");
                advance_locally(state, worker_id, next);
                Substate::Exploring { pos: next, entry: Some(dir.opposite()) }
            }
            _ => {
                let (w, h) = state.maze().dimensions();
                let local_choice = unexplored.first().expect("len >= 2");
                for dir in unexplored.iter().filter(|d| *d != local_choice) {
                    let branch_pos = dir.step(pos, w, h).expect("open direction stays in bounds");
                    state.queue.push(Bifurcation { position: branch_pos, came_from: dir.opposite() });
                }
                let next = local_choice.step(pos, w, h).expect("open direction stays in bounds");
                advance_locally(state, worker_id, next);
                Substate::Exploring { pos: next, entry: Some(local_choice.opposite()) }
            }
        };
    }
}

/// Reads the set of `pos`'s open directions whose neighbour is not yet
/// visited, per the hint-read contract of spec §4.1/§4.3 step 6: this is
/// read while holding only `pos`'s tile lock, never the neighbour's.
fn unexplored_exits<M: MazeView>(state: &SolverState<'_, M>, pos: Coord) -> DirectionMask {
    let (w, h) = state.maze().dimensions();
    let open = state.maze().open_directions_at(pos);
    open.iter()
        .filter(|d| {
            d.step(pos, w, h).map(|n| !state.exploration.is_visited_hint(n)).unwrap_or(false)
        })
        .collect()
}

/// Updates the visualiser's record of this worker's position and, if
/// visualisation is enabled, sleeps for the configured step delay. Spec §9
/// notes this couples the sleep to the logic path only when visualisation
/// is on; with it off, workers never sleep.
fn advance_locally<M: MazeView>(state: &SolverState<'_, M>, worker_id: usize, next: Coord) {
    if state.enable_viz() {
        state.update_worker_position(worker_id, next);
        if state.speed_us > 0 {
            thread::sleep(Duration::from_micros(state.speed_us as u64));
        }
    }
}
