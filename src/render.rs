//! Plain-ASCII maze rendering (spec §4.7): each cell is drawn as a single
//! marker character flanked by wall segments, with `|`/`-` drawn wherever
//! the shared side between two cells is closed. Polling-based, not
//! frame-synced — a live render may catch a worker mid-move, matching the
//! ~5ms poll artefact the original visualiser documents rather than hides
//! (spec §9).

use crate::direction::{Coord, Direction};
use crate::grid::Matrix;
use crate::maze::MazeView;
use crate::solver::WorkerSlot;

/// Renders `maze` as ASCII line-art, with no path or worker overlay.
pub fn render_maze(maze: &impl MazeView) -> String {
    render(maze, &[], None, &[])
}

/// Renders `maze` with `path` drawn as `*` over each cell it passes through.
pub fn render_solution(maze: &impl MazeView, path: &[Coord]) -> String {
    render(maze, path, None, &[])
}

/// Renders `maze` with every visited cell marked `.`, for showing the
/// explored set when no solution was found.
pub fn render_explored(maze: &impl MazeView, explored: &Matrix<bool>) -> String {
    render(maze, &[], Some(explored), &[])
}

/// Renders `maze` with live worker positions overlaid as the worker's id
/// (mod 10), for a polling visualisation loop.
pub fn render_live(maze: &impl MazeView, worker_positions: &[WorkerSlot]) -> String {
    render(maze, &[], None, worker_positions)
}

fn render(maze: &impl MazeView, path: &[Coord], explored: Option<&Matrix<bool>>, workers: &[WorkerSlot]) -> String {
    let (width, height) = maze.dimensions();
    let goal = maze.goal();
    let mut out = String::with_capacity((4 * width + 2) * (2 * height + 1));

    let horizontal_border = |out: &mut String| {
        for _ in 0..width {
            out.push_str("+--");
        }
        out.push_str("+\n");
    };

    horizontal_border(&mut out);

    for y in 0..height {
        out.push('|');
        for x in 0..width {
            let pos = Coord::new(x, y);
            let open = maze.open_directions_at(pos);
            out.push(' ');
            out.push(cell_marker(pos, goal, path, explored, workers));
            out.push(' ');
            out.push(if open.contains(Direction::EAST) { ' ' } else { '|' });
        }
        out.push('\n');

        out.push('+');
        for x in 0..width {
            let south_open = maze.open_directions_at(Coord::new(x, y)).contains(Direction::SOUTH);
            out.push_str(if south_open { "   " } else { "---" });
            out.push('+');
        }
        out.push('\n');
    }

    out
}

fn cell_marker(
    pos: Coord,
    goal: Coord,
    path: &[Coord],
    explored: Option<&Matrix<bool>>,
    workers: &[WorkerSlot],
) -> char {
    if let Some(id) = workers.iter().position(|w| w.is_active && w.position == pos) {
        return char::from_digit((id % 10) as u32, 10).unwrap_or('@');
    }
    if pos == Coord::new(0, 0) {
        'S'
    } else if pos == goal {
        'G'
    } else if path.contains(&pos) {
        '*'
    } else if explored.is_some_and(|e| e[pos]) {
        '.'
    } else {
        ' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Maze;

    #[test]
    fn render_marks_start_and_goal() {
        let maze = Maze::empty(2, 2);
        let text = render_maze(&maze);
        assert!(text.contains('S'));
        assert!(text.contains('G'));
    }

    #[test]
    fn render_solution_marks_path_cells() {
        let mut maze = Maze::empty(2, 1);
        maze.carve(Coord::new(0, 0), Direction::EAST);
        let path = vec![Coord::new(0, 0), Coord::new(1, 0)];
        let text = render_solution(&maze, &path);
        assert!(text.contains('S'));
        assert!(text.contains('*'));
    }

    #[test]
    fn render_live_shows_active_worker_as_digit() {
        let maze = Maze::empty(3, 3);
        let workers = vec![WorkerSlot { position: Coord::new(1, 1), is_active: true }];
        let text = render_live(&maze, &workers);
        assert!(text.contains('0'));
    }

    #[test]
    fn render_explored_marks_visited_cells() {
        let maze = Maze::empty(2, 2);
        let mut explored = Matrix::new_default(2, 2, false);
        explored[Coord::new(1, 0)] = true;
        let text = render_explored(&maze, &explored);
        assert!(text.contains('.'));
    }
}
