//! Maze generation (recursive backtracker), used by the CLI's `solve`
//! subcommand to produce a maze to feed the solver, and by tests to build
//! deliberately unsolvable mazes (spec §8 S4/S6).

use turborand::rng::Rng;
use turborand::TurboRand;

use crate::direction::{Coord, Direction};
use crate::maze::{Maze, MazeView};

impl Maze {
    /// Carves a perfect maze (every cell reachable, no cycles) over a
    /// `width x height` grid using randomized depth-first backtracking,
    /// seeded for reproducibility.
    pub fn generate(width: usize, height: usize, seed: u64) -> Maze {
        let rng = Rng::with_seed(seed);
        let mut maze = Maze::empty(width, height);
        carve_from(&mut maze, &rng, Coord::new(0, 0));
        maze
    }

    /// Like [`Maze::generate`], but reserves a rectangular island in the
    /// interior that is carved as its own connected perfect maze with no
    /// passage linking it to the rest of the grid — producing a maze with no
    /// path from `(0, 0)` to the goal, for testing quiescence-without-a-
    /// solution (spec §8 S6).
    pub fn generate_with_island(width: usize, height: usize, seed: u64) -> Maze {
        let rng = Rng::with_seed(seed);
        let mut maze = Maze::empty(width, height);

        let goal = maze.goal();
        let island_w = (width / 2).max(1);
        let island_h = (height / 2).max(1);
        let island_x0 = width - island_w;
        let island_y0 = height - island_h;

        let in_island = |c: Coord| c.x >= island_x0 && c.y >= island_y0;

        carve_region(&mut maze, &rng, Coord::new(0, 0), |c| !in_island(c));
        carve_region(&mut maze, &rng, goal, in_island);
        maze
    }
}

/// Recursive backtracker restricted to cells for which `allowed` holds,
/// rooted at `start`. Uses an explicit stack rather than true recursion, in
/// the style of [`j-markiewicz-maze`'s `gen_maze`]: push the current cell,
/// advance to a random unvisited neighbour, and backtrack by popping when
/// none remain.
fn carve_region(maze: &mut Maze, rng: &Rng, start: Coord, allowed: impl Fn(Coord) -> bool) {
    let (width, height) = maze.dimensions();
    let mut visited = vec![false; width * height];
    let index = |c: Coord| c.y * width + c.x;

    let mut stack = vec![start];
    visited[index(start)] = true;

    while let Some(&pos) = stack.last() {
        let candidates: Vec<(Direction, Coord)> = Direction::ORDER
            .iter()
            .filter_map(|&d| d.step(pos, width, height).map(|n| (d, n)))
            .filter(|&(_, n)| allowed(n) && !visited[index(n)])
            .collect();

        match rng.sample(&candidates) {
            Some(&(dir, next)) => {
                maze.carve(pos, dir);
                visited[index(next)] = true;
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }
}

fn carve_from(maze: &mut Maze, rng: &Rng, start: Coord) {
    carve_region(maze, rng, start, |_| true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_is_deterministic_for_a_fixed_seed() {
        let a = Maze::generate(10, 10, 42);
        let b = Maze::generate(10, 10, 42);
        for y in 0..10 {
            for x in 0..10 {
                let coord = Coord::new(x, y);
                assert_eq!(a.open_directions_at(coord).bits(), b.open_directions_at(coord).bits());
            }
        }
    }

    #[test]
    fn generate_reaches_every_cell() {
        let maze = Maze::generate(6, 6, 7);
        let reached = flood_fill(&maze, Coord::new(0, 0));
        assert_eq!(reached, 36);
    }

    #[test]
    fn island_maze_is_not_fully_connected() {
        let maze = Maze::generate_with_island(8, 8, 3);
        let reached = flood_fill(&maze, Coord::new(0, 0));
        assert!(reached < 64, "expected the island to be unreachable, reached {reached} cells");
    }

    fn flood_fill(maze: &Maze, start: Coord) -> usize {
        let (w, h) = maze.dimensions();
        let mut seen = vec![false; w * h];
        let idx = |c: Coord| c.y * w + c.x;
        let mut stack = vec![start];
        seen[idx(start)] = true;
        let mut count = 0;
        while let Some(pos) = stack.pop() {
            count += 1;
            for dir in maze.open_directions_at(pos).iter() {
                if let Some(next) = dir.step(pos, w, h) {
                    if !seen[idx(next)] {
                        seen[idx(next)] = true;
                        stack.push(next);
                    }
                }
            }
        }
        count
    }
}
