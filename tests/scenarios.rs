//! Concrete scenarios and universal invariants for the maze solver, run as
//! black-box integration tests against the public `maze_solver` API.

use maze_solver::direction::{Coord, Direction};
use maze_solver::maze::{Maze, MazeView};
use maze_solver::solve;

fn carve_many(maze: &mut Maze, edges: &[((usize, usize), Direction)]) {
    for &((x, y), dir) in edges {
        maze.carve(Coord::new(x, y), dir);
    }
}

/// S4: 3x3 disconnected maze. (0,0),(1,0),(0,1) form one component;
/// (2,2), the goal, is isolated. Expect `found = false` and the visited set
/// to be exactly the start's component.
#[test]
fn s4_disconnected_goal_is_unsolvable() {
    let mut maze = Maze::empty(3, 3);
    carve_many(
        &mut maze,
        &[((0, 0), Direction::EAST), ((0, 0), Direction::SOUTH)],
    );

    let solution = solve(&maze, 4, false, 0).unwrap();
    assert!(!solution.found);
    assert!(solution.path.is_none());

    for y in 0..3 {
        for x in 0..3 {
            let expected = matches!((x, y), (0, 0) | (1, 0) | (0, 1));
            assert_eq!(
                solution.explored[Coord::new(x, y)],
                expected,
                "mismatch at ({x}, {y})"
            );
        }
    }
}

/// S5: 4x4 maze with two disjoint paths from (0,0) to (3,3), of lengths 6
/// and 8 edges (7 and 9 cells). With N=2 workers, some path is found,
/// not necessarily the shorter one.
#[test]
fn s5_either_of_two_disjoint_paths_is_accepted() {
    // Path A (6 edges, 7 cells): right along the top row, down the right column.
    // (0,0)-(1,0)-(2,0)-(3,0)-(3,1)-(3,2)-(3,3)
    //
    // Path B (8 edges, 9 cells): down the left column, across, with a detour
    // through row 2 so its interior cells are disjoint from path A's.
    // (0,0)-(0,1)-(0,2)-(0,3)-(1,3)-(1,2)-(2,2)-(2,3)-(3,3)
    let mut maze = Maze::empty(4, 4);
    carve_many(
        &mut maze,
        &[
            ((0, 0), Direction::EAST),
            ((1, 0), Direction::EAST),
            ((2, 0), Direction::EAST),
            ((3, 0), Direction::SOUTH),
            ((3, 1), Direction::SOUTH),
            ((3, 2), Direction::SOUTH),
            ((0, 0), Direction::SOUTH),
            ((0, 1), Direction::SOUTH),
            ((0, 2), Direction::SOUTH),
            ((0, 3), Direction::EAST),
            ((1, 3), Direction::NORTH),
            ((1, 2), Direction::EAST),
            ((2, 2), Direction::SOUTH),
            ((2, 3), Direction::EAST),
        ],
    );

    let solution = solve(&maze, 2, false, 0).unwrap();
    assert!(solution.found);
    let path = solution.path.unwrap();
    assert_eq!(path[0], Coord::new(0, 0));
    assert_eq!(*path.last().unwrap(), Coord::new(3, 3));
    assert!(path.len() == 7 || path.len() == 9, "unexpected path length {}", path.len());
}

/// S6: a fully open 16x16 grid (no internal walls). Expect a solution whose
/// path contains no repeated cell.
#[test]
fn s6_fully_open_grid_has_acyclic_path() {
    let mut maze = Maze::empty(16, 16);
    for y in 0..16 {
        for x in 0..16 {
            if x + 1 < 16 {
                maze.carve(Coord::new(x, y), Direction::EAST);
            }
            if y + 1 < 16 {
                maze.carve(Coord::new(x, y), Direction::SOUTH);
            }
        }
    }

    let solution = solve(&maze, 8, false, 0).unwrap();
    assert!(solution.found);
    let path = solution.path.unwrap();

    let mut seen = std::collections::HashSet::new();
    for cell in &path {
        assert!(seen.insert(*cell), "path repeats cell {cell}");
    }
}

/// P1/P6: every cell in the path is connected to its neighbours by an open
/// passage, and `came_from` (read post-join) matches the path's predecessor
/// direction.
#[test]
fn p1_p6_path_edges_are_open_passages() {
    let mut maze = Maze::empty(5, 5);
    for y in 0..5 {
        for x in 0..5 {
            if x + 1 < 5 {
                maze.carve(Coord::new(x, y), Direction::EAST);
            }
            if y + 1 < 5 {
                maze.carve(Coord::new(x, y), Direction::SOUTH);
            }
        }
    }

    let solution = solve(&maze, 4, false, 0).unwrap();
    let path = solution.path.unwrap();

    for window in path.windows(2) {
        let (a, b) = (window[0], window[1]);
        let (w, h) = maze.dimensions();
        let dir = Direction::ORDER.into_iter().find(|d| d.step(a, w, h) == Some(b));
        let dir = dir.expect("adjacent path cells must differ by exactly one cardinal step");
        assert!(maze.open_directions_at(a).contains(dir), "path crosses a wall between {a} and {b}");
    }
}

/// P2: path endpoints are the start and the goal.
#[test]
fn p2_path_endpoints_are_start_and_goal() {
    let mut maze = Maze::empty(3, 3);
    for x in 0..2 {
        maze.carve(Coord::new(x, 0), Direction::EAST);
    }
    maze.carve(Coord::new(2, 0), Direction::SOUTH);
    maze.carve(Coord::new(2, 1), Direction::SOUTH);

    let solution = solve(&maze, 3, false, 0).unwrap();
    assert!(solution.found);
    let path = solution.path.unwrap();
    assert_eq!(path[0], Coord::new(0, 0));
    assert_eq!(*path.last().unwrap(), maze.goal());
}

/// P3: a fully connected maze solves under every worker count in the
/// spec's reference set.
#[test]
fn p3_solves_under_every_worker_count() {
    for &workers in &[1usize, 2, 4, 8, 16] {
        let mut maze = Maze::empty(6, 6);
        for y in 0..6 {
            for x in 0..6 {
                if x + 1 < 6 {
                    maze.carve(Coord::new(x, y), Direction::EAST);
                }
                if y + 1 < 6 {
                    maze.carve(Coord::new(x, y), Direction::SOUTH);
                }
            }
        }
        let solution = solve(&maze, workers, false, 0).unwrap();
        assert!(solution.found, "expected a solution with {workers} workers");
    }
}

/// P4: an unreachable goal yields `found = false` and the start's full
/// connected component marked visited.
#[test]
fn p4_unreachable_goal_marks_whole_component_visited() {
    let mut maze = Maze::empty(4, 4);
    // Only the top-left 2x2 block is connected; (3,3) is unreachable.
    maze.carve(Coord::new(0, 0), Direction::EAST);
    maze.carve(Coord::new(0, 0), Direction::SOUTH);
    maze.carve(Coord::new(1, 0), Direction::SOUTH);

    let solution = solve(&maze, 4, false, 0).unwrap();
    assert!(!solution.found);
    for &(x, y) in &[(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert!(solution.explored[Coord::new(x, y)], "({x}, {y}) should be visited");
    }
}

/// P7: solving terminates (a bounded test run stands in for "no deadlock").
#[test]
fn p7_terminates_promptly_on_a_sizeable_maze() {
    let maze = Maze::generate(32, 32, 99);
    let solution = solve(&maze, 8, false, 0).unwrap();
    assert!(solution.found);
}
