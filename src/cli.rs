//! Command-line surface and the resolution-summary table (spec §4.11),
//! grounded directly on the corpus's `xputils` module: a `StructOpt` `Args`
//! enum, a fixed-width header/row pair for comparing runs, and peak-memory
//! reporting via `peak_alloc`.

use std::time::Instant;

use peak_alloc::PeakAlloc;
use structopt::StructOpt;

use crate::error::MazeError;
use crate::maze::{Maze, MazeView};
use crate::render;
use crate::solver::solve;

#[global_allocator]
static PEAK_ALLOC: PeakAlloc = PeakAlloc;

#[derive(Debug, StructOpt)]
#[structopt(name = "maze-solver", about = "Concurrent grid maze generator and solver")]
pub enum Args {
    /// Generates a maze and solves it with a pool of worker threads.
    Solve {
        #[structopt(long, default_value = "64")]
        width: usize,
        #[structopt(long, default_value = "64")]
        height: usize,
        #[structopt(short, long)]
        workers: Option<usize>,
        #[structopt(long, default_value = "0")]
        seed: u64,
        #[structopt(long)]
        visualize: bool,
        #[structopt(long, default_value = "2000")]
        speed_us: u32,
        /// Carves a disconnected island so the maze has no solution, for
        /// exercising the quiescence-without-a-solution path (spec §8 S6).
        #[structopt(long)]
        disconnect: bool,
    },
    /// Prints the resolution-summary table header, for piping several runs
    /// into one aligned table.
    PrintHeader,
}

pub fn run(args: Args) -> Result<(), MazeError> {
    match args {
        Args::Solve { width, height, workers, seed, visualize, speed_us, disconnect } => {
            let workers = workers.unwrap_or_else(num_cpus::get);
            let maze = if disconnect {
                Maze::generate_with_island(width, height, seed)
            } else {
                Maze::generate(width, height, seed)
            };
            run_resolution(&maze, workers, seed, visualize, speed_us)
        }
        Args::PrintHeader => {
            resolution_header();
            Ok(())
        }
    }
}

fn run_resolution(
    maze: &Maze,
    workers: usize,
    seed: u64,
    visualize: bool,
    speed_us: u32,
) -> Result<(), MazeError> {
    let (width, height) = maze.dimensions();
    let start = Instant::now();
    let solution = solve(maze, workers, visualize, speed_us)?;
    let duration = start.elapsed();

    println!(
        "{:>10} | {:>7} | {:>8} | {:>10.3} | {:>8.2} | {:>8} | {:>10}",
        format!("{width}x{height}"),
        workers,
        if solution.found { "solved" } else { "no path" },
        duration.as_secs_f32(),
        PEAK_ALLOC.peak_usage_as_mb(),
        solution.path.as_ref().map_or(0, Vec::len),
        seed,
    );

    match &solution.path {
        Some(path) => println!("{}", render::render_solution(maze, path)),
        None => println!("{}", render::render_explored(maze, &solution.explored)),
    }

    Ok(())
}

pub fn resolution_header() {
    println!(
        "{:>10} | {:>7} | {:>8} | {:>10} | {:>8} | {:>8} | {:>10}",
        "SIZE", "WORKERS", "STATUS", "DURATION", "RAM_MB", "PATH_LEN", "SEED"
    );
}
