use std::process::ExitCode;

use maze_solver::cli::{self, Args};
use structopt::StructOpt;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::from_args();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "maze solver failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
