mod cli;

use crate::cli::Cli;

fn main() {
    // Parse CLI, initialize logging, and run the download + config pipeline.
    if let Err(err) = Cli::run_from_args() {
        eprintln!("mcpdb error: {:#}", err);
        std::process::exit(1);
    }
}
