//! tt - personal command-line task tracker

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = tt_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
