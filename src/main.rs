//! stackplan - Deployment graph synthesizer for managed search ingestion stacks

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = stackplan::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
