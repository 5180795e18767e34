//! `wfdoc` binary entry point

use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    match workflow_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
