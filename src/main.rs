//! Binary entrypoint for the `issue-mirror` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Local runs may keep their settings in a .env file.
    let _ = dotenvy::dotenv();

    match issue_mirror::run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
