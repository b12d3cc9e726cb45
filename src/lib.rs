//! Mirror GitHub issues into Asana tasks.
//!
//! One invocation handles one newly opened issue: check the access policy,
//! create an Asana task from the sanitized issue body, then comment on the
//! issue with the task's permalink.

pub mod adapters;
pub mod asana;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod compose;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod github;
pub mod logging;
pub mod mirror;
pub mod policy;
pub mod ports;
pub mod sanitize;

use clap::Parser;

pub use error::Error;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print and return `Ok`.
///
/// # Errors
///
/// Returns an error when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(Error::Usage(err.to_string())),
    };

    logging::init(cli.log_format);
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_prints_help() {
        assert!(run(["issue-mirror", "--help"]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let err = run(["issue-mirror", "unknown"]).unwrap_err();
        assert!(err.to_string().contains("unrecognized subcommand"));
    }
}
