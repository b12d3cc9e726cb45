//! Command dispatch and handlers.

pub mod mirror;
pub mod preview;

use crate::cli::{Cli, Command};
use crate::error::Error;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        Command::Mirror(args) => mirror::run(args, cli.replay.as_deref()),
        Command::Preview(args) => preview::run(args),
    }
}
