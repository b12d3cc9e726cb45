//! `mirror`: the workflow entry point.

use std::path::Path;

use crate::cli::MirrorArgs;
use crate::context::ServiceContext;
use crate::error::Error;
use crate::mirror::{Mirror, MirrorReport};

/// Mirrors the issue described by `args`.
///
/// A denied actor, a failed task or a failed comment all end successfully;
/// only a broken membership lookup (or broken local setup) is an error.
///
/// # Errors
///
/// Returns [`Error::Lookup`] when the access policy could not reach the
/// directory, or a setup error from the service context.
pub fn run(args: &MirrorArgs, replay: Option<&Path>) -> Result<(), Error> {
    let config = args.to_config();
    let event = args.to_event();
    let ctx = ServiceContext::select(replay)?;

    let result = Mirror::new(&config, ctx.http.as_ref()).run(&event);

    // Keep whatever was recorded even when the run failed.
    if let Some(path) = ctx.finish()? {
        tracing::info!(path = %path.display(), "recording saved");
    }

    match result? {
        MirrorReport::Denied => tracing::info!("issue not mirrored: actor not allowed"),
        MirrorReport::TaskFailed { reason } => tracing::warn!(%reason, "issue not mirrored"),
        MirrorReport::Mirrored { permalink, content_changed, .. } => {
            tracing::info!(%permalink, content_changed, "issue mirrored");
        }
    }
    Ok(())
}
