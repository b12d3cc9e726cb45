//! `preview`: render a Markdown body as an Asana task would see it.

use std::io::Read;

use crate::cli::PreviewArgs;
use crate::compose::compose;
use crate::error::Error;
use crate::sanitize::Sanitizer;

/// Prints the composed task body for `args.file` (or stdin) to stdout.
///
/// # Errors
///
/// Returns [`Error::Io`] if the input cannot be read.
pub fn run(args: &PreviewArgs) -> Result<(), Error> {
    let markdown = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|source| Error::Io { path: path.clone(), source })?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| Error::Io { path: "<stdin>".into(), source })?;
            buffer
        }
    };

    println!("{}", render(&markdown, &args.issue_url, args.linked));
    Ok(())
}

fn render(markdown: &str, issue_url: &str, linked: bool) -> String {
    let sanitized = Sanitizer::default().sanitize(markdown);
    if sanitized.content_changed {
        tracing::warn!("some content cannot be displayed in Asana and was removed");
    }
    compose(&sanitized, issue_url, !linked, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_linked_body_without_backlink() {
        assert_eq!(render("## Hello", "https://github.com/a/b/issues/1", true), "<body><h2>Hello</h2>\n</body>");
    }

    #[test]
    fn renders_backlink_and_disclaimer() {
        let body = render("<script>x</script>", "https://github.com/a/b/issues/1", false);
        assert!(body.contains("<a href=\"https://github.com/a/b/issues/1\">Github</a>"));
        assert!(body.contains("Note: The original Issue contained content"));
    }
}
