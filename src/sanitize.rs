//! Markdown to Asana rich text.
//!
//! Asana rejects `html_notes` containing tags outside a small allowlist
//! (<https://developers.asana.com/docs/rich-text>). Issue bodies are
//! rendered from Markdown, filtered down to that allowlist, and compared
//! against the unfiltered rendering so the caller knows whether anything
//! was lost.
//!
//! Filtering runs twice. The first pass also keeps `<p>`, which Asana does
//! not accept but the renderer emits freely; with paragraphs kept, the
//! filtered output only differs from the rendering when real content was
//! removed. The second pass strips the paragraphs.
//!
//! The output is HTML, not Markdown. Sanitizing it again is stable for
//! plain content, but text that came from Markdown escapes (`\*x\*`)
//! is Markdown again and renders differently on a second pass.

use std::collections::{HashMap, HashSet};

use ammonia::{Builder, UrlRelative};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Tags Asana accepts in task `html_notes`.
pub const ASANA_ALLOWED_TAGS: &[&str] =
    &["a", "body", "code", "em", "h1", "h2", "hr", "li", "ol", "s", "strong", "u", "ul"];

const PARAGRAPH_TAG: &str = "p";

/// Removed together with everything inside them.
const DROPPED_CONTENT_TAGS: &[&str] = &["script", "style"];

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Output of [`Sanitizer::sanitize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationResult {
    /// Allowlist-only HTML.
    pub html: String,
    /// Whether filtering removed anything the rendering contained.
    pub content_changed: bool,
}

/// Renders Markdown and filters it to a fixed tag allowlist.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer {
    allowed_tags: &'static [&'static str],
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(ASANA_ALLOWED_TAGS)
    }
}

impl Sanitizer {
    /// Creates a sanitizer for the given allowlist.
    #[must_use]
    pub const fn new(allowed_tags: &'static [&'static str]) -> Self {
        Self { allowed_tags }
    }

    /// Converts a Markdown issue body into allowlisted HTML.
    #[must_use]
    pub fn sanitize(&self, markdown: &str) -> SanitizationResult {
        let rendered = render_markdown(markdown);
        let first_pass = self.filter(&rendered, true);
        let content_changed = first_pass != normalize_rendering(&rendered);
        let html = self.filter(&first_pass, false);

        SanitizationResult { html, content_changed }
    }

    fn filter(&self, html: &str, keep_paragraphs: bool) -> String {
        let mut tags: HashSet<&str> = self.allowed_tags.iter().copied().collect();
        if keep_paragraphs {
            tags.insert(PARAGRAPH_TAG);
        }

        let dropped: HashSet<&str> =
            DROPPED_CONTENT_TAGS.iter().copied().filter(|t| !tags.contains(t)).collect();

        let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
        if tags.contains("a") {
            attributes.insert("a", HashSet::from(["href"]));
        }

        let mut builder = Builder::empty();
        builder
            .tags(tags)
            .clean_content_tags(dropped)
            .tag_attributes(attributes)
            .url_schemes(LINK_SCHEMES.iter().copied().collect())
            .url_relative(UrlRelative::PassThrough)
            .link_rel(None)
            .strip_comments(true);
        builder.clean(html).to_string()
    }
}

/// CommonMark rendering plus `~~strikethrough~~`, raw HTML passed through
/// untouched. Strikethrough is emitted as `<s>` since Asana has no `<del>`.
fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Start(Tag::Strikethrough) => Event::InlineHtml(CowStr::Borrowed("<s>")),
        Event::End(TagEnd::Strikethrough) => Event::InlineHtml(CowStr::Borrowed("</s>")),
        other => other,
    });
    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, parser);
    rendered
}

/// Rewrites spellings where the Markdown renderer and the HTML serializer
/// disagree without any difference in meaning.
fn normalize_rendering(html: &str) -> String {
    html.replace("<hr />", "<hr>")
        .replace("<hr/>", "<hr>")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace('\u{a0}', "&nbsp;")
}
