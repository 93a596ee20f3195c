//! Markdown → HTML for bot replies.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

/// Converts Markdown text into an HTML fragment. Must be pure: the same
/// input always yields the same output.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer backed by pulldown-cmark.
///
/// With `sanitize` set, raw HTML in the source is emitted as escaped text
/// and script-capable link/image destinations are replaced by `#`.
#[derive(Debug, Clone, Copy)]
pub struct CmarkRenderer {
    pub sanitize: bool,
}

impl CmarkRenderer {
    pub fn new(sanitize: bool) -> Self {
        Self { sanitize }
    }

    fn options() -> Options {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
    }
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::options());
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        if self.sanitize {
            html::push_html(&mut out, parser.map(sanitize_event));
        } else {
            html::push_html(&mut out, parser);
        }
        out
    }
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    // Browsers ignore embedded whitespace/control chars in the scheme.
    let scheme: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    if BLOCKED_SCHEMES.iter().any(|s| scheme.starts_with(s)) {
        CowStr::Borrowed("#")
    } else {
        url
    }
}
