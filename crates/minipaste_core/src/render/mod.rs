//! Pure string-to-HTML renderers used for article and highlight views.

/// Syntax highlighting via syntect.
pub mod highlight;
/// Markdown rendering via pulldown-cmark.
pub mod markdown;

pub use highlight::SyntectHighlighter;
pub use markdown::CmarkRenderer;

/// Renders markdown text into a complete HTML document.
pub trait MarkdownRenderer: Send + Sync {
    fn render_markdown(&self, text: &str) -> String;
}

/// Renders source text into a highlighted HTML document for `lang`.
pub trait HighlightRenderer: Send + Sync {
    fn highlight(&self, text: &str, lang: &str) -> String;
}
