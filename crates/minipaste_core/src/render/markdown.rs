//! Markdown article renderer.

use super::MarkdownRenderer;
use maud::{html, PreEscaped, DOCTYPE};
use pulldown_cmark::{html as md_html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

const ARTICLE_STYLE: &str = "body{max-width:46em;margin:2em auto;padding:0 1em;\
font-family:system-ui,sans-serif;line-height:1.6}\
pre{overflow-x:auto;padding:.6em;background:#f5f5f5}\
table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:.3em .6em}";

/// Markdown renderer backed by pulldown-cmark.
#[derive(Debug, Default, Clone, Copy)]
pub struct CmarkRenderer;

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render markdown to an HTML fragment.
pub fn render_fragment(text: &str) -> String {
    let parser = Parser::new_ext(text, options());
    let mut out = String::with_capacity(text.len() * 3 / 2);
    md_html::push_html(&mut out, parser);
    out
}

/// Plain text of the first level-1 heading, if any.
pub fn first_heading(text: &str) -> Option<String> {
    let mut in_heading = false;
    let mut title = String::new();
    for event in Parser::new_ext(text, options()) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_heading = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let trimmed = title.trim();
                return (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            Event::Text(t) | Event::Code(t) if in_heading => title.push_str(&t),
            _ => {}
        }
    }
    None
}

impl MarkdownRenderer for CmarkRenderer {
    fn render_markdown(&self, text: &str) -> String {
        let title = first_heading(text).unwrap_or_else(|| "Untitled".to_string());
        let body = render_fragment(text);
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) }
                    style { (PreEscaped(ARTICLE_STYLE)) }
                }
                body {
                    article { (PreEscaped(body)) }
                }
            }
        }
        .into_string()
    }
}
