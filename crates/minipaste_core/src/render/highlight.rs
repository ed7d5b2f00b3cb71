//! Syntax-highlighted HTML views backed by syntect.

use super::HighlightRenderer;
use crate::constants::DEFAULT_HIGHLIGHT_THEME;
use maud::{html, PreEscaped, DOCTYPE};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Highlighter holding syntect's default grammars and the selected theme.
///
/// Loading the syntax set is expensive; build one at startup and share it.
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

fn normalized_syntax_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Aliases users commonly pass that syntect names differently.
fn alias_candidates(lang_lower: &str) -> &'static [&'static str] {
    match lang_lower {
        "shell" | "zsh" => &["bash", "sh"],
        "cs" | "csharp" => &["C#", "cs"],
        "cpp" | "c++" => &["C++", "cpp"],
        "golang" => &["go"],
        "js" | "javascript" | "ts" | "typescript" => &["js"],
        "py" | "python3" => &["py"],
        "tex" | "latex" => &["LaTeX", "tex"],
        "make" | "makefile" => &["Makefile"],
        _ => &[],
    }
}

/// Resolve a user-supplied language token to a syntect grammar.
///
/// Tries exact name, extension, case-insensitive name, punctuation-insensitive
/// name, then the alias table.
pub fn resolve_syntax<'a>(syntaxes: &'a SyntaxSet, lang: &str) -> Option<&'a SyntaxReference> {
    let trimmed = lang.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(syntax) = syntaxes
        .find_syntax_by_name(trimmed)
        .or_else(|| syntaxes.find_syntax_by_extension(trimmed))
    {
        return Some(syntax);
    }

    if let Some(syntax) = syntaxes
        .syntaxes()
        .iter()
        .find(|syntax| syntax.name.eq_ignore_ascii_case(trimmed))
    {
        return Some(syntax);
    }

    let normalized = normalized_syntax_key(trimmed);
    if !normalized.is_empty() {
        if let Some(syntax) = syntaxes
            .syntaxes()
            .iter()
            .find(|syntax| normalized_syntax_key(&syntax.name) == normalized)
        {
            return Some(syntax);
        }
    }

    alias_candidates(&trimmed.to_ascii_lowercase())
        .iter()
        .find_map(|candidate| {
            syntaxes
                .find_syntax_by_name(candidate)
                .or_else(|| syntaxes.find_syntax_by_extension(candidate))
        })
}

impl SyntectHighlighter {
    /// Load default grammars and the named theme.
    ///
    /// Unknown theme names fall back to the default theme with a warning.
    pub fn new(theme_name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                tracing::warn!(
                    "Unknown highlight theme '{}', using {}",
                    theme_name,
                    DEFAULT_HIGHLIGHT_THEME
                );
                themes.remove(DEFAULT_HIGHLIGHT_THEME).unwrap_or_default()
            }
        };
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    fn highlighted_block(&self, text: &str, lang: &str) -> String {
        let syntax = resolve_syntax(&self.syntaxes, lang)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        match highlighted_html_for_string(text, &self.syntaxes, syntax, &self.theme) {
            Ok(block) => block,
            Err(err) => {
                tracing::warn!("Highlighting as '{}' failed: {}", lang, err);
                html! { pre { code { (text) } } }.into_string()
            }
        }
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_THEME)
    }
}

impl HighlightRenderer for SyntectHighlighter {
    fn highlight(&self, text: &str, lang: &str) -> String {
        let block = self.highlighted_block(text, lang);
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (lang) }
                    style { "body{margin:0}pre{margin:0;padding:1em;min-height:100vh;font-size:14px}" }
                }
                body { (PreEscaped(block)) }
            }
        }
        .into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn shared() -> &'static SyntectHighlighter {
        static HIGHLIGHTER: OnceLock<SyntectHighlighter> = OnceLock::new();
        HIGHLIGHTER.get_or_init(SyntectHighlighter::default)
    }

    #[test]
    fn resolve_syntax_matches_names_extensions_and_aliases() {
        let syntaxes = &shared().syntaxes;
        let cases = [
            ("rs", "Rust"),
            ("Rust", "Rust"),
            ("rust", "Rust"),
            ("py", "Python"),
            ("shell", "Bourne Again Shell (bash)"),
            ("golang", "Go"),
        ];
        for (lang, expected) in cases {
            let syntax = resolve_syntax(syntaxes, lang).expect(lang);
            assert_eq!(syntax.name, expected, "lang: {}", lang);
        }
        assert!(resolve_syntax(syntaxes, "no-such-language").is_none());
        assert!(resolve_syntax(syntaxes, "  ").is_none());
    }

    #[test]
    fn highlight_emits_document_with_styled_pre() {
        let html = shared().highlight("fn main() {}\n", "rust");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<pre style="));
        assert!(html.contains("main"));
    }

    #[test]
    fn unknown_language_is_rendered_as_escaped_plain_text() {
        let html = shared().highlight("<script>alert(1)</script>\n", "klingon");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
