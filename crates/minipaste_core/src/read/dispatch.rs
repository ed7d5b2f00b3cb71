//! Role dispatch: turns a parsed request plus the fetched paste into the
//! single response shape the server emits.

use super::negotiate::{negotiate, Negotiated};
use super::path::{RequestDescriptor, Role};
use crate::error::AppError;
use crate::models::StoredPaste;
use crate::render::{HighlightRenderer, MarkdownRenderer};
use std::collections::HashMap;
use url::Url;

/// Recognized query parameters for paste reads.
#[derive(Debug, Clone, Default)]
pub struct ReadQuery {
    /// MIME override for raw bodies.
    pub mime: Option<String>,
    /// Presence (any value) forces `attachment` disposition.
    pub a: Option<String>,
    /// Highlight language; empty behaves as absent.
    pub lang: Option<String>,
}

impl ReadQuery {
    /// Pick the recognized parameters out of a decoded query map.
    pub fn from_params(mut params: HashMap<String, String>) -> Self {
        Self {
            mime: params.remove("mime"),
            a: params.remove("a"),
            lang: params.remove("lang"),
        }
    }

    pub fn attachment(&self) -> bool {
        self.a.is_some()
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref().filter(|lang| !lang.is_empty())
    }
}

/// Terminal state of a successful read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendition {
    /// Redirect to an absolute URL.
    Redirect(String),
    /// Markdown article rendered to HTML.
    Article(String),
    /// Highlighted source rendered to HTML.
    Highlighted(String),
    /// Stored bytes, untouched, with negotiated headers.
    Raw {
        body: Vec<u8>,
        negotiated: Negotiated,
    },
}

/// Validate `candidate` as an absolute URL usable as a redirect target.
///
/// Any URL the WHATWG parser accepts is legal except the `javascript:`
/// scheme. Input that is already a valid header value is returned verbatim;
/// anything else (non-ASCII, stripped tabs or newlines) is returned in its
/// serialized form.
pub fn redirect_target(candidate: &str) -> Option<String> {
    let url = Url::parse(candidate).ok()?;
    if url.scheme() == "javascript" {
        return None;
    }
    if candidate.bytes().all(is_visible_ascii) {
        Some(candidate.to_string())
    } else {
        Some(url.into())
    }
}

fn is_visible_ascii(byte: u8) -> bool {
    (0x20..0x7f).contains(&byte)
}

/// Whether `candidate` is a legal redirect target.
pub fn is_legal_url(candidate: &str) -> bool {
    redirect_target(candidate).is_some()
}

/// Produce the rendition for one request.
///
/// # Arguments
/// - `descriptor`: parsed request path.
/// - `query`: recognized query parameters.
/// - `paste`: store lookup result for `descriptor.id`.
/// - `markdown` / `highlighter`: renderers for article and highlight views.
///
/// # Errors
/// - [`AppError::NotFound`] when `paste` is `None`, whatever the role.
/// - [`AppError::BadRequest`] when a redirect paste is not a legal URL.
pub fn dispatch(
    descriptor: &RequestDescriptor,
    query: &ReadQuery,
    paste: Option<StoredPaste>,
    markdown: &dyn MarkdownRenderer,
    highlighter: &dyn HighlightRenderer,
) -> Result<Rendition, AppError> {
    let paste = paste.ok_or_else(|| AppError::paste_not_found(&descriptor.id))?;

    match descriptor.role {
        Role::UrlRedirect => {
            let text = paste.text();
            match redirect_target(text.trim()) {
                Some(target) => Ok(Rendition::Redirect(target)),
                None => {
                    tracing::debug!(id = %descriptor.id, "redirect paste is not a legal URL");
                    Err(AppError::BadRequest(
                        "cannot parse paste content as a legal URL".to_string(),
                    ))
                }
            }
        }
        Role::Article => Ok(Rendition::Article(markdown.render_markdown(&paste.text()))),
        Role::Default => match query.lang() {
            Some(lang) => Ok(Rendition::Highlighted(
                highlighter.highlight(&paste.text(), lang),
            )),
            None => {
                let negotiated = negotiate(
                    query.mime.as_deref(),
                    descriptor.extension.as_deref(),
                    query.attachment(),
                    descriptor.filename_override.as_deref(),
                    paste.metadata.filename.as_deref(),
                );
                Ok(Rendition::Raw {
                    body: paste.content,
                    negotiated,
                })
            }
        },
    }
}
