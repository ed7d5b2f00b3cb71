//! Request path parsing.
//!
//! Grammar: `/[<role>/]<id>[:<password>][.<ext>][/<filename>]`.
//! Parsing is total: malformed input degrades to empty fields, never an error.

use percent_encoding::percent_decode_str;

/// Rendering mode selected purely from path shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Raw bytes, or highlighted when `lang` is supplied.
    Default,
    /// `u/`: treat content as a URL and redirect to it.
    UrlRedirect,
    /// `a/`: render content as a markdown article.
    Article,
}

impl Role {
    fn from_letter(letter: char) -> Self {
        match letter {
            'u' => Self::UrlRedirect,
            'a' => Self::Article,
            _ => Self::Default,
        }
    }
}

/// Semantic fields extracted from one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub role: Role,
    /// Store lookup key.
    pub id: String,
    /// Extension including its leading dot, e.g. `.json`.
    pub extension: Option<String>,
    /// Text after `:` in the id segment; empty when absent.
    pub password: String,
    /// Filename from the trailing path segment, percent-decoded.
    pub filename_override: Option<String>,
}

impl RequestDescriptor {
    /// Non-empty password: the request targets the editor page, not a paste.
    pub fn targets_editor(&self) -> bool {
        !self.password.is_empty()
    }
}

fn split_role(path: &str) -> (Role, &str) {
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), Some('/')) => (Role::from_letter(letter), &path[letter.len_utf8() + 1..]),
        _ => (Role::Default, path),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse a request path into a [`RequestDescriptor`].
///
/// A leading `/` is optional. Query strings must already be stripped.
pub fn parse_path(path: &str) -> RequestDescriptor {
    let path = path.strip_prefix('/').unwrap_or(path);
    let (role, rest) = split_role(path);

    let (segment, filename) = match rest.rsplit_once('/') {
        Some((head, tail)) => {
            let decoded = percent_decode_str(tail).decode_utf8_lossy();
            (head, non_empty(&decoded))
        }
        None => (rest, None),
    };

    let (segment, password) = match segment.split_once(':') {
        Some((head, password)) => (head, password.to_string()),
        None => (segment, String::new()),
    };

    let (id, extension) = match segment.find('.') {
        Some(dot) => (&segment[..dot], non_empty(&segment[dot..])),
        None => (segment, None),
    };

    // An extension on the id wins; otherwise the filename's suffix is used.
    let extension = extension.or_else(|| {
        filename
            .as_deref()
            .and_then(|name| name.rfind('.').map(|dot| &name[dot..]))
            .filter(|ext| ext.len() > 1)
            .map(str::to_string)
    });

    RequestDescriptor {
        role,
        id: id.to_string(),
        extension,
        password,
        filename_override: filename,
    }
}
