//! Content-type and content-disposition resolution for raw paste bodies.

use crate::constants::FALLBACK_MIME;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// RFC 5987 `attr-char` minus alphanumerics; everything else is escaped.
const ATTR_CHAR_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// How the client should present the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
        })
    }
}

/// Resolved header values for a raw response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    /// Full `content-type` value, always carrying `;charset=UTF-8`.
    pub content_type: String,
    /// Full `content-disposition` value.
    pub content_disposition: String,
}

/// Encode a value for an RFC 5987 `ext-value` (`UTF-8''<encoded>`).
pub fn encode_rfc5987(value: &str) -> String {
    utf8_percent_encode(value, ATTR_CHAR_ESCAPES).to_string()
}

/// Resolve the MIME type: query override, then extension, then `text/plain`.
///
/// `extension` may carry its leading dot. Only the last dot-separated part
/// is looked up, so `.tar.gz` resolves as `gz`.
pub fn resolve_mime(mime_override: Option<&str>, extension: Option<&str>) -> String {
    if let Some(mime) = mime_override.map(str::trim).filter(|m| !m.is_empty()) {
        return mime.to_string();
    }
    extension
        .and_then(|ext| ext.rsplit('.').next())
        .filter(|ext| !ext.is_empty())
        .and_then(|ext| mime_guess::from_ext(ext).first_raw())
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

/// Build the `content-disposition` value.
pub fn content_disposition(disposition: Disposition, filename: Option<&str>) -> String {
    match filename {
        Some(name) => format!("{}; filename*=UTF-8''{}", disposition, encode_rfc5987(name)),
        None => disposition.to_string(),
    }
}

/// Resolve content type and disposition for a raw paste body.
///
/// # Arguments
/// - `mime_override`: `mime` query parameter.
/// - `extension`: parsed path extension.
/// - `attachment`: whether the `a` query flag is present.
/// - `filename_override`: filename from the path.
/// - `stored_filename`: filename from paste metadata.
pub fn negotiate(
    mime_override: Option<&str>,
    extension: Option<&str>,
    attachment: bool,
    filename_override: Option<&str>,
    stored_filename: Option<&str>,
) -> Negotiated {
    let mime = resolve_mime(mime_override, extension);
    let disposition = if attachment {
        Disposition::Attachment
    } else {
        Disposition::Inline
    };
    let filename = filename_override
        .or(stored_filename)
        .filter(|name| !name.is_empty());

    Negotiated {
        content_type: format!("{};charset=UTF-8", mime),
        content_disposition: content_disposition(disposition, filename),
    }
}
