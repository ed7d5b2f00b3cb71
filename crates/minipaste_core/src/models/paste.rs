//! Stored paste records as the read pipeline sees them.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Writer-supplied metadata attached to a paste.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteMetadata {
    /// Last modification time as written by the uploader.
    ///
    /// Kept verbatim; see [`parse_timestamp`] for the accepted forms.
    pub last_modified: Option<String>,
    pub filename: Option<String>,
}

/// A paste row: content bytes plus metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPaste {
    pub content: Vec<u8>,
    pub metadata: PasteMetadata,
    /// Display-only expiry; expired rows read as absent.
    pub expiration: Option<DateTime<Utc>>,
}

/// One row of the admin listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteListing {
    pub name: String,
    pub expiration: Option<DateTime<Utc>>,
}

impl StoredPaste {
    /// Create a paste with no metadata and no expiry.
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            metadata: PasteMetadata::default(),
            expiration: None,
        }
    }

    /// Set the stored last-modified value.
    pub fn with_last_modified(mut self, value: impl Into<String>) -> Self {
        self.metadata.last_modified = Some(value.into());
        self
    }

    /// Set the stored filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.metadata.filename = Some(filename.into());
        self
    }

    /// Set the expiry instant.
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Whether the paste has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|at| at <= now)
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

impl PasteMetadata {
    /// Parsed last-modified instant, or `None` when missing or unparsable.
    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified.as_deref().and_then(parse_timestamp)
    }
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339, RFC 2822 (which covers HTTP-dates ending in `GMT`),
/// and integer epoch milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn parse_timestamp_accepts_all_supported_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 5).unwrap();
        for raw in [
            "2024-03-09T12:30:05Z",
            "2024-03-09T14:30:05+02:00",
            "Sat, 09 Mar 2024 12:30:05 GMT",
            "1709987405000",
        ] {
            assert_eq!(parse_timestamp(raw), Some(expected), "raw: {}", raw);
        }
    }

    #[test]
    fn parse_timestamp_keeps_subsecond_precision() {
        let parsed = parse_timestamp("2024-03-09T12:30:05.250Z").expect("parse");
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
        let parsed = parse_timestamp("1709987405250").expect("parse");
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-40"), None);
    }

    #[test]
    fn expiry_is_inclusive_of_the_current_instant() {
        let now = Utc::now();
        let paste = StoredPaste::new("x").with_expiration(now);
        assert!(paste.is_expired_at(now));
        assert!(!paste.is_expired_at(now - Duration::seconds(1)));
        assert!(!StoredPaste::new("x").is_expired_at(now));
    }

    #[test]
    fn text_replaces_invalid_utf8() {
        let paste = StoredPaste::new(vec![b'h', b'i', 0xff]);
        assert_eq!(paste.text(), "hi\u{fffd}");
    }
}
