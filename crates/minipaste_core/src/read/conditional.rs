//! `If-Modified-Since` evaluation against a paste's stored timestamp.

use crate::models::paste::parse_timestamp;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// HTTP-date layout (IMF-fixdate), always in GMT.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Obsolete HTTP-date layouts recipients must still accept: RFC 850 and
/// asctime.
const OBSOLETE_HTTP_DATE_FORMATS: [&str; 2] =
    ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];

/// Outcome of a conditional-request check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheCheck {
    /// Respond 304 with an empty body and only this `Last-Modified` value.
    NotModified { last_modified: String },
    /// Precondition absent or failed; render normally.
    Proceed,
}

/// Format an instant as an HTTP-date. Sub-second precision is dropped.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}

/// Truncate an instant down to its whole second.
///
/// `timestamp()` floors toward negative infinity, so pre-epoch values
/// truncate the same way as post-epoch ones.
pub fn floor_to_second(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(at.timestamp(), 0).single().unwrap_or(at)
}

/// Parse an `If-Modified-Since` header value.
pub fn parse_http_date(raw: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(raw).or_else(|| {
        let raw = raw.trim();
        OBSOLETE_HTTP_DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    })
}

/// Decide whether a stored paste satisfies `If-Modified-Since`.
///
/// # Arguments
/// - `stored_last_modified`: raw stored timestamp, if any.
/// - `if_modified_since`: raw request header value, if any.
///
/// # Returns
/// [`CacheCheck::NotModified`] when both are present and parseable and the
/// stored time truncated to the second is not after the header time;
/// otherwise [`CacheCheck::Proceed`].
pub fn evaluate(stored_last_modified: Option<&str>, if_modified_since: Option<&str>) -> CacheCheck {
    let (Some(stored), Some(header)) = (stored_last_modified, if_modified_since) else {
        return CacheCheck::Proceed;
    };
    let (Some(stored), Some(header)) = (parse_timestamp(stored), parse_http_date(header)) else {
        return CacheCheck::Proceed;
    };

    if floor_to_second(stored) <= header {
        CacheCheck::NotModified {
            last_modified: http_date(stored),
        }
    } else {
        CacheCheck::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at_millis(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).single().expect("valid millis")
    }

    #[test]
    fn http_date_uses_imf_fixdate() {
        let at = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
        assert_eq!(http_date(at), "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(
            http_date(at + Duration::milliseconds(999)),
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn parse_http_date_accepts_every_rfc9110_layout() {
        let expected = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
        for raw in [
            "Sun, 06 Nov 1994 08:49:37 GMT",
            "Sunday, 06-Nov-94 08:49:37 GMT",
            "Sun Nov  6 08:49:37 1994",
        ] {
            assert_eq!(parse_http_date(raw), Some(expected), "raw: {:?}", raw);
        }
        assert_eq!(parse_http_date("Sunday, 06 November 1994"), None);
    }

    #[test]
    fn asctime_header_yields_not_modified() {
        let check = evaluate(Some("1994-11-06T08:49:37.400Z"), Some("Sun Nov  6 08:49:37 1994"));
        assert_eq!(
            check,
            CacheCheck::NotModified {
                last_modified: "Sun, 06 Nov 1994 08:49:37 GMT".to_string(),
            }
        );
    }

    #[test]
    fn missing_inputs_never_short_circuit() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert_eq!(evaluate(None, Some(header)), CacheCheck::Proceed);
        assert_eq!(evaluate(Some("1994-11-06T08:49:37Z"), None), CacheCheck::Proceed);
        assert_eq!(evaluate(None, None), CacheCheck::Proceed);
    }

    #[test]
    fn unparsable_inputs_never_short_circuit() {
        assert_eq!(
            evaluate(Some("not a date"), Some("Sun, 06 Nov 1994 08:49:37 GMT")),
            CacheCheck::Proceed
        );
        assert_eq!(
            evaluate(Some("1994-11-06T08:49:37Z"), Some("garbage")),
            CacheCheck::Proceed
        );
    }

    #[test]
    fn subsecond_stored_time_matches_header_of_same_second() {
        let stored = "1994-11-06T08:49:37.750Z";
        let check = evaluate(Some(stored), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
        assert_eq!(
            check,
            CacheCheck::NotModified {
                last_modified: "Sun, 06 Nov 1994 08:49:37 GMT".to_string(),
            }
        );
    }

    #[test]
    fn stored_time_after_header_proceeds() {
        let check = evaluate(
            Some("1994-11-06T08:49:38Z"),
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
        );
        assert_eq!(check, CacheCheck::Proceed);
    }

    #[test]
    fn not_modified_iff_floored_stored_millis_not_after_header() {
        let header_secs = 784_111_777_i64;
        let header = http_date(at_millis(header_secs * 1000));
        for stored_millis in [
            (header_secs - 3) * 1000,
            header_secs * 1000 - 1,
            header_secs * 1000,
            header_secs * 1000 + 1,
            header_secs * 1000 + 999,
            (header_secs + 1) * 1000,
            (header_secs + 1) * 1000 + 500,
        ] {
            let expected = stored_millis.div_euclid(1000) * 1000 <= header_secs * 1000;
            let check = evaluate(Some(&stored_millis.to_string()), Some(&header));
            assert_eq!(
                matches!(check, CacheCheck::NotModified { .. }),
                expected,
                "stored millis: {}",
                stored_millis
            );
        }
    }

    #[test]
    fn floor_to_second_floors_pre_epoch_instants() {
        let floored = floor_to_second(at_millis(-1_500));
        assert_eq!(floored.timestamp_millis(), -2_000);
    }
}
