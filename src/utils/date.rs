//! Export timestamps → epoch milliseconds.
//!
//! WordPress writes `wp:post_date_gmt` / `wp:comment_date_gmt` as
//! `YYYY-MM-DD HH:MM:SS` in UTC, and `pubDate` as RFC 2822. Unpublished
//! drafts carry `0000-00-00 00:00:00`, which is not a date.

use chrono::{DateTime, NaiveDateTime};

const WP_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `YYYY-MM-DD HH:MM:SS` UTC timestamp.
pub fn parse_wp_datetime_ms(s: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(s.trim(), WP_DATETIME_FORMAT)
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Parse an RFC 2822 date such as `Sat, 09 Jan 2016 21:53:01 +0000`.
pub fn parse_rfc2822_ms(s: &str) -> Option<i64> {
    DateTime::parse_from_rfc2822(s.trim())
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// First of `candidates` that parses: WordPress format, then RFC 2822.
pub fn first_timestamp_ms<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<i64> {
    candidates
        .into_iter()
        .flatten()
        .find_map(|s| parse_wp_datetime_ms(s).or_else(|| parse_rfc2822_ms(s)))
}
