//! URL and file-name helpers for competitor references

use chrono::{DateTime, Local};
use url::Url;

/// Derive a display name for a competitor from its URL
///
/// Uses the host with a leading `www.` stripped. Falls back to the raw input
/// when the URL has no parseable host.
#[must_use]
pub fn name_from_url(url: &str) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.trim().to_string());

    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// Check that `url` is an absolute http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
}

/// Turn a competitor name into a lowercase file-name stem
///
/// Replaces `<>:"/\|?*` and spaces with `_`, then runs the result through
/// `sanitize-filename` to drop anything else the host filesystem rejects.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | ' ' => '_',
            other => other,
        })
        .collect();

    sanitize_filename::sanitize(replaced).to_lowercase()
}

/// Timestamp fragment used in screenshot, report and history file names
#[must_use]
pub fn file_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}
