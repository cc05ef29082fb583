//! Sensitive header redaction.

use axum::http::HeaderMap;
use std::collections::{BTreeMap, HashSet};
use warden_authz::sanitize::{limits, sanitize};

/// Replacement for redacted values.
pub const REDACTED: &str = "[REDACTED]";

/// Most distinct headers kept by [`audit_headers`].
pub const MAX_AUDITED_HEADERS: usize = 32;

/// Headers that should be redacted in logs.
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
    "x-access-token",
    "x-csrf-token",
];

/// Redact sensitive headers from a header map.
///
/// Names come back lowercase. Repeated headers are joined with `", "`;
/// non-UTF-8 values are decoded lossily.
pub fn redact_headers(headers: &HeaderMap, additional: &[String]) -> BTreeMap<String, String> {
    let sensitive: HashSet<String> = SENSITIVE_HEADERS
        .iter()
        .map(|s| s.to_string())
        .chain(additional.iter().map(|s| s.to_lowercase()))
        .collect();

    let mut redacted: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = if sensitive.contains(name.as_str()) {
            REDACTED.to_string()
        } else {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        };
        redacted
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                if existing != REDACTED {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
            })
            .or_insert(value);
    }
    redacted
}

/// Redacted headers bounded for an audit record.
///
/// Keeps the first [`MAX_AUDITED_HEADERS`] names in sorted order; names and
/// values are sanitized and clipped like any other audited field.
pub fn audit_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    redact_headers(headers, &[])
        .into_iter()
        .take(MAX_AUDITED_HEADERS)
        .map(|(name, value)| {
            (
                sanitize(&name, limits::HEADER_NAME),
                sanitize(&value, limits::HEADER_VALUE),
            )
        })
        .collect()
}
