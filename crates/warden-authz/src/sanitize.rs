//! Log-safe normalization of untrusted text.
//!
//! Every value that ends up in an audit line passes through [`sanitize`]
//! first. The output never contains a raw line break, so one record cannot be
//! split into forged additional records, and it is bounded in length.

use std::fmt;

/// Appended to any value that was clipped.
pub const TRUNCATION_MARKER: &str = "...[truncated]";

/// Rendering of an absent value.
pub const ABSENT: &str = "None";

/// Per-field upper bounds used by the audit logger.
pub mod limits {
    /// Caller identity.
    pub const PRINCIPAL: usize = 100;
    /// Resource or endpoint name.
    pub const RESOURCE: usize = 200;
    /// Required permission.
    pub const PERMISSION: usize = 100;
    /// Human-readable denial reason.
    pub const REASON: usize = 500;
    /// HTTP method.
    pub const METHOD: usize = 10;
    /// Request path.
    pub const PATH: usize = 500;
    /// Remote address.
    pub const REMOTE_ADDR: usize = 50;
    /// User agent header.
    pub const USER_AGENT: usize = 200;
    /// Name of a header carried in extra context.
    pub const HEADER_NAME: usize = 100;
    /// Value of a header carried in extra context.
    pub const HEADER_VALUE: usize = 200;
}

/// Normalize a value for inclusion in a log line.
///
/// The value is rendered with [`Display`](fmt::Display), then:
///
/// - `\n` and `\r` become the visible two-character sequences `\\n` / `\\r`
/// - other ASCII control characters (including DEL) are dropped; tab is kept
/// - the result is clipped to `max_length` characters and, if clipped,
///   [`TRUNCATION_MARKER`] is appended
///
/// Escapes are never split by the clip, and the length check runs on the
/// escaped text, so the output is at most `max_length` characters plus the
/// marker. A dropped control character still counts one toward the limit,
/// so at most `max_length` input characters are examined.
pub fn sanitize<T: fmt::Display + ?Sized>(value: &T, max_length: usize) -> String {
    let text = value.to_string();
    let mut out = String::with_capacity(text.len().min(max_length));
    let mut written = 0usize;
    let mut truncated = false;

    for ch in text.chars() {
        let (escaped, width) = match ch {
            '\n' => (Some("\\n"), 2),
            '\r' => (Some("\\r"), 2),
            '\t' => (None, 1),
            // Dropped, but counts toward the limit.
            c if c.is_ascii_control() => (Some(""), 1),
            _ => (None, 1),
        };

        if written + width > max_length {
            truncated = true;
            break;
        }

        match escaped {
            Some(seq) => out.push_str(seq),
            None => out.push(ch),
        }
        written += width;
    }

    if truncated {
        out.push_str(TRUNCATION_MARKER);
    }
    out
}

/// Like [`sanitize`], but renders `None` as the literal `"None"`.
pub fn sanitize_opt<T: fmt::Display>(value: Option<T>, max_length: usize) -> String {
    match value {
        Some(v) => sanitize(&v, max_length),
        None => sanitize(ABSENT, max_length),
    }
}
