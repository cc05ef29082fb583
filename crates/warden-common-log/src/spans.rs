//! Request tracing spans.

use tracing::{info_span, Span};

/// Create the span that wraps one inbound request.
///
/// Callers pass already-sanitized values; span fields end up in every line
/// emitted inside the span.
pub fn request_span(request_id: &str, method: &str, path: &str, client_ip: &str) -> Span {
    info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        client_ip = %client_ip,
    )
}

/// Create the span around one authorization check.
pub fn authz_span(permission: &str) -> Span {
    info_span!("authz", permission = %permission)
}
