//! Request logging middleware.

pub mod layer;
pub mod redaction;

pub use layer::{LoggingLayer, LoggingMiddleware, RequestLogConfig};
pub use redaction::{
    audit_headers, redact_headers, MAX_AUDITED_HEADERS, REDACTED, SENSITIVE_HEADERS,
};
