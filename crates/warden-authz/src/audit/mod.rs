//! Denial auditing.
//!
//! Every denial produces two lines on the injected [`AuditSink`]: a
//! warning-level summary for humans and an info-level JSON record for
//! machines. All text is sanitized before either line is built.

mod logger;
mod record;
mod sink;

pub use logger::{AuditLogger, EXTRA_CONTEXT_PLACEHOLDER};
pub use record::{AuditRecord, RequestContext, ERROR_TYPE_FORBIDDEN};
#[cfg(any(test, feature = "test-utils"))]
pub use sink::MemorySink;
pub use sink::{AuditSink, TracingSink, AUDIT_TARGET};
