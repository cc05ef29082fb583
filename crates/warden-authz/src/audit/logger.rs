//! The denial audit logger.

use super::record::{AuditRecord, RequestContext, ERROR_TYPE_FORBIDDEN};
use super::sink::AuditSink;
use crate::engine::Denial;
use crate::sanitize::{limits, sanitize, sanitize_opt};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Stored in place of extra context that could not be normalized.
pub const EXTRA_CONTEXT_PLACEHOLDER: &str = "extra context could not be serialized";

const UNKNOWN_USER_AGENT: &str = "Unknown";

/// Writes sanitized denial records to an [`AuditSink`].
#[derive(Clone)]
pub struct AuditLogger {
    sink: Arc<dyn AuditSink>,
}

impl AuditLogger {
    /// Create a logger writing to `sink`.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Record one denial.
    ///
    /// Emits a warning-level summary followed by an info-level
    /// `403_ERROR_DETAILS:` line holding the full record as JSON. Never fails:
    /// extra context that cannot be normalized is replaced by a placeholder.
    pub fn record<E>(
        &self,
        denial: &Denial,
        principal: Option<&str>,
        resource: &str,
        required_permission: &str,
        request: &RequestContext,
        extra_context: Option<&E>,
    ) where
        E: Serialize + ?Sized,
    {
        let record = AuditRecord {
            timestamp: Utc::now(),
            error_type: ERROR_TYPE_FORBIDDEN,
            user_id: sanitize_opt(principal, limits::PRINCIPAL),
            resource: sanitize(resource, limits::RESOURCE),
            required_permission: sanitize(required_permission, limits::PERMISSION),
            reason: sanitize(&denial.detail, limits::REASON),
            reason_code: denial.reason.as_str(),
            request_method: sanitize(&request.method, limits::METHOD),
            request_path: sanitize(&request.path, limits::PATH),
            request_remote_addr: sanitize(&request.remote_addr, limits::REMOTE_ADDR),
            request_user_agent: sanitize(
                request.user_agent.as_deref().unwrap_or(UNKNOWN_USER_AGENT),
                limits::USER_AGENT,
            ),
            extra_context: extra_context.map(normalize_extra),
        };

        self.sink.warn(&summary_line(&record));
        self.sink.info(&details_line(&record));
    }
}

impl fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLogger").finish_non_exhaustive()
    }
}

fn summary_line(record: &AuditRecord) -> String {
    format!(
        "403 AUTHORIZATION DENIED - User: {}, Resource: {}, Required: {}, Reason: {}, \
         IP: {}, Path: {}, Method: {}",
        record.user_id,
        record.resource,
        record.required_permission,
        record.reason,
        record.request_remote_addr,
        record.request_path,
        record.request_method,
    )
}

fn details_line(record: &AuditRecord) -> String {
    let json = serde_json::to_string(record).unwrap_or_else(|err| {
        debug!(error = %err, "audit record serialization failed");
        json!({
            "timestamp": record.timestamp,
            "error_type": record.error_type,
        })
        .to_string()
    });
    format!("403_ERROR_DETAILS: {}", json)
}

/// Round-trip `extra` through JSON text so only JSON-safe data is kept.
fn normalize_extra<E: Serialize + ?Sized>(extra: &E) -> serde_json::Value {
    serde_json::to_string(extra)
        .and_then(|text| serde_json::from_str(&text))
        .unwrap_or_else(|err| {
            debug!(error = %err, "extra context normalization failed");
            json!({ "error": EXTRA_CONTEXT_PLACEHOLDER })
        })
}
