//! Audit record types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Value of [`AuditRecord::error_type`].
pub const ERROR_TYPE_FORBIDDEN: &str = "403_FORBIDDEN";

/// Request details supplied by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Remote peer address.
    pub remote_addr: String,
    /// `User-Agent` header, if sent.
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Create a context without a user agent.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        remote_addr: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            remote_addr: remote_addr.into(),
            user_agent: None,
        }
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// One denial, with every text field already sanitized.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// When the denial was recorded.
    pub timestamp: DateTime<Utc>,
    /// Always [`ERROR_TYPE_FORBIDDEN`].
    pub error_type: &'static str,
    /// Caller identity, or `"None"`.
    pub user_id: String,
    /// Protected resource name.
    pub resource: String,
    /// Permission the caller needed.
    pub required_permission: String,
    /// Human-readable denial reason.
    pub reason: String,
    /// Snake_case [`DenyReason`](crate::engine::DenyReason) code.
    pub reason_code: &'static str,
    /// HTTP method.
    pub request_method: String,
    /// Request path.
    pub request_path: String,
    /// Client address.
    pub request_remote_addr: String,
    /// User agent, or `"Unknown"`.
    pub request_user_agent: String,
    /// Reason-specific detail, normalized to plain JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_context: Option<serde_json::Value>,
}
