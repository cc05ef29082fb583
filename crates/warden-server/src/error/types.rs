//! API error types.

use axum::http::StatusCode;
use thiserror::Error;
use warden_authz::{Denial, DenyReason};

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error enum covering all error cases.
///
/// Messages are what the caller sees. Denial details stay in the audit trail.
#[derive(Debug, Error)]
pub enum ApiError {
    // 403 Forbidden
    /// No caller identity was sent.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The identity is not provisioned.
    #[error("Invalid user")]
    InvalidUser,

    /// The caller lacks the named permission.
    #[error("Insufficient permissions. Required: {0}")]
    InsufficientPermissions(String),

    /// Any other refusal.
    #[error("Access denied")]
    Forbidden,

    // 404 Not Found
    /// No route matched.
    #[error("The requested resource was not found")]
    NotFound,

    // 500 Internal Server Error
    /// Unexpected failure; details are logged, never returned.
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// Map a denial to the caller-facing error.
    pub fn from_denial(denial: &Denial, required_permission: &str) -> Self {
        match denial.reason {
            DenyReason::MissingIdentity => Self::AuthenticationRequired,
            DenyReason::UnknownPrincipal => Self::InvalidUser,
            DenyReason::InsufficientPermission => {
                Self::InsufficientPermissions(required_permission.to_string())
            }
            DenyReason::Unhandled => Self::Forbidden,
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationRequired
            | Self::InvalidUser
            | Self::InsufficientPermissions(_)
            | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used as the `error` field of the body.
    pub fn error_label(&self) -> &'static str {
        self.status_code()
            .canonical_reason()
            .unwrap_or("Error")
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}
