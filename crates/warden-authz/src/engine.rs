//! The allow/deny decision.

use crate::store::PermissionStore;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Machine-readable reason for a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No caller identity was supplied.
    MissingIdentity,
    /// The identity does not resolve to a provisioned principal.
    UnknownPrincipal,
    /// The principal is known but lacks the required permission.
    InsufficientPermission,
    /// A denial raised outside the engine, e.g. a bare 403 from a handler.
    /// [`AuthorizationEngine::decide`] never produces it.
    Unhandled,
}

impl DenyReason {
    /// Stable snake_case code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingIdentity => "missing_identity",
            Self::UnknownPrincipal => "unknown_principal",
            Self::InsufficientPermission => "insufficient_permission",
            Self::Unhandled => "unhandled",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why access was denied. The detail is unsanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// Reason code.
    pub reason: DenyReason,
    /// Human-readable explanation.
    pub detail: String,
}

impl Denial {
    /// Create a denial.
    pub fn new(reason: DenyReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }

    fn missing_identity() -> Self {
        Self::new(DenyReason::MissingIdentity, "No user identification provided")
    }

    fn unknown_principal() -> Self {
        Self::new(DenyReason::UnknownPrincipal, "User not found in system")
    }

    fn insufficient(granted: &str, required: &str) -> Self {
        Self::new(
            DenyReason::InsufficientPermission,
            format!(
                "User lacks required permission. Has: {}, Needs: {}",
                granted, required
            ),
        )
    }

    /// A denial that did not come from a permission check.
    pub fn unhandled(detail: impl Into<String>) -> Self {
        Self::new(DenyReason::Unhandled, detail)
    }
}

/// Coarse outcome of a [`Decision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Access granted.
    Allow,
    /// Access refused.
    Deny,
}

/// Result of one authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The caller may proceed.
    Allow,
    /// The caller is refused.
    Deny(Denial),
}

impl Decision {
    /// Coarse outcome.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Allow => Outcome::Allow,
            Self::Deny(_) => Outcome::Deny,
        }
    }

    /// Whether access was granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Reason code of a denial.
    pub fn reason(&self) -> Option<DenyReason> {
        self.denial().map(|d| d.reason)
    }

    /// Denial details, if denied.
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Allow => None,
            Self::Deny(denial) => Some(denial),
        }
    }
}

/// Decides whether a principal holds a required permission.
///
/// Checks run in a fixed order and the first failure wins: missing identity,
/// unknown principal, then missing grant. Only explicit grants count; a
/// principal whose role is `admin` does not thereby hold an `admin`
/// permission.
#[derive(Clone)]
pub struct AuthorizationEngine {
    store: Arc<dyn PermissionStore>,
}

impl AuthorizationEngine {
    /// Create an engine over a permission store.
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    /// Decide whether `principal` may use `required_permission`.
    ///
    /// Never fails: every input maps to a [`Decision`]. Pure apart from the
    /// store lookup; emits no log events.
    pub fn decide(&self, principal: Option<&str>, required_permission: &str) -> Decision {
        let principal = match principal {
            Some(p) if !p.is_empty() => p,
            _ => return Decision::Deny(Denial::missing_identity()),
        };

        let Some(record) = self.store.lookup(principal) else {
            return Decision::Deny(Denial::unknown_principal());
        };

        if !record.grants(required_permission) {
            return Decision::Deny(Denial::insufficient(
                &record.granted_list(),
                required_permission,
            ));
        }

        Decision::Allow
    }
}

impl fmt::Debug for AuthorizationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationEngine").finish_non_exhaustive()
    }
}
