//! Principal → permission lookup.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Role and granted permissions of one provisioned principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Role name. Informational only; it never grants anything by itself.
    pub role: String,
    /// Granted permissions.
    pub permissions: BTreeSet<String>,
}

impl PermissionRecord {
    /// Create a record from a role and any collection of permission names.
    pub fn new<I, P>(role: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            role: role.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `permission` is explicitly granted.
    pub fn grants(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Granted permissions rendered as `[a, b, c]`.
    pub fn granted_list(&self) -> String {
        let joined = self
            .permissions
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{}]", joined)
    }
}

/// Read-only lookup of provisioned principals.
///
/// `None` means the principal is unknown. That is an expected state, not an
/// error, and implementations must not invent records for it.
pub trait PermissionStore: Send + Sync {
    /// Look up a principal by identity.
    fn lookup(&self, principal: &str) -> Option<PermissionRecord>;
}

impl<T: PermissionStore + ?Sized> PermissionStore for Arc<T> {
    fn lookup(&self, principal: &str) -> Option<PermissionRecord> {
        (**self).lookup(principal)
    }
}

impl<T: PermissionStore + ?Sized> PermissionStore for Box<T> {
    fn lookup(&self, principal: &str) -> Option<PermissionRecord> {
        (**self).lookup(principal)
    }
}

/// In-memory store populated once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionStore {
    principals: HashMap<String, PermissionRecord>,
}

impl StaticPermissionStore {
    /// Create an empty store. Every lookup on it yields an unknown principal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the demonstration principals.
    pub fn demo() -> Self {
        Self::new()
            .with_principal("user1", "admin", ["read", "write", "delete"])
            .with_principal("user2", "user", ["read", "write"])
            .with_principal("user3", "guest", ["read"])
    }

    /// Add a principal, replacing any previous record for the same identity.
    pub fn with_principal<I, P>(
        mut self,
        principal: impl Into<String>,
        role: impl Into<String>,
        permissions: I,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.principals
            .insert(principal.into(), PermissionRecord::new(role, permissions));
        self
    }

    /// Build a store from provisioning entries, rejecting empty or repeated
    /// identities.
    pub fn from_records<I, K>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, PermissionRecord)>,
        K: Into<String>,
    {
        let mut principals = HashMap::new();
        for (principal, record) in records {
            let principal = principal.into();
            if principal.is_empty() {
                return Err(Error::EmptyPrincipal);
            }
            if principals.contains_key(&principal) {
                return Err(Error::DuplicatePrincipal(principal));
            }
            principals.insert(principal, record);
        }
        Ok(Self { principals })
    }

    /// Number of provisioned principals.
    pub fn len(&self) -> usize {
        self.principals.len()
    }

    /// Whether no principal is provisioned.
    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

impl PermissionStore for StaticPermissionStore {
    fn lookup(&self, principal: &str) -> Option<PermissionRecord> {
        self.principals.get(principal).cloned()
    }
}
