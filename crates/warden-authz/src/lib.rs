//! Authorization core for Warden.
//!
//! This crate decides whether a caller may invoke a protected operation and
//! records every denial as an injection-safe audit trail.
//!
//! # Components
//!
//! - [`sanitize`] - normalizes untrusted text before it reaches a log stream
//! - [`store`] - read-only principal → permission lookup
//! - [`engine`] - the pure allow/deny decision
//! - [`audit`] - denial records written to an injected [`AuditSink`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use warden_authz::{AuthorizationEngine, Decision, DenyReason, StaticPermissionStore};
//!
//! let engine = AuthorizationEngine::new(Arc::new(StaticPermissionStore::demo()));
//!
//! assert!(engine.decide(Some("user1"), "read").is_allowed());
//! assert_eq!(
//!     engine.decide(None, "read").reason(),
//!     Some(DenyReason::MissingIdentity),
//! );
//! assert!(matches!(engine.decide(Some("user1"), "admin"), Decision::Deny(_)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod engine;
pub mod error;
pub mod sanitize;
pub mod store;

pub use audit::{AuditLogger, AuditRecord, AuditSink, RequestContext, TracingSink};
#[cfg(any(test, feature = "test-utils"))]
pub use audit::MemorySink;
pub use engine::{AuthorizationEngine, Decision, Denial, DenyReason, Outcome};
pub use error::{Error, Result};
pub use sanitize::{sanitize, sanitize_opt, TRUNCATION_MARKER};
pub use store::{PermissionRecord, PermissionStore, StaticPermissionStore};
