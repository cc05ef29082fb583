//! Error types for the authorization core.
//!
//! Decisions never fail; these errors only arise while provisioning a store.

use thiserror::Error;

/// Errors raised while building a permission store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// A principal was provisioned with an empty identity.
    #[error("principal identity must not be empty")]
    EmptyPrincipal,

    /// The same principal was provisioned twice.
    #[error("principal provisioned more than once: {0}")]
    DuplicatePrincipal(String),
}

/// Result type alias using the authorization core's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
