//! Configuration validation.

use super::types::ServerConfig;
use axum::http::HeaderName;
use std::collections::HashSet;
use thiserror::Error;
use warden_common_log::{LogFormat, LogLevel};

/// A configuration problem found by [`validate_config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port 0 is not bindable.
    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    /// Host and port do not form a socket address.
    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    /// Unknown log level name.
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// Unknown log format name.
    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),

    /// Identity header is not a valid HTTP header name.
    #[error("Invalid identity header name: {0}")]
    InvalidIdentityHeader(String),

    /// A principal has an empty id.
    #[error("Principal id must not be empty")]
    EmptyPrincipalId,

    /// The same principal id appears twice.
    #[error("Principal provisioned twice: {0}")]
    DuplicatePrincipal(String),
}

/// Validate server configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate port
    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    }

    if config.server.socket_addr().is_err() {
        errors.push(ConfigError::InvalidBindAddress(config.server.host.clone()));
    }

    // Validate logging
    if LogLevel::parse(&config.logging.level).is_none() {
        errors.push(ConfigError::InvalidLogLevel(config.logging.level.clone()));
    }
    if LogFormat::parse(&config.logging.format).is_none() {
        errors.push(ConfigError::InvalidLogFormat(config.logging.format.clone()));
    }

    // Validate identity header
    if HeaderName::from_bytes(config.auth.identity_header.as_bytes()).is_err() {
        errors.push(ConfigError::InvalidIdentityHeader(
            config.auth.identity_header.clone(),
        ));
    }

    // Validate principals
    let mut seen = HashSet::new();
    for principal in &config.principals {
        if principal.id.is_empty() {
            errors.push(ConfigError::EmptyPrincipalId);
        } else if !seen.insert(principal.id.as_str()) {
            errors.push(ConfigError::DuplicatePrincipal(principal.id.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
