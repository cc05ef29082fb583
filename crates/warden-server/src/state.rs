//! Shared application state.

use crate::config::ServerConfig;
use anyhow::Context;
use axum::http::HeaderName;
use std::sync::Arc;
use warden_authz::{
    AuditLogger, AuditSink, AuthorizationEngine, PermissionStore, StaticPermissionStore,
    TracingSink,
};

/// State shared by every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<ServerConfig>,
    /// Read-only permission lookups.
    pub store: Arc<dyn PermissionStore>,
    /// Decision engine over `store`.
    pub engine: Arc<AuthorizationEngine>,
    /// Denial audit trail.
    pub audit: Arc<AuditLogger>,
    /// Header carrying the caller identity.
    pub identity_header: HeaderName,
}

impl AppState {
    /// Build state from configuration, auditing through `tracing`.
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let store = StaticPermissionStore::from_records(config.permission_records())
            .context("Failed to provision principals")?;
        Self::with_parts(config.clone(), Arc::new(store), Arc::new(TracingSink))
    }

    /// Build state from explicit parts.
    pub fn with_parts(
        config: ServerConfig,
        store: Arc<dyn PermissionStore>,
        sink: Arc<dyn AuditSink>,
    ) -> anyhow::Result<Self> {
        let identity_header = HeaderName::from_bytes(config.auth.identity_header.as_bytes())
            .with_context(|| {
                format!("Invalid identity header: {}", config.auth.identity_header)
            })?;

        Ok(Self {
            engine: Arc::new(AuthorizationEngine::new(store.clone())),
            audit: Arc::new(AuditLogger::new(sink)),
            config: Arc::new(config),
            store,
            identity_header,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("identity_header", &self.identity_header)
            .finish_non_exhaustive()
    }
}
