//! Server configuration types.

use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use warden_authz::PermissionRecord;
use warden_common_log::{LogConfig, LogFormat, LogLevel};

/// Main server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server binding configuration.
    pub server: ServerBindConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Caller identification.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Provisioned principals. Loaded once; read-only afterwards.
    #[serde(default)]
    pub principals: Vec<PrincipalConfig>,
}

impl ServerConfig {
    /// Address to bind to.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.server.socket_addr()
    }

    /// Logging setup derived from the `logging` section.
    ///
    /// Unknown level or format names fall back to the defaults; run
    /// [`validate_config`](super::validate_config) to reject them instead.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: LogLevel::parse(&self.logging.level).unwrap_or_default(),
            format: LogFormat::parse(&self.logging.format).unwrap_or_default(),
            file_path: self.logging.file.clone(),
            source_location: false,
        }
    }

    /// Provisioning entries for the permission store.
    pub fn permission_records(&self) -> impl Iterator<Item = (String, PermissionRecord)> + '_ {
        self.principals.iter().map(|p| {
            (
                p.id.clone(),
                PermissionRecord::new(p.role.clone(), p.permissions.iter().cloned()),
            )
        })
    }
}

/// Server binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerBindConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

impl ServerBindConfig {
    /// Parse `host:port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, compact or json).
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional append-only log file.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Enable request logging.
    #[serde(default = "default_true")]
    pub log_requests: bool,
    /// Paths to exclude from request logging.
    #[serde(default)]
    pub exclude_paths: Vec<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_true() -> bool {
    true
}

/// Caller identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Header carrying the caller identity.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
}

fn default_identity_header() -> String {
    "x-user-id".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            identity_header: default_identity_header(),
        }
    }
}

/// One provisioned principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalConfig {
    /// Identity as sent in the identity header.
    pub id: String,
    /// Role name (informational).
    pub role: String,
    /// Granted permissions.
    #[serde(default)]
    pub permissions: Vec<String>,
}
