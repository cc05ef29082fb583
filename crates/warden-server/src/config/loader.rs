//! Configuration loading utilities.

use super::types::ServerConfig;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

const DEFAULTS: &str = include_str!("defaults.toml");

/// Load configuration from layered sources.
///
/// Later sources override earlier ones: embedded defaults, then the optional
/// config file, then `WARDEN__SECTION__KEY` environment variables.
pub struct ConfigLoader {
    config_path: Option<String>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Loader reading `WARDEN__*` environment variables and no file.
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: Some("WARDEN".to_string()),
        }
    }

    /// Set config file path.
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Ignore environment variables.
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Load configuration.
    pub fn load(&self) -> Result<ServerConfig> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULTS,
            config::FileFormat::Toml,
        ));

        if let Some(path) = &self.config_path {
            if Path::new(path).exists() {
                info!(path = %path, "Loading config file");
                builder = builder.add_source(config::File::with_name(path));
            } else {
                warn!(path = %path, "Config file not found, using defaults");
            }
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                config::Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config = builder
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from `CONFIG_PATH` and the environment.
pub fn load_config() -> Result<ServerConfig> {
    let mut loader = ConfigLoader::new();
    if let Ok(path) = std::env::var("CONFIG_PATH") {
        loader = loader.with_config_path(path);
    }
    loader.load()
}

/// The embedded defaults alone.
pub fn default_config() -> Result<ServerConfig> {
    ConfigLoader::new().without_env().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_provision_demo_principals() {
        let config = default_config().unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.identity_header, "x-user-id");

        let ids: Vec<_> = config.principals.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["user1", "user2", "user3"]);
        assert_eq!(config.principals[0].role, "admin");
        assert_eq!(config.principals[2].permissions, ["read"]);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("warden-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("warden.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[[principals]]
id = "Alice"
role = "auditor"
permissions = ["read"]
"#
        )
        .unwrap();

        let config = ConfigLoader::new()
            .without_env()
            .with_config_path(path.to_string_lossy())
            .load()
            .unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.principals.len(), 1);
        assert_eq!(config.principals[0].id, "Alice");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ConfigLoader::new()
            .without_env()
            .with_config_path("/nonexistent/warden.toml")
            .load()
            .unwrap();
        assert_eq!(config.principals.len(), 3);
    }
}
