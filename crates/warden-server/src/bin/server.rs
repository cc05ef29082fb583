//! Warden Server Binary

use anyhow::{bail, Result};
use tracing::{error, info};
use warden_server::{
    config::{load_config, validate_config},
    Server,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = load_config()?;

    // Initialize tracing
    // WARDEN_LOG_* variables win over the [logging] section.
    warden_common_log::init(config.log_config().with_env_overrides())?;

    if let Err(errors) = validate_config(&config) {
        for err in &errors {
            error!(error = %err, "Invalid configuration");
        }
        bail!("{} configuration error(s)", errors.len());
    }

    info!(
        principals = config.principals.len(),
        "Starting Warden Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}
