//! Command implementations for the biztime CLI

pub mod config;
pub mod migrate;
pub mod serve;

pub use config::run_config;
pub use migrate::run_migrate;
pub use serve::run_serve;

use std::path::Path;

use anyhow::{Context, Result};
use biztime_server::BiztimeConfig;

/// Config file (explicit or discovered) with environment overrides applied.
///
/// Command-line flags are layered on top by each command.
pub fn load_config(explicit: Option<&Path>) -> Result<BiztimeConfig> {
    let mut config = BiztimeConfig::load(explicit).context("failed to load configuration")?;
    config
        .apply_env()
        .context("invalid configuration in environment")?;
    Ok(config)
}

/// Resolve the database URL once flags have been applied.
pub(crate) fn require_database_url(config: &BiztimeConfig) -> Result<&str> {
    config.database.url.as_deref().context(
        "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or [database] url in biztime.toml",
    )
}
