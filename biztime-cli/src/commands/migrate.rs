//! `biztime migrate` - apply the schema and exit

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use biztime_server::db::{create_pool, migrations};

use super::{load_config, require_database_url};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(url) = args.database_url {
        config.database.url = Some(url);
    }

    let pool = create_pool(require_database_url(&config)?)
        .await
        .context("Failed to create database pool")?;
    migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;

    tracing::info!("schema is up to date");
    pool.close().await;
    Ok(())
}
