//! `biztime config` - inspect configuration

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::load_config;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration (file + environment) as TOML
    Show,
    /// List config file locations in lookup order
    Paths,
}

pub fn run_config(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let config = load_config(config_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Paths => {
            let paths = match config_path {
                Some(path) => vec![path.to_path_buf()],
                None => biztime_server::BiztimeConfig::search_paths(),
            };
            for path in paths {
                let marker = if path.exists() { "found" } else { "missing" };
                println!("{} ({})", path.display(), marker);
            }
        }
    }
    Ok(())
}
