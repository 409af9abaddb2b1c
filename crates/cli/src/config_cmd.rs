use anyhow::{bail, Context, Result};
use authdb_runtime_config::AuthDbConfig;
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration (file plus `AUTHDB_*` overrides).
    Show,
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn run(config_path: &Path, args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => run_show(config_path),
        ConfigAction::Init { force } => run_init(config_path, force),
    }
}

fn run_show(config_path: &Path) -> Result<()> {
    let cfg = authdb_runtime_config::load_with_env(config_path)?;
    let source = if config_path.exists() { "" } else { " (not found, using defaults)" };
    println!("# config: {}{source}", config_path.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

fn run_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "config already exists: {} (use --force to overwrite)",
            config_path.display()
        );
    }
    authdb_runtime_config::save(config_path, &AuthDbConfig::default())?;
    println!("config: {}", config_path.display());
    Ok(())
}
