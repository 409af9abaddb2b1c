use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use authdb_runtime_config::DatabaseSettings;
use authdb_store::AuthDb;
use chrono::Utc;

use crate::output::{print_json, OutputFormat};

/// Database settings from the config, with `--db` taking precedence.
fn database_settings(config_path: &Path, db: Option<PathBuf>) -> Result<DatabaseSettings> {
    let mut settings = authdb_runtime_config::load_with_env(config_path)?.database;
    if let Some(path) = db {
        settings.path = path;
    }
    Ok(settings)
}

fn open(settings: &DatabaseSettings) -> Result<AuthDb> {
    AuthDb::open(settings)
        .with_context(|| format!("open database at {}", settings.path.display()))
}

/// Run the `migrate` command. Opening the store applies pending migrations.
pub fn run_migrate(config_path: &Path, db: Option<PathBuf>) -> Result<()> {
    let settings = database_settings(config_path, db)?;
    let db = open(&settings)?;
    println!("database: {}", settings.path.display());
    for migration in db.applied_migrations()? {
        println!("  {}  {}", migration.name, migration.applied_at);
    }
    Ok(())
}

/// Run the `purge-expired` command.
pub fn run_purge(config_path: &Path, db: Option<PathBuf>) -> Result<()> {
    let settings = database_settings(config_path, db)?;
    let report = open(&settings)?
        .purge_expired(Utc::now())
        .context("purge expired rows")?;
    println!(
        "purged {} session(s), {} verification(s)",
        report.sessions, report.verifications
    );
    Ok(())
}

/// Run the `stats` command.
pub fn run_stats(config_path: &Path, db: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let settings = database_settings(config_path, db)?;
    let counts = open(&settings)?.table_counts()?;
    match format {
        OutputFormat::Json => print_json(&counts)?,
        OutputFormat::Text => {
            let width = counts.iter().map(|c| c.table.len()).max().unwrap_or(0);
            for count in &counts {
                println!("{:<width$}  {}", count.table, count.rows);
            }
        }
    }
    Ok(())
}
