//! Runtime configuration for authdb.
//!
//! The CLI reads `authdb.toml` into [`AuthDbConfig`]; the store takes the
//! `[database]` section directly. Every field has a default, so an absent or
//! partial file is valid.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use authdb_schema::Backend;
use serde::{Deserialize, Serialize};

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "authdb.toml";

pub const ENV_DATABASE_PATH: &str = "AUTHDB_DATABASE_PATH";
pub const ENV_SCHEMA_BACKEND: &str = "AUTHDB_SCHEMA_BACKEND";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AuthDbConfig {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub schema: SchemaSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub journal_mode: JournalMode,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            journal_mode: JournalMode::default(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseSettings {
    /// Settings for a database file at `path`, everything else default.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// SQLite `journal_mode` pragma value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    #[default]
    Wal,
    Delete,
    Memory,
}

impl JournalMode {
    pub fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "WAL",
            Self::Delete => "DELETE",
            Self::Memory => "MEMORY",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SchemaSettings {
    /// Dialect `authdb schema` renders when `--backend` is not given.
    #[serde(default)]
    pub backend: Backend,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data").join("auth.db")
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Read `path`, or return defaults when the file does not exist.
pub fn load(path: &Path) -> Result<AuthDbConfig> {
    if !path.exists() {
        return Ok(AuthDbConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let config = toml::from_str::<AuthDbConfig>(&content)
        .with_context(|| format!("Failed to parse config at {}", path.display()))?;
    Ok(config)
}

/// Apply `AUTHDB_*` overrides from the given lookup (normally `std::env::var`).
pub fn apply_env_overrides<F>(config: &mut AuthDbConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(ENV_DATABASE_PATH).filter(|s| !s.is_empty()) {
        config.database.path = PathBuf::from(path);
    }
    if let Some(raw) = lookup(ENV_SCHEMA_BACKEND).filter(|s| !s.is_empty()) {
        config.schema.backend = raw
            .parse()
            .with_context(|| format!("invalid {ENV_SCHEMA_BACKEND}"))?;
    }
    Ok(())
}

/// `load` followed by overrides from the process environment.
pub fn load_with_env(path: &Path) -> Result<AuthDbConfig> {
    let mut config = load(path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Write `config` as TOML, creating parent directories.
pub fn save(path: &Path, config: &AuthDbConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir for {}", path.display()))?;
    }
    let content = toml::to_string_pretty(config).context("serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config at {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_stable() {
        let cfg = AuthDbConfig::default();
        assert_eq!(cfg.database.path, PathBuf::from("data/auth.db"));
        assert_eq!(cfg.database.journal_mode, JournalMode::Wal);
        assert_eq!(cfg.database.busy_timeout_ms, 5_000);
        assert_eq!(cfg.schema.backend, Backend::Sqlite);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: AuthDbConfig = toml::from_str(
            r#"
[database]
journal_mode = "delete"
"#,
        )
        .expect("parse toml");
        assert_eq!(cfg.database.journal_mode, JournalMode::Delete);
        assert_eq!(cfg.database.busy_timeout_ms, 5_000);
        assert_eq!(cfg.schema.backend, Backend::Sqlite);
    }

    #[test]
    fn backend_aliases_deserialize() {
        let cfg: AuthDbConfig = toml::from_str(
            r#"
[schema]
backend = "postgresql"
"#,
        )
        .expect("parse toml");
        assert_eq!(cfg.schema.backend, Backend::Postgres);
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            (ENV_DATABASE_PATH, "/tmp/other.db"),
            (ENV_SCHEMA_BACKEND, "pg"),
        ]
        .into_iter()
        .collect();
        let mut cfg = AuthDbConfig::default();
        apply_env_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.database.path, PathBuf::from("/tmp/other.db"));
        assert_eq!(cfg.schema.backend, Backend::Postgres);
    }

    #[test]
    fn bad_backend_override_is_an_error() {
        let mut cfg = AuthDbConfig::default();
        let err = apply_env_overrides(&mut cfg, |k| {
            (k == ENV_SCHEMA_BACKEND).then(|| "oracle".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains(ENV_SCHEMA_BACKEND));
    }

    #[test]
    fn missing_file_loads_defaults_and_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        assert_eq!(load(&path).unwrap(), AuthDbConfig::default());

        let mut cfg = AuthDbConfig::default();
        cfg.database.busy_timeout_ms = 250;
        save(&path, &cfg).unwrap();
        assert_eq!(load(&path).unwrap(), cfg);
    }
}
