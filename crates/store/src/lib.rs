//! SQLite store for the auth tables.
//!
//! [`AuthDb`] applies the schema migrations on open and exposes the per-table
//! insert / update / delete / indexed-lookup operations. Constraint checks
//! (uniqueness, foreign keys, NOT NULL, cascades) are left to SQLite and
//! surfaced as [`StoreError`] variants.

mod accounts;
mod error;
mod migrate;
mod rows;
mod sessions;
mod subscriptions;
mod users;
mod verifications;

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use authdb_runtime_config::{DatabaseSettings, JournalMode};
use authdb_schema::catalog;
use authdb_schema::db::Built;
use chrono::{DateTime, Utc};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use sea_query::{Alias, Asterisk, Expr, Func, Query, SqliteQueryBuilder};
use serde::Serialize;

pub use authdb_schema::model::{
    Account, AccountTokens, Session, Subscription, User, Verification,
};
pub use error::{Result, StoreError};
pub use migrate::AppliedMigration;

/// Rows removed by [`AuthDb::purge_expired`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub sessions: usize,
    pub verifications: usize,
}

/// Row count for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: i64,
}

/// Auth database handle.
/// Thread-safe: wraps the connection in a Mutex so it can be shared via `Arc<AuthDb>`.
pub struct AuthDb {
    conn: Mutex<Connection>,
}

impl AuthDb {
    /// Open (or create) the database described by `settings` and apply any
    /// pending migrations.
    pub fn open(settings: &DatabaseSettings) -> Result<Self> {
        let path = &settings.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn, settings.journal_mode, settings.busy_timeout_ms)
    }

    /// Open (or create) a database file with default settings.
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(&DatabaseSettings::at(path))
    }

    /// Private in-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, JournalMode::Memory, 0)
    }

    fn init(conn: Connection, journal_mode: JournalMode, busy_timeout_ms: u64) -> Result<Self> {
        conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
        conn.execute_batch(&format!(
            "PRAGMA journal_mode={};",
            journal_mode.pragma_value()
        ))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrate::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("auth db mutex poisoned")
    }

    /// Run `f` against the raw connection. Errors are classified like every
    /// other store operation.
    pub fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        Ok(f(&self.conn())?)
    }

    /// Migrations recorded in `_migrations`, oldest first.
    pub fn applied_migrations(&self) -> Result<Vec<AppliedMigration>> {
        migrate::applied_migrations(&self.conn())
    }

    // ── Statement helpers ──────────────────────────────────────────────

    fn execute(&self, (sql, values): Built) -> Result<usize> {
        tracing::debug!(%sql, "execute");
        let params = rows::values_to_sql(&values);
        let changed = self.conn().execute(&sql, params_from_iter(params.iter()))?;
        Ok(changed)
    }

    fn query_one<T>(
        &self,
        (sql, values): Built,
        map: fn(&Row) -> rusqlite::Result<T>,
    ) -> Result<Option<T>> {
        tracing::debug!(%sql, "query_one");
        let params = rows::values_to_sql(&values);
        let row = self
            .conn()
            .query_row(&sql, params_from_iter(params.iter()), map)
            .optional()?;
        Ok(row)
    }

    fn query_all<T>(
        &self,
        (sql, values): Built,
        map: fn(&Row) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        tracing::debug!(%sql, "query_all");
        let params = rows::values_to_sql(&values);
        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), map)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    // ── Housekeeping ───────────────────────────────────────────────────

    /// Delete sessions and verifications whose expiry is at or before `now`.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<PurgeReport> {
        let report = PurgeReport {
            sessions: self.delete_expired_sessions(now)?,
            verifications: self.delete_expired_verifications(now)?,
        };
        tracing::info!(
            sessions = report.sessions,
            verifications = report.verifications,
            "purged expired rows"
        );
        Ok(report)
    }

    /// Row counts for every catalog table.
    pub fn table_counts(&self) -> Result<Vec<TableCount>> {
        catalog::tables()
            .iter()
            .map(|t| -> Result<TableCount> {
                let built = Query::select()
                    .expr(Func::count(Expr::col(Asterisk)))
                    .from(Alias::new(t.name))
                    .build(SqliteQueryBuilder);
                let rows = self
                    .query_one(built, |row| row.get::<_, i64>(0))?
                    .unwrap_or(0);
                Ok(TableCount {
                    table: t.name,
                    rows,
                })
            })
            .collect()
    }
}
