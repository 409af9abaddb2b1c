use authdb_schema::db::migrations::migrations;
use authdb_schema::Backend;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use serde::Serialize;

use crate::error::Result;

/// A row of the `_migrations` bookkeeping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub name: String,
    pub applied_at: String,
}

/// Apply every migration not yet recorded in `_migrations`. Each migration
/// runs in its own `BEGIN IMMEDIATE` transaction together with its
/// bookkeeping row, and the "already applied" check reads inside it, so
/// concurrent openers of one file apply each migration exactly once.
pub(crate) fn run_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;
    tx.commit()?;

    let mut applied = Vec::new();
    for migration in migrations(Backend::Sqlite) {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let already_applied: bool = tx.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
            params![migration.name],
            |row| row.get(0),
        )?;
        if already_applied {
            tx.commit()?;
            continue;
        }

        tx.execute_batch(&migration.script())?;
        tx.execute(
            "INSERT INTO _migrations (name) VALUES (?1)",
            params![migration.name],
        )?;
        tx.commit()?;

        tracing::info!(migration = migration.name, "applied migration");
        applied.push(migration.name);
    }

    Ok(applied)
}

pub(crate) fn applied_migrations(conn: &Connection) -> Result<Vec<AppliedMigration>> {
    let mut stmt = conn.prepare("SELECT name, applied_at FROM _migrations ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(AppliedMigration {
            name: row.get(0)?,
            applied_at: row.get(1)?,
        })
    })?;
    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}
