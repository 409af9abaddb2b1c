//! DDL rendering from the catalog.

use std::fmt;
use std::str::FromStr;

use sea_query::{
    Alias, ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement,
    IndexDropStatement, PostgresQueryBuilder, SchemaStatementBuilder, SqliteQueryBuilder, Table,
    TableCreateStatement, TableDropStatement,
};
use serde::{Deserialize, Serialize};

use crate::catalog::{self, ColumnKind, ReferentialAction, TableDef};

/// SQL dialect DDL is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown backend '{0}' (expected sqlite or postgres)")]
pub struct ParseBackendError(String);

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(ParseBackendError(other.to_string())),
        }
    }
}

fn fk_action(action: ReferentialAction) -> ForeignKeyAction {
    match action {
        ReferentialAction::Cascade => ForeignKeyAction::Cascade,
        ReferentialAction::Restrict => ForeignKeyAction::Restrict,
        ReferentialAction::SetNull => ForeignKeyAction::SetNull,
        ReferentialAction::NoAction => ForeignKeyAction::NoAction,
    }
}

/// `CREATE TABLE IF NOT EXISTS` for one catalog table, foreign keys inline.
pub fn create_table(def: &TableDef) -> TableCreateStatement {
    let mut stmt = Table::create();
    stmt.table(Alias::new(def.name)).if_not_exists();

    for col in def.columns {
        let mut column = ColumnDef::new(Alias::new(col.name));
        match col.kind {
            ColumnKind::Text => column.text(),
            ColumnKind::Boolean => column.boolean(),
            ColumnKind::Integer => column.integer(),
            ColumnKind::Timestamp => column.timestamp(),
        };
        if col.not_null {
            column.not_null();
        }
        if col.primary_key {
            column.primary_key();
        }
        if col.unique {
            column.unique_key();
        }
        stmt.col(&mut column);
    }

    for fk in def.foreign_keys {
        stmt.foreign_key(
            ForeignKey::create()
                .name(fk.name)
                .from(Alias::new(def.name), Alias::new(fk.column))
                .to(
                    Alias::new(fk.references_table),
                    Alias::new(fk.references_column),
                )
                .on_delete(fk_action(fk.on_delete)),
        );
    }

    stmt
}

/// `CREATE INDEX IF NOT EXISTS` for every index the table declares.
pub fn create_indexes(def: &TableDef) -> Vec<IndexCreateStatement> {
    def.indexes
        .iter()
        .map(|idx| {
            let mut stmt = Index::create();
            stmt.if_not_exists()
                .name(idx.name)
                .table(Alias::new(def.name));
            for col in idx.columns {
                stmt.col(Alias::new(*col));
            }
            if idx.unique {
                stmt.unique();
            }
            stmt
        })
        .collect()
}

pub fn drop_table(def: &TableDef) -> TableDropStatement {
    Table::drop()
        .table(Alias::new(def.name))
        .if_exists()
        .to_owned()
}

pub fn drop_indexes(def: &TableDef) -> Vec<IndexDropStatement> {
    def.indexes
        .iter()
        .map(|idx| {
            Index::drop()
                .name(idx.name)
                .table(Alias::new(def.name))
                .if_exists()
                .to_owned()
        })
        .collect()
}

fn build<S: SchemaStatementBuilder>(stmt: &S, backend: Backend) -> String {
    match backend {
        Backend::Sqlite => stmt.build(SqliteQueryBuilder),
        Backend::Postgres => stmt.build(PostgresQueryBuilder),
    }
}

/// Statements creating one table and its indexes.
pub fn render_table(def: &TableDef, backend: Backend) -> Vec<String> {
    let mut out = vec![build(&create_table(def), backend)];
    out.extend(create_indexes(def).iter().map(|s| build(s, backend)));
    out
}

/// Every statement needed to create the full schema, in dependency order.
pub fn render(backend: Backend) -> Vec<String> {
    catalog::tables()
        .iter()
        .flat_map(|t| render_table(t, backend))
        .collect()
}

/// Teardown statements: tables dropped in reverse dependency order.
pub fn render_drop(backend: Backend) -> Vec<String> {
    catalog::tables()
        .iter()
        .rev()
        .map(|t| build(&drop_table(t), backend))
        .collect()
}

pub fn render_drop_indexes(def: &TableDef, backend: Backend) -> Vec<String> {
    drop_indexes(def).iter().map(|s| build(s, backend)).collect()
}

/// The schema as a single script with `;` terminated statements.
pub fn render_script(backend: Backend) -> String {
    let mut script = String::new();
    for stmt in render(backend) {
        script.push_str(&stmt);
        script.push_str(";\n");
    }
    script
}
