//! Canonical migration definitions.
//!
//! Migrations are append-only: a name, once released, always renders the same
//! statements. New schema changes get a new entry at the end.

use crate::ddl::{self, Backend};

/// A named migration and the statements it runs, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub name: &'static str,
    pub statements: Vec<String>,
}

impl Migration {
    /// Statements joined into one `;` terminated script.
    pub fn script(&self) -> String {
        let mut out = String::new();
        for stmt in &self.statements {
            out.push_str(stmt);
            out.push_str(";\n");
        }
        out
    }
}

pub const AUTH_SCHEMA: &str = "0001_auth_schema";

/// All migrations for the given backend.
pub fn migrations(backend: Backend) -> Vec<Migration> {
    vec![Migration {
        name: AUTH_SCHEMA,
        statements: ddl::render(backend),
    }]
}
