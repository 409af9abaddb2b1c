//! Storage layout for the auth subsystem.
//!
//! - [`catalog`]: typed description of every table (columns, constraints, indexes)
//! - [`ddl`]: `CREATE TABLE` / `CREATE INDEX` rendering for SQLite and PostgreSQL
//! - [`db`]: column identifiers, migrations, and per-table SQLite query builders
//! - [`model`]: row types shared by the store and its callers

pub mod catalog;
pub mod db;
pub mod ddl;
pub mod model;

pub use catalog::{ColumnKind, ColumnSpec, ForeignKeySpec, IndexSpec, ReferentialAction, TableDef};
pub use ddl::Backend;
pub use model::{Account, AccountTokens, Session, Subscription, User, Verification};
