//! Static description of every auth table.
//!
//! The catalog is what DDL is rendered from, so column order, nullability,
//! uniqueness, foreign keys and index names here are the storage layout.

use serde::Serialize;

/// Storage kind of a column, independent of SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Boolean,
    Integer,
    /// Timestamp without time zone.
    Timestamp,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Timestamp => "timestamp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    NoAction,
}

impl ReferentialAction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForeignKeySpec {
    pub name: &'static str,
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
    pub on_delete: ReferentialAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub unique: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
    pub foreign_keys: &'static [ForeignKeySpec],
    pub indexes: &'static [IndexSpec],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&'static ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The primary-key column. Every catalog table has exactly one.
    pub fn primary_key(&self) -> Option<&'static ColumnSpec> {
        self.columns.iter().find(|c| c.primary_key)
    }

    pub fn not_null_columns(&self) -> impl Iterator<Item = &'static ColumnSpec> {
        self.columns.iter().filter(|c| c.not_null)
    }

    pub fn unique_columns(&self) -> impl Iterator<Item = &'static ColumnSpec> {
        self.columns.iter().filter(|c| c.unique || c.primary_key)
    }

    pub fn foreign_key_for(&self, column: &str) -> Option<&'static ForeignKeySpec> {
        self.foreign_keys.iter().find(|fk| fk.column == column)
    }
}

const fn pk(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind: ColumnKind::Text,
        not_null: true,
        unique: false,
        primary_key: true,
    }
}

const fn required(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        not_null: true,
        unique: false,
        primary_key: false,
    }
}

const fn required_unique(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        not_null: true,
        unique: true,
        primary_key: false,
    }
}

const fn optional(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        not_null: false,
        unique: false,
        primary_key: false,
    }
}

const fn index(name: &'static str, columns: &'static [&'static str]) -> IndexSpec {
    IndexSpec {
        name,
        columns,
        unique: false,
    }
}

use ColumnKind::{Boolean, Integer, Text, Timestamp};

pub const USERS: TableDef = TableDef {
    name: "users",
    columns: &[
        pk("id"),
        required("name", Text),
        required_unique("email", Text),
        required("email_verified", Boolean),
        optional("image", Text),
        required("created_at", Timestamp),
        required("updated_at", Timestamp),
        optional("stripe_customer_id", Text),
        optional("role", Text),
        optional("banned", Boolean),
        optional("ban_reason", Text),
        optional("ban_expires", Timestamp),
    ],
    foreign_keys: &[],
    indexes: &[index("email_idx", &["email"])],
};

pub const SESSIONS: TableDef = TableDef {
    name: "sessions",
    columns: &[
        pk("id"),
        required("expires_at", Timestamp),
        required_unique("token", Text),
        required("created_at", Timestamp),
        required("updated_at", Timestamp),
        optional("ip_address", Text),
        optional("user_agent", Text),
        required("user_id", Text),
        optional("impersonated_by", Text),
    ],
    foreign_keys: &[ForeignKeySpec {
        name: "fk_sessions_user_id",
        column: "user_id",
        references_table: "users",
        references_column: "id",
        on_delete: ReferentialAction::Cascade,
    }],
    indexes: &[
        index("user_id_idx_sessions", &["user_id"]),
        index("token_idx", &["token"]),
    ],
};

pub const ACCOUNTS: TableDef = TableDef {
    name: "accounts",
    columns: &[
        pk("id"),
        required("account_id", Text),
        required("provider_id", Text),
        required("user_id", Text),
        optional("access_token", Text),
        optional("refresh_token", Text),
        optional("id_token", Text),
        optional("access_token_expires_at", Timestamp),
        optional("refresh_token_expires_at", Timestamp),
        optional("scope", Text),
        optional("password", Text),
        required("created_at", Timestamp),
        required("updated_at", Timestamp),
    ],
    foreign_keys: &[ForeignKeySpec {
        name: "fk_accounts_user_id",
        column: "user_id",
        references_table: "users",
        references_column: "id",
        on_delete: ReferentialAction::Cascade,
    }],
    indexes: &[index("user_id_idx_accounts", &["user_id"])],
};

pub const VERIFICATIONS: TableDef = TableDef {
    name: "verifications",
    columns: &[
        pk("id"),
        required("identifier", Text),
        required("value", Text),
        required("expires_at", Timestamp),
        optional("created_at", Timestamp),
        optional("updated_at", Timestamp),
    ],
    foreign_keys: &[],
    indexes: &[index("identifier_idx", &["identifier"])],
};

// reference_id is intentionally not a foreign key.
pub const SUBSCRIPTIONS: TableDef = TableDef {
    name: "subscriptions",
    columns: &[
        pk("id"),
        required("plan", Text),
        required("reference_id", Text),
        optional("stripe_customer_id", Text),
        optional("stripe_subscription_id", Text),
        optional("status", Text),
        optional("period_start", Timestamp),
        optional("period_end", Timestamp),
        optional("cancel_at_period_end", Boolean),
        optional("seats", Integer),
    ],
    foreign_keys: &[],
    indexes: &[index("stripe_customer_id_idx", &["stripe_customer_id"])],
};

static TABLES: [TableDef; 5] = [USERS, SESSIONS, ACCOUNTS, VERIFICATIONS, SUBSCRIPTIONS];

/// All tables, referenced tables before the tables that point at them.
pub fn tables() -> &'static [TableDef] {
    &TABLES
}

pub fn table(name: &str) -> Option<&'static TableDef> {
    TABLES.iter().find(|t| t.name == name)
}
