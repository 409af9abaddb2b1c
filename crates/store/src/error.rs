use rusqlite::ffi;

use crate::rows::BadTimestamp;

/// Store failures. Constraint violations reported by SQLite are classified so
/// callers can match on them instead of parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// UNIQUE or PRIMARY KEY constraint; `target` is `table.column`.
    #[error("unique constraint violated: {target}")]
    UniqueViolation { target: String },

    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    #[error("not-null constraint violated: {target}")]
    NotNullViolation { target: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("invalid timestamp in column {column}: {value}")]
    InvalidTimestamp { column: usize, value: String },

    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::ForeignKeyViolation)
    }

    pub fn is_not_null_violation(&self) -> bool {
        matches!(self, Self::NotNullViolation { .. })
    }
}

/// `"UNIQUE constraint failed: users.email"` → `"users.email"`.
fn constraint_target(message: Option<&str>) -> String {
    message
        .and_then(|m| m.split_once(": "))
        .map(|(_, target)| target.to_string())
        .unwrap_or_default()
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, message)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                match e.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        return Self::UniqueViolation {
                            target: constraint_target(message.as_deref()),
                        };
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Self::ForeignKeyViolation,
                    ffi::SQLITE_CONSTRAINT_NOTNULL => {
                        return Self::NotNullViolation {
                            target: constraint_target(message.as_deref()),
                        };
                    }
                    _ => {}
                }
            }
            rusqlite::Error::FromSqlConversionFailure(column, _, inner) => {
                if let Some(bad) = inner.downcast_ref::<BadTimestamp>() {
                    return Self::InvalidTimestamp {
                        column: *column,
                        value: bad.raw.clone(),
                    };
                }
            }
            _ => {}
        }
        Self::Sqlite(err)
    }
}
