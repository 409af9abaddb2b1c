//! Verification token query builders.

use chrono::{DateTime, Utc};
use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::{Verifications, VERIFICATION_COLUMNS};
use super::{opt_ts, ts, Built};
use crate::model::Verification;

pub fn insert(v: &Verification) -> Built {
    Query::insert()
        .into_table(Verifications::Table)
        .columns(VERIFICATION_COLUMNS)
        .values_panic([
            v.id.as_str().into(),
            v.identifier.as_str().into(),
            v.value.as_str().into(),
            ts(&v.expires_at),
            opt_ts(v.created_at.as_ref()),
            opt_ts(v.updated_at.as_ref()),
        ])
        .build(SqliteQueryBuilder)
}

/// Most recent verification for an identifier (served by `identifier_idx`).
///
/// Expiry is not filtered here; callers decide what an expired row means.
pub fn latest_by_identifier(identifier: &str) -> Built {
    Query::select()
        .columns(VERIFICATION_COLUMNS)
        .from(Verifications::Table)
        .and_where(Expr::col(Verifications::Identifier).eq(identifier))
        .order_by(Verifications::ExpiresAt, Order::Desc)
        .order_by(Verifications::Id, Order::Desc)
        .limit(1)
        .build(SqliteQueryBuilder)
}

pub fn list_by_identifier(identifier: &str) -> Built {
    Query::select()
        .columns(VERIFICATION_COLUMNS)
        .from(Verifications::Table)
        .and_where(Expr::col(Verifications::Identifier).eq(identifier))
        .order_by(Verifications::ExpiresAt, Order::Desc)
        .order_by(Verifications::Id, Order::Desc)
        .build(SqliteQueryBuilder)
}

pub fn delete_by_id(id: &str) -> Built {
    Query::delete()
        .from_table(Verifications::Table)
        .and_where(Expr::col(Verifications::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn delete_by_identifier(identifier: &str) -> Built {
    Query::delete()
        .from_table(Verifications::Table)
        .and_where(Expr::col(Verifications::Identifier).eq(identifier))
        .build(SqliteQueryBuilder)
}

pub fn delete_expired(now: &DateTime<Utc>) -> Built {
    Query::delete()
        .from_table(Verifications::Table)
        .and_where(Expr::col(Verifications::ExpiresAt).lte(ts(now)))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_is_limited_to_one_row() {
        let (sql, _) = latest_by_identifier("email:ada@example.com");
        assert!(sql.contains(r#"WHERE "identifier" = ?"#));
        assert!(sql.contains("LIMIT ?"));
    }
}
