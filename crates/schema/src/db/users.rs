//! User query builders.

use chrono::{DateTime, Utc};
use sea_query::{Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use super::tables::{Users, USER_COLUMNS};
use super::{opt_ts, ts, Built};
use crate::model::User;

// ── Lookups ────────────────────────────────────────────────────────────────

/// Find user by id.
pub fn get_by_id(user_id: &str) -> Built {
    Query::select()
        .columns(USER_COLUMNS)
        .from(Users::Table)
        .and_where(Expr::col(Users::Id).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Find user by email (served by `email_idx`).
pub fn get_by_email(email: &str) -> Built {
    Query::select()
        .columns(USER_COLUMNS)
        .from(Users::Table)
        .and_where(Expr::col(Users::Email).eq(email))
        .build(SqliteQueryBuilder)
}

/// Check email existence.
pub fn email_exists(email: &str) -> Built {
    Query::select()
        .expr(Expr::expr(Func::count(Expr::col(Asterisk))).gt(0))
        .from(Users::Table)
        .and_where(Expr::col(Users::Email).eq(email))
        .build(SqliteQueryBuilder)
}

/// Page through users, oldest first.
pub fn list(limit: u64, offset: u64) -> Built {
    Query::select()
        .columns(USER_COLUMNS)
        .from(Users::Table)
        .order_by(Users::CreatedAt, Order::Asc)
        .order_by(Users::Id, Order::Asc)
        .limit(limit)
        .offset(offset)
        .build(SqliteQueryBuilder)
}

pub fn count() -> Built {
    Query::select()
        .expr(Func::count(Expr::col(Asterisk)))
        .from(Users::Table)
        .build(SqliteQueryBuilder)
}

// ── Inserts ────────────────────────────────────────────────────────────────

pub fn insert(user: &User) -> Built {
    Query::insert()
        .into_table(Users::Table)
        .columns(USER_COLUMNS)
        .values_panic([
            user.id.as_str().into(),
            user.name.as_str().into(),
            user.email.as_str().into(),
            user.email_verified.into(),
            user.image.clone().into(),
            ts(&user.created_at),
            ts(&user.updated_at),
            user.stripe_customer_id.clone().into(),
            user.role.clone().into(),
            user.banned.into(),
            user.ban_reason.clone().into(),
            opt_ts(user.ban_expires.as_ref()),
        ])
        .build(SqliteQueryBuilder)
}

// ── Updates (id is never written) ──────────────────────────────────────────

/// Rewrite every mutable column from `user`, keyed by `user.id`.
pub fn update(user: &User) -> Built {
    Query::update()
        .table(Users::Table)
        .value(Users::Name, user.name.as_str())
        .value(Users::Email, user.email.as_str())
        .value(Users::EmailVerified, user.email_verified)
        .value(Users::Image, user.image.clone())
        .value(Users::UpdatedAt, ts(&user.updated_at))
        .value(Users::StripeCustomerId, user.stripe_customer_id.clone())
        .value(Users::Role, user.role.clone())
        .value(Users::Banned, user.banned)
        .value(Users::BanReason, user.ban_reason.clone())
        .value(Users::BanExpires, opt_ts(user.ban_expires.as_ref()))
        .and_where(Expr::col(Users::Id).eq(user.id.as_str()))
        .build(SqliteQueryBuilder)
}

pub fn set_email_verified(user_id: &str, verified: bool, now: &DateTime<Utc>) -> Built {
    Query::update()
        .table(Users::Table)
        .value(Users::EmailVerified, verified)
        .value(Users::UpdatedAt, ts(now))
        .and_where(Expr::col(Users::Id).eq(user_id))
        .build(SqliteQueryBuilder)
}

pub fn set_stripe_customer_id(
    user_id: &str,
    stripe_customer_id: Option<&str>,
    now: &DateTime<Utc>,
) -> Built {
    Query::update()
        .table(Users::Table)
        .value(Users::StripeCustomerId, stripe_customer_id.map(str::to_string))
        .value(Users::UpdatedAt, ts(now))
        .and_where(Expr::col(Users::Id).eq(user_id))
        .build(SqliteQueryBuilder)
}

pub fn set_role(user_id: &str, role: Option<&str>, now: &DateTime<Utc>) -> Built {
    Query::update()
        .table(Users::Table)
        .value(Users::Role, role.map(str::to_string))
        .value(Users::UpdatedAt, ts(now))
        .and_where(Expr::col(Users::Id).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Mark a user banned. `expires` of `None` means an open-ended ban.
pub fn ban(
    user_id: &str,
    reason: Option<&str>,
    expires: Option<&DateTime<Utc>>,
    now: &DateTime<Utc>,
) -> Built {
    Query::update()
        .table(Users::Table)
        .value(Users::Banned, true)
        .value(Users::BanReason, reason.map(str::to_string))
        .value(Users::BanExpires, opt_ts(expires))
        .value(Users::UpdatedAt, ts(now))
        .and_where(Expr::col(Users::Id).eq(user_id))
        .build(SqliteQueryBuilder)
}

pub fn unban(user_id: &str, now: &DateTime<Utc>) -> Built {
    Query::update()
        .table(Users::Table)
        .value(Users::Banned, false)
        .value(Users::BanReason, Option::<String>::None)
        .value(Users::BanExpires, Option::<String>::None)
        .value(Users::UpdatedAt, ts(now))
        .and_where(Expr::col(Users::Id).eq(user_id))
        .build(SqliteQueryBuilder)
}

// ── Deletes ────────────────────────────────────────────────────────────────

/// Delete a user; sessions and accounts go with it via `ON DELETE CASCADE`.
pub fn delete(user_id: &str) -> Built {
    Query::delete()
        .from_table(Users::Table)
        .and_where(Expr::col(Users::Id).eq(user_id))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn insert_binds_every_column() {
        let (sql, values) = insert(&User::new("u1", "Ada", "ada@example.com", now()));
        assert!(sql.starts_with(r#"INSERT INTO "users" ("id", "name", "email""#));
        assert_eq!(values.0.len(), USER_COLUMNS.len());
    }

    #[test]
    fn update_never_writes_id_or_created_at() {
        let (sql, _) = update(&User::new("u1", "Ada", "ada@example.com", now()));
        let set_clause = sql.split("WHERE").next().unwrap();
        assert!(!set_clause.contains(r#""id" ="#));
        assert!(!set_clause.contains(r#""created_at""#));
        assert!(sql.ends_with(r#"WHERE "id" = ?"#));
    }

    #[test]
    fn unban_clears_reason_and_expiry() {
        let (sql, values) = unban("u1", &now());
        assert!(sql.contains(r#""ban_reason" = ?"#));
        assert!(sql.contains(r#""ban_expires" = ?"#));
        assert_eq!(values.0.len(), 5);
    }

    #[test]
    fn email_lookup_filters_on_email() {
        let (sql, values) = get_by_email("ada@example.com");
        assert!(sql.ends_with(r#"WHERE "email" = ?"#));
        assert_eq!(values.0.len(), 1);
    }
}
