//! Session query builders.

use chrono::{DateTime, Utc};
use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::{Sessions, SESSION_COLUMNS};
use super::{ts, Built};
use crate::model::Session;

pub fn insert(session: &Session) -> Built {
    Query::insert()
        .into_table(Sessions::Table)
        .columns(SESSION_COLUMNS)
        .values_panic([
            session.id.as_str().into(),
            ts(&session.expires_at),
            session.token.as_str().into(),
            ts(&session.created_at),
            ts(&session.updated_at),
            session.ip_address.clone().into(),
            session.user_agent.clone().into(),
            session.user_id.as_str().into(),
            session.impersonated_by.clone().into(),
        ])
        .build(SqliteQueryBuilder)
}

/// Lookup by token (served by `token_idx`).
pub fn get_by_token(token: &str) -> Built {
    Query::select()
        .columns(SESSION_COLUMNS)
        .from(Sessions::Table)
        .and_where(Expr::col(Sessions::Token).eq(token))
        .build(SqliteQueryBuilder)
}

pub fn get_by_id(session_id: &str) -> Built {
    Query::select()
        .columns(SESSION_COLUMNS)
        .from(Sessions::Table)
        .and_where(Expr::col(Sessions::Id).eq(session_id))
        .build(SqliteQueryBuilder)
}

/// All sessions of a user, newest first (served by `user_id_idx_sessions`).
pub fn list_by_user(user_id: &str) -> Built {
    Query::select()
        .columns(SESSION_COLUMNS)
        .from(Sessions::Table)
        .and_where(Expr::col(Sessions::UserId).eq(user_id))
        .order_by(Sessions::CreatedAt, Order::Desc)
        .order_by(Sessions::Id, Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Extend a session: new expiry, bumped `updated_at`.
pub fn refresh(token: &str, expires_at: &DateTime<Utc>, now: &DateTime<Utc>) -> Built {
    Query::update()
        .table(Sessions::Table)
        .value(Sessions::ExpiresAt, ts(expires_at))
        .value(Sessions::UpdatedAt, ts(now))
        .and_where(Expr::col(Sessions::Token).eq(token))
        .build(SqliteQueryBuilder)
}

pub fn delete_by_token(token: &str) -> Built {
    Query::delete()
        .from_table(Sessions::Table)
        .and_where(Expr::col(Sessions::Token).eq(token))
        .build(SqliteQueryBuilder)
}

pub fn delete_by_user(user_id: &str) -> Built {
    Query::delete()
        .from_table(Sessions::Table)
        .and_where(Expr::col(Sessions::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Delete every session whose expiry is at or before `now`.
pub fn delete_expired(now: &DateTime<Utc>) -> Built {
    Query::delete()
        .from_table(Sessions::Table)
        .and_where(Expr::col(Sessions::ExpiresAt).lte(ts(now)))
        .build(SqliteQueryBuilder)
}
