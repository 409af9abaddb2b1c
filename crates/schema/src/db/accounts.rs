//! Linked-account query builders.

use chrono::{DateTime, Utc};
use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::{Accounts, ACCOUNT_COLUMNS};
use super::{opt_ts, ts, Built};
use crate::model::{Account, AccountTokens};

pub fn insert(account: &Account) -> Built {
    Query::insert()
        .into_table(Accounts::Table)
        .columns(ACCOUNT_COLUMNS)
        .values_panic([
            account.id.as_str().into(),
            account.account_id.as_str().into(),
            account.provider_id.as_str().into(),
            account.user_id.as_str().into(),
            account.access_token.clone().into(),
            account.refresh_token.clone().into(),
            account.id_token.clone().into(),
            opt_ts(account.access_token_expires_at.as_ref()),
            opt_ts(account.refresh_token_expires_at.as_ref()),
            account.scope.clone().into(),
            account.password.clone().into(),
            ts(&account.created_at),
            ts(&account.updated_at),
        ])
        .build(SqliteQueryBuilder)
}

/// Resolve an external identity: `(provider_id, account_id)`.
pub fn get_by_provider(provider_id: &str, account_id: &str) -> Built {
    Query::select()
        .columns(ACCOUNT_COLUMNS)
        .from(Accounts::Table)
        .and_where(Expr::col(Accounts::ProviderId).eq(provider_id))
        .and_where(Expr::col(Accounts::AccountId).eq(account_id))
        .build(SqliteQueryBuilder)
}

pub fn get_by_id(id: &str) -> Built {
    Query::select()
        .columns(ACCOUNT_COLUMNS)
        .from(Accounts::Table)
        .and_where(Expr::col(Accounts::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Accounts linked to a user (served by `user_id_idx_accounts`).
pub fn list_by_user(user_id: &str) -> Built {
    Query::select()
        .columns(ACCOUNT_COLUMNS)
        .from(Accounts::Table)
        .and_where(Expr::col(Accounts::UserId).eq(user_id))
        .order_by(Accounts::CreatedAt, Order::Asc)
        .order_by(Accounts::Id, Order::Asc)
        .build(SqliteQueryBuilder)
}

pub fn update_tokens(id: &str, tokens: &AccountTokens, now: &DateTime<Utc>) -> Built {
    Query::update()
        .table(Accounts::Table)
        .value(Accounts::AccessToken, tokens.access_token.clone())
        .value(Accounts::RefreshToken, tokens.refresh_token.clone())
        .value(Accounts::IdToken, tokens.id_token.clone())
        .value(
            Accounts::AccessTokenExpiresAt,
            opt_ts(tokens.access_token_expires_at.as_ref()),
        )
        .value(
            Accounts::RefreshTokenExpiresAt,
            opt_ts(tokens.refresh_token_expires_at.as_ref()),
        )
        .value(Accounts::Scope, tokens.scope.clone())
        .value(Accounts::UpdatedAt, ts(now))
        .and_where(Expr::col(Accounts::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Set (or clear) the credential hash of an account.
pub fn update_password(id: &str, password_hash: Option<&str>, now: &DateTime<Utc>) -> Built {
    Query::update()
        .table(Accounts::Table)
        .value(Accounts::Password, password_hash.map(str::to_string))
        .value(Accounts::UpdatedAt, ts(now))
        .and_where(Expr::col(Accounts::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn delete_by_id(id: &str) -> Built {
    Query::delete()
        .from_table(Accounts::Table)
        .and_where(Expr::col(Accounts::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Unlink one provider from a user.
pub fn delete_by_user_and_provider(user_id: &str, provider_id: &str) -> Built {
    Query::delete()
        .from_table(Accounts::Table)
        .and_where(Expr::col(Accounts::UserId).eq(user_id))
        .and_where(Expr::col(Accounts::ProviderId).eq(provider_id))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_lookup_binds_both_keys() {
        let (sql, values) = get_by_provider("github", "12345");
        assert!(sql.ends_with(r#"WHERE "provider_id" = ? AND "account_id" = ?"#));
        assert_eq!(values.0.len(), 2);
    }

    #[test]
    fn update_tokens_leaves_identity_columns_alone() {
        let (sql, _) = update_tokens("a1", &AccountTokens::default(), &Utc::now());
        let set_clause = sql.split("WHERE").next().unwrap();
        for col in ["\"account_id\"", "\"provider_id\"", "\"user_id\"", "\"password\""] {
            assert!(!set_clause.contains(col), "{col}");
        }
    }
}
