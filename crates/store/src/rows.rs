//! Row decoders. Column positions follow the `*_COLUMNS` arrays in
//! `authdb_schema::db::tables`.

use authdb_schema::model::{decode_timestamp, Account, Session, Subscription, User, Verification};
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::Row;

#[derive(Debug, thiserror::Error)]
#[error("cannot decode timestamp '{raw}'")]
pub(crate) struct BadTimestamp {
    pub(crate) raw: String,
    #[source]
    source: chrono::ParseError,
}

fn parse_ts(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    decode_timestamp(&raw).map_err(|source| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(BadTimestamp { raw, source }),
        )
    })
}

fn ts(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    parse_ts(idx, row.get(idx)?)
}

fn opt_ts(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<String>>(idx)?
        .map(|raw| parse_ts(idx, raw))
        .transpose()
}

pub(crate) fn user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        email_verified: row.get(3)?,
        image: row.get(4)?,
        created_at: ts(row, 5)?,
        updated_at: ts(row, 6)?,
        stripe_customer_id: row.get(7)?,
        role: row.get(8)?,
        banned: row.get(9)?,
        ban_reason: row.get(10)?,
        ban_expires: opt_ts(row, 11)?,
    })
}

pub(crate) fn session(row: &Row) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        expires_at: ts(row, 1)?,
        token: row.get(2)?,
        created_at: ts(row, 3)?,
        updated_at: ts(row, 4)?,
        ip_address: row.get(5)?,
        user_agent: row.get(6)?,
        user_id: row.get(7)?,
        impersonated_by: row.get(8)?,
    })
}

pub(crate) fn account(row: &Row) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        account_id: row.get(1)?,
        provider_id: row.get(2)?,
        user_id: row.get(3)?,
        access_token: row.get(4)?,
        refresh_token: row.get(5)?,
        id_token: row.get(6)?,
        access_token_expires_at: opt_ts(row, 7)?,
        refresh_token_expires_at: opt_ts(row, 8)?,
        scope: row.get(9)?,
        password: row.get(10)?,
        created_at: ts(row, 11)?,
        updated_at: ts(row, 12)?,
    })
}

pub(crate) fn verification(row: &Row) -> rusqlite::Result<Verification> {
    Ok(Verification {
        id: row.get(0)?,
        identifier: row.get(1)?,
        value: row.get(2)?,
        expires_at: ts(row, 3)?,
        created_at: opt_ts(row, 4)?,
        updated_at: opt_ts(row, 5)?,
    })
}

pub(crate) fn subscription(row: &Row) -> rusqlite::Result<Subscription> {
    Ok(Subscription {
        id: row.get(0)?,
        plan: row.get(1)?,
        reference_id: row.get(2)?,
        stripe_customer_id: row.get(3)?,
        stripe_subscription_id: row.get(4)?,
        status: row.get(5)?,
        period_start: opt_ts(row, 6)?,
        period_end: opt_ts(row, 7)?,
        cancel_at_period_end: row.get(8)?,
        seats: row.get(9)?,
    })
}

/// Convert `sea_query::Values` into rusqlite bind params.
pub(crate) fn values_to_sql(values: &sea_query::Values) -> Vec<SqlValue> {
    use sea_query::Value;

    values
        .0
        .iter()
        .map(|v| match v {
            Value::Bool(Some(b)) => SqlValue::Integer(i64::from(*b)),
            Value::TinyInt(Some(i)) => SqlValue::Integer(i64::from(*i)),
            Value::SmallInt(Some(i)) => SqlValue::Integer(i64::from(*i)),
            Value::Int(Some(i)) => SqlValue::Integer(i64::from(*i)),
            Value::BigInt(Some(i)) => SqlValue::Integer(*i),
            Value::TinyUnsigned(Some(u)) => SqlValue::Integer(i64::from(*u)),
            Value::SmallUnsigned(Some(u)) => SqlValue::Integer(i64::from(*u)),
            Value::Unsigned(Some(u)) => SqlValue::Integer(i64::from(*u)),
            Value::BigUnsigned(Some(u)) => SqlValue::Integer(i64::try_from(*u).unwrap_or(i64::MAX)),
            Value::Float(Some(f)) => SqlValue::Real(f64::from(*f)),
            Value::Double(Some(f)) => SqlValue::Real(*f),
            Value::String(Some(s)) => SqlValue::Text(s.to_string()),
            Value::Char(Some(c)) => SqlValue::Text(c.to_string()),
            Value::Bytes(Some(b)) => SqlValue::Blob(b.to_vec()),
            _ => SqlValue::Null,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_map_to_sqlite_types() {
        let values = sea_query::Values(vec![
            true.into(),
            7i32.into(),
            "x".into(),
            Option::<String>::None.into(),
            10u64.into(),
        ]);
        assert_eq!(
            values_to_sql(&values),
            vec![
                SqlValue::Integer(1),
                SqlValue::Integer(7),
                SqlValue::Text("x".into()),
                SqlValue::Null,
                SqlValue::Integer(10),
            ]
        );
    }
}
