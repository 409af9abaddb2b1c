//! Identifiers, migrations, and SQLite query builders for the auth tables.

pub mod accounts;
pub mod migrations;
pub mod sessions;
pub mod subscriptions;
pub mod tables;
pub mod users;
pub mod verifications;

pub use tables::*;

use chrono::{DateTime, Utc};
use sea_query::SimpleExpr;

use crate::model::encode_timestamp;

/// A rendered statement and its positional bind values.
pub type Built = (String, sea_query::Values);

pub(crate) fn ts(dt: &DateTime<Utc>) -> SimpleExpr {
    encode_timestamp(dt).into()
}

pub(crate) fn opt_ts(dt: Option<&DateTime<Utc>>) -> SimpleExpr {
    dt.map(encode_timestamp).into()
}
