//! Subscription query builders.
//!
//! `reference_id` is an unchecked owner reference; nothing here joins it.

use chrono::{DateTime, Utc};
use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::{Subscriptions, SUBSCRIPTION_COLUMNS};
use super::{opt_ts, Built};
use crate::model::Subscription;

pub fn insert(sub: &Subscription) -> Built {
    Query::insert()
        .into_table(Subscriptions::Table)
        .columns(SUBSCRIPTION_COLUMNS)
        .values_panic([
            sub.id.as_str().into(),
            sub.plan.as_str().into(),
            sub.reference_id.as_str().into(),
            sub.stripe_customer_id.clone().into(),
            sub.stripe_subscription_id.clone().into(),
            sub.status.clone().into(),
            opt_ts(sub.period_start.as_ref()),
            opt_ts(sub.period_end.as_ref()),
            sub.cancel_at_period_end.into(),
            sub.seats.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn get_by_id(id: &str) -> Built {
    Query::select()
        .columns(SUBSCRIPTION_COLUMNS)
        .from(Subscriptions::Table)
        .and_where(Expr::col(Subscriptions::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn list_by_reference(reference_id: &str) -> Built {
    Query::select()
        .columns(SUBSCRIPTION_COLUMNS)
        .from(Subscriptions::Table)
        .and_where(Expr::col(Subscriptions::ReferenceId).eq(reference_id))
        .order_by(Subscriptions::Id, Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Subscriptions billed to a Stripe customer (served by `stripe_customer_id_idx`).
pub fn list_by_stripe_customer(stripe_customer_id: &str) -> Built {
    Query::select()
        .columns(SUBSCRIPTION_COLUMNS)
        .from(Subscriptions::Table)
        .and_where(Expr::col(Subscriptions::StripeCustomerId).eq(stripe_customer_id))
        .order_by(Subscriptions::Id, Order::Asc)
        .build(SqliteQueryBuilder)
}

pub fn get_by_stripe_subscription(stripe_subscription_id: &str) -> Built {
    Query::select()
        .columns(SUBSCRIPTION_COLUMNS)
        .from(Subscriptions::Table)
        .and_where(Expr::col(Subscriptions::StripeSubscriptionId).eq(stripe_subscription_id))
        .build(SqliteQueryBuilder)
}

/// Billing-cycle update pushed from the payment provider.
pub fn update_status(
    id: &str,
    status: Option<&str>,
    period_start: Option<&DateTime<Utc>>,
    period_end: Option<&DateTime<Utc>>,
    cancel_at_period_end: Option<bool>,
) -> Built {
    Query::update()
        .table(Subscriptions::Table)
        .value(Subscriptions::Status, status.map(str::to_string))
        .value(Subscriptions::PeriodStart, opt_ts(period_start))
        .value(Subscriptions::PeriodEnd, opt_ts(period_end))
        .value(Subscriptions::CancelAtPeriodEnd, cancel_at_period_end)
        .and_where(Expr::col(Subscriptions::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn update_seats(id: &str, seats: Option<i32>) -> Built {
    Query::update()
        .table(Subscriptions::Table)
        .value(Subscriptions::Seats, seats)
        .and_where(Expr::col(Subscriptions::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Attach Stripe identifiers once checkout completes.
pub fn set_stripe_ids(
    id: &str,
    stripe_customer_id: Option<&str>,
    stripe_subscription_id: Option<&str>,
) -> Built {
    Query::update()
        .table(Subscriptions::Table)
        .value(
            Subscriptions::StripeCustomerId,
            stripe_customer_id.map(str::to_string),
        )
        .value(
            Subscriptions::StripeSubscriptionId,
            stripe_subscription_id.map(str::to_string),
        )
        .and_where(Expr::col(Subscriptions::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn delete_by_id(id: &str) -> Built {
    Query::delete()
        .from_table(Subscriptions::Table)
        .and_where(Expr::col(Subscriptions::Id).eq(id))
        .build(SqliteQueryBuilder)
}
