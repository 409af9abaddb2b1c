use authdb_schema::db::subscriptions;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::{rows, AuthDb, Subscription};

impl AuthDb {
    /// Insert a subscription. `reference_id` is not a foreign key, so it may
    /// name a user, an organization, or anything else.
    pub fn insert_subscription(&self, subscription: &Subscription) -> Result<()> {
        self.execute(subscriptions::insert(subscription))?;
        Ok(())
    }

    pub fn get_subscription(&self, id: &str) -> Result<Option<Subscription>> {
        self.query_one(subscriptions::get_by_id(id), rows::subscription)
    }

    pub fn list_subscriptions_for_reference(&self, reference_id: &str) -> Result<Vec<Subscription>> {
        self.query_all(
            subscriptions::list_by_reference(reference_id),
            rows::subscription,
        )
    }

    pub fn list_subscriptions_for_stripe_customer(
        &self,
        stripe_customer_id: &str,
    ) -> Result<Vec<Subscription>> {
        self.query_all(
            subscriptions::list_by_stripe_customer(stripe_customer_id),
            rows::subscription,
        )
    }

    pub fn find_subscription_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>> {
        self.query_one(
            subscriptions::get_by_stripe_subscription(stripe_subscription_id),
            rows::subscription,
        )
    }

    pub fn update_subscription_status(
        &self,
        id: &str,
        status: Option<&str>,
        period_start: Option<DateTime<Utc>>,
        period_end: Option<DateTime<Utc>>,
        cancel_at_period_end: Option<bool>,
    ) -> Result<()> {
        self.expect_row(
            "subscription",
            id,
            subscriptions::update_status(
                id,
                status,
                period_start.as_ref(),
                period_end.as_ref(),
                cancel_at_period_end,
            ),
        )
    }

    pub fn update_subscription_seats(&self, id: &str, seats: Option<i32>) -> Result<()> {
        self.expect_row("subscription", id, subscriptions::update_seats(id, seats))
    }

    pub fn set_subscription_stripe_ids(
        &self,
        id: &str,
        stripe_customer_id: Option<&str>,
        stripe_subscription_id: Option<&str>,
    ) -> Result<()> {
        self.expect_row(
            "subscription",
            id,
            subscriptions::set_stripe_ids(id, stripe_customer_id, stripe_subscription_id),
        )
    }

    pub fn delete_subscription(&self, id: &str) -> Result<bool> {
        Ok(self.execute(subscriptions::delete_by_id(id))? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_reference_is_not_enforced() {
        let db = AuthDb::open_in_memory().unwrap();
        let sub = Subscription::new("sub1", "pro", "org_without_user_row");
        db.insert_subscription(&sub).unwrap();
        assert_eq!(db.get_subscription("sub1").unwrap(), Some(sub.clone()));
        assert_eq!(
            db.list_subscriptions_for_reference("org_without_user_row")
                .unwrap(),
            vec![sub]
        );
    }

    #[test]
    fn test_checkout_then_billing_cycle() {
        let db = AuthDb::open_in_memory().unwrap();
        db.insert_subscription(&Subscription::new("sub1", "pro", "u1"))
            .unwrap();
        db.set_subscription_stripe_ids("sub1", Some("cus_1"), Some("sub_stripe_1"))
            .unwrap();

        let end = now() + Duration::days(30);
        db.update_subscription_status("sub1", Some("active"), Some(now()), Some(end), Some(false))
            .unwrap();
        db.update_subscription_seats("sub1", Some(5)).unwrap();

        let sub = db
            .find_subscription_by_stripe_id("sub_stripe_1")
            .unwrap()
            .unwrap();
        assert_eq!(sub.id, "sub1");
        assert_eq!(sub.status.as_deref(), Some("active"));
        assert_eq!(sub.period_start, Some(now()));
        assert_eq!(sub.period_end, Some(end));
        assert_eq!(sub.cancel_at_period_end, Some(false));
        assert_eq!(sub.seats, Some(5));
        assert_eq!(
            db.list_subscriptions_for_stripe_customer("cus_1")
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_missing_subscription() {
        let db = AuthDb::open_in_memory().unwrap();
        assert!(matches!(
            db.update_subscription_seats("nope", Some(1)).unwrap_err(),
            StoreError::NotFound { entity: "subscription", .. }
        ));
        assert!(!db.delete_subscription("nope").unwrap());
    }
}
