use authdb_schema::db::users;
use chrono::{DateTime, Utc};

use crate::error::{Result, StoreError};
use crate::{rows, AuthDb, User};

impl AuthDb {
    pub fn insert_user(&self, user: &User) -> Result<()> {
        self.execute(users::insert(user))?;
        Ok(())
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.query_one(users::get_by_id(user_id), rows::user)
    }

    /// Like [`get_user`](Self::get_user) but a missing row is an error.
    pub fn require_user(&self, user_id: &str) -> Result<User> {
        self.get_user(user_id)?
            .ok_or_else(|| StoreError::not_found("user", user_id))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_one(users::get_by_email(email), rows::user)
    }

    pub fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self
            .query_one(users::email_exists(email), |row| row.get(0))?
            .unwrap_or(false))
    }

    pub fn list_users(&self, limit: u64, offset: u64) -> Result<Vec<User>> {
        self.query_all(users::list(limit, offset), rows::user)
    }

    pub fn count_users(&self) -> Result<i64> {
        Ok(self
            .query_one(users::count(), |row| row.get(0))?
            .unwrap_or(0))
    }

    /// Persist every mutable field of `user`. The id selects the row and is
    /// never rewritten.
    pub fn update_user(&self, user: &User) -> Result<()> {
        self.expect_row("user", &user.id, users::update(user))
    }

    pub fn set_email_verified(
        &self,
        user_id: &str,
        verified: bool,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.expect_row(
            "user",
            user_id,
            users::set_email_verified(user_id, verified, &now),
        )
    }

    pub fn set_stripe_customer_id(
        &self,
        user_id: &str,
        stripe_customer_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.expect_row(
            "user",
            user_id,
            users::set_stripe_customer_id(user_id, stripe_customer_id, &now),
        )
    }

    pub fn set_role(&self, user_id: &str, role: Option<&str>, now: DateTime<Utc>) -> Result<()> {
        self.expect_row("user", user_id, users::set_role(user_id, role, &now))
    }

    pub fn ban_user(
        &self,
        user_id: &str,
        reason: Option<&str>,
        expires: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.expect_row(
            "user",
            user_id,
            users::ban(user_id, reason, expires.as_ref(), &now),
        )
    }

    pub fn unban_user(&self, user_id: &str, now: DateTime<Utc>) -> Result<()> {
        self.expect_row("user", user_id, users::unban(user_id, &now))
    }

    /// Delete a user and, through the cascade, its sessions and accounts.
    /// Returns whether a row was removed.
    pub fn delete_user(&self, user_id: &str) -> Result<bool> {
        Ok(self.execute(users::delete(user_id))? > 0)
    }

    /// Execute a keyed update; zero affected rows is `NotFound`.
    pub(crate) fn expect_row(
        &self,
        entity: &'static str,
        key: &str,
        built: authdb_schema::db::Built,
    ) -> Result<()> {
        match self.execute(built)? {
            0 => Err(StoreError::not_found(entity, key)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn db_with_user() -> AuthDb {
        let db = AuthDb::open_in_memory().unwrap();
        db.insert_user(&User::new("u1", "Ada", "ada@example.com", now()))
            .unwrap();
        db
    }

    #[test]
    fn test_insert_and_lookup() {
        let db = db_with_user();
        let by_id = db.get_user("u1").unwrap().unwrap();
        let by_email = db.get_user_by_email("ada@example.com").unwrap().unwrap();
        assert_eq!(by_id, by_email);
        assert_eq!(by_id.created_at, now());
        assert!(!by_id.email_verified);
        assert!(db.email_exists("ada@example.com").unwrap());
        assert!(!db.email_exists("bob@example.com").unwrap());
        assert_eq!(db.get_user("missing").unwrap(), None);
    }

    #[test]
    fn test_update_user_round_trips_optional_fields() {
        let db = db_with_user();
        let mut user = db.require_user("u1").unwrap();
        user.image = Some("https://img.example/ada.png".into());
        user.role = Some("admin".into());
        user.updated_at = now() + Duration::hours(1);
        db.update_user(&user).unwrap();
        assert_eq!(db.require_user("u1").unwrap(), user);
    }

    #[test]
    fn test_ban_and_unban() {
        let db = db_with_user();
        let until = now() + Duration::days(7);
        db.ban_user("u1", Some("spam"), Some(until), now()).unwrap();
        let banned = db.require_user("u1").unwrap();
        assert_eq!(banned.banned, Some(true));
        assert_eq!(banned.ban_reason.as_deref(), Some("spam"));
        assert_eq!(banned.ban_expires, Some(until));

        db.unban_user("u1", now()).unwrap();
        let user = db.require_user("u1").unwrap();
        assert_eq!(user.banned, Some(false));
        assert_eq!(user.ban_reason, None);
        assert_eq!(user.ban_expires, None);
    }

    #[test]
    fn test_keyed_update_on_missing_user_is_not_found() {
        let db = AuthDb::open_in_memory().unwrap();
        let err = db.set_email_verified("ghost", true, now()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "user", .. }));
        assert!(matches!(
            db.require_user("ghost").unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_list_and_count() {
        let db = db_with_user();
        db.insert_user(&User::new(
            "u2",
            "Bob",
            "bob@example.com",
            now() + Duration::seconds(1),
        ))
        .unwrap();
        assert_eq!(db.count_users().unwrap(), 2);
        let ids: Vec<_> = db
            .list_users(10, 0)
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["u1", "u2"]);
        assert_eq!(db.list_users(1, 1).unwrap()[0].id, "u2");
    }

    #[test]
    fn test_stripe_customer_and_role() {
        let db = db_with_user();
        db.set_stripe_customer_id("u1", Some("cus_1"), now()).unwrap();
        db.set_role("u1", Some("admin"), now()).unwrap();
        let user = db.require_user("u1").unwrap();
        assert_eq!(user.stripe_customer_id.as_deref(), Some("cus_1"));
        assert_eq!(user.role.as_deref(), Some("admin"));
    }
}
