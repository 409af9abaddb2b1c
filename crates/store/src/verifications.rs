use authdb_schema::db::verifications;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::{rows, AuthDb, Verification};

impl AuthDb {
    pub fn insert_verification(&self, verification: &Verification) -> Result<()> {
        self.execute(verifications::insert(verification))?;
        Ok(())
    }

    /// The verification with the latest expiry for `identifier`, expired or not.
    pub fn latest_verification(&self, identifier: &str) -> Result<Option<Verification>> {
        self.query_one(
            verifications::latest_by_identifier(identifier),
            rows::verification,
        )
    }

    pub fn list_verifications(&self, identifier: &str) -> Result<Vec<Verification>> {
        self.query_all(
            verifications::list_by_identifier(identifier),
            rows::verification,
        )
    }

    pub fn delete_verification(&self, id: &str) -> Result<bool> {
        Ok(self.execute(verifications::delete_by_id(id))? > 0)
    }

    pub fn delete_verifications_for(&self, identifier: &str) -> Result<usize> {
        self.execute(verifications::delete_by_identifier(identifier))
    }

    pub fn delete_expired_verifications(&self, now: DateTime<Utc>) -> Result<usize> {
        self.execute(verifications::delete_expired(&now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_latest_prefers_furthest_expiry() {
        let db = AuthDb::open_in_memory().unwrap();
        let first = Verification::new("v1", "email:ada", "111111", now(), now() + Duration::minutes(5));
        let second = Verification::new("v2", "email:ada", "222222", now(), now() + Duration::minutes(10));
        db.insert_verification(&first).unwrap();
        db.insert_verification(&second).unwrap();
        db.insert_verification(&Verification::new(
            "v3",
            "email:bob",
            "333333",
            now(),
            now() + Duration::hours(1),
        ))
        .unwrap();

        assert_eq!(db.latest_verification("email:ada").unwrap(), Some(second));
        assert_eq!(db.list_verifications("email:ada").unwrap().len(), 2);
        assert_eq!(db.latest_verification("email:eve").unwrap(), None);
    }

    #[test]
    fn test_optional_timestamps_round_trip() {
        let db = AuthDb::open_in_memory().unwrap();
        let mut v = Verification::new("v1", "reset:u1", "tok", now(), now() + Duration::hours(1));
        v.created_at = None;
        v.updated_at = None;
        db.insert_verification(&v).unwrap();
        assert_eq!(db.latest_verification("reset:u1").unwrap(), Some(v));
    }

    #[test]
    fn test_delete_expired_is_inclusive() {
        let db = AuthDb::open_in_memory().unwrap();
        db.insert_verification(&Verification::new("v1", "i", "a", now(), now()))
            .unwrap();
        db.insert_verification(&Verification::new(
            "v2",
            "i",
            "b",
            now(),
            now() + Duration::milliseconds(1),
        ))
        .unwrap();
        assert_eq!(db.delete_expired_verifications(now()).unwrap(), 1);
        assert_eq!(db.latest_verification("i").unwrap().unwrap().id, "v2");
    }

    #[test]
    fn test_delete_by_id_and_identifier() {
        let db = AuthDb::open_in_memory().unwrap();
        for id in ["v1", "v2", "v3"] {
            db.insert_verification(&Verification::new(id, "i", id, now(), now()))
                .unwrap();
        }
        assert!(db.delete_verification("v1").unwrap());
        assert!(!db.delete_verification("v1").unwrap());
        assert_eq!(db.delete_verifications_for("i").unwrap(), 2);
    }
}
