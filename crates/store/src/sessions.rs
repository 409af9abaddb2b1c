use authdb_schema::db::sessions;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::{rows, AuthDb, Session};

impl AuthDb {
    /// Insert a session. Fails with a foreign-key violation when `user_id`
    /// does not exist and a unique violation when the token is taken.
    pub fn insert_session(&self, session: &Session) -> Result<()> {
        self.execute(sessions::insert(session))?;
        Ok(())
    }

    pub fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        self.query_one(sessions::get_by_id(session_id), rows::session)
    }

    pub fn get_session_by_token(&self, token: &str) -> Result<Option<Session>> {
        self.query_one(sessions::get_by_token(token), rows::session)
    }

    pub fn list_sessions_for_user(&self, user_id: &str) -> Result<Vec<Session>> {
        self.query_all(sessions::list_by_user(user_id), rows::session)
    }

    pub fn refresh_session(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.expect_row(
            "session",
            token,
            sessions::refresh(token, &expires_at, &now),
        )
    }

    pub fn delete_session(&self, token: &str) -> Result<bool> {
        Ok(self.execute(sessions::delete_by_token(token))? > 0)
    }

    pub fn delete_sessions_for_user(&self, user_id: &str) -> Result<usize> {
        self.execute(sessions::delete_by_user(user_id))
    }

    pub fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
        self.execute(sessions::delete_expired(&now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StoreError, User};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn db() -> AuthDb {
        let db = AuthDb::open_in_memory().unwrap();
        db.insert_user(&User::new("u1", "Ada", "ada@example.com", now()))
            .unwrap();
        db
    }

    #[test]
    fn test_token_lookup_round_trips() {
        let db = db();
        let mut session = Session::new("s1", "u1", "tok-1", now(), now() + Duration::days(7));
        session.ip_address = Some("127.0.0.1".into());
        session.user_agent = Some("curl/8".into());
        db.insert_session(&session).unwrap();
        assert_eq!(db.get_session_by_token("tok-1").unwrap(), Some(session.clone()));
        assert_eq!(db.get_session("s1").unwrap(), Some(session));
    }

    #[test]
    fn test_duplicate_token_is_rejected() {
        let db = db();
        db.insert_session(&Session::new("s1", "u1", "tok", now(), now()))
            .unwrap();
        let err = db
            .insert_session(&Session::new("s2", "u1", "tok", now(), now()))
            .unwrap_err();
        match err {
            StoreError::UniqueViolation { target } => assert_eq!(target, "sessions.token"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_refresh_extends_expiry() {
        let db = db();
        db.insert_session(&Session::new("s1", "u1", "tok", now(), now() + Duration::hours(1)))
            .unwrap();
        let later = now() + Duration::minutes(30);
        db.refresh_session("tok", later + Duration::days(1), later)
            .unwrap();
        let s = db.get_session_by_token("tok").unwrap().unwrap();
        assert_eq!(s.expires_at, later + Duration::days(1));
        assert_eq!(s.updated_at, later);
        assert_eq!(s.created_at, now());
        assert!(db.refresh_session("nope", later, later).is_err());
    }

    #[test]
    fn test_delete_expired_keeps_live_sessions() {
        let db = db();
        db.insert_session(&Session::new("old", "u1", "a", now(), now() - Duration::seconds(1)))
            .unwrap();
        db.insert_session(&Session::new("edge", "u1", "b", now(), now()))
            .unwrap();
        db.insert_session(&Session::new("live", "u1", "c", now(), now() + Duration::seconds(1)))
            .unwrap();
        assert_eq!(db.delete_expired_sessions(now()).unwrap(), 2);
        let left: Vec<_> = db
            .list_sessions_for_user("u1")
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(left, vec!["live"]);
    }

    #[test]
    fn test_delete_by_token_and_user() {
        let db = db();
        db.insert_session(&Session::new("s1", "u1", "a", now(), now()))
            .unwrap();
        db.insert_session(&Session::new("s2", "u1", "b", now(), now()))
            .unwrap();
        assert!(db.delete_session("a").unwrap());
        assert!(!db.delete_session("a").unwrap());
        assert_eq!(db.delete_sessions_for_user("u1").unwrap(), 1);
        assert!(db.list_sessions_for_user("u1").unwrap().is_empty());
    }
}
