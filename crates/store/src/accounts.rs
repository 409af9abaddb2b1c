use authdb_schema::db::accounts;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::{rows, Account, AccountTokens, AuthDb};

impl AuthDb {
    pub fn insert_account(&self, account: &Account) -> Result<()> {
        self.execute(accounts::insert(account))?;
        Ok(())
    }

    pub fn get_account(&self, id: &str) -> Result<Option<Account>> {
        self.query_one(accounts::get_by_id(id), rows::account)
    }

    /// Look up the account a provider reports as `account_id`.
    pub fn find_account(&self, provider_id: &str, account_id: &str) -> Result<Option<Account>> {
        self.query_one(
            accounts::get_by_provider(provider_id, account_id),
            rows::account,
        )
    }

    pub fn list_accounts_for_user(&self, user_id: &str) -> Result<Vec<Account>> {
        self.query_all(accounts::list_by_user(user_id), rows::account)
    }

    pub fn update_account_tokens(
        &self,
        id: &str,
        tokens: &AccountTokens,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.expect_row("account", id, accounts::update_tokens(id, tokens, &now))
    }

    /// Replace (or clear, with `None`) the stored password hash.
    pub fn update_account_password(
        &self,
        id: &str,
        password_hash: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.expect_row(
            "account",
            id,
            accounts::update_password(id, password_hash, &now),
        )
    }

    pub fn delete_account(&self, id: &str) -> Result<bool> {
        Ok(self.execute(accounts::delete_by_id(id))? > 0)
    }

    /// Remove every account linking `user_id` to `provider_id`.
    pub fn unlink_account(&self, user_id: &str, provider_id: &str) -> Result<usize> {
        self.execute(accounts::delete_by_user_and_provider(user_id, provider_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StoreError, User};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn db() -> AuthDb {
        let db = AuthDb::open_in_memory().unwrap();
        db.insert_user(&User::new("u1", "Ada", "ada@example.com", now()))
            .unwrap();
        db
    }

    #[test]
    fn test_provider_lookup() {
        let db = db();
        let mut github = Account::new("a1", "u1", "github", "gh-42", now());
        github.scope = Some("read:user".into());
        db.insert_account(&github).unwrap();
        db.insert_account(&Account::new("a2", "u1", "google", "gh-42", now()))
            .unwrap();

        assert_eq!(db.find_account("github", "gh-42").unwrap(), Some(github));
        assert_eq!(db.find_account("github", "other").unwrap(), None);
        assert_eq!(db.list_accounts_for_user("u1").unwrap().len(), 2);
    }

    #[test]
    fn test_update_tokens() {
        let db = db();
        db.insert_account(&Account::new("a1", "u1", "github", "gh-42", now()))
            .unwrap();
        let tokens = AccountTokens {
            access_token: Some("at".into()),
            refresh_token: Some("rt".into()),
            access_token_expires_at: Some(now() + Duration::hours(1)),
            ..AccountTokens::default()
        };
        let later = now() + Duration::minutes(5);
        db.update_account_tokens("a1", &tokens, later).unwrap();

        let account = db.get_account("a1").unwrap().unwrap();
        assert_eq!(account.access_token.as_deref(), Some("at"));
        assert_eq!(account.refresh_token.as_deref(), Some("rt"));
        assert_eq!(account.access_token_expires_at, tokens.access_token_expires_at);
        assert_eq!(account.id_token, None);
        assert_eq!(account.updated_at, later);
        assert_eq!(account.created_at, now());
    }

    #[test]
    fn test_password_set_and_clear() {
        let db = db();
        db.insert_account(&Account::new("a1", "u1", "credential", "u1", now()))
            .unwrap();
        db.update_account_password("a1", Some("$argon2id$hash"), now())
            .unwrap();
        assert_eq!(
            db.get_account("a1").unwrap().unwrap().password.as_deref(),
            Some("$argon2id$hash")
        );
        db.update_account_password("a1", None, now()).unwrap();
        assert_eq!(db.get_account("a1").unwrap().unwrap().password, None);

        let err = db.update_account_password("missing", None, now()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "account", .. }));
    }

    #[test]
    fn test_unknown_user_is_rejected() {
        let db = db();
        let err = db
            .insert_account(&Account::new("a1", "ghost", "github", "x", now()))
            .unwrap_err();
        assert!(err.is_foreign_key_violation());
    }

    #[test]
    fn test_unlink_and_delete() {
        let db = db();
        db.insert_account(&Account::new("a1", "u1", "github", "x", now()))
            .unwrap();
        db.insert_account(&Account::new("a2", "u1", "google", "y", now()))
            .unwrap();
        assert_eq!(db.unlink_account("u1", "github").unwrap(), 1);
        assert_eq!(db.unlink_account("u1", "github").unwrap(), 0);
        assert!(db.delete_account("a2").unwrap());
        assert!(db.list_accounts_for_user("u1").unwrap().is_empty());
    }
}
