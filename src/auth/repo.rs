use std::collections::HashMap;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{generate_temp_password, hash_password, verify_password};
use crate::auth::repo_types::{PublicUser, UserRecord};
use crate::config::AdminConfig;
use crate::errors::AuthError;
use crate::storage::{BlobStore, USER_DATABASE_KEY};

/// Credential store over the `user_database` blob: a mapping keyed by email,
/// loaded and persisted wholesale around every operation.
///
/// Persistence failures are non-fatal: the operation completes in memory and
/// the caller gets a success, but the change is not durable (it is logged).
pub struct UserStore {
    store: Arc<dyn BlobStore>,
}

impl UserStore {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> HashMap<String, UserRecord> {
        let text = match self.store.get(USER_DATABASE_KEY).await {
            Ok(Some(text)) => text,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                warn!(error = %e, "failed to read user database; starting empty");
                return HashMap::new();
            }
        };
        match serde_json::from_str(&text) {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "user database blob is corrupt; starting empty");
                HashMap::new()
            }
        }
    }

    async fn save(&self, users: &HashMap<String, UserRecord>) {
        let text = match serde_json::to_string(users) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "failed to serialize user database");
                return;
            }
        };
        if let Err(e) = self.store.put(USER_DATABASE_KEY, &text).await {
            warn!(error = %e, "failed to persist user database; change is not durable");
        }
    }

    /// Creates a user. Fails with `DuplicateUser` when the email is taken;
    /// the existing record is left untouched.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<PublicUser, AuthError> {
        let mut users = self.load().await;
        if users.contains_key(email) {
            return Err(AuthError::DuplicateUser);
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: hash_password(password)?,
            created_at: OffsetDateTime::now_utc(),
            last_login: None,
        };
        let view = PublicUser::from(&record);
        users.insert(email.to_string(), record);
        self.save(&users).await;

        info!(email = %email, user_id = %view.id, "user created");
        Ok(view)
    }

    /// Checks credentials and stamps `last_login` on success. A failed
    /// attempt never touches the record.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<PublicUser, AuthError> {
        let mut users = self.load().await;
        let user = users.get_mut(email).ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredential);
        }

        user.last_login = Some(OffsetDateTime::now_utc());
        let view = PublicUser::from(&*user);
        self.save(&users).await;
        Ok(view)
    }

    /// Overwrites the stored hash with a fresh temporary password and returns
    /// that password in plaintext. The API response is the only channel back
    /// to the user, so the plaintext goes to the caller; logged so deployments
    /// notice the tradeoff.
    pub async fn reset_password(&self, email: &str) -> Result<String, AuthError> {
        let mut users = self.load().await;
        let user = users.get_mut(email).ok_or(AuthError::UserNotFound)?;

        let temp = generate_temp_password();
        user.password_hash = hash_password(&temp)?;
        self.save(&users).await;

        warn!(email = %email, "password reset issued; temporary password returned to caller");
        Ok(temp)
    }

    /// Updates name and/or password. Only those two fields are mutable.
    pub async fn update_user(
        &self,
        email: &str,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<PublicUser, AuthError> {
        let mut users = self.load().await;
        let user = users.get_mut(email).ok_or(AuthError::UserNotFound)?;

        if let Some(name) = name {
            user.name = name.to_string();
        }
        if let Some(password) = password {
            user.password_hash = hash_password(password)?;
        }
        let view = PublicUser::from(&*user);
        self.save(&users).await;
        Ok(view)
    }

    pub async fn delete_user(&self, email: &str) -> Result<(), AuthError> {
        let mut users = self.load().await;
        if users.remove(email).is_none() {
            return Err(AuthError::UserNotFound);
        }
        self.save(&users).await;
        info!(email = %email, "user deleted");
        Ok(())
    }

    pub async fn get_by_email(&self, email: &str) -> Result<PublicUser, AuthError> {
        let users = self.load().await;
        users
            .get(email)
            .map(PublicUser::from)
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<PublicUser, AuthError> {
        let users = self.load().await;
        users
            .values()
            .find(|u| u.id == id)
            .map(PublicUser::from)
            .ok_or(AuthError::UserNotFound)
    }

    /// Sanitized views of every user, ordered by creation time.
    pub async fn list_users(&self) -> Vec<PublicUser> {
        let users = self.load().await;
        let mut views: Vec<PublicUser> = users.values().map(PublicUser::from).collect();
        views.sort_by_key(|u| u.created_at);
        views
    }

    /// Creates the configured admin account when the store is empty.
    /// Returns whether an account was provisioned.
    pub async fn bootstrap_admin(&self, admin: &AdminConfig) -> Result<bool, AuthError> {
        if !self.load().await.is_empty() {
            return Ok(false);
        }
        let (Some(email), Some(password)) = (&admin.email, &admin.password) else {
            return Ok(false);
        };
        let name = admin.name.as_deref().unwrap_or("Administrator");
        self.create_user(email, password, name).await?;
        info!(email = %email, "provisioned initial admin account");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> UserStore {
        UserStore::new(Arc::new(MemoryStore::default()))
    }

    #[tokio::test]
    async fn create_then_authenticate_succeeds() {
        let users = store();
        users
            .create_user("jane@example.com", "hunter2hunter2", "Jane")
            .await
            .expect("create");

        let view = users
            .authenticate("jane@example.com", "hunter2hunter2")
            .await
            .expect("authenticate");
        assert_eq!(view.email, "jane@example.com");
        assert_eq!(view.name, "Jane");
        assert!(view.last_login.is_some());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_record_unchanged() {
        let users = store();
        users
            .create_user("jane@example.com", "first-password", "Jane")
            .await
            .expect("create");

        let err = users
            .create_user("jane@example.com", "second-password", "Imposter")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser));

        // Original credentials and name still stand.
        let view = users
            .authenticate("jane@example.com", "first-password")
            .await
            .expect("authenticate");
        assert_eq!(view.name, "Jane");
    }

    #[tokio::test]
    async fn wrong_password_does_not_touch_last_login() {
        let users = store();
        users
            .create_user("jane@example.com", "hunter2hunter2", "Jane")
            .await
            .expect("create");

        let err = users
            .authenticate("jane@example.com", "nope-nope-nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredential));

        let view = users.get_by_email("jane@example.com").await.expect("get");
        assert!(view.last_login.is_none());
    }

    #[tokio::test]
    async fn unknown_email_is_user_not_found() {
        let users = store();
        let err = users.authenticate("ghost@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn reset_invalidates_old_password_and_temp_works() {
        let users = store();
        users
            .create_user("jane@example.com", "old-password-1", "Jane")
            .await
            .expect("create");

        let temp = users.reset_password("jane@example.com").await.expect("reset");
        assert_eq!(temp.len(), crate::auth::password::TEMP_PASSWORD_LEN);

        let err = users
            .authenticate("jane@example.com", "old-password-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredential));

        users
            .authenticate("jane@example.com", &temp)
            .await
            .expect("temp password authenticates");
    }

    #[tokio::test]
    async fn update_changes_name_and_password() {
        let users = store();
        users
            .create_user("jane@example.com", "old-password-1", "Jane")
            .await
            .expect("create");

        users
            .update_user("jane@example.com", Some("Jane Doe"), Some("new-password-1"))
            .await
            .expect("update");

        let view = users
            .authenticate("jane@example.com", "new-password-1")
            .await
            .expect("authenticate with new password");
        assert_eq!(view.name, "Jane Doe");
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let users = store();
        users
            .create_user("jane@example.com", "hunter2hunter2", "Jane")
            .await
            .expect("create");
        users.delete_user("jane@example.com").await.expect("delete");

        let err = users.get_by_email("jane@example.com").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));

        let err = users.delete_user("jane@example.com").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn bootstrap_seeds_exactly_one_account_when_configured() {
        let users = store();
        let admin = AdminConfig {
            email: Some("admin@example.com".into()),
            password: Some("provisioned-pw".into()),
            name: Some("Admin".into()),
        };

        assert!(users.bootstrap_admin(&admin).await.expect("bootstrap"));
        let all = users.list_users().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].email, "admin@example.com");

        // Second run is a no-op: the store is no longer empty.
        assert!(!users.bootstrap_admin(&admin).await.expect("bootstrap again"));
        assert_eq!(users.list_users().await.len(), 1);
    }

    #[tokio::test]
    async fn bootstrap_without_config_seeds_nothing() {
        let users = store();
        assert!(!users
            .bootstrap_admin(&AdminConfig::default())
            .await
            .expect("bootstrap"));
        assert!(users.list_users().await.is_empty());
    }

    #[tokio::test]
    async fn create_user_completes_when_the_write_fails() {
        use crate::storage::WriteFailStore;

        let users = UserStore::new(Arc::new(WriteFailStore::default()));
        let view = users
            .create_user("jane@example.com", "hunter2hunter2", "Jane")
            .await
            .expect("create completes despite the write failure");
        assert_eq!(view.email, "jane@example.com");
        assert_eq!(view.name, "Jane");

        // The change was never persisted, so a fresh load does not see it.
        let err = users.get_by_email("jane@example.com").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn unreadable_user_database_starts_empty() {
        let blob: Arc<dyn BlobStore> = Arc::new(MemoryStore::default());
        blob.put(USER_DATABASE_KEY, "{ not json").await.unwrap();

        let users = UserStore::new(blob);
        assert!(users.list_users().await.is_empty());
        users
            .create_user("jane@example.com", "hunter2hunter2", "Jane")
            .await
            .expect("create over a corrupt blob");
    }

    #[tokio::test]
    async fn store_survives_reload_from_same_blob() {
        let blob: Arc<dyn BlobStore> = Arc::new(MemoryStore::default());
        let users = UserStore::new(blob.clone());
        users
            .create_user("jane@example.com", "hunter2hunter2", "Jane")
            .await
            .expect("create");

        // A second store over the same blob sees the persisted record.
        let reloaded = UserStore::new(blob);
        let view = reloaded
            .authenticate("jane@example.com", "hunter2hunter2")
            .await
            .expect("authenticate after reload");
        assert_eq!(view.name, "Jane");
    }
}
