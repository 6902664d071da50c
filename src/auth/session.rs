use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::auth::repo_types::PublicUser;
use crate::storage::{BlobStore, CURRENT_USER_KEY};

/// The "currently logged in user" marker, persisted under its own key
/// independently of the user database. Written on login/signup, read on
/// load, cleared on logout.
///
/// This marker only restores display state; it is not proof of identity.
/// Authorization always goes through the signed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
}

impl From<&PublicUser> for SessionUser {
    fn from(u: &PublicUser) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: u.name.clone(),
            last_login: u.last_login,
        }
    }
}

pub struct SessionStore {
    store: Arc<dyn BlobStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub async fn write(&self, user: &SessionUser) {
        let text = match serde_json::to_string(user) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "failed to serialize session marker");
                return;
            }
        };
        if let Err(e) = self.store.put(CURRENT_USER_KEY, &text).await {
            warn!(error = %e, "failed to persist session marker");
        }
    }

    pub async fn read(&self) -> Option<SessionUser> {
        let text = match self.store.get(CURRENT_USER_KEY).await {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read session marker");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "session marker blob is corrupt; ignoring");
                None
            }
        }
    }

    pub async fn clear(&self) {
        if let Err(e) = self.store.delete(CURRENT_USER_KEY).await {
            warn!(error = %e, "failed to clear session marker");
        }
    }
}
