use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::models::User;

/// Everything the client persists between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoredState {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    /// UI preference keys such as the last active dashboard tab
    #[serde(default)]
    pub prefs: BTreeMap<String, String>,
}

/// Where the session lives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<StoredState>;
    async fn save(&self, state: &StoredState) -> Result<()>;
}

/// JSON file on disk
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<StoredState> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(StoredState::default()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|err| {
                ClientError::Session(format!("{}: {err}", self.path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no session file yet");
                Ok(StoredState::default())
            }
            Err(err) => Err(ClientError::Session(format!(
                "{}: {err}",
                self.path.display()
            ))),
        }
    }

    async fn save(&self, state: &StoredState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| ClientError::Session(format!("{}: {err}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|err| ClientError::Session(err.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|err| ClientError::Session(format!("{}: {err}", self.path.display())))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }
}

/// Process-local store, for tests and one-shot runs
#[derive(Default)]
pub struct MemorySessionStore {
    state: Mutex<StoredState>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<StoredState> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    async fn save(&self, state: &StoredState) -> Result<()> {
        *self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("rental-hub-{}", uuid::Uuid::new_v4()))
            .join("session.json")
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let store = FileSessionStore::new(temp_path());
        assert_eq!(store.load().await.unwrap(), StoredState::default());
    }

    #[tokio::test]
    async fn file_round_trips_token_user_and_prefs() {
        let path = temp_path();
        let store = FileSessionStore::new(&path);

        let mut state = StoredState {
            token: Some("tok".into()),
            user: Some(
                serde_json::from_value(json!({ "_id": "u1", "role": "Owner" })).unwrap(),
            ),
            ..StoredState::default()
        };
        state.prefs.insert("ownerActiveTab".into(), "bookings".into());
        store.save(&state).await.unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load().await.unwrap(), state);

        tokio::fs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn saved_user_with_unrecognised_role_still_loads() {
        let path = temp_path();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        let saved = json!({ "token": "tok", "user": { "id": "u1", "role": "Landlord" } });
        tokio::fs::write(&path, saved.to_string()).await.unwrap();

        let state = FileSessionStore::new(&path).load().await.unwrap();
        assert_eq!(state.token.as_deref(), Some("tok"));
        assert_eq!(state.user.and_then(|user| user.role), None);

        tokio::fs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_is_a_session_error() {
        let path = temp_path();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "{not json").await.unwrap();

        let err = FileSessionStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ClientError::Session(_)));

        tokio::fs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }
}
