use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::error::{ClientError, Result};
use crate::models::{Role, User};
use crate::session::store::{SessionStore, StoredState};

/// Preference keys cleared on logout
pub const OWNER_ACTIVE_TAB: &str = "ownerActiveTab";
pub const TENANT_ACTIVE_TAB: &str = "tenantActiveTab";

/// A logged-in session: the bearer token and the account it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn role(&self) -> Option<Role> {
        self.user.role
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

/// The single accessor for session state, shared by the HTTP client and the guard.
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<StoredState>>,
    store: Arc<dyn SessionStore>,
}

impl SessionHandle {
    /// Loads whatever the store holds.
    pub async fn open(store: Arc<dyn SessionStore>) -> Result<Self> {
        let state = store.load().await?;
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            store,
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, StoredState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoredState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// Both a token and a user, or nothing.
    pub fn current(&self) -> Option<Session> {
        let state = self.read();
        match (&state.token, &state.user) {
            (Some(token), Some(user)) => Some(Session {
                token: token.clone(),
                user: user.clone(),
            }),
            _ => None,
        }
    }

    pub fn state(&self) -> AuthState {
        if self.current().is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    /// The current session, or `Unauthenticated`.
    pub fn require(&self) -> Result<Session> {
        self.current().ok_or(ClientError::Unauthenticated)
    }

    pub async fn sign_in(&self, session: Session) -> Result<()> {
        let snapshot = {
            let mut state = self.write();
            state.token = Some(session.token);
            state.user = Some(session.user);
            state.clone()
        };
        self.store.save(&snapshot).await?;
        info!(
            user_id = snapshot.user.as_ref().map(|u| u.id.as_str()).unwrap_or_default(),
            "session established"
        );
        Ok(())
    }

    /// Clears the token, the user and the dashboard tab preferences.
    pub async fn sign_out(&self) -> Result<()> {
        let snapshot = {
            let mut state = self.write();
            state.token = None;
            state.user = None;
            state.prefs.remove(OWNER_ACTIVE_TAB);
            state.prefs.remove(TENANT_ACTIVE_TAB);
            state.clone()
        };
        self.store.save(&snapshot).await?;
        info!("session cleared");
        Ok(())
    }

    pub fn preference(&self, key: &str) -> Option<String> {
        self.read().prefs.get(key).cloned()
    }

    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        let snapshot = {
            let mut state = self.write();
            state.prefs.insert(key.to_string(), value.to_string());
            state.clone()
        };
        self.store.save(&snapshot).await
    }
}
