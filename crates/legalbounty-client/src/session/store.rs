/*
[INPUT]:  User records and the persisted session snapshot
[OUTPUT]: Authenticated session state, rehydrated across restarts
[POS]:    Session layer - single owner of the user record
[UPDATE]: When session persistence keys or rehydration rules change
*/

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::http::{BountyError, Result};
use crate::session::KeyValueStore;
use crate::types::{User, UserUpdate};

/// Persistence keys shared by the session and token layers
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";
pub const WALLET_TOPIC_KEY: &str = "wallet_topic";
pub const WALLET_ACCOUNT_KEY: &str = "wallet_account_id";

/// Holds the authenticated user and persists a snapshot of it.
///
/// The user record is owned here exclusively; `authenticated` is derived
/// from its presence, so the two can never disagree.
#[derive(Debug, Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    user: Arc<RwLock<Option<User>>>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            user: Arc::new(RwLock::new(None)),
        }
    }

    /// Rehydrate from persisted storage.
    ///
    /// Requires both an access token and a well-formed user snapshot;
    /// anything less yields the logged-out state. Never errors - malformed
    /// persisted data is treated as absent.
    pub fn initialize(&self) {
        let user = match (self.store.get(ACCESS_TOKEN_KEY), self.store.get(USER_KEY)) {
            (Some(_), Some(snapshot)) => match serde_json::from_str::<User>(&snapshot) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("discarding malformed user snapshot: {e}");
                    None
                }
            },
            _ => None,
        };

        if user.is_none() {
            debug!("no persisted session, starting logged out");
        }
        *self.user.write().unwrap() = user;
    }

    /// Mark authenticated and persist the user snapshot
    pub fn set_session(&self, user: User) -> Result<()> {
        let snapshot = serde_json::to_string(&user)?;
        self.store.set(USER_KEY, &snapshot)?;
        *self.user.write().unwrap() = Some(user);
        Ok(())
    }

    /// Drop the session and every persisted session/wallet key.
    ///
    /// Storage failures are logged, not propagated; logout must always
    /// leave the in-memory state logged out.
    pub fn clear(&self) {
        for key in [
            ACCESS_TOKEN_KEY,
            REFRESH_TOKEN_KEY,
            USER_KEY,
            WALLET_TOPIC_KEY,
            WALLET_ACCOUNT_KEY,
        ] {
            if let Err(e) = self.store.remove(key) {
                warn!(key, "failed to remove persisted session key: {e}");
            }
        }
        *self.user.write().unwrap() = None;
    }

    /// Merge partial fields into the current user and re-persist.
    ///
    /// Fails with `InvalidState` when no user is authenticated, leaving
    /// state unchanged.
    pub fn update_user(&self, update: &UserUpdate) -> Result<User> {
        let mut guard = self.user.write().unwrap();
        let user = guard
            .as_mut()
            .ok_or_else(|| BountyError::InvalidState("no authenticated user to update".to_string()))?;

        update.apply(user);
        let snapshot = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &snapshot)?;
        Ok(user.clone())
    }

    /// Current user, if authenticated
    pub fn user(&self) -> Option<User> {
        self.user.read().unwrap().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().unwrap().is_some()
    }

    /// The key-value store backing this session
    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }
}
