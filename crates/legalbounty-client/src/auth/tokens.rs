/*
[INPUT]:  Access/refresh token pairs from the API
[OUTPUT]: Token retrieval, persistence, and staleness status
[POS]:    Auth layer - token lifecycle management
[UPDATE]: When token persistence or rotation rules change
*/

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::http::Result;
use crate::session::{ACCESS_TOKEN_KEY, KeyValueStore, REFRESH_TOKEN_KEY};

/// Stored token pair with metadata
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub obtained_at: DateTime<Utc>,
}

/// Thread-safe token manager backed by the shared key-value store.
///
/// Tokens are persisted as a side effect of every successful set; a failed
/// write propagates before the in-memory pair changes, so persisted and
/// in-memory state never diverge on error.
#[derive(Debug, Clone)]
pub struct TokenManager {
    store: Arc<dyn KeyValueStore>,
    data: Arc<RwLock<Option<TokenPair>>>,
}

impl TokenManager {
    /// Create a manager and load any previously persisted pair
    pub fn with_persisted(store: Arc<dyn KeyValueStore>) -> Self {
        let data = match (store.get(ACCESS_TOKEN_KEY), store.get(REFRESH_TOKEN_KEY)) {
            (Some(access), Some(refresh)) => Some(TokenPair {
                access,
                refresh,
                // Age of a rehydrated pair is unknown; count from now
                obtained_at: Utc::now(),
            }),
            _ => None,
        };

        Self {
            store,
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Store a new token pair, persisting both keys
    pub fn set_tokens(&self, access: &str, refresh: &str) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, access)?;
        self.store.set(REFRESH_TOKEN_KEY, refresh)?;

        let mut guard = self.data.write().unwrap();
        *guard = Some(TokenPair {
            access: access.to_string(),
            refresh: refresh.to_string(),
            obtained_at: Utc::now(),
        });
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.data
            .read()
            .unwrap()
            .as_ref()
            .map(|pair| pair.access.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.data
            .read()
            .unwrap()
            .as_ref()
            .map(|pair| pair.refresh.clone())
    }

    /// True when the pair is older than `max_age_secs` or absent
    pub fn is_stale(&self, max_age_secs: i64) -> bool {
        let guard = self.data.read().unwrap();
        match guard.as_ref() {
            Some(pair) => Utc::now() - pair.obtained_at > Duration::seconds(max_age_secs),
            None => true,
        }
    }

    /// Remove tokens from memory and persistence
    pub fn clear(&self) -> Result<()> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        *self.data.write().unwrap() = None;
        Ok(())
    }
}
