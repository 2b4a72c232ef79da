/*
[INPUT]:  A pairing provider and the shared key-value storage
[OUTPUT]: Linked wallet account identifiers
[POS]:    Wallet layer - pairing state machine
[UPDATE]: When pairing states or persistence rules change
*/

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::http::{BountyError, Result};
use crate::session::{KeyValueStore, WALLET_ACCOUNT_KEY, WALLET_TOPIC_KEY};
use crate::wallet::provider::WalletProvider;

const DEFAULT_APPROVAL_TIMEOUT: Duration = Duration::from_secs(120);

/// Transient pairing data while a connection is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletPairing {
    pub uri: String,
    pub topic: String,
    pub account_id: Option<String>,
}

/// Connector states. Failure or cancellation from any non-terminal state
/// returns to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletState {
    Idle,
    Pairing,
    AwaitingApproval(WalletPairing),
    Linked { account_id: String },
}

/// Drives the pairing handshake with an external wallet provider.
///
/// Nothing is persisted until the wallet approves; only the topic and the
/// resolved account id survive the pairing, and `disconnect` removes both.
#[derive(Debug, Clone)]
pub struct WalletConnector {
    provider: Arc<dyn WalletProvider>,
    store: Arc<dyn KeyValueStore>,
    state: Arc<RwLock<WalletState>>,
    approval_timeout: Duration,
}

impl WalletConnector {
    pub fn new(provider: Arc<dyn WalletProvider>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            provider,
            store,
            state: Arc::new(RwLock::new(WalletState::Idle)),
            approval_timeout: DEFAULT_APPROVAL_TIMEOUT,
        }
    }

    pub fn with_approval_timeout(mut self, timeout: Duration) -> Self {
        self.approval_timeout = timeout;
        self
    }

    pub fn state(&self) -> WalletState {
        self.state.read().unwrap().clone()
    }

    /// Pairing data while awaiting approval, for QR display
    pub fn pairing(&self) -> Option<WalletPairing> {
        match &*self.state.read().unwrap() {
            WalletState::AwaitingApproval(pairing) => Some(pairing.clone()),
            _ => None,
        }
    }

    /// Run the pairing handshake to completion.
    ///
    /// `Idle -> Pairing -> AwaitingApproval -> Linked` on success, back to
    /// `Idle` with `ConnectionFailed` on timeout or rejection. The resolved
    /// account id is returned so the caller can report it to the API.
    pub async fn connect(&self) -> Result<String> {
        {
            let mut state = self.state.write().unwrap();
            if *state != WalletState::Idle {
                return Err(BountyError::InvalidState(
                    "wallet pairing already in progress".to_string(),
                ));
            }
            *state = WalletState::Pairing;
        }

        let handle = match self.provider.create_pairing().await {
            Ok(handle) => handle,
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };
        info!(topic = %handle.topic, "wallet pairing created");

        {
            let mut state = self.state.write().unwrap();
            *state = WalletState::AwaitingApproval(WalletPairing {
                uri: handle.uri.clone(),
                topic: handle.topic.clone(),
                account_id: None,
            });
        }

        let approval =
            tokio::time::timeout(self.approval_timeout, self.provider.await_approval(&handle.topic))
                .await;
        let account_id = match approval {
            Ok(Ok(account_id)) => account_id,
            Ok(Err(e)) => {
                self.reset();
                self.provider.release(&handle.topic).await;
                return Err(e);
            }
            Err(_) => {
                self.reset();
                self.provider.release(&handle.topic).await;
                return Err(BountyError::ConnectionFailed(format!(
                    "wallet approval timed out after {}s",
                    self.approval_timeout.as_secs()
                )));
            }
        };

        {
            let mut state = self.state.write().unwrap();
            // A disconnect may have raced the approval; honor the cancel
            if !matches!(*state, WalletState::AwaitingApproval(_)) {
                return Err(BountyError::ConnectionFailed(
                    "pairing was cancelled".to_string(),
                ));
            }
            *state = WalletState::Linked {
                account_id: account_id.clone(),
            };
        }

        self.store.set(WALLET_TOPIC_KEY, &handle.topic)?;
        self.store.set(WALLET_ACCOUNT_KEY, &account_id)?;
        info!(account = %account_id, "wallet pairing approved");
        Ok(account_id)
    }

    /// Tear down the pairing; valid from any state.
    ///
    /// Clears the persisted wallet keys and returns to `Idle`. Storage
    /// failures are logged, not surfaced.
    pub async fn disconnect(&self) {
        let topic = {
            let state = self.state.read().unwrap();
            match &*state {
                WalletState::AwaitingApproval(pairing) => Some(pairing.topic.clone()),
                _ => self.store.get(WALLET_TOPIC_KEY),
            }
        };

        for key in [WALLET_TOPIC_KEY, WALLET_ACCOUNT_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!(key, "failed to remove persisted wallet key: {e}");
            }
        }
        self.reset();

        if let Some(topic) = topic {
            self.provider.release(&topic).await;
        }
        debug!("wallet disconnected");
    }

    fn reset(&self) {
        *self.state.write().unwrap() = WalletState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;
    use crate::wallet::provider::MockWalletProvider;

    fn connector(provider: MockWalletProvider) -> (WalletConnector, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let connector = WalletConnector::new(Arc::new(provider), Arc::clone(&store));
        (connector, store)
    }

    #[tokio::test]
    async fn test_connect_links_and_persists() {
        let (connector, store) = connector(MockWalletProvider::approving("0xfeed"));

        let account = connector.connect().await.unwrap();
        assert_eq!(account, "0xfeed");
        assert!(matches!(connector.state(), WalletState::Linked { .. }));
        assert_eq!(store.get(WALLET_ACCOUNT_KEY), Some("0xfeed".to_string()));
        assert!(store.get(WALLET_TOPIC_KEY).is_some());
    }

    #[tokio::test]
    async fn test_rejection_returns_to_idle_without_persisting() {
        let (connector, store) = connector(MockWalletProvider::rejecting());

        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, BountyError::ConnectionFailed(_)));
        assert_eq!(connector.state(), WalletState::Idle);
        assert!(store.get(WALLET_TOPIC_KEY).is_none());
        assert!(store.get(WALLET_ACCOUNT_KEY).is_none());
    }

    #[tokio::test]
    async fn test_approval_timeout_returns_to_idle() {
        let provider =
            MockWalletProvider::approving("0xfeed").with_delay(Duration::from_secs(60));
        let (connector, store) = connector(provider);
        let connector = connector.with_approval_timeout(Duration::from_millis(20));

        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, BountyError::ConnectionFailed(_)));
        assert_eq!(connector.state(), WalletState::Idle);
        assert!(store.get(WALLET_ACCOUNT_KEY).is_none());
    }

    #[tokio::test]
    async fn test_disconnect_before_approval_cancels_pairing() {
        let provider =
            MockWalletProvider::approving("0xfeed").with_delay(Duration::from_millis(200));
        let (connector, store) = connector(provider);

        let pending = {
            let connector = connector.clone();
            tokio::spawn(async move { connector.connect().await })
        };

        // Wait until the pairing reaches AwaitingApproval
        while connector.pairing().is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        connector.disconnect().await;

        let result = pending.await.unwrap();
        assert!(matches!(result, Err(BountyError::ConnectionFailed(_))));
        assert_eq!(connector.state(), WalletState::Idle);
        assert!(store.get(WALLET_TOPIC_KEY).is_none());
        assert!(store.get(WALLET_ACCOUNT_KEY).is_none());
    }

    #[tokio::test]
    async fn test_concurrent_connect_is_invalid_state() {
        let provider =
            MockWalletProvider::approving("0xfeed").with_delay(Duration::from_millis(100));
        let (connector, _store) = connector(provider);

        let pending = {
            let connector = connector.clone();
            tokio::spawn(async move { connector.connect().await })
        };
        while connector.pairing().is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, BountyError::InvalidState(_)));

        assert!(pending.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_disconnect_after_link_removes_keys() {
        let (connector, store) = connector(MockWalletProvider::approving("0xfeed"));
        connector.connect().await.unwrap();

        connector.disconnect().await;
        assert_eq!(connector.state(), WalletState::Idle);
        assert!(store.get(WALLET_TOPIC_KEY).is_none());
        assert!(store.get(WALLET_ACCOUNT_KEY).is_none());
    }
}
