/*
[INPUT]:  Pairing requests from the wallet connector
[OUTPUT]: Pairing handles and approved account identifiers
[POS]:    Wallet layer - external provider abstraction
[UPDATE]: When the pairing SDK or approval signal changes
*/

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use uuid::Uuid;

use crate::http::{BountyError, Result};

/// A freshly created pairing: the URI is shown to the user (e.g. as a QR
/// code), the topic identifies the pairing channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingHandle {
    pub uri: String,
    pub topic: String,
}

/// Trait for external wallet pairing providers.
///
/// The trait is async to support real pairing SDKs; `await_approval` blocks
/// until the wallet approves or rejects the pairing.
#[async_trait]
pub trait WalletProvider: fmt::Debug + Send + Sync {
    /// Start a pairing handshake and return its URI/topic
    async fn create_pairing(&self) -> Result<PairingHandle>;

    /// Wait for the wallet on the other end to approve the pairing,
    /// resolving the approved account identifier
    async fn await_approval(&self, topic: &str) -> Result<String>;

    /// Tear down the pairing channel; never fails
    async fn release(&self, topic: &str);
}

/// Build a pairing URI in the standard `wc:` QR-payload shape
pub(crate) fn pairing_uri(topic: &str) -> String {
    let sym_key = URL_SAFE_NO_PAD.encode(Uuid::new_v4().into_bytes());
    format!("wc:{topic}@2?relay-protocol=irn&symKey={sym_key}")
}

/// Mock wallet provider with a configurable delay and outcome.
///
/// The upstream pairing-approval protocol is unspecified; this stub stands
/// in for it in tests and demos, resolving (or rejecting) after a fixed
/// delay.
#[derive(Debug, Clone)]
pub struct MockWalletProvider {
    account_id: Option<String>,
    approval_delay: Duration,
}

impl MockWalletProvider {
    /// A provider that approves the pairing with the given account id
    pub fn approving(account_id: &str) -> Self {
        Self {
            account_id: Some(account_id.to_string()),
            approval_delay: Duration::from_millis(10),
        }
    }

    /// A provider whose wallet rejects every pairing
    pub fn rejecting() -> Self {
        Self {
            account_id: None,
            approval_delay: Duration::from_millis(10),
        }
    }

    /// Override the simulated approval delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.approval_delay = delay;
        self
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn create_pairing(&self) -> Result<PairingHandle> {
        let topic = Uuid::new_v4().to_string();
        Ok(PairingHandle {
            uri: pairing_uri(&topic),
            topic,
        })
    }

    async fn await_approval(&self, _topic: &str) -> Result<String> {
        tokio::time::sleep(self.approval_delay).await;
        match &self.account_id {
            Some(account_id) => Ok(account_id.clone()),
            None => Err(BountyError::ConnectionFailed(
                "pairing rejected by wallet".to_string(),
            )),
        }
    }

    async fn release(&self, _topic: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_approves() {
        let provider = MockWalletProvider::approving("0xfeed");
        let handle = provider.create_pairing().await.unwrap();

        assert!(handle.uri.starts_with(&format!("wc:{}@2?", handle.topic)));

        let account = provider.await_approval(&handle.topic).await.unwrap();
        assert_eq!(account, "0xfeed");
    }

    #[tokio::test]
    async fn test_mock_provider_rejects() {
        let provider = MockWalletProvider::rejecting();
        let handle = provider.create_pairing().await.unwrap();

        let err = provider.await_approval(&handle.topic).await.unwrap_err();
        assert!(matches!(err, BountyError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_pairing_topics_are_unique() {
        let provider = MockWalletProvider::approving("0xfeed");
        let first = provider.create_pairing().await.unwrap();
        let second = provider.create_pairing().await.unwrap();
        assert_ne!(first.topic, second.topic);
    }
}
