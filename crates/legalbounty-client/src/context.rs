/*
[INPUT]:  Auth service, session store, and wallet connector
[OUTPUT]: One composed value object for a UI tree root
[POS]:    Composition layer - state + actions behind the UI
[UPDATE]: When adding actions or changing snapshot semantics
*/

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::http::{BountyClient, Result};
use crate::session::{KeyValueStore, SessionStore};
use crate::types::{RegisterRequest, User, UserUpdate};
use crate::wallet::{WalletConnector, WalletProvider};

/// Immutable view of the session handed to renderers
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct Transient {
    loading: bool,
    error: Option<String>,
}

/// Explicitly constructed session context.
///
/// Composes the auth service, session store, and wallet connector into one
/// value object injected at the UI tree root - there is no module-level
/// singleton. Every action toggles the loading flag for its duration and
/// converts failures into a user-facing message in `error`.
///
/// Completions are guarded by a liveness ticket: an action that finishes
/// after a newer action began (or after `teardown`) does not overwrite the
/// newer transient state. Last write wins; session-store mutations
/// themselves are atomic per action.
#[derive(Debug)]
pub struct SessionContext {
    auth: AuthService,
    session: SessionStore,
    wallet: WalletConnector,
    seq: AtomicU64,
    transient: RwLock<Transient>,
}

impl SessionContext {
    pub fn new(auth: AuthService, session: SessionStore, wallet: WalletConnector) -> Self {
        Self {
            auth,
            session,
            wallet,
            seq: AtomicU64::new(0),
            transient: RwLock::new(Transient::default()),
        }
    }

    /// Wire a full context from configuration, shared storage, and a
    /// pairing provider
    pub fn from_config(
        config: &AppConfig,
        storage: Arc<dyn KeyValueStore>,
        provider: Arc<dyn WalletProvider>,
    ) -> Result<Self> {
        let client = BountyClient::from_app_config(config)?;
        let auth = AuthService::new(client, Arc::clone(&storage));
        let session = SessionStore::new(Arc::clone(&storage));
        let wallet = WalletConnector::new(provider, storage);
        Ok(Self::new(auth, session, wallet))
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn wallet(&self) -> &WalletConnector {
        &self.wallet
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let transient = self.transient.read().unwrap();
        SessionSnapshot {
            user: self.session.user(),
            is_authenticated: self.session.is_authenticated(),
            is_loading: transient.loading,
            error: transient.error.clone(),
        }
    }

    fn begin(&self) -> u64 {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut transient = self.transient.write().unwrap();
        transient.loading = true;
        transient.error = None;
        ticket
    }

    fn finish(&self, ticket: u64, error: Option<String>) {
        if self.seq.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "dropping stale action completion");
            return;
        }
        let mut transient = self.transient.write().unwrap();
        transient.loading = false;
        transient.error = error;
    }

    fn commit<T>(&self, ticket: u64, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.finish(ticket, None);
                Ok(value)
            }
            Err(e) => {
                self.finish(ticket, Some(e.user_message()));
                Err(e)
            }
        }
    }

    /// Rehydrate at startup: restore the persisted session and validate it
    /// against the API. A stale session degrades to logged-out; a
    /// refresh rejection forces a local logout.
    pub async fn restore(&self) -> Result<()> {
        self.session.initialize();
        if !self.session.is_authenticated() {
            return Ok(());
        }

        let ticket = self.begin();
        let outcome = match self.auth.restore_session().await {
            Ok(Some(user)) => self.session.set_session(user),
            Ok(None) => {
                self.session.clear();
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.commit(ticket, outcome)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let ticket = self.begin();
        let outcome = match self.auth.login(email, password).await {
            Ok(user) => self.session.set_session(user),
            Err(e) => Err(e),
        };
        self.commit(ticket, outcome)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<()> {
        let ticket = self.begin();
        let outcome = match self.auth.register(req).await {
            Ok(user) => self.session.set_session(user),
            Err(e) => Err(e),
        };
        self.commit(ticket, outcome)
    }

    /// Log out unconditionally: cancels any wallet pairing, clears tokens,
    /// and resets the session. Never fails.
    pub async fn logout(&self) {
        let ticket = self.begin();
        self.wallet.disconnect().await;
        self.auth.logout();
        self.session.clear();
        self.finish(ticket, None);
    }

    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User> {
        let ticket = self.begin();
        let outcome = match self.auth.update_profile(update).await {
            Ok(user) => self.session.set_session(user.clone()).map(|()| user),
            Err(e) => Err(e),
        };
        self.commit(ticket, outcome)
    }

    /// Pair with a wallet and link the approved account to the profile
    pub async fn connect_wallet(&self) -> Result<User> {
        let ticket = self.begin();
        let outcome = match self.wallet.connect().await {
            Ok(account_id) => match self.auth.connect_wallet(&account_id).await {
                Ok(user) => self.session.set_session(user.clone()).map(|()| user),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        self.commit(ticket, outcome)
    }

    /// Reset transient state and invalidate in-flight completions.
    ///
    /// For tests and unmount paths; persisted storage is left alone so a
    /// later `restore` can still rehydrate.
    pub fn teardown(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        let mut transient = self.transient.write().unwrap();
        *transient = Transient::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{BountyError, ClientConfig};
    use crate::session::MemoryStore;
    use crate::wallet::MockWalletProvider;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context_for(server: &MockServer, provider: MockWalletProvider) -> SessionContext {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let client =
            BountyClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
                .expect("client init");
        let auth = AuthService::new(client, Arc::clone(&storage));
        let session = SessionStore::new(Arc::clone(&storage));
        let wallet = WalletConnector::new(Arc::new(provider), storage);
        SessionContext::new(auth, session, wallet)
    }

    fn mount_login(server: &MockServer) -> impl std::future::Future<Output = ()> + '_ {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access": "access-1",
                "refresh": "refresh-1",
                "user": {
                    "id": "1",
                    "email": "admin@example.com",
                    "username": "admin",
                    "firstName": "Ada",
                    "lastName": "Marshall",
                    "role": "admin"
                },
            })))
            .mount(server)
    }

    #[tokio::test]
    async fn test_snapshot_starts_logged_out() {
        let server = MockServer::start().await;
        let context = context_for(&server, MockWalletProvider::approving("0xfeed"));

        let snapshot = context.snapshot();
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.user.is_none());
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_login_updates_snapshot() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let context = context_for(&server, MockWalletProvider::approving("0xfeed"));

        context.login("admin@example.com", "password").await.unwrap();

        let snapshot = context.snapshot();
        assert!(snapshot.is_authenticated);
        assert_eq!(snapshot.user.map(|u| u.id), Some("1".to_string()));
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_failed_login_sets_user_facing_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let context = context_for(&server, MockWalletProvider::approving("0xfeed"));

        let err = context.login("admin@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, BountyError::InvalidCredentials));

        let snapshot = context.snapshot();
        assert!(!snapshot.is_authenticated);
        assert_eq!(snapshot.error.as_deref(), Some("Invalid email or password"));
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_logout_always_lands_logged_out() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let context = context_for(&server, MockWalletProvider::approving("0xfeed"));

        context.login("admin@example.com", "password").await.unwrap();
        context.logout().await;

        let snapshot = context.snapshot();
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.user.is_none());
        assert!(snapshot.error.is_none());

        // Logout from an already logged-out state is also fine
        context.logout().await;
        assert!(!context.snapshot().is_authenticated);
    }

    #[tokio::test]
    async fn test_connect_wallet_links_account_to_profile() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/connect-wallet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": {
                    "id": "1",
                    "email": "admin@example.com",
                    "username": "admin",
                    "firstName": "Ada",
                    "lastName": "Marshall",
                    "role": "admin",
                    "walletAddress": "0xfeed"
                },
            })))
            .mount(&server)
            .await;
        let context = context_for(&server, MockWalletProvider::approving("0xfeed"));

        context.login("admin@example.com", "password").await.unwrap();
        let user = context.connect_wallet().await.unwrap();

        assert_eq!(user.wallet_address.as_deref(), Some("0xfeed"));
        let snapshot = context.snapshot();
        assert_eq!(
            snapshot.user.and_then(|u| u.wallet_address),
            Some("0xfeed".to_string())
        );
    }

    #[tokio::test]
    async fn test_wallet_rejection_surfaces_error_and_stays_authenticated() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let context = context_for(&server, MockWalletProvider::rejecting());

        context.login("admin@example.com", "password").await.unwrap();
        let err = context.connect_wallet().await.unwrap_err();
        assert!(matches!(err, BountyError::ConnectionFailed(_)));

        let snapshot = context.snapshot();
        assert!(snapshot.is_authenticated);
        assert_eq!(
            snapshot.error.as_deref(),
            Some("Could not connect to your wallet, please try again")
        );
    }

    #[tokio::test]
    async fn test_teardown_drops_stale_completion() {
        let server = MockServer::start().await;
        // Slow login: respond after the context is torn down
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_delay(std::time::Duration::from_millis(100)),
            )
            .mount(&server)
            .await;
        let context =
            Arc::new(context_for(&server, MockWalletProvider::approving("0xfeed")));

        let pending = {
            let context = Arc::clone(&context);
            tokio::spawn(async move {
                context
                    .login("admin@example.com", "password")
                    .await
                    .unwrap_err()
            })
        };

        // Give the action time to start, then invalidate it
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        context.teardown();

        pending.await.unwrap();
        let snapshot = context.snapshot();
        // The stale failure must not have written an error after teardown
        assert!(snapshot.error.is_none());
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_restore_without_persisted_session_is_quiet() {
        let server = MockServer::start().await;
        let context = context_for(&server, MockWalletProvider::approving("0xfeed"));

        context.restore().await.unwrap();
        let snapshot = context.snapshot();
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.error.is_none());
    }
}
