/*
[INPUT]:  Credentials, profile fields, and the HTTP client
[OUTPUT]: Authenticated user records with persisted tokens
[POS]:    Auth layer - orchestrates the remote auth flow
[UPDATE]: When auth endpoints or token handling change
*/

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::TokenManager;
use crate::http::{BountyClient, BountyError, Result};
use crate::session::KeyValueStore;
use crate::types::{
    ConnectWalletRequest, LoginRequest, RefreshRequest, RegisterRequest, User, UserUpdate,
};

/// Performs login/register/refresh/profile operations against the API.
///
/// Every successful call that returns tokens persists them as a side
/// effect; every failure leaves persisted state untouched.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: BountyClient,
    tokens: TokenManager,
}

impl AuthService {
    /// Create a service over the given client and storage.
    ///
    /// A token pair persisted by a previous run is loaded and installed on
    /// the client so authenticated calls work immediately.
    pub fn new(client: BountyClient, store: Arc<dyn KeyValueStore>) -> Self {
        let tokens = TokenManager::with_persisted(store);
        if let Some(access) = tokens.access_token() {
            client.set_bearer(&access);
        }
        Self { client, tokens }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn client(&self) -> &BountyClient {
        &self.client
    }

    fn install_tokens(&self, access: &str, refresh: &str) -> Result<()> {
        self.tokens.set_tokens(access, refresh)?;
        self.client.set_bearer(access);
        Ok(())
    }

    /// Authenticate with an email/password pair.
    ///
    /// `InvalidCredentials` when the API rejects the pair, `Network` on
    /// transport failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let response = self
            .client
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.install_tokens(&response.access, &response.refresh)?;
        info!(user_id = %response.user.id, "login succeeded");
        Ok(response.user)
    }

    /// Create an account and authenticate in one step
    pub async fn register(&self, req: &RegisterRequest) -> Result<User> {
        let response = self.client.register(req).await?;
        self.install_tokens(&response.access, &response.refresh)?;
        info!(user_id = %response.user.id, "registration succeeded");
        Ok(response.user)
    }

    /// Clear local tokens.
    ///
    /// Local-only and best-effort: server-side revocation is not attempted
    /// (the API exposes no revocation endpoint) and a storage failure is
    /// logged rather than surfaced, so logout never fails the caller.
    pub fn logout(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!("failed to clear persisted tokens on logout: {e}");
        }
        self.client.clear_bearer();
        debug!("local session tokens cleared");
    }

    /// Exchange the persisted refresh token for a fresh access token.
    ///
    /// `NoRefreshToken` when none is persisted; `Expired` when the API
    /// rejects it - callers treat either as a forced logout.
    pub async fn refresh(&self) -> Result<String> {
        let refresh = self
            .tokens
            .refresh_token()
            .ok_or(BountyError::NoRefreshToken)?;

        let response = self
            .client
            .refresh_token(&RefreshRequest {
                refresh: refresh.clone(),
            })
            .await?;

        // The server may rotate the refresh token; keep the old one if not
        let next_refresh = response.refresh.unwrap_or(refresh);
        self.install_tokens(&response.access, &next_refresh)?;
        debug!("access token refreshed");
        Ok(response.access)
    }

    /// Fetch the user behind the current bearer token
    pub async fn current_user(&self) -> Result<User> {
        Ok(self.client.me().await?.user)
    }

    /// Apply a partial profile update, returning the canonical record
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User> {
        Ok(self.client.update_profile(update).await?.user)
    }

    /// Link a wallet address to the authenticated account
    pub async fn connect_wallet(&self, address: &str) -> Result<User> {
        let response = self
            .client
            .connect_wallet(&ConnectWalletRequest {
                wallet_address: address.to_string(),
            })
            .await?;
        info!(wallet = %address, "wallet linked to account");
        Ok(response.user)
    }

    /// Startup path: validate the persisted session against the API.
    ///
    /// Returns `Ok(None)` when no tokens are persisted. A rejected access
    /// token falls back to a refresh; if that also fails the local tokens
    /// are cleared and `Ok(None)` is returned, so a stale session degrades
    /// to logged-out rather than an error.
    pub async fn restore_session(&self) -> Result<Option<User>> {
        if self.tokens.access_token().is_none() {
            return Ok(None);
        }

        match self.current_user().await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_auth_error() => match self.refresh().await {
                Ok(_) => Ok(Some(self.current_user().await?)),
                Err(e) if e.is_auth_error() => {
                    debug!("persisted session could not be refreshed: {e}");
                    self.logout();
                    Ok(None)
                }
                Err(other) => Err(other),
            },
            Err(other) => Err(other),
        }
    }
}
