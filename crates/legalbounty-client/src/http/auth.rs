/*
[INPUT]:  Credentials, profile fields, and bearer authentication
[OUTPUT]: User records and token pairs from the auth endpoints
[POS]:    HTTP layer - auth/profile endpoints
[UPDATE]: When adding new auth endpoints or changing the envelope
*/

use reqwest::Method;

use crate::http::{BountyClient, BountyError, Result};
use crate::types::{
    AuthResponse, ConnectWalletRequest, LoginRequest, RefreshRequest, RegisterRequest,
    TokenResponse, UserResponse, UserUpdate,
};

impl BountyClient {
    /// Exchange an email/password pair for tokens and a user record
    ///
    /// POST /login
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        let builder = self.request(Method::POST, "/login")?.json(req);
        match self.send_json(builder).await {
            // A 401 here means the credentials were wrong, not that a
            // previously issued token was rejected.
            Err(BountyError::Unauthorized) => Err(BountyError::InvalidCredentials),
            other => other,
        }
    }

    /// Create an account
    ///
    /// POST /register
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        let builder = self.request(Method::POST, "/register")?.json(req);
        self.send_json(builder).await
    }

    /// Exchange a refresh token for a fresh access token
    ///
    /// POST /refresh-token
    pub async fn refresh_token(&self, req: &RefreshRequest) -> Result<TokenResponse> {
        let builder = self.request(Method::POST, "/refresh-token")?.json(req);
        match self.send_json(builder).await {
            // Rejection of the refresh token ends the session
            Err(BountyError::Unauthorized) => Err(BountyError::Expired),
            other => other,
        }
    }

    /// Fetch the user record behind the bearer token
    ///
    /// GET /me
    pub async fn me(&self) -> Result<UserResponse> {
        let builder = self.auth_request(Method::GET, "/me")?;
        self.send_json(builder).await
    }

    /// Apply a partial profile update
    ///
    /// PATCH /update-profile
    pub async fn update_profile(&self, req: &UserUpdate) -> Result<UserResponse> {
        let builder = self.auth_request(Method::PATCH, "/update-profile")?.json(req);
        self.send_json(builder).await
    }

    /// Link a wallet address to the account
    ///
    /// POST /connect-wallet
    pub async fn connect_wallet(&self, req: &ConnectWalletRequest) -> Result<UserResponse> {
        let builder = self.auth_request(Method::POST, "/connect-wallet")?.json(req);
        self.send_json(builder).await
    }
}
