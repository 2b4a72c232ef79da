/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed request bodies for the auth endpoints
[POS]:    Data layer - outbound payload shapes
[UPDATE]: When auth endpoints gain or change parameters
*/

use serde::{Deserialize, Serialize};

use super::models::Role;

/// Body for POST /login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for POST /register
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Body for POST /refresh-token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Body for POST /connect-wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectWalletRequest {
    pub wallet_address: String,
}
