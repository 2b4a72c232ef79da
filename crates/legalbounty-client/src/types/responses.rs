/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed response bodies for the auth endpoints
[POS]:    Data layer - inbound payload shapes
[UPDATE]: When the API response envelope changes
*/

use serde::{Deserialize, Serialize};

use super::models::User;

/// Response from POST /login and POST /register: `{access, refresh, user}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// Response from the profile endpoints: `{user}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

/// Response from POST /refresh-token.
///
/// The server may rotate the refresh token; when it does not, the old one
/// stays valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

/// Error envelope returned by the API on non-2xx responses.
///
/// Both fields are optional; unknown bodies decode to the empty envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}
