/*
[INPUT]:  Credentials and the shared key-value storage
[OUTPUT]: Authenticated users, persisted token pairs, and auth errors
[POS]:    Auth layer - remote authentication for the LegalBounty API
[UPDATE]: When auth flow or token persistence changes
*/

pub mod service;
pub mod tokens;

pub use service::AuthService;
pub use tokens::{TokenManager, TokenPair};
