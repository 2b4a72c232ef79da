/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public LegalBounty client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod config;
pub mod context;
pub mod http;
pub mod session;
pub mod types;
pub mod wallet;

// Re-export commonly used types from auth
pub use auth::{AuthService, TokenManager, TokenPair};

// Re-export commonly used types from http
pub use http::{BountyClient, BountyError, ClientConfig, Result};

// Re-export the session layer
pub use session::{FileStore, KeyValueStore, MemoryStore, SessionStore};

// Re-export the composition layer
pub use context::{SessionContext, SessionSnapshot};

// Re-export configuration
pub use config::{AppConfig, ContractAddresses};

// Re-export all types
pub use types::*;

// Re-export commonly used types from wallet
pub use wallet::{
    MockWalletProvider, PairingHandle, WalletConnector, WalletPairing, WalletProvider, WalletState,
};
