/*
[INPUT]:  Pairing requests and provider responses
[OUTPUT]: Wallet pairing state and linked account identifiers
[POS]:    Wallet layer - connection flow with external wallets
[UPDATE]: When pairing states or the provider contract change
*/

pub mod connector;
pub mod provider;

pub use connector::{WalletConnector, WalletPairing, WalletState};
pub use provider::{MockWalletProvider, PairingHandle, WalletProvider};
