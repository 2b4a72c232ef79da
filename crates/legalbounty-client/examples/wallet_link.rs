/*
[INPUT]:  A pairing provider and an authenticated session
[OUTPUT]: A linked wallet account id on stdout
[POS]:    Examples - wallet pairing demonstration
[UPDATE]: When the pairing flow changes
*/

use std::sync::Arc;
use std::time::Duration;

use legalbounty_client::{
    KeyValueStore, MemoryStore, MockWalletProvider, WalletConnector, WalletState,
};

/// Example: wallet pairing flow
///
/// 1. Create a connector over a pairing provider
/// 2. Start the handshake and show the pairing URI (a QR payload)
/// 3. Wait for approval and read back the linked account
#[tokio::main]
async fn main() {
    println!("=== LegalBounty Wallet Pairing Example ===\n");

    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    // The mock provider stands in for a real pairing SDK and approves
    // after a short delay
    let provider = Arc::new(MockWalletProvider::approving("0xfeed").with_delay(Duration::from_millis(300)));
    let connector = WalletConnector::new(provider, storage);
    println!("✓ Wallet connector created (state: {:?})", connector.state());

    let pending = {
        let connector = connector.clone();
        tokio::spawn(async move { connector.connect().await })
    };

    // Show the QR payload once the handshake reaches AwaitingApproval
    loop {
        if let Some(pairing) = connector.pairing() {
            println!("  scan to approve: {}", pairing.uri);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    match pending.await.expect("join failed") {
        Ok(account_id) => {
            println!("\n✓ Wallet approved, linked account: {account_id}");
            assert!(matches!(connector.state(), WalletState::Linked { .. }));
            println!("  in production, report this id via SessionContext::connect_wallet");
        }
        Err(e) => {
            println!("\nPairing failed: {}", e.user_message());
        }
    }
}
