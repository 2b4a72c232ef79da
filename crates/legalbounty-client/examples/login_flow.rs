/*
[INPUT]:  Credentials and the LegalBounty API endpoints
[OUTPUT]: An authenticated session snapshot on stdout
[POS]:    Examples - login/session flow demonstration
[UPDATE]: When the session context API changes
*/

use std::sync::Arc;

use legalbounty_client::{
    AppConfig, KeyValueStore, MemoryStore, MockWalletProvider, SessionContext,
};

/// Example: login and session flow
///
/// 1. Build configuration from the environment
/// 2. Wire a session context over in-memory storage
/// 3. Restore any persisted session, then log in
/// 4. Render the resulting snapshot
#[tokio::main]
async fn main() {
    println!("=== LegalBounty Login Example ===\n");

    let config = AppConfig::from_env();
    println!("✓ Config loaded (api: {}, network: {})", config.api_url, config.network);

    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let provider = Arc::new(MockWalletProvider::approving("0xfeed"));
    let context = match SessionContext::from_config(&config, storage, provider) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Failed to build session context: {e}");
            return;
        }
    };
    println!("✓ Session context created");

    if let Err(e) = context.restore().await {
        eprintln!("Restore failed: {e}");
    }
    println!("✓ Session restored: authenticated = {}", context.snapshot().is_authenticated);

    // In production the credentials come from a login form; against the
    // real API this call needs an existing account.
    match context.login("admin@example.com", "password").await {
        Ok(()) => {
            let snapshot = context.snapshot();
            println!("\n✓ Logged in");
            if let Some(user) = snapshot.user {
                println!("  user: {} <{}> (role: {:?})", user.username, user.email, user.role);
            }
        }
        Err(e) => {
            println!("\nLogin failed: {}", e.user_message());
        }
    }
}
