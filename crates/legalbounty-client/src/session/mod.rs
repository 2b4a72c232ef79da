/*
[INPUT]:  Persisted snapshots and user records
[OUTPUT]: Session state and key-value persistence
[POS]:    Session layer - authenticated-state ownership
[UPDATE]: When session semantics or storage backends change
*/

pub mod keyvalue;
pub mod store;

pub use keyvalue::{FileStore, KeyValueStore, MemoryStore};
pub use store::{
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionStore, USER_KEY, WALLET_ACCOUNT_KEY,
    WALLET_TOPIC_KEY,
};
