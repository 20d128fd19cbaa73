//! Persisted session storage.
//!
//! DESIGN
//! ======
//! Two independent string slots, [`TOKEN_KEY`] and [`USER_KEY`], behave like
//! origin-scoped browser storage. Reads and writes are
//! synchronous and infallible at the call site; backends that can fail on
//! write log the failure and keep the in-memory value.
//!
//! There is no atomicity between the two slots. Readers must tolerate one
//! being present without the other.

pub mod file;
pub mod memory;

pub use file::{FileStore, StoreError};
pub use memory::MemoryStore;

/// Slot holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Slot holding the JSON-serialized `User`.
pub const USER_KEY: &str = "user";

/// Key/value persistence for the session token and cached user record.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Stored token, treating an empty string as absent.
pub fn stored_token(store: &dyn SessionStore) -> Option<String> {
    store.get(TOKEN_KEY).filter(|token| !token.is_empty())
}

/// Drop both session slots.
pub fn clear_session(store: &dyn SessionStore) {
    store.remove(TOKEN_KEY);
    store.remove(USER_KEY);
}
