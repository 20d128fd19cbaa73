//! # userdesk
//!
//! Client-side session and request-authorization layer for the user
//! management API.
//!
//! This crate contains the persisted session store, the shared HTTP
//! pipeline with its credential and unauthorized interceptors, the auth and
//! user gateways, and the in-memory session controller. [`Client`] wires
//! them together and is meant to be owned by the hosting application.

pub mod client;
pub mod config;
pub mod error;
pub mod net;
pub mod state;
pub mod store;

#[cfg(test)]
#[path = "mock_api_test.rs"]
pub(crate) mod mock_api;

pub use client::Client;
pub use config::ClientConfig;
pub use error::ClientError;
pub use net::types::{AuthResponse, RegisterRequest, User, UserUpdate};
pub use state::session::{Session, SessionController, SessionStatus};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
