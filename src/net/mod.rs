//! Networking layer.
//!
//! DESIGN
//! ======
//! `http` owns the shared request pipeline and its interceptors; `auth` and
//! `users` are gateways that only know paths and payload shapes; `types`
//! holds the wire DTOs.

pub mod auth;
pub mod http;
pub mod types;
pub mod users;
