//! Auth gateway: login/register calls plus local session queries.
//!
//! The gateway never writes a session itself; persisting the returned
//! token and user is the session controller's job. It only clears the
//! store on logout.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use super::http::HttpClient;
use super::types::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::error::ClientError;
use crate::store::{self, SessionStore, USER_KEY};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";

/// Remote and local auth operations the session controller depends on.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token and user record.
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError>;

    /// Create an account and receive its token and user record.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError>;

    /// Remove the persisted token and user.
    fn logout(&self);

    /// True iff a non-empty token is persisted.
    fn is_authenticated(&self) -> bool;

    /// The persisted user, if present and parseable.
    fn current_user(&self) -> Option<User>;
}

pub struct AuthGateway {
    http: HttpClient,
}

impl AuthGateway {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn store(&self) -> &Arc<dyn SessionStore> {
        self.http.store()
    }
}

#[async_trait::async_trait]
impl AuthApi for AuthGateway {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest { username: username.to_owned(), password: password.to_owned() };
        self.http.post(LOGIN_PATH, &body).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.http.post(REGISTER_PATH, request).await
    }

    fn logout(&self) {
        store::clear_session(self.store().as_ref());
    }

    fn is_authenticated(&self) -> bool {
        store::stored_token(self.store().as_ref()).is_some()
    }

    fn current_user(&self) -> Option<User> {
        read_user(self.store().as_ref())
    }
}

/// Decode the persisted user slot. A corrupt entry reads as absent.
pub(crate) fn read_user(store: &dyn SessionStore) -> Option<User> {
    let raw = store.get(USER_KEY)?;
    match serde_json::from_str::<User>(&raw) {
        Ok(user) => Some(user),
        Err(error) => {
            tracing::warn!(%error, "persisted user entry is corrupt, treating as absent");
            None
        }
    }
}
