//! In-memory session mirror kept consistent with the persisted store.
//!
//! DESIGN
//! ======
//! `SessionController` is an explicit context object owned by the hosting
//! application. It holds the current [`Session`] behind a lock that is only
//! taken for single reads or writes, never across an `.await`.
//!
//! TRADE-OFFS
//! ==========
//! Concurrent logins, or a login racing a 401-triggered clear, are not
//! coordinated: whichever write lands last wins, in memory and on disk.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::ClientError;
use crate::net::auth::{self, AuthApi};
use crate::net::types::{AuthResponse, RegisterRequest, User};
use crate::store::{self, SessionStore, TOKEN_KEY, USER_KEY};

/// The client's belief about who is signed in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub authenticated: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Authenticated,
}

impl Session {
    fn established(token: String, user: User) -> Self {
        let authenticated = !token.is_empty();
        Self { user: Some(user), token: Some(token), authenticated }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.authenticated {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        }
    }
}

#[derive(Clone)]
pub struct SessionController {
    auth: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    session: Arc<RwLock<Session>>,
}

impl SessionController {
    /// Start unauthenticated. Call [`check_auth`](Self::check_auth) to
    /// rehydrate from the store.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthApi>, store: Arc<dyn SessionStore>) -> Self {
        Self { auth, store, session: Arc::new(RwLock::new(Session::default())) }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().unwrap_or_else(PoisonError::into_inner).authenticated
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.session.read().unwrap_or_else(PoisonError::into_inner).user.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session.read().unwrap_or_else(PoisonError::into_inner).token.clone()
    }

    /// Sign in and persist the returned session. On failure the in-memory
    /// session is left as it was.
    ///
    /// # Errors
    ///
    /// Propagates the auth gateway's error unchanged.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let response = self.auth.login(username, password).await?;
        self.establish(&response);
        tracing::info!(username, user_id = response.user.id, "logged in");
        Ok(response)
    }

    /// Create an account and sign in with the session the server returns.
    ///
    /// # Errors
    ///
    /// Propagates the auth gateway's error unchanged.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let response = self.auth.register(request).await?;
        self.establish(&response);
        tracing::info!(username = %request.username, user_id = response.user.id, "registered");
        Ok(response)
    }

    /// Clear the persisted session and reset memory. Always succeeds.
    pub fn logout(&self) {
        self.auth.logout();
        self.clear_local();
        tracing::info!("logged out");
    }

    /// Rehydrate from the store when both entries are usable, otherwise
    /// force a full logout so no half-populated state survives.
    pub fn check_auth(&self) -> SessionStatus {
        let token = store::stored_token(self.store.as_ref());
        let user = auth::read_user(self.store.as_ref());

        match (token, user) {
            (Some(token), Some(user)) => {
                *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session::established(token, user);
                SessionStatus::Authenticated
            }
            _ => {
                self.logout();
                SessionStatus::Unauthenticated
            }
        }
    }

    /// Drop the in-memory session without touching the store. Used when the
    /// store has already been cleared, e.g. by the 401 interceptor.
    pub fn clear_local(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
    }

    /// Callback that drops the in-memory session while the controller is
    /// alive. Holds only a weak reference, so registering it on the HTTP
    /// client does not create an ownership cycle.
    pub(crate) fn local_reset(&self) -> impl Fn() + Send + Sync + 'static + use<> {
        let session = Arc::downgrade(&self.session);
        move || {
            if let Some(session) = session.upgrade() {
                *session.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
            }
        }
    }

    fn establish(&self, response: &AuthResponse) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) =
            Session::established(response.token.clone(), response.user.clone());
        self.store.set(TOKEN_KEY, &response.token);
        match serde_json::to_string(&response.user) {
            Ok(raw) => self.store.set(USER_KEY, &raw),
            Err(error) => tracing::warn!(%error, "failed to serialize user for the session store"),
        }
    }
}
