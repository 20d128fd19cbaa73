//! Application-root context object.
//!
//! SYSTEM CONTEXT
//! ==============
//! `Client` builds one HTTP pipeline over one session store and hands the
//! same pipeline to both gateways. It also subscribes the session
//! controller to unauthorized events so a `401` on any call drops the
//! in-memory session as well as the persisted one.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::net::auth::AuthGateway;
use crate::net::http::{HttpClient, Unauthorized};
use crate::net::users::UserGateway;
use crate::state::session::SessionController;
use crate::store::SessionStore;

pub struct Client {
    http: HttpClient,
    auth: Arc<AuthGateway>,
    users: UserGateway,
    session: SessionController,
}

impl Client {
    /// Wire the gateways and the session controller. The session starts
    /// unauthenticated; call `session().check_auth()` to rehydrate.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let http = HttpClient::new(config, store.clone())?;
        let auth = Arc::new(AuthGateway::new(http.clone()));
        let users = UserGateway::new(http.clone());
        let session = SessionController::new(auth.clone(), store);

        let reset = session.local_reset();
        http.on_unauthorized(move |event| {
            tracing::info!(method = %event.method, path = %event.path, "session revoked by server");
            reset();
        });

        Ok(Self { http, auth, users, session })
    }

    /// Register a host reaction to rejected credentials (e.g. send the user
    /// back to the login screen).
    pub fn on_unauthorized<F>(&self, listener: F)
    where
        F: Fn(&Unauthorized) + Send + Sync + 'static,
    {
        self.http.on_unauthorized(listener);
    }

    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub fn auth(&self) -> &AuthGateway {
        &self.auth
    }

    #[must_use]
    pub fn users(&self) -> &UserGateway {
        &self.users
    }

    #[must_use]
    pub fn session(&self) -> &SessionController {
        &self.session
    }
}
