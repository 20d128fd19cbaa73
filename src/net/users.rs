//! User collection gateway.
//!
//! Thin CRUD over `/users`; credentials come from the HTTP client's
//! outgoing interceptor. No retries and no local mutation: every result is
//! exactly what the server returned.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use super::http::HttpClient;
use super::types::{User, UserUpdate, UsersResponse};
use crate::error::ClientError;

pub const USERS_PATH: &str = "/users";

fn user_path(id: i64) -> String {
    format!("{USERS_PATH}/{id}")
}

pub struct UserGateway {
    http: HttpClient,
}

impl UserGateway {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `GET /users`, unwrapped from its `{users: [...]}` envelope.
    ///
    /// # Errors
    ///
    /// Propagates HTTP client failures unchanged.
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let envelope: UsersResponse = self.http.get(USERS_PATH).await?;
        Ok(envelope.users)
    }

    /// `GET /users/{id}`.
    ///
    /// # Errors
    ///
    /// Propagates HTTP client failures unchanged (e.g. `Status { status: 404, .. }`).
    pub async fn get_user(&self, id: i64) -> Result<User, ClientError> {
        self.http.get(&user_path(id)).await
    }

    /// `PUT /users/{id}` with only the fields set in `update`.
    ///
    /// # Errors
    ///
    /// Propagates HTTP client failures unchanged.
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User, ClientError> {
        self.http.put(&user_path(id), update).await
    }

    /// `DELETE /users/{id}`.
    ///
    /// # Errors
    ///
    /// Propagates HTTP client failures unchanged.
    pub async fn delete_user(&self, id: i64) -> Result<(), ClientError> {
        self.http.delete(&user_path(id)).await
    }
}
