//! Shared request pipeline for the user management API.
//!
//! ARCHITECTURE
//! ============
//! One `reqwest::Client` per [`HttpClient`], configured with the base URL,
//! the request deadline and a default JSON content type. Two interceptors
//! wrap every call:
//!
//! - outgoing: attach `Authorization: Bearer <token>` when the session store
//!   holds a non-empty token.
//! - incoming: on `401`, clear the persisted session, notify unauthorized
//!   listeners, then hand the error back to the caller.
//!
//! Navigation or any other host reaction to a rejected credential lives in
//! listeners registered through [`HttpClient::on_unauthorized`].

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::store::{self, SessionStore};

/// Emitted once per `401` response, after persisted session data is cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unauthorized {
    /// HTTP method of the rejected request.
    pub method: String,
    /// API path of the rejected request (e.g. `"/users/42"`).
    pub path: String,
}

/// Callback invoked synchronously from the incoming interceptor.
pub type UnauthorizedListener = Arc<dyn Fn(&Unauthorized) + Send + Sync>;

/// Cloneable handle to the shared pipeline. Clones share the connection
/// pool, the session store and the listener list.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

struct HttpClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<dyn SessionStore>,
    listeners: RwLock<Vec<UnauthorizedListener>>,
}

impl HttpClient {
    /// Build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(HttpClientInner { http, config, store, listeners: RwLock::new(Vec::new()) }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    /// Register a listener for rejected credentials.
    pub fn on_unauthorized<F>(&self, listener: F)
    where
        F: Fn(&Unauthorized) + Send + Sync + 'static,
    {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    /// `GET path`, decoding the JSON body.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decode failures.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        decode(response).await
    }

    /// `POST path` with a JSON body, decoding the JSON response.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decode failures.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    /// `PUT path` with a JSON body, decoding the JSON response.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decode failures.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        decode(response).await
    }

    /// `DELETE path`. The response body is not read.
    ///
    /// # Errors
    ///
    /// Propagates transport and status failures.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.inner.config.url(path);
        let request = self.authorize(self.inner.http.request(method.clone(), url));
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };

        tracing::debug!(%method, path, "api request");
        let response = request.send().await?;
        self.intercept_response(&method, path, response).await
    }

    /// Outgoing interceptor.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match store::stored_token(self.inner.store.as_ref()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Incoming interceptor.
    async fn intercept_response(&self, method: &Method, path: &str, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "api response");
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%method, path, %error, "failed to read error body");
                String::new()
            }
        };
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%method, path, "credential rejected, clearing session");
            store::clear_session(self.inner.store.as_ref());
            self.notify_unauthorized(&Unauthorized { method: method.to_string(), path: path.to_owned() });
            return Err(ClientError::Unauthorized { body });
        }

        Err(ClientError::Status { status: status.as_u16(), body })
    }

    fn notify_unauthorized(&self, event: &Unauthorized) {
        let listeners: Vec<UnauthorizedListener> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(event);
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
}
