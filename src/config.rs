//! Client configuration parsed from environment variables.

use std::time::Duration;

pub const BASE_URL_ENV: &str = "USERDESK_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API origin without a trailing slash (e.g. `"http://localhost:8080"`).
    pub base_url: String,
    /// Deadline applied to every request, connect included.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `USERDESK_API_BASE_URL`: API origin, default `http://localhost:8080`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(BASE_URL_ENV) {
            Some(raw) if !raw.trim().is_empty() => Self::default().with_base_url(raw.trim()),
            _ => Self::default(),
        }
    }

    /// Replace the base URL, dropping any trailing slashes.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Join an API path (leading `/` expected) onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
