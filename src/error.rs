//! Errors surfaced by remote calls.
//!
//! Every failure reaches the caller; the only side effect attached to an
//! error is the forced logout on `401`, which runs before the error is
//! returned.

/// Errors produced by the HTTP pipeline and the gateways built on it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connect failure, timeout, TLS).
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status other than 401.
    #[error("server returned HTTP {status}")]
    Status { status: u16, body: String },

    /// The server rejected the credential. Persisted session data has
    /// already been cleared when this is returned.
    #[error("unauthorized")]
    Unauthorized { body: String },

    /// A success response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ClientError {
    /// HTTP status carried by this error, if the server responded.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::HttpClientBuild(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The `error` field of a JSON error body (`{"error": "User not found"}`),
    /// falling back to the raw body when it is not JSON.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            Self::Status { body, .. } | Self::Unauthorized { body } => body,
            Self::Transport(_) | Self::Decode(_) | Self::HttpClientBuild(_) => return None,
        };
        if body.trim().is_empty() {
            return None;
        }
        let parsed = serde_json::from_str::<serde_json::Value>(body);
        match parsed.as_ref().map(|v| v.get("error").and_then(serde_json::Value::as_str)) {
            Ok(Some(message)) => Some(message.to_owned()),
            _ => Some(body.clone()),
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
