use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        hint: Option<String>,
    },

    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Response blocked: {0}")]
    Blocked(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimit { .. } | Self::Connection(_) | Self::Timeout(_) | Self::Server { .. }
        )
    }

    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Maps a failure to get any response at all. Only the connect phase
    /// has a deadline, so a timeout is always `connect_timeout`.
    #[must_use]
    pub fn from_send(err: &reqwest_middleware::Error, connect_timeout: Duration) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
                Self::Timeout(connect_timeout)
            }
            other => Self::Connection(other.to_string()),
        }
    }

    /// Maps a non-success HTTP response. Gemini reports errors as
    /// `{"error": {"code", "message", "status"}}`.
    #[must_use]
    pub fn from_status(status: u16, body: &str, api_key_env_var: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error")?.get("message")?.as_str().map(String::from))
            .unwrap_or_else(|| format!("HTTP {status}"));

        match status {
            401 | 403 => Self::Authentication {
                message,
                hint: Some(format!("Check your {api_key_env_var} environment variable")),
            },
            400 if message.to_lowercase().contains("api key") => Self::Authentication {
                message,
                hint: Some(format!("Check your {api_key_env_var} environment variable")),
            },
            429 => Self::RateLimit {
                message,
                retry_after: None,
            },
            400..=499 => Self::InvalidRequest(message),
            500..=599 => Self::Server { status, message },
            _ => Self::InvalidRequest(message),
        }
    }
}
