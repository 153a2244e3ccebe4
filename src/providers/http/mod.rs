pub mod auth;
pub mod sse;

pub use auth::AuthStrategy;
pub use sse::SseParser;

use reqwest::{Client, Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{Retryable, RetryableStrategy, RetryTransientMiddleware};
use std::time::Duration;

use crate::providers::error::ProviderError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Transport settings. Retries only cover the request that opens a
/// stream; a body that breaks off mid-stream is not replayed.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub max_retries: u32,
    pub retry_min_delay: Duration,
    pub retry_max_delay: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            max_retries: 2,
            retry_min_delay: Duration::from_millis(500),
            retry_max_delay: Duration::from_secs(10),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn without_retries(mut self) -> Self {
        self.max_retries = 0;
        self
    }
}

/// Retries exactly what [`ProviderError::is_retryable`] calls transient.
#[derive(Debug, Clone, Copy)]
struct ProviderRetryStrategy {
    connect_timeout: Duration,
}

impl ProviderRetryStrategy {
    fn classify(error: &ProviderError) -> Retryable {
        if error.is_retryable() {
            Retryable::Transient
        } else {
            Retryable::Fatal
        }
    }

    fn classify_status(status: StatusCode) -> Option<Retryable> {
        if status.is_success() {
            return None;
        }
        Some(Self::classify(&ProviderError::from_status(
            status.as_u16(),
            "",
            "",
        )))
    }
}

impl RetryableStrategy for ProviderRetryStrategy {
    fn handle(&self, res: &Result<Response, reqwest_middleware::Error>) -> Option<Retryable> {
        match res {
            Ok(response) => Self::classify_status(response.status()),
            Err(reqwest_middleware::Error::Middleware(_)) => Some(Retryable::Fatal),
            Err(err) => Some(Self::classify(&ProviderError::from_send(
                err,
                self.connect_timeout,
            ))),
        }
    }
}

#[derive(Clone)]
pub struct HttpClient {
    inner: ClientWithMiddleware,
    config: HttpConfig,
}

impl HttpClient {
    pub fn with_config(config: HttpConfig) -> Result<Self, ProviderError> {
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(config.retry_min_delay, config.retry_max_delay)
            .build_with_max_retries(config.max_retries);

        // No overall timeout: a long answer may keep the body open for minutes.
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        let client_with_middleware = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                ProviderRetryStrategy {
                    connect_timeout: config.connect_timeout,
                },
            ))
            .build();

        Ok(Self {
            inner: client_with_middleware,
            config,
        })
    }

    #[must_use]
    pub fn post(&self, url: &str, auth: &AuthStrategy) -> reqwest_middleware::RequestBuilder {
        auth.apply(self.inner.post(url))
    }

    #[must_use]
    pub const fn config(&self) -> &HttpConfig {
        &self.config
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
