pub mod convert;
pub mod types;

use async_trait::async_trait;
use futures::StreamExt;

use crate::core::error::{ChatError, Result};
use crate::core::llm::LLM;
use crate::core::prompt::DEFAULT_MODEL;
use crate::core::types::{CompletionRequest, StreamResponse};
use crate::providers::error::ProviderError;
use crate::providers::http::{AuthStrategy, HttpClient, HttpConfig, SseParser};
use crate::providers::types::{ApiKey, BaseUrl, ModelId};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Clone)]
pub struct GeminiProvider {
    http: HttpClient,
    auth: AuthStrategy,
    model: ModelId,
    base_url: BaseUrl,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    pub fn new(api_key: ApiKey) -> std::result::Result<Self, ProviderError> {
        Self::with_http_config(api_key, HttpConfig::default())
    }

    pub fn with_http_config(
        api_key: ApiKey,
        http_config: HttpConfig,
    ) -> std::result::Result<Self, ProviderError> {
        let auth = AuthStrategy::google(api_key);
        if !auth.is_configured() {
            return Err(ProviderError::Configuration(format!(
                "{API_KEY_ENV} is empty"
            )));
        }

        Ok(Self {
            http: HttpClient::with_config(http_config)?,
            auth,
            model: ModelId::new(DEFAULT_MODEL),
            base_url: BaseUrl::new(DEFAULT_BASE_URL),
        })
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<ModelId>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<BaseUrl>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn stream_generate_content_url(&self) -> String {
        self.base_url.join(&format!(
            "/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.model.as_str()
        ))
    }

    fn parse_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
        ProviderError::from_status(status.as_u16(), body, API_KEY_ENV)
    }
}

#[async_trait]
impl LLM for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        self.model.as_str()
    }

    async fn stream(&self, request: CompletionRequest) -> Result<StreamResponse> {
        let api_request = convert::to_api_request(&request);
        let url = self.stream_generate_content_url();
        let body = serde_json::to_string(&api_request)?;

        tracing::debug!(
            model = %self.model,
            contents = api_request.contents.len(),
            "streamGenerateContent"
        );

        let response = self
            .http
            .post(&url, &self.auth)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::from_send(&e, self.http.config().connect_timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let err = Self::parse_error(status, &error_body);
            tracing::warn!(status = status.as_u16(), error = %err, "Gemini request rejected");
            return Err(err.into());
        }

        let sse_stream = SseParser::parse_stream(response.bytes_stream());

        let event_stream = sse_stream.flat_map(|result| {
            let parsed = result.and_then(|sse| convert::parse_stream_event(&sse.data));
            let events: Vec<Result<_>> = match parsed {
                Ok(events) => events.into_iter().map(Ok).collect(),
                Err(e) => vec![Err(ChatError::from(e))],
            };
            futures::stream::iter(events)
        });

        Ok(Box::pin(event_stream))
    }
}
