use std::sync::Arc;

use parking_lot::Mutex;

use super::error::{ChatError, Result};
use super::llm::LLM;
use super::prompt::{DEFAULT_MODEL, DEFAULT_SYSTEM_INSTRUCTION, DEFAULT_TEMPERATURE};
use super::stream::FragmentStream;
use super::types::{CompletionRequest, HistoryEntry};
use crate::providers::GeminiProvider;
use crate::providers::http::HttpConfig;
use crate::providers::types::{ApiKey, BaseUrl};

pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Fixed at session construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub model: String,
    pub system_instruction: String,
    /// Higher values trade determinism for variety.
    pub temperature: f32,
    /// Provider default when unset.
    pub max_output_tokens: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: None,
        }
    }
}

/// Builds a [`ChatSession`] against the Gemini API.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    config: SessionConfig,
    api_key_env: String,
    base_url: Option<BaseUrl>,
    http_config: HttpConfig,
}

impl SessionFactory {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: None,
            http_config: HttpConfig::default(),
        }
    }

    #[must_use]
    pub fn with_api_key_env(mut self, var_name: impl Into<String>) -> Self {
        self.api_key_env = var_name.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<BaseUrl>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Opens one conversation context. Missing credentials and client
    /// construction failures surface as [`ChatError::Initialization`].
    pub fn create(&self) -> Result<ChatSession> {
        let api_key = self.resolve_api_key()?;

        let mut provider = GeminiProvider::with_http_config(api_key, self.http_config.clone())
            .map_err(|e| ChatError::Initialization(e.to_string()))?
            .with_model(self.config.model.clone());

        if let Some(base_url) = &self.base_url {
            provider = provider.with_base_url(base_url.clone());
        }

        tracing::info!(
            model = %self.config.model,
            temperature = self.config.temperature,
            "Chat session created"
        );

        Ok(ChatSession::new(Arc::new(provider), self.config.clone()))
    }

    fn resolve_api_key(&self) -> Result<ApiKey> {
        let key = ApiKey::from_env(&self.api_key_env).or_else(|e| {
            if self.api_key_env == DEFAULT_API_KEY_ENV {
                ApiKey::from_env(FALLBACK_API_KEY_ENV).map_err(|_| e)
            } else {
                Err(e)
            }
        });

        match key {
            Ok(key) if !key.is_empty() => Ok(key),
            Ok(_) => Err(ChatError::Initialization(format!(
                "Environment variable {} is empty",
                self.api_key_env
            ))),
            Err(e) => Err(ChatError::Initialization(e.to_string())),
        }
    }
}

/// One conversation with the remote assistant.
pub struct ChatSession {
    llm: Arc<dyn LLM>,
    config: SessionConfig,
    history: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl ChatSession {
    #[must_use]
    pub fn new(llm: Arc<dyn LLM>, config: SessionConfig) -> Self {
        Self {
            llm,
            config,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.llm.name()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.llm.model()
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().clone()
    }

    pub fn reset(&self) {
        self.history.lock().clear();
        tracing::debug!("Session history cleared");
    }

    /// Submits `text` and returns the lazy fragment sequence for the reply.
    pub async fn send_and_stream(&self, text: &str) -> Result<FragmentStream> {
        let mut contents = self.history();
        contents.push(HistoryEntry::user(text));

        let mut request = CompletionRequest::new(contents)
            .with_system_instruction(self.config.system_instruction.clone())
            .with_temperature(self.config.temperature);
        if let Some(max_tokens) = self.config.max_output_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        tracing::debug!(
            model = %self.llm.model(),
            history = request.history.len(),
            "Sending message"
        );

        let inner = self
            .llm
            .stream(request)
            .await
            .map_err(ChatError::into_transport)?;

        Ok(FragmentStream::new(inner, text, Arc::clone(&self.history)))
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("provider", &self.llm.name())
            .field("model", &self.llm.model())
            .field("history", &self.history.lock().len())
            .finish_non_exhaustive()
    }
}
