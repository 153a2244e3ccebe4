use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Failed to initialize chat session: {0}")]
    Initialization(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatError {
    #[must_use]
    pub const fn is_initialization(&self) -> bool {
        matches!(self, Self::Initialization(_))
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Folds any failure raised while talking to the remote service into
    /// `Transport`, so callers past the adapter only see one kind.
    #[must_use]
    pub fn into_transport(self) -> Self {
        match self {
            Self::Transport(_) => self,
            other => Self::Transport(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;

impl From<crate::providers::error::ProviderError> for ChatError {
    fn from(err: crate::providers::error::ProviderError) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::error::ProviderError;

    #[test]
    fn test_error_display() {
        let err = ChatError::Initialization("GEMINI_API_KEY not set".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to initialize chat session: GEMINI_API_KEY not set"
        );
    }

    #[test]
    fn test_provider_error_becomes_transport() {
        let err: ChatError = ProviderError::StreamError("connection reset".into()).into();
        assert!(err.is_transport());
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_into_transport_keeps_transport() {
        let err = ChatError::Transport("reset".into()).into_transport();
        assert_eq!(err.to_string(), "Transport error: reset");

        let err = ChatError::Config("bad".into()).into_transport();
        assert!(err.is_transport());
        assert!(err.to_string().contains("Configuration error: bad"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let chat_err: ChatError = io_err.into();
        assert!(matches!(chat_err, ChatError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let chat_err: ChatError = json_err.into();
        assert!(matches!(chat_err, ChatError::Json(_)));
    }
}
