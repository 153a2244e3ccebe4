use crate::providers::types::ApiKey;
use reqwest_middleware::RequestBuilder;

const GOOGLE_API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub enum AuthStrategy {
    ApiKeyHeader {
        header_name: &'static str,
        key: ApiKey,
    },
    None,
}

impl AuthStrategy {
    /// Google AI Studio keys go in a header rather than the `key` query
    /// parameter so they never show up in logged URLs.
    #[must_use]
    pub const fn google(key: ApiKey) -> Self {
        Self::ApiKeyHeader {
            header_name: GOOGLE_API_KEY_HEADER,
            key,
        }
    }

    #[must_use]
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiKeyHeader { header_name, key } => request.header(*header_name, key.as_str()),
            Self::None => request,
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self {
            Self::ApiKeyHeader { key, .. } => !key.is_empty(),
            Self::None => true,
        }
    }
}

impl std::fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKeyHeader { header_name, key } => f
                .debug_struct("ApiKeyHeader")
                .field("header_name", header_name)
                .field("key", key)
                .finish(),
            Self::None => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_auth_header() {
        let auth = AuthStrategy::google(ApiKey::new("AIzaSyExampleKey123"));
        assert!(auth.is_configured());

        let AuthStrategy::ApiKeyHeader { header_name, .. } = &auth else {
            panic!("Expected ApiKeyHeader variant");
        };
        assert_eq!(*header_name, "x-goog-api-key");

        let debug = format!("{auth:?}");
        assert!(!debug.contains("ExampleKey"));
    }

    #[test]
    fn test_empty_key_not_configured() {
        let auth = AuthStrategy::google(ApiKey::new(""));
        assert!(!auth.is_configured());
        assert!(AuthStrategy::None.is_configured());
    }
}
