use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use super::error::ProviderError;

#[derive(Clone)]
pub struct ApiKey(Cow<'static, str>);

impl ApiKey {
    #[must_use]
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub fn from_env(var_name: &str) -> Result<Self, ProviderError> {
        std::env::var(var_name)
            .map(|s| Self(Cow::Owned(s)))
            .map_err(|_| {
                ProviderError::Configuration(format!("Environment variable {var_name} not set"))
            })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.0.chars().count();
        if len > 8 {
            let head: String = self.0.chars().take(4).collect();
            let tail: String = self.0.chars().skip(len - 3).collect();
            write!(f, "ApiKey({head}...{tail})")
        } else if len > 0 {
            write!(f, "ApiKey(***)")
        } else {
            write!(f, "ApiKey(<empty>)")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(Cow<'static, str>);

impl ModelId {
    #[must_use]
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ModelId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&'static str> for ModelId {
    fn from(id: &'static str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Cow<'static, str>);

impl BaseUrl {
    #[must_use]
    pub fn new(url: impl Into<Cow<'static, str>>) -> Self {
        let url = url.into();
        let url = if url.ends_with('/') {
            Cow::Owned(url.trim_end_matches('/').to_string())
        } else {
            url
        };
        Self(url)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BaseUrl {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

impl From<&'static str> for BaseUrl {
    fn from(url: &'static str) -> Self {
        Self::new(url)
    }
}
