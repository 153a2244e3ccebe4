use async_trait::async_trait;

use super::error::Result;
use super::types::{CompletionRequest, StreamResponse};

#[async_trait]
pub trait LLM: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;
    async fn stream(&self, request: CompletionRequest) -> Result<StreamResponse>;
}
