pub mod openai;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::sync::Arc;

use self::openai::OpenAiChatClient;
use super::LlmConfig;
use crate::models::chat::ChatMessage;

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
}

/// One completion request over the full turn sequence supplied by the
/// caller. Implementations never retry; a failed call is terminal for that
/// turn.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage]
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>>;
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn ChatClient>, Box<dyn StdError + Send + Sync>> {
    let client = OpenAiChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
