use async_trait::async_trait;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;

use super::{ ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, DEFAULT_COMPLETIONS_URL, DEFAULT_MODEL };
use crate::models::chat::{ ChatMessage, Role };

pub struct OpenAiChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    frequency_penalty: f32,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: Role,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
    frequency_penalty: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

impl OpenAiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        max_tokens: u32,
        temperature: f32,
        frequency_penalty: f32,
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let chat_model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_url = base_url.unwrap_or_else(|| DEFAULT_COMPLETIONS_URL.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| format!("Invalid API key format: {}", e))?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            model: chat_model,
            base_url: api_url,
            max_tokens,
            temperature,
            frequency_penalty,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| "Chat API key is required (set CHAT_API_KEY)".to_string())?;

        Self::new(
            api_key,
            config.model.clone(),
            config.base_url.clone(),
            config.max_tokens,
            config.temperature,
            config.frequency_penalty,
        )
    }

    fn build_request(&self, messages: &[ChatMessage]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            frequency_penalty: self.frequency_penalty,
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage]
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let req = self.build_request(messages);

        let resp = self.http
            .post(&self.base_url)
            .json(&req)
            .send().await?
            .error_for_status()?
            .json::<ChatCompletionResponse>().await?;

        let content = resp.choices
            .into_iter()
            .next()
            .ok_or_else(|| "Completion response contained no choices".to_string())?
            .message.content;

        Ok(CompletionResponse { content })
    }
}
