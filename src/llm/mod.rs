pub mod chat;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub frequency_penalty: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            base_url: None,
            max_tokens: 800,
            temperature: 0.5,
            frequency_penalty: 0.8,
        }
    }
}
