use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Catalog Args ---
    /// Path or HTTP(S) URL of the product catalog document.
    #[arg(long, env = "CATALOG_SOURCE", default_value = "json/products.json")]
    pub catalog_source: String,

    // --- Selection Store Args ---
    /// Selection store type (file, memory)
    #[arg(long, env = "SELECTION_STORE", default_value = "file")]
    pub selection_store: String,

    /// Path of the selection store document. Defaults to
    /// selected_products.json under the user data directory.
    #[arg(long, env = "SELECTION_PATH")]
    pub selection_path: Option<String>,

    // --- Chat LLM Provider Args ---
    /// API Key for the chat completion provider.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., gpt-4o)
    #[arg(long, env = "CHAT_MODEL")]
    pub chat_model: Option<String>,

    /// Full URL of the chat completion endpoint.
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// Maximum completion tokens per request.
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value = "800")]
    pub chat_max_tokens: u32,

    /// Sampling temperature for completion requests.
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.5")]
    pub chat_temperature: f32,

    /// Frequency penalty for completion requests.
    #[arg(long, env = "CHAT_FREQUENCY_PENALTY", default_value = "0.8")]
    pub chat_frequency_penalty: f32,

    // --- Conversation Args ---
    /// Maximum conversation turns sent per completion request. The first
    /// turn is always kept. 0 sends the full history.
    #[arg(long, env = "HISTORY_TURNS", default_value = "20")]
    pub history_turns: usize,

    // --- General App Args ---
    /// Optional path to a prompt template JSON file. Built-in templates are
    /// used when not set.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    /// Render output right-to-left.
    #[arg(long, env = "RTL", default_value = "false")]
    pub rtl: bool,
}
