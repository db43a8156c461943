pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod llm;
pub mod models;
pub mod render;
pub mod selection;

use app::App;
use catalog::CatalogLoader;
use cli::Args;
use config::prompt::load_prompts;
use conversation::ConversationController;
use llm::chat::new_client as new_chat_client;
use llm::{ LlmConfig, DEFAULT_COMPLETIONS_URL, DEFAULT_MODEL };
use log::info;
use selection::create_selection_store;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Catalog Source: {}", args.catalog_source);
    info!("Selection Store Type: {}", args.selection_store);
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or(DEFAULT_MODEL));
    info!("Chat Endpoint: {}", args.chat_base_url.as_deref().unwrap_or(DEFAULT_COMPLETIONS_URL));
    info!("History Turns Per Request: {}", args.history_turns);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in defaults"));
    info!("-------------------------");

    let chat_config = LlmConfig {
        api_key: Some(args.chat_api_key.clone()).filter(|k| !k.is_empty()),
        model: args.chat_model.clone(),
        base_url: args.chat_base_url.clone(),
        max_tokens: args.chat_max_tokens,
        temperature: args.chat_temperature,
        frequency_penalty: args.chat_frequency_penalty,
    };
    let chat_client = new_chat_client(&chat_config)?;
    let prompt_config = load_prompts(args.prompts_path.as_deref())?;
    let selection_store = create_selection_store(&args).await?;
    let controller = ConversationController::new(chat_client, prompt_config, args.history_turns);
    let loader = CatalogLoader::new(&args.catalog_source);

    let mut app = App::new(loader, selection_store, controller, &args);
    app.run().await
}
