mod file;
mod memory;

use async_trait::async_trait;
use log::info;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::Args;
use crate::models::catalog::Product;

pub use file::FileSelectionStore;
pub use memory::MemorySelectionStore;

/// Ordered, name-unique product selection. Every mutation persists the full
/// selection and returns the updated ordered list.
#[async_trait]
pub trait SelectionStore: Send + Sync {
    async fn items(&self) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>>;

    /// Adds the product when absent (by name), removes it when present.
    async fn toggle(
        &self,
        product: &Product
    ) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>>;

    /// Removes the entry at `index`. An out-of-range index is a no-op.
    async fn remove(&self, index: usize) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>>;

    async fn clear(&self) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>>;
}

pub async fn create_selection_store(
    args: &Args
) -> Result<Arc<dyn SelectionStore>, Box<dyn Error + Send + Sync>> {
    match args.selection_store.to_lowercase().as_str() {
        "file" => {
            let path = match &args.selection_path {
                Some(path) => PathBuf::from(path),
                None => default_selection_path(),
            };
            info!("Selection will be stored in: {}", path.display());
            let store = FileSelectionStore::open(path).await;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemorySelectionStore::new())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported selection store type: {}", args.selection_store)
                    )
                )
            ),
    }
}

fn default_selection_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("routine-assistant")
        .join("selected_products.json")
}

#[derive(Serialize)]
struct PromptProduct<'a> {
    name: &'a str,
    category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    benefits: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ingredients: Option<&'a str>,
}

/// Serializes the prompt-relevant product fields as pretty JSON. Image URLs
/// carry nothing useful for the model and are left out.
pub fn format_selection_for_prompt(selection: &[Product]) -> String {
    let info: Vec<PromptProduct<'_>> = selection
        .iter()
        .map(|p| PromptProduct {
            name: &p.name,
            category: &p.category,
            description: p.description.as_deref(),
            benefits: p.benefits.as_deref(),
            ingredients: p.ingredients.as_deref(),
        })
        .collect();

    serde_json::to_string_pretty(&info).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> Product {
        Product {
            name: name.to_string(),
            category: "Serum".to_string(),
            image: "serum.png".to_string(),
            description: Some("Brightening serum".to_string()),
            benefits: None,
            ingredients: None,
        }
    }

    #[test]
    fn prompt_format_keeps_relevant_fields_only() {
        let formatted = format_selection_for_prompt(&[product("Serum B")]);
        assert!(formatted.contains("Serum B"));
        assert!(formatted.contains("Brightening serum"));
        assert!(!formatted.contains("serum.png"));
        assert!(!formatted.contains("benefits"));
    }

    #[test]
    fn prompt_format_of_empty_selection_is_empty_array() {
        assert_eq!(format_selection_for_prompt(&[]), "[]");
    }
}
