use async_trait::async_trait;
use std::error::Error;
use tokio::sync::RwLock;

use super::SelectionStore;
use crate::models::catalog::Product;

/// Ephemeral selection backend. Same semantics as the file store without
/// persistence; the selection lives for the process only.
pub struct MemorySelectionStore {
    items: RwLock<Vec<Product>>,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemorySelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SelectionStore for MemorySelectionStore {
    async fn items(&self) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>> {
        Ok(self.items.read().await.clone())
    }

    async fn toggle(
        &self,
        product: &Product
    ) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>> {
        let mut items = self.items.write().await;
        match items.iter().position(|p| p.name == product.name) {
            Some(index) => {
                items.remove(index);
            }
            None => items.push(product.clone()),
        }
        Ok(items.clone())
    }

    async fn remove(&self, index: usize) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>> {
        let mut items = self.items.write().await;
        if index < items.len() {
            items.remove(index);
        }
        Ok(items.clone())
    }

    async fn clear(&self) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>> {
        let mut items = self.items.write().await;
        items.clear();
        Ok(items.clone())
    }
}
