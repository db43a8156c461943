use async_trait::async_trait;
use log::{ error, warn };
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;

use super::SelectionStore;
use crate::models::catalog::Product;

/// Durable selection backend: one JSON document holding the ordered
/// selection, rewritten in full on every mutation. Persistence is
/// best-effort; the in-memory list stays authoritative when a write fails.
pub struct FileSelectionStore {
    path: PathBuf,
    items: RwLock<Vec<Product>>,
}

impl FileSelectionStore {
    pub async fn open(path: PathBuf) -> Self {
        let items = match fs::read_to_string(&path).await {
            Ok(json) =>
                match serde_json::from_str::<Vec<Product>>(&json) {
                    Ok(items) => items,
                    Err(e) => {
                        error!("Ignoring unreadable selection document {}: {}", path.display(), e);
                        Vec::new()
                    }
                }
            Err(_) => Vec::new(),
        };

        Self {
            path,
            items: RwLock::new(items),
        }
    }

    async fn persist(&self, items: &[Product]) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                warn!("Could not create selection directory {}: {}", parent.display(), e);
                return;
            }
        }

        match serde_json::to_string_pretty(items) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json).await {
                    warn!("Could not persist selection to {}: {}", self.path.display(), e);
                }
            }
            Err(e) => {
                warn!("Could not serialize selection: {}", e);
            }
        }
    }
}

#[async_trait]
impl SelectionStore for FileSelectionStore {
    async fn items(&self) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>> {
        Ok(self.items.read().await.clone())
    }

    async fn toggle(
        &self,
        product: &Product
    ) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>> {
        let snapshot = {
            let mut items = self.items.write().await;
            match items.iter().position(|p| p.name == product.name) {
                Some(index) => {
                    items.remove(index);
                }
                None => items.push(product.clone()),
            }
            items.clone()
        };
        self.persist(&snapshot).await;
        Ok(snapshot)
    }

    async fn remove(&self, index: usize) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>> {
        let snapshot = {
            let mut items = self.items.write().await;
            if index < items.len() {
                items.remove(index);
            }
            items.clone()
        };
        self.persist(&snapshot).await;
        Ok(snapshot)
    }

    async fn clear(&self) -> Result<Vec<Product>, Box<dyn Error + Send + Sync>> {
        let snapshot = {
            let mut items = self.items.write().await;
            items.clear();
            items.clone()
        };
        self.persist(&snapshot).await;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: &str) -> Product {
        Product {
            name: name.to_string(),
            category: category.to_string(),
            image: String::new(),
            description: None,
            benefits: None,
            ingredients: None,
        }
    }

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("selected_products.json")
    }

    #[tokio::test]
    async fn toggle_adds_then_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSelectionStore::open(store_path(&dir)).await;
        let cream = product("Cream A", "Moisturizer");

        let after_add = store.toggle(&cream).await.unwrap();
        assert_eq!(after_add.len(), 1);

        let after_remove = store.toggle(&cream).await.unwrap();
        assert!(after_remove.is_empty());
    }

    #[tokio::test]
    async fn persisted_selection_reloads_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);

        {
            let store = FileSelectionStore::open(path.clone()).await;
            store.toggle(&product("Serum B", "Serum")).await.unwrap();
            store.toggle(&product("Cream A", "Moisturizer")).await.unwrap();
        }

        let reopened = FileSelectionStore::open(path).await;
        let items = reopened.items().await.unwrap();
        let names: Vec<&str> = items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Serum B", "Cream A"]);
    }

    #[tokio::test]
    async fn remove_out_of_range_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSelectionStore::open(store_path(&dir)).await;
        store.toggle(&product("Cream A", "Moisturizer")).await.unwrap();

        let items = store.remove(5).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn clear_empties_store_and_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);

        let store = FileSelectionStore::open(path.clone()).await;
        store.toggle(&product("Cream A", "Moisturizer")).await.unwrap();
        let items = store.clear().await.unwrap();
        assert!(items.is_empty());

        let reopened = FileSelectionStore::open(path).await;
        assert!(reopened.items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_document_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);
        tokio::fs::write(&path, "not json").await.unwrap();

        let store = FileSelectionStore::open(path).await;
        assert!(store.items().await.unwrap().is_empty());
    }
}
