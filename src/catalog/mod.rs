use log::info;
use std::error::Error;
use std::fmt;
use tokio::fs;
use url::Url;

use crate::models::catalog::{ CatalogFile, Product };

#[derive(Debug)]
pub enum CatalogError {
    Network(reqwest::Error),
    Io(std::io::Error),
    Malformed(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Network(e) => write!(f, "Catalog fetch failed: {}", e),
            CatalogError::Io(e) => write!(f, "Catalog file read failed: {}", e),
            CatalogError::Malformed(e) => write!(f, "Catalog document is malformed: {}", e),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CatalogError::Network(e) => Some(e),
            CatalogError::Io(e) => Some(e),
            CatalogError::Malformed(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network(err)
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Malformed(err)
    }
}

/// Loads the static catalog document from a local path or an HTTP(S) URL.
pub struct CatalogLoader {
    source: String,
    http: reqwest::Client,
}

impl CatalogLoader {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<Product>, CatalogError> {
        let document = if is_remote(&self.source) {
            self.http
                .get(&self.source)
                .send().await?
                .error_for_status()?
                .text().await?
        } else {
            fs::read_to_string(&self.source).await?
        };

        let catalog: CatalogFile = serde_json::from_str(&document)?;
        info!("Loaded {} products from {}", catalog.products.len(), self.source);
        Ok(catalog.products)
    }
}

fn is_remote(source: &str) -> bool {
    Url::parse(source)
        .map(|url| url.scheme() == "http" || url.scheme() == "https")
        .unwrap_or(false)
}

/// Categories that have at least one product, sorted and deduplicated.
/// Empty categories can never appear because the list is derived.
pub fn available_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = products
        .iter()
        .map(|p| p.category.clone())
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

/// Pure filter: exact category match (empty category matches all) plus a
/// case-insensitive substring match of the query against name and
/// description. A missing description never matches the query.
pub fn filter_products(products: &[Product], category: &str, query: &str) -> Vec<Product> {
    let query = query.to_lowercase();
    products
        .iter()
        .filter(|product| {
            let matches_category = category.is_empty() || product.category == category;
            let matches_query =
                query.is_empty() ||
                product.name.to_lowercase().contains(&query) ||
                product.description
                    .as_ref()
                    .map(|d| d.to_lowercase().contains(&query))
                    .unwrap_or(false);
            matches_category && matches_query
        })
        .cloned()
        .collect()
}
