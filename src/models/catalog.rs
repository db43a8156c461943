use serde::{ Deserialize, Serialize };

/// One catalog entry. Identity is `name`, assumed unique within a catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
}

/// Top-level shape of the catalog document.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<Product>,
}
