use serde::Deserialize;

use crate::search::Item;

/// Body returned by a catalog search endpoint.
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    /// Total hits reported by the catalog; falls back to `items.len()` when absent.
    pub count: Option<u64>,
    #[serde(default)]
    pub items: Vec<Item>,
}
