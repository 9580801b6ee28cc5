use serde::{Deserialize, Serialize};

use crate::catalog::LookupError;

/// A dataset record as returned by one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identity key, unique within one site.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
}

/// Successful answer from one (site, query) lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteResultSet {
    pub site: String,
    /// Total-count estimate reported by the catalog, not the length of `items`.
    pub count: u64,
    pub items: Vec<Item>,
}

/// Settled result of one dispatched lookup.
#[derive(Debug)]
pub enum LookupOutcome {
    Found(SiteResultSet),
    Failed { site: String, error: LookupError },
}

impl LookupOutcome {
    pub fn site(&self) -> &str {
        match self {
            LookupOutcome::Found(set) => &set.site,
            LookupOutcome::Failed { site, .. } => site,
        }
    }
}

/// Merged result for one site across every query variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedSiteResult {
    #[serde(rename = "database")]
    pub site: String,
    pub count: u64,
    pub items: Vec<Item>,
}
