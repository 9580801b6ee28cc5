//! Search orchestration: query expansion, per-site fan-out, and result aggregation.

pub(crate) mod aggregate;
pub(crate) mod dispatch;
pub(crate) mod engine;
pub(crate) mod expand;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use types::{AggregatedSiteResult, Item, SiteResultSet};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("lookup task for site '{site}' did not complete: {reason}")]
    Internal { site: String, reason: String },
}
