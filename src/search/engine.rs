use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::SearchError;
use super::aggregate::aggregate;
use super::dispatch::fan_out;
use super::expand::expand_query;
use super::types::{AggregatedSiteResult, LookupOutcome};
use crate::catalog::CatalogLookup;
use crate::translate::Translator;

pub struct SearchRequest<'a> {
    /// Already trimmed and non-empty.
    pub query: &'a str,
    pub sites: &'a [String],
    pub translate_timeout: Duration,
}

/// Expands the query, searches every site with every variant, and merges the results.
pub async fn search<T, L>(
    translator: &T,
    catalog: &Arc<L>,
    req: &SearchRequest<'_>,
) -> Result<Vec<AggregatedSiteResult>, SearchError>
where
    T: Translator,
    L: CatalogLookup + 'static,
{
    let queries = expand_query(translator, req.query, req.translate_timeout).await;
    info!(queries = ?queries, sites = req.sites.len(), "effective queries");

    let outcomes = fan_out(catalog, req.sites, &queries).await?;
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| matches!(o, LookupOutcome::Failed { .. }))
        .map(LookupOutcome::site)
        .collect();

    let results = aggregate(&outcomes);

    info!(
        dispatched = outcomes.len(),
        failed = failed.len(),
        failed_sites = ?failed,
        sites_with_results = results.len(),
        "search complete"
    );
    Ok(results)
}
