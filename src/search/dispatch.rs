use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinError;
use tracing::{error, warn};

use super::SearchError;
use super::types::LookupOutcome;
use crate::catalog::{CatalogLookup, LookupError};

/// Runs one lookup and folds its result into an outcome tagged with `site`.
pub async fn dispatch(lookup: &impl CatalogLookup, site: String, query: &str) -> LookupOutcome {
    match lookup.lookup(&site, query).await {
        Ok(mut set) => {
            set.site = site;
            LookupOutcome::Found(set)
        }
        Err(error) => {
            warn!(site = %site, query, error = %error, "catalog lookup failed");
            LookupOutcome::Failed { site, error }
        }
    }
}

/// Launches one task per (site, query) pair and waits for every task to settle.
///
/// Outcomes come back in issue order (sites outer, queries inner), independent of
/// completion order. A failing or panicking lookup never cancels its siblings.
pub async fn fan_out<L>(
    lookup: &Arc<L>,
    sites: &[String],
    queries: &[String],
) -> Result<Vec<LookupOutcome>, SearchError>
where
    L: CatalogLookup + 'static,
{
    let mut issued = Vec::with_capacity(sites.len() * queries.len());
    let mut tasks = Vec::with_capacity(sites.len() * queries.len());

    for site in sites {
        for query in queries {
            let lookup = Arc::clone(lookup);
            let (task_site, query) = (site.clone(), query.clone());
            tasks.push(tokio::spawn(async move {
                dispatch(lookup.as_ref(), task_site, &query).await
            }));
            issued.push(site.clone());
        }
    }

    let settled = join_all(tasks).await;
    settle(issued, settled)
}

/// Pairs each settled task with the site it was issued for. Panics become site
/// failures; a cancelled task aborts the whole search.
fn settle(
    issued: Vec<String>,
    settled: Vec<Result<LookupOutcome, JoinError>>,
) -> Result<Vec<LookupOutcome>, SearchError> {
    let mut outcomes = Vec::with_capacity(settled.len());
    for (site, result) in issued.into_iter().zip(settled) {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) if e.is_panic() => {
                warn!(site = %site, "catalog lookup task panicked");
                outcomes.push(LookupOutcome::Failed {
                    site,
                    error: LookupError::Aborted("lookup panicked".into()),
                });
            }
            Err(e) => {
                error!(site = %site, error = %e, "catalog lookup task cancelled");
                return Err(SearchError::Internal {
                    site,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(outcomes)
}
