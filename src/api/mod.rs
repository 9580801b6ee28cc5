//! HTTP surface: the dataset search endpoint and a health probe.

mod errors;

use errors::ApiError;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::catalog::CatalogLookup;
use crate::search::AggregatedSiteResult;
use crate::search::engine::{self, SearchRequest};
use crate::translate::Translator;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared, read-only state for every request.
pub struct AppState<T, L> {
    translator: Arc<T>,
    catalog: Arc<L>,
    sites: Arc<[String]>,
    translate_timeout: Duration,
}

impl<T, L> AppState<T, L> {
    pub fn new(
        translator: Arc<T>,
        catalog: Arc<L>,
        sites: Vec<String>,
        translate_timeout: Duration,
    ) -> Self {
        Self {
            translator,
            catalog,
            sites: sites.into(),
            translate_timeout,
        }
    }
}

impl<T, L> Clone for AppState<T, L> {
    fn clone(&self) -> Self {
        Self {
            translator: Arc::clone(&self.translator),
            catalog: Arc::clone(&self.catalog),
            sites: Arc::clone(&self.sites),
            translate_timeout: self.translate_timeout,
        }
    }
}

pub fn router<T, L>(state: AppState<T, L>) -> Router
where
    T: Translator + 'static,
    L: CatalogLookup + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/dataset-search", post(post_dataset_search::<T, L>))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// POST /api/dataset-search - search every configured catalog for `{"query": "..."}`
async fn post_dataset_search<T, L>(
    State(state): State<AppState<T, L>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<AggregatedSiteResult>>, ApiError>
where
    T: Translator + 'static,
    L: CatalogLookup + 'static,
{
    let Json(body) = payload.map_err(reject_payload)?;
    let query = validate_query(&body)?;

    info!(query, "dataset search request");

    let req = SearchRequest {
        query,
        sites: &state.sites,
        translate_timeout: state.translate_timeout,
    };
    let results = engine::search(state.translator.as_ref(), &state.catalog, &req).await?;

    info!(sites = results.len(), "returning dataset search results");
    Ok(Json(results))
}

// Oversized bodies surface here whether or not a Content-Length was sent.
fn reject_payload(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::InvalidJson(rejection.body_text())
    }
}

/// The query must be a string that is non-empty after trimming.
fn validate_query(body: &Value) -> Result<&str, ApiError> {
    body.get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::InvalidQuery)
}
