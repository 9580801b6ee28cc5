//! Scripted translation and catalog doubles shared by the search and api tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::types::{Item, SiteResultSet};
use crate::catalog::{CatalogLookup, LookupError};
use crate::translate::{TranslateError, Translation, Translator};

enum TranslatorBehavior {
    Returns(String),
    Untranslated,
    Fails,
    Hangs,
}

pub(crate) struct MockTranslator {
    behavior: TranslatorBehavior,
    calls: AtomicUsize,
}

impl MockTranslator {
    fn with(behavior: TranslatorBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn returns(translated: &str) -> Self {
        Self::with(TranslatorBehavior::Returns(translated.to_string()))
    }

    pub(crate) fn untranslated() -> Self {
        Self::with(TranslatorBehavior::Untranslated)
    }

    pub(crate) fn failing() -> Self {
        Self::with(TranslatorBehavior::Fails)
    }

    pub(crate) fn hanging() -> Self {
        Self::with(TranslatorBehavior::Hangs)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Translator for MockTranslator {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            TranslatorBehavior::Returns(t) => Ok(Translation {
                original: text.to_string(),
                translated: Some(t.clone()),
            }),
            TranslatorBehavior::Untranslated => Ok(Translation::untranslated(text)),
            TranslatorBehavior::Fails => Err(TranslateError::Status(503)),
            TranslatorBehavior::Hangs => std::future::pending().await,
        }
    }
}

enum Scripted {
    Found {
        reported_site: String,
        count: u64,
        ids: Vec<String>,
    },
    Fails,
    Panics,
}

struct ScriptedResponse {
    delay_ms: u64,
    kind: Scripted,
}

/// Catalog double keyed by (site, query). Unscripted pairs fail with a 404.
///
/// Item names are `"<id> via <query>"` so tests can tell which variant an item came from.
#[derive(Default)]
pub(crate) struct MockCatalog {
    responses: HashMap<(String, String), ScriptedResponse>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockCatalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn script(mut self, site: &str, query: &str, delay_ms: u64, kind: Scripted) -> Self {
        self.responses
            .insert((site.into(), query.into()), ScriptedResponse { delay_ms, kind });
        self
    }

    pub(crate) fn found(self, site: &str, query: &str, count: u64, ids: &[&str]) -> Self {
        self.found_after(site, query, count, ids, 0)
    }

    pub(crate) fn found_after(
        self,
        site: &str,
        query: &str,
        count: u64,
        ids: &[&str],
        delay_ms: u64,
    ) -> Self {
        self.found_as(site, query, site, count, ids)
            .delayed(site, query, delay_ms)
    }

    /// Like `found`, but the result set claims to come from `reported_site`.
    pub(crate) fn found_as(
        self,
        site: &str,
        query: &str,
        reported_site: &str,
        count: u64,
        ids: &[&str],
    ) -> Self {
        let kind = Scripted::Found {
            reported_site: reported_site.into(),
            count,
            ids: ids.iter().map(|id| id.to_string()).collect(),
        };
        self.script(site, query, 0, kind)
    }

    pub(crate) fn failing(self, site: &str, query: &str) -> Self {
        self.script(site, query, 0, Scripted::Fails)
    }

    pub(crate) fn panicking(self, site: &str, query: &str) -> Self {
        self.script(site, query, 0, Scripted::Panics)
    }

    fn delayed(mut self, site: &str, query: &str, delay_ms: u64) -> Self {
        if let Some(r) = self.responses.get_mut(&(site.into(), query.into())) {
            r.delay_ms = delay_ms;
        }
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CatalogLookup for MockCatalog {
    async fn lookup(&self, site: &str, query: &str) -> Result<SiteResultSet, LookupError> {
        let key = (site.to_string(), query.to_string());
        self.calls.lock().unwrap().push(key.clone());

        let Some(response) = self.responses.get(&key) else {
            return Err(LookupError::Status(404));
        };
        if response.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(response.delay_ms)).await;
        }

        match &response.kind {
            Scripted::Found {
                reported_site,
                count,
                ids,
            } => Ok(SiteResultSet {
                site: reported_site.clone(),
                count: *count,
                items: ids
                    .iter()
                    .map(|id| Item {
                        id: id.clone(),
                        name: format!("{id} via {query}"),
                        description: format!("{id} from {site}"),
                        link: format!("https://example.com/datasets/{id}"),
                    })
                    .collect(),
            }),
            Scripted::Fails => Err(LookupError::Status(500)),
            Scripted::Panics => panic!("scripted lookup panic for {site}"),
        }
    }
}
