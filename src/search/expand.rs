use std::time::Duration;

use tracing::{debug, warn};

use crate::translate::{TranslateError, Translator};

/// Expands a validated query into the distinct variants to search with:
/// the original first, then the translation when one is available and differs.
///
/// Translation is best-effort. Errors and timeouts fall back to the original alone.
pub async fn expand_query(
    translator: &impl Translator,
    query: &str,
    timeout: Duration,
) -> Vec<String> {
    let translated = match tokio::time::timeout(timeout, translator.translate(query)).await {
        Ok(Ok(translation)) => {
            debug!(
                original = %translation.original,
                translated = ?translation.translated,
                "translation received"
            );
            translation.translated
        }
        Ok(Err(e)) => {
            warn!(error = %e, "translation failed, searching original query only");
            None
        }
        Err(_) => {
            let e = TranslateError::Timeout(timeout.as_millis() as u64);
            warn!(error = %e, "translation failed, searching original query only");
            None
        }
    };

    let mut variants = vec![query.to_string()];
    if let Some(t) = translated.map(|t| t.trim().to_string())
        && !t.is_empty()
        && t != query
    {
        variants.push(t);
    }

    debug!(variants = ?variants, "query expanded");
    variants
}
