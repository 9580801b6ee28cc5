//! Translation capability: trait, LibreTranslate-compatible HTTP client, and target selection.

mod lang;
mod types;

pub use lang::Lang;
pub use types::Translation;

use std::future::Future;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use types::{TranslateRequest, TranslateResponse};

const ERROR_SNIPPET_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("translation service returned status {0}")]
    Status(u16),

    #[error("translation service error: {0}")]
    Api(String),

    #[error("translation service returned an unreadable body: {0}")]
    Decode(String),

    #[error("translation service timed out after {0}ms")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Produces a translated variant of a query.
/// Implemented by `HttpTranslator` for production; mock implementations used in tests.
pub trait Translator: Send + Sync {
    fn translate(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Translation, TranslateError>> + Send;
}

/// A missing translator means translation is disabled.
impl<T: Translator> Translator for Option<T> {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        match self {
            Some(inner) => inner.translate(text).await,
            None => Ok(Translation::untranslated(text)),
        }
    }
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Client for a LibreTranslate-compatible `/translate` endpoint.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    http: Client,
    endpoint: Url,
    api_key: Option<ApiKey>,
}

impl HttpTranslator {
    pub fn new(http: Client, endpoint: Url, api_key: Option<String>) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(ApiKey);
        Self {
            http,
            endpoint,
            api_key,
        }
    }
}

impl Translator for HttpTranslator {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        let target = Lang::target_for(text);
        let request = TranslateRequest {
            q: text,
            source: "auto",
            target: target.code(),
            format: "text",
            api_key: self.api_key.as_ref().map(|k| k.0.as_str()),
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(body) = serde_json::from_str::<TranslateResponse>(&text)
                && let Some(message) = body.error
            {
                warn!(status = %status, error = %message, "translation service error");
                return Err(TranslateError::Api(message));
            }
            warn!(status = %status, "translation service error (no structured body)");
            return Err(TranslateError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let body: TranslateResponse = serde_json::from_str(&text).map_err(|e| {
            let end = text.floor_char_boundary(ERROR_SNIPPET_CHARS);
            TranslateError::Decode(format!("{e} (body: {})", &text[..end]))
        })?;
        if let Some(message) = body.error {
            return Err(TranslateError::Api(message));
        }

        let translated = body
            .translated_text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        debug!(target = target.code(), translated = translated.is_some(), "translation complete");
        Ok(Translation {
            original: text.to_string(),
            translated,
        })
    }
}
