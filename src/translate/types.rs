use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    pub q: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_text: Option<String>,
    pub error: Option<String>,
}

/// Result of one translation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub original: String,
    /// `None` when no translation is available.
    pub translated: Option<String>,
}

impl Translation {
    pub fn untranslated(text: &str) -> Self {
        Self {
            original: text.to_string(),
            translated: None,
        }
    }
}
