use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use indexmap::IndexMap;
use tracing::info;
use url::Url;

/// Command-line and environment configuration, read once at startup.
#[derive(Debug, Parser)]
#[command(name = "datascout", version, about)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "DATASCOUT_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Catalog to search, as NAME=URL (repeatable; order is preserved)
    #[arg(long = "site", value_name = "NAME=URL")]
    pub sites: Vec<String>,

    /// Semicolon-separated NAME=URL list, used only when no --site is given
    #[arg(
        long = "sites",
        env = "DATASCOUT_SITES",
        value_name = "NAME=URL;...",
        value_delimiter = ';'
    )]
    pub site_list: Vec<String>,

    /// LibreTranslate-compatible /translate endpoint; translation is disabled when unset
    #[arg(long, env = "DATASCOUT_TRANSLATE_URL")]
    pub translate_url: Option<String>,

    /// API key sent to the translation service
    #[arg(long, env = "DATASCOUT_TRANSLATE_API_KEY", hide_env_values = true)]
    pub translate_api_key: Option<String>,

    /// Give up on translation after this many milliseconds
    #[arg(long, env = "DATASCOUT_TRANSLATE_TIMEOUT_MS", default_value_t = 3_000)]
    pub translate_timeout_ms: u64,

    /// Per-request HTTP timeout for catalog lookups, in milliseconds
    #[arg(long, env = "DATASCOUT_LOOKUP_TIMEOUT_MS", default_value_t = 20_000)]
    pub lookup_timeout_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no catalog sites configured; pass --site NAME=URL or set DATASCOUT_SITES")]
    NoSites,

    #[error("invalid site '{0}': expected NAME=URL")]
    InvalidSite(String),

    #[error("site '{0}' is configured more than once")]
    DuplicateSite(String),

    #[error("invalid URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        source: url::ParseError,
    },

    #[error("URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validated, immutable service settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: SocketAddr,
    /// Site name to search endpoint, in configured order.
    pub sites: IndexMap<String, Url>,
    pub translate_url: Option<Url>,
    pub translate_api_key: Option<String>,
    pub translate_timeout: Duration,
    pub lookup_timeout: Duration,
}

impl Settings {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        // Explicit --site flags win over the list form.
        let entries = if args.sites.is_empty() {
            &args.site_list
        } else {
            &args.sites
        };

        let mut sites = IndexMap::new();
        for entry in entries.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let (name, url) = parse_site(entry)?;
            if sites.contains_key(&name) {
                return Err(ConfigError::DuplicateSite(name));
            }
            sites.insert(name, url);
        }
        if sites.is_empty() {
            return Err(ConfigError::NoSites);
        }

        let translate_url = args
            .translate_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(parse_http_url)
            .transpose()?;

        if args.translate_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("translate timeout"));
        }
        if args.lookup_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("lookup timeout"));
        }

        Ok(Self {
            bind: args.bind,
            sites,
            translate_url,
            translate_api_key: args.translate_api_key,
            translate_timeout: Duration::from_millis(args.translate_timeout_ms),
            lookup_timeout: Duration::from_millis(args.lookup_timeout_ms),
        })
    }

    pub fn site_names(&self) -> Vec<String> {
        self.sites.keys().cloned().collect()
    }

    pub fn log_startup(&self) {
        info!(
            bind = %self.bind,
            sites = ?self.sites.keys().collect::<Vec<_>>(),
            translation = self.translate_url.is_some(),
            translate_timeout_ms = self.translate_timeout.as_millis() as u64,
            lookup_timeout_ms = self.lookup_timeout.as_millis() as u64,
            "configuration loaded"
        );
    }
}

fn parse_site(entry: &str) -> Result<(String, Url), ConfigError> {
    let (name, url) = entry
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidSite(entry.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::InvalidSite(entry.to_string()));
    }
    Ok((name.to_string(), parse_http_url(url.trim())?))
}

fn parse_http_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(value.to_string())),
    }
}
