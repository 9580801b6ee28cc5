mod api;
mod catalog;
mod config;
mod search;
mod translate;

pub const USER_AGENT: &str = concat!("datascout/", env!("CARGO_PKG_VERSION"));

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tracing::info;

use api::AppState;
use catalog::HttpCatalog;
use config::{Args, Settings};
use translate::HttpTranslator;

/// TCP connection establishment timeout for outbound calls.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("datascout=info".parse()?),
        )
        .init();

    let settings = Settings::from_args(Args::parse())
        .inspect_err(|e| tracing::error!("invalid configuration: {e}"))?;
    settings.log_startup();

    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(settings.lookup_timeout)
        .build()?;

    let translator = settings
        .translate_url
        .clone()
        .map(|url| HttpTranslator::new(http.clone(), url, settings.translate_api_key.clone()));
    let catalog = HttpCatalog::new(http, settings.sites.clone());

    let state = AppState::new(
        Arc::new(translator),
        Arc::new(catalog),
        settings.site_names(),
        settings.translate_timeout,
    );

    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "starting datascout");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
