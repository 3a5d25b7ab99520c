use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use linktolawyers::auth::{FileSessionStore, HttpAuthClient, SessionManager};
use linktolawyers::cli::Cli;
use linktolawyers::config::{BackendConfig, SessionCacheConfig};
use linktolawyers::db::RestBackend;
use linktolawyers::rest::RestClient;
use linktolawyers::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Populate env vars from a local .env when present.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = Settings::load().context("failed to load settings")?;
    let backend = BackendConfig::resolve(&settings).context("failed to resolve backend config")?;
    let cache = SessionCacheConfig::resolve(&settings)
        .context("failed to resolve session cache config")?;

    let rest = RestClient::new(&backend);
    let auth = Arc::new(HttpAuthClient::new(rest.clone()));
    let store = Arc::new(FileSessionStore::new(cache.path));
    let sessions = SessionManager::new(auth, store);
    sessions.init_blocking().await;

    // A restored session may have outlived its access token.
    if sessions.session().is_some_and(|s| s.is_expired()) {
        if let Err(e) = sessions.refresh().await {
            tracing::warn!(error = %e, "failed to refresh expired session");
        }
    }

    let db = RestBackend::new(rest, sessions.clone());
    linktolawyers::cli::run(cli, &sessions, &db).await
}
