use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use study_materials::api::{self, AppState};
use study_materials::catalog::{CatalogCache, HttpCatalogFetcher};
use study_materials::config::Config;
use study_materials::store::{EventStore, MemoryStore, PartStore, PostgresStore};
use study_materials::templates::TemplateStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("study_materials=info".parse()?),
        )
        .init();

    info!("Starting study materials service");

    let config = Config::from_env()?;

    let (parts, events): (Arc<dyn PartStore>, Arc<dyn EventStore>) = match &config.database_url {
        Some(url) => {
            let store = PostgresStore::connect(url)
                .await
                .context("Failed to connect to Postgres")?;
            info!("Using Postgres document storage");
            (Arc::new(store.clone()), Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set, records will not survive a restart");
            let store = MemoryStore::new();
            (Arc::new(store.clone()), Arc::new(store))
        }
    };

    let fetcher = HttpCatalogFetcher::new(&config.catalog_url, config.catalog_timeout)
        .context("Failed to build catalog HTTP client")?;
    info!(
        "Initialized catalog client: {} (timeout: {:?})",
        config.catalog_url, config.catalog_timeout
    );
    let catalog = Arc::new(CatalogCache::new(Arc::new(fetcher), &config.source_link_base));

    let templates = Arc::new(
        TemplateStore::load(&config.templates_path)
            .with_context(|| format!("Failed to load templates from {}", config.templates_path))?,
    );

    let state = Arc::new(AppState::new(parts, events, catalog, templates));
    let app = api::router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result.context("Server error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
