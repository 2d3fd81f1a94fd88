//! HTTP surface: thin axum handlers over the sync engine, the event service,
//! the catalog cache and the template store.

mod error;
mod events;
mod extract;
mod parts;
mod sources;
mod templates;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::CatalogCache;
use crate::events::EventService;
use crate::store::{EventStore, PartStore};
use crate::sync::SyncEngine;
use crate::templates::TemplateStore;

/// Services shared by every handler
pub struct AppState {
    pub engine: SyncEngine,
    pub events: EventService,
    pub catalog: Arc<CatalogCache>,
    pub templates: Arc<TemplateStore>,
}

impl AppState {
    pub fn new(
        parts: Arc<dyn PartStore>,
        events: Arc<dyn EventStore>,
        catalog: Arc<CatalogCache>,
        templates: Arc<TemplateStore>,
    ) -> Self {
        Self {
            engine: SyncEngine::new(
                parts,
                Arc::clone(&events),
                Arc::clone(&catalog),
                Arc::clone(&templates),
            ),
            events: EventService::new(events),
            catalog,
            templates,
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(parts::routes())
        .merge(events::routes())
        .merge(sources::routes())
        .merge(templates::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
