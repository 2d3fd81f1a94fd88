use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::error::{Error, Result};
use crate::i18n::Language;

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sources/search", get(search_sources))
        .route("/api/sources/title", get(source_title))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
struct TitleQuery {
    #[serde(default)]
    id: String,
    language: Option<String>,
}

async fn search_sources(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>> {
    let sources = state.catalog.search(&query.q).await?;
    Ok(Json(json!({ "total": sources.len(), "sources": sources })))
}

async fn source_title(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TitleQuery>,
) -> Result<Json<Value>> {
    if query.id.is_empty() {
        return Err(Error::validation("Source id is required"));
    }
    let language = match query.language.as_deref() {
        None | Some("") => Language::canonical(),
        Some(code) => Language::from_code(code)?,
    };

    let title = state.catalog.title_of(&query.id, language.code()).await?;
    Ok(Json(json!({
        "source_id": query.id,
        "language": language.code(),
        "title": title,
        "url": state.catalog.source_link(&query.id),
    })))
}
