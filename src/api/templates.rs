use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::extract::JsonBody;
use super::AppState;
use crate::error::Result;
use crate::templates::{TemplateConfig, TemplateDefinition};

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/templates", get(get_templates).post(create_template))
        .route(
            "/api/templates/:id",
            put(update_template).delete(delete_template),
        )
}

#[derive(Debug, Deserialize)]
struct UpdateTemplateRequest {
    #[serde(default)]
    translations: BTreeMap<String, String>,
    #[serde(default = "visible")]
    visible: bool,
}

fn visible() -> bool {
    true
}

async fn get_templates(State(state): State<Arc<AppState>>) -> Result<Json<TemplateConfig>> {
    Ok(Json(state.templates.snapshot()?))
}

async fn create_template(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<TemplateDefinition>,
) -> Result<(StatusCode, Json<TemplateDefinition>)> {
    let template = state
        .templates
        .create(&request.id, request.translations, request.visible)
        .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

async fn update_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateTemplateRequest>,
) -> Result<Json<TemplateDefinition>> {
    let template = state
        .templates
        .update(&id, request.translations, request.visible)
        .await?;
    Ok(Json(template))
}

async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.templates.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
