use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::extract::JsonBody;
use super::AppState;
use crate::error::Result;
use crate::model::{CreatePartRequest, Part, PartEdits};
use crate::sync::SyncReport;

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/parts", post(create_part).get(list_parts))
        .route(
            "/api/parts/:id",
            get(get_part).put(update_part).delete(delete_part),
        )
        .route("/api/parts/:id/propagate", post(propagate_part))
}

async fn create_part(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreatePartRequest>,
) -> Result<(StatusCode, Json<Part>)> {
    let created = state.engine.create_group(request).await?;
    Ok((StatusCode::CREATED, Json(created.value)))
}

async fn list_parts(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let parts = state.engine.list_parts().await?;
    Ok(Json(json!({ "total": parts.len(), "parts": parts })))
}

async fn get_part(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Part>> {
    Ok(Json(state.engine.get_part(&id).await?))
}

async fn update_part(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(edits): JsonBody<PartEdits>,
) -> Result<Json<Part>> {
    let updated = state.engine.update_record(&id, edits).await?;
    Ok(Json(updated.value))
}

async fn delete_part(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.engine.delete_record(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn propagate_part(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SyncReport>> {
    Ok(Json(state.engine.repropagate(&id).await?))
}
