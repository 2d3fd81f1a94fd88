use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::JsonBody;
use super::AppState;
use crate::error::Result;
use crate::model::{parse_date, CreateEventRequest, Event, EventType, UpdateEventRequest};
use crate::store::EventFilter;

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/events", post(create_event).get(list_events))
        .route(
            "/api/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/events/:id/duplicate", post(duplicate_event))
        .route("/api/events/:id/toggle-public", put(toggle_public))
        .route("/api/events/:id/parts", get(event_parts))
}

#[derive(Debug, Default, Deserialize)]
struct ListEventsQuery {
    public: Option<bool>,
    #[serde(rename = "type")]
    event_type: Option<String>,
    from: Option<String>,
    to: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl ListEventsQuery {
    fn is_empty(&self) -> bool {
        self.public.is_none()
            && self.event_type.is_none()
            && self.from.is_none()
            && self.to.is_none()
            && self.limit.is_none()
            && self.offset.is_none()
    }

    fn filter(&self) -> Result<EventFilter> {
        Ok(EventFilter {
            public: self.public,
            event_type: self
                .event_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(EventType::parse)
                .transpose()?,
            date_from: self.from.as_deref().map(parse_date).transpose()?,
            date_to: self.to.as_deref().map(parse_date).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DuplicateEventRequest {
    #[serde(default)]
    new_date: String,
}

#[derive(Debug, Deserialize)]
struct TogglePublicRequest {
    public: bool,
}

#[derive(Debug, Default, Deserialize)]
struct EventPartsQuery {
    language: Option<String>,
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = state.events.create_event(request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Value>> {
    if query.is_empty() {
        let events = state.events.list_events().await?;
        return Ok(Json(json!({ "total": events.len(), "events": events })));
    }

    let limit = query.limit.unwrap_or(0);
    let offset = query.offset.unwrap_or(0);
    let (events, total) = state
        .events
        .list_events_filtered(&query.filter()?, limit, offset)
        .await?;
    Ok(Json(json!({
        "events": events,
        "total": total,
        "limit": limit,
        "offset": offset,
    })))
}

async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    Ok(Json(state.events.get_event(&id).await?))
}

async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateEventRequest>,
) -> Result<Json<Event>> {
    Ok(Json(state.events.update_event(&id, request).await?))
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.engine.delete_event(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn duplicate_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<DuplicateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let duplicated = state.engine.duplicate_event(&id, &request.new_date).await?;
    Ok((StatusCode::CREATED, Json(duplicated.value)))
}

async fn toggle_public(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<TogglePublicRequest>,
) -> Result<Json<Event>> {
    Ok(Json(state.events.toggle_public(&id, request.public).await?))
}

async fn event_parts(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<EventPartsQuery>,
) -> Result<Json<Value>> {
    let language = query.language.as_deref().filter(|l| !l.is_empty());
    let parts = state.engine.event_parts(&id, language).await?;
    Ok(Json(json!({ "total": parts.len(), "parts": parts })))
}
