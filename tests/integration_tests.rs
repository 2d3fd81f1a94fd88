//! Integration tests for the study materials service
//!
//! These run the sync engine and the HTTP router against the in-memory store
//! and a canned catalog. Postgres is covered by the query-builder tests in
//! src/store/postgres.rs since it needs a live database.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use study_materials::api::{self, AppState};
use study_materials::catalog::{CatalogCache, CatalogFetcher, SourceNode};
use study_materials::error::{Error, Result};
use study_materials::model::{CreateEventRequest, CreatePartRequest, PartEdits, Source};
use study_materials::store::{EventStore, MemoryStore, PartStore};
use study_materials::templates::{TemplateConfig, TemplateStore, TRANSLATION_NEEDED};

// ==================== Test Helpers ====================

/// Serves a fixed forest per language; unknown languages get an empty forest
struct CannedCatalog {
    forests: HashMap<String, Vec<SourceNode>>,
}

#[async_trait]
impl CatalogFetcher for CannedCatalog {
    async fn fetch(&self, language: &str) -> Result<Vec<SourceNode>> {
        Ok(self.forests.get(language).cloned().unwrap_or_default())
    }
}

fn forest(author: &str, book: &str) -> Vec<SourceNode> {
    serde_json::from_value(json!([
        {
            "id": "A1",
            "name": author,
            "children": [{ "id": "B1", "parent_id": "A1", "name": book }]
        }
    ]))
    .expect("valid forest")
}

fn catalog() -> Arc<CatalogCache> {
    let forests = HashMap::from([
        ("he".to_string(), forest("בעל הסולם", "שמעתי")),
        ("en".to_string(), forest("Baal HaSulam", "Shamati")),
        ("es".to_string(), forest("Baal HaSulam", "Shamati (es)")),
    ]);
    Arc::new(CatalogCache::new(
        Arc::new(CannedCatalog { forests }),
        "https://example.org/sources",
    ))
}

struct Harness {
    state: Arc<AppState>,
    store: MemoryStore,
    _dir: TempDir,
}

fn harness() -> Harness {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = TemplateConfig {
        languages: vec!["he".to_string(), "en".to_string(), "es".to_string()],
        preparation: BTreeMap::from([
            ("he".to_string(), "הכנה לשיעור".to_string()),
            ("en".to_string(), "Lesson Preparation".to_string()),
        ]),
        templates: Vec::new(),
    };
    let templates = Arc::new(TemplateStore::with_config(
        dir.path().join("templates.json"),
        config,
    ));

    let store = MemoryStore::new();
    let parts: Arc<dyn PartStore> = Arc::new(store.clone());
    let events: Arc<dyn EventStore> = Arc::new(store.clone());
    let state = Arc::new(AppState::new(parts, events, catalog(), templates));

    Harness {
        state,
        store,
        _dir: dir,
    }
}

async fn create_event(h: &Harness) -> String {
    h.state
        .events
        .create_event(CreateEventRequest {
            date: "2024-01-15".to_string(),
            event_type: "morning_lesson".to_string(),
            ..Default::default()
        })
        .await
        .expect("event created")
        .id
}

fn lesson_part(event_id: &str) -> CreatePartRequest {
    CreatePartRequest {
        title: "שיעור בוקר".to_string(),
        date: "2024-01-15".to_string(),
        language: Some("he".to_string()),
        event_id: Some(event_id.to_string()),
        order: 1,
        sources: vec![Source {
            source_id: "B1".to_string(),
            source_title: "בעל הסולם | שמעתי".to_string(),
            source_url: "https://example.org/sources/B1".to_string(),
            page_number: None,
            start_point: None,
            end_point: None,
        }],
        ..Default::default()
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_raw(app, method, uri, body.map(|b| b.to_string())).await
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body)),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("readable body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).to_string())
        })
    };
    (status, value)
}

// ==================== Group Lifecycle ====================

#[tokio::test]
async fn test_group_create_update_delete_lifecycle() {
    let h = harness();
    let event_id = create_event(&h).await;

    // Create: one canonical record plus a stub per configured language
    let created = h
        .state
        .engine
        .create_group(lesson_part(&event_id))
        .await
        .unwrap();
    assert!(created.report.is_complete());
    assert_eq!(created.report.attempted, 2);

    let group = h.state.engine.event_parts(&event_id, None).await.unwrap();
    assert_eq!(group.len(), 3);
    let stubs: Vec<_> = group.iter().filter(|p| p.language != "he").collect();
    assert_eq!(stubs.len(), 2);
    assert!(stubs.iter().all(|p| p.title == TRANSLATION_NEEDED));

    // Stub sources are re-titled from the stub's own catalog
    let en = group.iter().find(|p| p.language == "en").unwrap();
    assert_eq!(en.sources[0].source_title, "Baal HaSulam | Shamati");
    assert_eq!(en.sources[0].source_url, "https://example.org/sources/B1");

    // Update: a shared field edit on the canonical record reaches every sibling
    let canonical = created.value;
    let mut edits = PartEdits {
        title: canonical.title.clone(),
        order: canonical.order,
        shared: canonical.shared.clone(),
        sources: canonical.sources.clone(),
        ..Default::default()
    };
    edits.shared.lesson_link = "https://example.org/lesson/42".to_string();
    let updated = h
        .state
        .engine
        .update_record(&canonical.id, edits)
        .await
        .unwrap();
    assert_eq!(updated.report.succeeded, 2);

    let group = h.state.engine.event_parts(&event_id, None).await.unwrap();
    assert!(group
        .iter()
        .all(|p| p.shared.lesson_link == "https://example.org/lesson/42"));

    // Delete: removing the canonical record takes the translations with it
    let report = h.state.engine.delete_record(&canonical.id).await.unwrap();
    assert_eq!(report.succeeded, 2);
    assert!(h.store.list_parts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_translation_edit_reaches_canonical_record() {
    let h = harness();
    let event_id = create_event(&h).await;
    let created = h
        .state
        .engine
        .create_group(lesson_part(&event_id))
        .await
        .unwrap();

    let es = h
        .state
        .engine
        .event_parts(&event_id, Some("es"))
        .await
        .unwrap()
        .remove(0);
    let mut edits = PartEdits {
        title: "Lección de la mañana".to_string(),
        order: es.order,
        shared: es.shared.clone(),
        ..Default::default()
    };
    edits.shared.transcript_link = "https://example.org/transcript".to_string();
    h.state.engine.update_record(&es.id, edits).await.unwrap();

    let canonical = h.state.engine.get_part(&created.value.id).await.unwrap();
    assert_eq!(
        canonical.shared.transcript_link,
        "https://example.org/transcript"
    );
    // Language-specific fields stay put
    assert_eq!(canonical.title, "שיעור בוקר");

    // Deleting a translation leaves the rest of the group alone
    h.state.engine.delete_record(&es.id).await.unwrap();
    let remaining = h.state.engine.event_parts(&event_id, None).await.unwrap();
    assert_eq!(remaining.len(), 2);
}

#[tokio::test]
async fn test_duplicate_then_delete_event() {
    let h = harness();
    let event_id = create_event(&h).await;
    h.state
        .engine
        .create_group(lesson_part(&event_id))
        .await
        .unwrap();

    let copy = h
        .state
        .engine
        .duplicate_event(&event_id, "2024-02-01")
        .await
        .unwrap();
    assert_ne!(copy.value.id, event_id);
    assert_eq!(copy.report.succeeded, 3);

    let copied = h
        .state
        .engine
        .event_parts(&copy.value.id, None)
        .await
        .unwrap();
    assert_eq!(copied.len(), 3);
    assert!(copied
        .iter()
        .all(|p| p.date.to_string() == "2024-02-01"));

    let report = h.state.engine.delete_event(&event_id).await.unwrap();
    assert_eq!(report.succeeded, 3);
    assert!(matches!(
        h.state.events.get_event(&event_id).await,
        Err(Error::NotFound(_))
    ));
    // The copy is untouched
    assert_eq!(h.store.list_parts().await.unwrap().len(), 3);
}

// ==================== HTTP Surface ====================

#[tokio::test]
async fn test_health_endpoint() {
    let h = harness();
    let app = api::router(Arc::clone(&h.state));

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn test_http_event_and_part_flow() {
    let h = harness();
    let app = api::router(Arc::clone(&h.state));

    let (status, event) = send(
        &app,
        "POST",
        "/api/events",
        Some(json!({ "date": "2024-01-15", "type": "morning_lesson" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = event["id"].as_str().unwrap().to_string();
    assert!(!event["titles"]["he"].as_str().unwrap_or_default().is_empty());

    let (status, part) = send(
        &app,
        "POST",
        "/api/parts",
        Some(json!({
            "title": "הכנה",
            "date": "2024-01-15",
            "language": "he",
            "event_id": event_id,
            "order": 0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(part["language"], "he");

    let (status, parts) = send(
        &app,
        "GET",
        &format!("/api/events/{}/parts?language=en", event_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parts["total"], 1);
    // Preparation stubs take the configured preparation label
    assert_eq!(parts["parts"][0]["title"], "Lesson Preparation");

    let (status, _) = send(&app, "DELETE", &format!("/api/events/{}", event_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(h.store.list_parts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_http_missing_part_is_json_404() {
    let h = harness();
    let app = api::router(Arc::clone(&h.state));

    let (status, body) = send(&app, "GET", "/api/parts/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("does-not-exist"));
}

#[tokio::test]
async fn test_http_part_for_missing_event_is_rejected() {
    let h = harness();
    let app = api::router(Arc::clone(&h.state));

    let (status, _) = send(
        &app,
        "POST",
        "/api/parts",
        Some(json!({ "title": "x", "date": "2024-01-15", "event_id": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(h.store.list_parts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_http_source_search_and_title() {
    let h = harness();
    let app = api::router(Arc::clone(&h.state));

    let (status, body) = send(&app, "GET", "/api/sources/search?q=shamati", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["sources"][0]["id"], "B1");
    assert_eq!(body["sources"][0]["url"], "https://example.org/sources/B1");

    let (status, body) = send(
        &app,
        "GET",
        "/api/sources/title?id=B1&language=en",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Baal HaSulam | Shamati");

    let (status, body) = send(&app, "GET", "/api/sources/title", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");

    let (status, _) = send(&app, "GET", "/api/sources/title?id=ZZZ", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_http_template_lifecycle() {
    let h = harness();
    let app = api::router(Arc::clone(&h.state));

    let (status, created) = send(
        &app,
        "POST",
        "/api/templates",
        Some(json!({
            "id": " Shamati ",
            "translations": { "he": "שמעתי", "en": "Shamati", "es": "Shamati" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "shamati");
    assert_eq!(created["visible"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/api/templates",
        Some(json!({ "id": "partial", "translations": { "he": "חלקי" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, config) = send(&app, "GET", "/api/templates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(config["templates"].as_array().unwrap().len(), 1);

    // Persisted alongside the in-memory copy
    let saved = TemplateStore::load(h.state.templates.path()).unwrap();
    assert_eq!(saved.snapshot().unwrap().templates.len(), 1);

    let (status, _) = send(&app, "DELETE", "/api/templates/shamati", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_http_malformed_bodies_are_validation_failures() {
    let h = harness();
    let app = api::router(Arc::clone(&h.state));

    let (status, body) = send_raw(&app, "POST", "/api/parts", Some("{not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");

    // Well-formed JSON of the wrong shape
    let (status, body) = send(&app, "POST", "/api/events", Some(json!({ "date": 20240115 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");

    let (status, body) = send_raw(&app, "POST", "/api/templates", Some("[".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");

    assert!(h.store.list_parts().await.unwrap().is_empty());
}
