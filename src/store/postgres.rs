use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use tracing::info;

use super::{stamp_event, stamp_part, EventFilter, EventStore, PartStore};
use crate::error::{Error, Result};
use crate::model::{Event, Part};
use crate::sync::ordering::sort_events;

/// Postgres document store: one JSONB document per record.
///
/// `parts.event_id` is duplicated out of the document so group lookups use an
/// index instead of scanning every part.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

const EVENT_ORDER_BY: &str = " ORDER BY (doc->>'order')::int ASC, (doc->>'date')::date DESC";

impl PostgresStore {
    /// Connect and create tables if they do not exist
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS parts (
                id TEXT PRIMARY KEY,
                event_id TEXT,
                doc JSONB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS parts_event_id_idx ON parts (event_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                doc JSONB NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        info!("Postgres document tables ready");
        Ok(())
    }
}

fn push_event_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter) {
    if let Some(public) = filter.public {
        builder
            .push(" AND (doc->>'public')::boolean = ")
            .push_bind(public);
    }
    if let Some(event_type) = filter.event_type {
        builder
            .push(" AND doc->>'type' = ")
            .push_bind(event_type.as_str());
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND (doc->>'date')::date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND (doc->>'date')::date <= ").push_bind(to);
    }
}

fn event_page_query<'a>(
    filter: &EventFilter,
    limit: usize,
    offset: usize,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("SELECT doc FROM events WHERE TRUE");
    push_event_filter(&mut builder, filter);
    builder.push(EVENT_ORDER_BY);
    if limit > 0 {
        builder.push(" LIMIT ").push_bind(limit as i64);
    }
    if offset > 0 {
        builder.push(" OFFSET ").push_bind(offset as i64);
    }
    builder
}

#[async_trait]
impl PartStore for PostgresStore {
    async fn save_part(&self, mut part: Part) -> Result<Part> {
        stamp_part(&mut part);
        sqlx::query(
            "INSERT INTO parts (id, event_id, doc) VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET event_id = EXCLUDED.event_id, doc = EXCLUDED.doc",
        )
        .bind(&part.id)
        .bind(part.event_id.as_deref())
        .bind(Json(&part))
        .execute(&self.pool)
        .await?;
        Ok(part)
    }

    async fn get_part(&self, id: &str) -> Result<Part> {
        let row: Option<(Json<Part>,)> = sqlx::query_as("SELECT doc FROM parts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(Json(part),)| part)
            .ok_or_else(|| Error::not_found(format!("part {}", id)))
    }

    async fn list_parts(&self) -> Result<Vec<Part>> {
        let rows: Vec<(Json<Part>,)> = sqlx::query_as("SELECT doc FROM parts")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(Json(part),)| part).collect())
    }

    async fn parts_for_event(&self, event_id: &str) -> Result<Vec<Part>> {
        let rows: Vec<(Json<Part>,)> = sqlx::query_as("SELECT doc FROM parts WHERE event_id = $1")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(Json(part),)| part).collect())
    }

    async fn delete_part(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM parts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("part {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for PostgresStore {
    async fn save_event(&self, mut event: Event) -> Result<Event> {
        stamp_event(&mut event);
        sqlx::query(
            "INSERT INTO events (id, doc) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc",
        )
        .bind(&event.id)
        .bind(Json(&event))
        .execute(&self.pool)
        .await?;
        Ok(event)
    }

    async fn get_event(&self, id: &str) -> Result<Event> {
        let row: Option<(Json<Event>,)> = sqlx::query_as("SELECT doc FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(Json(event),)| event)
            .ok_or_else(|| Error::not_found(format!("event {}", id)))
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let rows: Vec<(Json<Event>,)> = sqlx::query_as("SELECT doc FROM events")
            .fetch_all(&self.pool)
            .await?;
        let mut events: Vec<Event> = rows.into_iter().map(|(Json(event),)| event).collect();
        sort_events(&mut events);
        Ok(events)
    }

    async fn list_events_filtered(
        &self,
        filter: &EventFilter,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Event>, usize)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events WHERE TRUE");
        push_event_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut page = event_page_query(filter, limit, offset);
        let rows: Vec<(Json<Event>,)> = page.build_query_as().fetch_all(&self.pool).await?;
        let events = rows.into_iter().map(|(Json(event),)| event).collect();

        Ok((events, total.max(0) as usize))
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("event {}", id)));
        }
        Ok(())
    }
}
