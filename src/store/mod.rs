//! Document storage for parts and events.
//!
//! Stores provide per-record upsert and nothing stronger: there is no
//! multi-record transaction, and the sync engine is written around that.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Event, EventType, Part};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

#[async_trait]
pub trait PartStore: Send + Sync {
    /// Insert or replace by id. Assigns id and creation time when absent.
    async fn save_part(&self, part: Part) -> Result<Part>;

    async fn get_part(&self, id: &str) -> Result<Part>;

    async fn list_parts(&self) -> Result<Vec<Part>>;

    /// Every part whose `event_id` equals the given id, unordered
    async fn parts_for_event(&self, event_id: &str) -> Result<Vec<Part>> {
        let parts = self.list_parts().await?;
        Ok(parts
            .into_iter()
            .filter(|p| p.event_id.as_deref() == Some(event_id))
            .collect())
    }

    async fn delete_part(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert or replace by id. Assigns id and creation time when absent.
    async fn save_event(&self, event: Event) -> Result<Event>;

    async fn get_event(&self, id: &str) -> Result<Event>;

    async fn list_events(&self) -> Result<Vec<Event>>;

    /// One page of matching events in display order, plus the total match count.
    /// A `limit` of 0 returns everything from `offset` on.
    async fn list_events_filtered(
        &self,
        filter: &EventFilter,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Event>, usize)>;

    async fn delete_event(&self, id: &str) -> Result<()>;
}

/// Equality and range filter over events; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub public: Option<bool>,
    pub event_type: Option<EventType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.public.map_or(true, |p| event.public == p)
            && self.event_type.map_or(true, |t| event.event_type == t)
            && self.date_from.map_or(true, |from| event.date >= from)
            && self.date_to.map_or(true, |to| event.date <= to)
    }
}

pub(crate) fn stamp_part(part: &mut Part) {
    if part.id.is_empty() {
        part.id = Uuid::new_v4().to_string();
    }
    if part.created_at.is_none() {
        part.created_at = Some(Utc::now());
    }
}

pub(crate) fn stamp_event(event: &mut Event) {
    if event.id.is_empty() {
        event.id = Uuid::new_v4().to_string();
    }
    if event.created_at.is_none() {
        event.created_at = Some(Utc::now());
    }
}
