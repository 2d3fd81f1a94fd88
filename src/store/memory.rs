use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{stamp_event, stamp_part, EventFilter, EventStore, PartStore};
use crate::error::{Error, Result};
use crate::model::{Event, Part};
use crate::sync::ordering::sort_events;

/// In-process store used when no database is configured and in tests.
///
/// Clones share the same maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    parts: Arc<RwLock<HashMap<String, Part>>>,
    events: Arc<RwLock<HashMap<String, Event>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PartStore for MemoryStore {
    async fn save_part(&self, mut part: Part) -> Result<Part> {
        stamp_part(&mut part);
        self.parts
            .write()
            .await
            .insert(part.id.clone(), part.clone());
        Ok(part)
    }

    async fn get_part(&self, id: &str) -> Result<Part> {
        self.parts
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("part {}", id)))
    }

    async fn list_parts(&self) -> Result<Vec<Part>> {
        Ok(self.parts.read().await.values().cloned().collect())
    }

    async fn delete_part(&self, id: &str) -> Result<()> {
        match self.parts.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("part {}", id))),
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn save_event(&self, mut event: Event) -> Result<Event> {
        stamp_event(&mut event);
        self.events
            .write()
            .await
            .insert(event.id.clone(), event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: &str) -> Result<Event> {
        self.events
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("event {}", id)))
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        sort_events(&mut events);
        Ok(events)
    }

    async fn list_events_filtered(
        &self,
        filter: &EventFilter,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Event>, usize)> {
        let mut matching: Vec<Event> = self
            .events
            .read()
            .await
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        sort_events(&mut matching);

        let total = matching.len();
        let page = matching.into_iter().skip(offset);
        let page = if limit == 0 {
            page.collect()
        } else {
            page.take(limit).collect()
        };
        Ok((page, total))
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        match self.events.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("event {}", id))),
        }
    }
}
