use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::i18n::LanguageRegistry;
use crate::model::{parse_date, CreateEventRequest, Event, EventType, UpdateEventRequest};
use crate::store::{EventFilter, EventStore};

/// Default title of `event_type` in every registered language
pub fn default_titles(event_type: EventType) -> BTreeMap<String, String> {
    LanguageRegistry::get()
        .list_all()
        .into_iter()
        .map(|lang| {
            (
                lang.code.to_string(),
                lang.event_titles.title(event_type).to_string(),
            )
        })
        .collect()
}

/// Overlay non-empty caller titles on top of `titles`
fn merge_titles(titles: &mut BTreeMap<String, String>, overrides: BTreeMap<String, String>) {
    for (language, title) in overrides {
        if !title.is_empty() {
            titles.insert(language, title);
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Event CRUD. None of these touch the parts under an event; the group-wide
/// event operations live on the sync engine.
pub struct EventService {
    events: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        if request.date.is_empty() {
            return Err(Error::validation("Date is required"));
        }
        let date = parse_date(&request.date)?;
        let event_type = EventType::parse(&request.event_type)?;

        let mut titles = default_titles(event_type);
        merge_titles(&mut titles, request.titles);

        let event = Event {
            id: String::new(),
            date,
            start_time: non_empty(request.start_time),
            end_time: non_empty(request.end_time),
            event_type,
            number: if request.number == 0 { 1 } else { request.number },
            order: request.order.unwrap_or(0),
            titles,
            public: request.public.unwrap_or(false),
            email_sent_at: None,
            created_at: None,
        };

        let event = self.events.save_event(event).await?;
        info!(
            "Created {} event {} on {}",
            event.event_type.as_str(),
            event.id,
            event.date
        );
        Ok(event)
    }

    pub async fn get_event(&self, id: &str) -> Result<Event> {
        self.events.get_event(id).await
    }

    /// Apply the fields present in `request`
    pub async fn update_event(&self, id: &str, request: UpdateEventRequest) -> Result<Event> {
        let mut event = self.events.get_event(id).await?;

        if let Some(titles) = request.titles {
            if event.titles.is_empty() {
                event.titles = default_titles(event.event_type);
            }
            merge_titles(&mut event.titles, titles);
        }
        if let Some(date) = request.date {
            event.date = parse_date(&date)?;
        }
        if let Some(start_time) = request.start_time {
            event.start_time = non_empty(Some(start_time));
        }
        if let Some(end_time) = request.end_time {
            event.end_time = non_empty(Some(end_time));
        }
        if let Some(order) = request.order {
            event.order = order;
        }
        if let Some(public) = request.public {
            event.public = public;
        }

        self.events.save_event(event).await
    }

    pub async fn toggle_public(&self, id: &str, public: bool) -> Result<Event> {
        let mut event = self.events.get_event(id).await?;
        event.public = public;
        let event = self.events.save_event(event).await?;
        info!("Event {} is now {}", event.id, if public { "public" } else { "private" });
        Ok(event)
    }

    /// All events in display order
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        self.events.list_events().await
    }

    pub async fn list_events_filtered(
        &self,
        filter: &EventFilter,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Event>, usize)> {
        self.events.list_events_filtered(filter, limit, offset).await
    }
}
