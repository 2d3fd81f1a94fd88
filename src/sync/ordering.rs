//! Display ordering for parts within an event and for events.

use std::cmp::Ordering;

use crate::model::{Event, Part};

fn part_ordering(a: &Part, b: &Part) -> Ordering {
    a.order
        .cmp(&b.order)
        .then_with(|| a.language.cmp(&b.language))
}

fn event_ordering(a: &Event, b: &Event) -> Ordering {
    a.order.cmp(&b.order).then_with(|| b.date.cmp(&a.date))
}

/// Order ascending, then language code ascending
pub fn sort_parts(parts: &mut [Part]) {
    parts.sort_by(part_ordering);
}

/// Order ascending, then most recent date first
pub fn sort_events(events: &mut [Event]) {
    events.sort_by(event_ordering);
}

/// Parts of one event, optionally restricted to one language, in display order
pub fn event_parts(parts: Vec<Part>, event_id: &str, language: Option<&str>) -> Vec<Part> {
    let mut selected: Vec<Part> = parts
        .into_iter()
        .filter(|p| p.event_id.as_deref() == Some(event_id))
        .filter(|p| language.map_or(true, |lang| p.language == lang))
        .collect();
    sort_parts(&mut selected);
    selected
}
