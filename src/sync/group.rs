use std::fmt;

use crate::i18n::Language;
use crate::model::Part;

/// Identity of one multilingual unit: the event and the position within it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub event_id: String,
    pub order: i32,
}

impl GroupKey {
    /// `None` for parts with no (or an empty) event id; those are never grouped
    pub fn of(part: &Part) -> Option<GroupKey> {
        match part.event_id.as_deref() {
            Some(event_id) if !event_id.is_empty() => Some(GroupKey {
                event_id: event_id.to_string(),
                order: part.order,
            }),
            _ => None,
        }
    }

    pub fn contains(&self, part: &Part) -> bool {
        part.event_id.as_deref() == Some(self.event_id.as_str()) && part.order == self.order
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.event_id, self.order)
    }
}

pub fn is_canonical(part: &Part) -> bool {
    part.language == Language::canonical().code()
}
