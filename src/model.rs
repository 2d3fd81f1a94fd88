//! Records persisted by the stores and the request shapes that create them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Wire and storage format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date, reporting a human-readable reason on failure
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| Error::validation("Invalid date format, use YYYY-MM-DD"))
}

// ==================== Parts ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    #[default]
    LiveLesson,
    RecordedLesson,
}

impl PartType {
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value.unwrap_or("") {
            "" | "live_lesson" => Ok(PartType::LiveLesson),
            "recorded_lesson" => Ok(PartType::RecordedLesson),
            _ => Err(Error::validation(
                "Invalid part_type, must be 'live_lesson' or 'recorded_lesson'",
            )),
        }
    }
}

/// A study source referenced by a part.
///
/// `source_title` is denormalized from the catalog in the part's own language
/// when the part is created; it is not re-resolved afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub source_id: String,
    pub source_title: String,
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<String>,
}

/// A titled link that belongs to one language only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLink {
    pub title: String,
    pub url: String,
}

/// Attributes that must be identical across every language of one group.
///
/// Flattened into the part document so the wire format keeps one flat object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFields {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub excerpts_link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transcript_link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lesson_link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub program_link: String,
    /// Preparation parts (order 0) only
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reading_before_sleep_link: String,
    /// Preparation parts (order 0) only
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lesson_preparation_link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lineup_for_hosts_link: String,
    /// Date the recorded lesson was originally given (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub recorded_lesson_date: String,
}

/// One language's rendering of one lesson part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Empty until the store assigns one
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub part_type: PartType,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Position within the event: 0 is preparation, 1..n are sequential parts
    #[serde(default)]
    pub order: i32,
    #[serde(flatten)]
    pub shared: SharedFields,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_links: Vec<CustomLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a part create request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePartRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    pub part_type: Option<String>,
    pub language: Option<String>,
    pub event_id: Option<String>,
    #[serde(default)]
    pub order: i32,
    /// Template the title was picked from; drives stub titles
    pub template_id: Option<String>,
    #[serde(flatten)]
    pub shared: SharedFields,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub custom_links: Vec<CustomLink>,
}

/// Body of a part update request. Replaces every editable field.
///
/// Id, language, event id and creation time are never edited.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartEdits {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ignored when absent or malformed
    pub date: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(flatten)]
    pub shared: SharedFields,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub custom_links: Vec<CustomLink>,
}

// ==================== Events ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    MorningLesson,
    NoonLesson,
    EveningLesson,
    Meal,
    Convention,
    Lecture,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        EventType::MorningLesson,
        EventType::NoonLesson,
        EventType::EveningLesson,
        EventType::Meal,
        EventType::Convention,
        EventType::Lecture,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::MorningLesson => "morning_lesson",
            EventType::NoonLesson => "noon_lesson",
            EventType::EveningLesson => "evening_lesson",
            EventType::Meal => "meal",
            EventType::Convention => "convention",
            EventType::Lecture => "lecture",
            EventType::Other => "other",
        }
    }

    /// Parse an event type; empty means the default
    pub fn parse(value: &str) -> Result<Self> {
        if value.is_empty() {
            return Ok(EventType::default());
        }
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| {
                Error::validation(
                    "Invalid event type, must be one of: morning_lesson, noon_lesson, \
                     evening_lesson, meal, convention, lecture, other",
                )
            })
    }
}

/// A study event grouping lesson parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Event number for the same day (1, 2, ...)
    pub number: u32,
    /// Display order; lower first
    #[serde(default)]
    pub order: i32,
    /// language code -> title
    #[serde(default)]
    pub titles: BTreeMap<String, String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_sent_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default, rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub number: u32,
    pub order: Option<i32>,
    #[serde(default)]
    pub titles: BTreeMap<String, String>,
    pub public: Option<bool>,
}

/// Partial event update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub date: Option<String>,
    pub titles: Option<BTreeMap<String, String>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub order: Option<i32>,
    pub public: Option<bool>,
}
