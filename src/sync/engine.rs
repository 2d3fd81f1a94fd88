use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::group::{is_canonical, GroupKey};
use super::ordering::{self, sort_parts};
use crate::catalog::CatalogCache;
use crate::error::{Error, Result};
use crate::i18n::Language;
use crate::model::{parse_date, CreatePartRequest, Event, Part, PartEdits, PartType, Source};
use crate::store::{EventStore, PartStore};
use crate::templates::TemplateStore;

/// Outcome of the sibling writes of one group operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub attempted: usize,
    pub succeeded: usize,
    /// Ids (or labels) of the records whose write failed
    pub failed: Vec<String>,
}

impl SyncReport {
    fn record(&mut self, label: &str, result: Result<()>) {
        self.attempted += 1;
        match result {
            Ok(()) => self.succeeded += 1,
            Err(_) => self.failed.push(label.to_string()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turn sibling failures into [`Error::PartialPropagationFailure`]
    pub fn into_result(self) -> Result<SyncReport> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(Error::PartialPropagationFailure {
                attempted: self.attempted,
                failed: self.failed,
            })
        }
    }
}

/// A primary result together with the report of its best-effort side effects
#[derive(Debug, Clone)]
pub struct Synced<T> {
    pub value: T,
    pub report: SyncReport,
}

/// Keeps the language records of each group consistent.
///
/// Every multi-record step is a sequence of independent upserts. Failures of
/// the initiating record abort the operation; sibling failures are logged and
/// reported but never roll anything back.
pub struct SyncEngine {
    parts: Arc<dyn PartStore>,
    events: Arc<dyn EventStore>,
    catalog: Arc<CatalogCache>,
    templates: Arc<TemplateStore>,
}

impl SyncEngine {
    pub fn new(
        parts: Arc<dyn PartStore>,
        events: Arc<dyn EventStore>,
        catalog: Arc<CatalogCache>,
        templates: Arc<TemplateStore>,
    ) -> Self {
        Self {
            parts,
            events,
            catalog,
            templates,
        }
    }

    // ==================== Reads ====================

    pub async fn get_part(&self, id: &str) -> Result<Part> {
        self.parts.get_part(id).await
    }

    pub async fn list_parts(&self) -> Result<Vec<Part>> {
        let mut parts = self.parts.list_parts().await?;
        sort_parts(&mut parts);
        Ok(parts)
    }

    /// Parts of an existing event in display order, optionally one language only
    pub async fn event_parts(&self, event_id: &str, language: Option<&str>) -> Result<Vec<Part>> {
        self.events.get_event(event_id).await?;
        let parts = self.parts.parts_for_event(event_id).await?;
        Ok(ordering::event_parts(parts, event_id, language))
    }

    /// Every record currently holding `key`
    async fn group_members(&self, key: &GroupKey) -> Result<Vec<Part>> {
        let parts = self.parts.parts_for_event(&key.event_id).await?;
        Ok(parts.into_iter().filter(|p| key.contains(p)).collect())
    }

    // ==================== Create ====================

    /// Save a new part. A canonical grouped part also gets one stub per
    /// configured language that the group does not have yet.
    pub async fn create_group(&self, request: CreatePartRequest) -> Result<Synced<Part>> {
        let template_id = request.template_id.clone();
        let part = self.validate_new_part(request).await?;

        let key = GroupKey::of(&part);
        let existing = match &key {
            Some(key) => {
                let members = self.group_members(key).await?;
                if members.iter().any(|p| p.language == part.language) {
                    return Err(Error::validation(format!(
                        "A '{}' part already exists for group {}",
                        part.language, key
                    )));
                }
                members
            }
            None => Vec::new(),
        };

        let part = self.parts.save_part(part).await?;
        info!("Created part {} ({})", part.id, part.language);

        let mut report = SyncReport::default();
        if let Some(key) = key.filter(|_| is_canonical(&part)) {
            let present: Vec<&str> = existing.iter().map(|p| p.language.as_str()).collect();
            for language in self.templates.languages()? {
                if language == part.language || present.contains(&language.as_str()) {
                    continue;
                }
                let stub = self
                    .build_stub(&part, &language, template_id.as_deref())
                    .await?;
                let result = self.parts.save_part(stub).await.map(|_| ());
                if let Err(e) = &result {
                    warn!(
                        "Failed to create {} translation stub for group {}: {}",
                        language, key, e
                    );
                }
                report.record(&language, result);
            }
            info!(
                "Created {} translation stubs for group {}",
                report.succeeded, key
            );
        }

        Ok(Synced {
            value: part,
            report,
        })
    }

    async fn validate_new_part(&self, request: CreatePartRequest) -> Result<Part> {
        if request.title.trim().is_empty() {
            return Err(Error::validation("Title is required"));
        }
        if request.date.is_empty() {
            return Err(Error::validation("Date is required"));
        }
        let date = parse_date(&request.date)?;
        let part_type = PartType::parse(request.part_type.as_deref())?;

        let language = match request.language.as_deref() {
            None | Some("") => Language::canonical(),
            Some(code) => Language::from_code(code)?,
        };

        let event_id = request.event_id.filter(|id| !id.is_empty());
        if let Some(event_id) = &event_id {
            self.events.get_event(event_id).await?;
        }

        Ok(Part {
            id: String::new(),
            title: request.title,
            description: request.description,
            date,
            part_type,
            language: language.code().to_string(),
            event_id,
            order: request.order,
            shared: request.shared,
            sources: request.sources,
            custom_links: request.custom_links,
            created_at: None,
        })
    }

    async fn build_stub(
        &self,
        canonical: &Part,
        language: &str,
        template_id: Option<&str>,
    ) -> Result<Part> {
        Ok(Part {
            id: String::new(),
            title: self
                .templates
                .stub_title(language, canonical.order, template_id)?,
            description: String::new(),
            date: canonical.date,
            part_type: canonical.part_type,
            language: language.to_string(),
            event_id: canonical.event_id.clone(),
            order: canonical.order,
            shared: canonical.shared.clone(),
            sources: self.translate_sources(&canonical.sources, language).await,
            custom_links: Vec::new(),
            created_at: None,
        })
    }

    /// Re-title sources in `language`, keeping the original when lookup fails
    async fn translate_sources(&self, sources: &[Source], language: &str) -> Vec<Source> {
        let mut translated = Vec::with_capacity(sources.len());
        for source in sources {
            match self.catalog.title_of(&source.source_id, language).await {
                Ok(title) => translated.push(Source {
                    source_title: title,
                    source_url: self.catalog.source_link(&source.source_id),
                    ..source.clone()
                }),
                Err(e) => {
                    warn!(
                        "Failed to get source title for {} in {}: {}",
                        source.source_id, language, e
                    );
                    translated.push(source.clone());
                }
            }
        }
        translated
    }

    // ==================== Update ====================

    /// Replace a part's editable fields, then push changed shared fields to
    /// the rest of its group
    pub async fn update_record(&self, id: &str, edits: PartEdits) -> Result<Synced<Part>> {
        let mut part = self.parts.get_part(id).await?;
        let previous_shared = part.shared.clone();

        if edits.order != part.order {
            let moved = Part {
                order: edits.order,
                ..part.clone()
            };
            if let Some(key) = GroupKey::of(&moved) {
                let taken = self
                    .group_members(&key)
                    .await?
                    .iter()
                    .any(|p| p.id != part.id && p.language == part.language);
                if taken {
                    return Err(Error::validation(format!(
                        "A '{}' part already exists for group {}",
                        part.language, key
                    )));
                }
            }
        }

        part.title = edits.title;
        part.description = edits.description;
        part.order = edits.order;
        part.shared = edits.shared;
        part.sources = edits.sources;
        part.custom_links = edits.custom_links;
        if let Some(date) = edits.date.as_deref().filter(|d| !d.is_empty()) {
            match parse_date(date) {
                Ok(date) => part.date = date,
                Err(_) => debug!("Ignoring malformed date '{}' for part {}", date, id),
            }
        }

        let part = self.parts.save_part(part).await?;

        let report = if part.shared != previous_shared {
            self.propagate_shared(&part).await
        } else {
            SyncReport::default()
        };

        Ok(Synced {
            value: part,
            report,
        })
    }

    /// Copy `source`'s shared fields onto every other member of its group.
    ///
    /// Siblings that already match are left untouched, so running this again
    /// after a partial failure only rewrites the records that missed out.
    async fn propagate_shared(&self, source: &Part) -> SyncReport {
        let mut report = SyncReport::default();
        let Some(key) = GroupKey::of(source) else {
            return report;
        };

        let members = match self.group_members(&key).await {
            Ok(members) => members,
            Err(e) => {
                warn!("Failed to list group {} for propagation: {}", key, e);
                report.record(&key.to_string(), Err(e));
                return report;
            }
        };

        for mut sibling in members.into_iter().filter(|p| p.id != source.id) {
            if sibling.shared == source.shared {
                continue;
            }
            sibling.shared = source.shared.clone();
            let sibling_id = sibling.id.clone();
            let language = sibling.language.clone();
            let result = self.parts.save_part(sibling).await.map(|_| ());
            if let Err(e) = &result {
                warn!(
                    "Failed to update shared fields of {} ({}): {}",
                    sibling_id, language, e
                );
            }
            report.record(&sibling_id, result);
        }

        if report.attempted > 0 {
            info!(
                "Propagated shared fields of {} to {}/{} records in group {}",
                source.id, report.succeeded, report.attempted, key
            );
        }
        report
    }

    /// Re-assert a part's shared fields on its group
    pub async fn repropagate(&self, id: &str) -> Result<SyncReport> {
        let part = self.parts.get_part(id).await?;
        self.propagate_shared(&part).await.into_result()
    }

    // ==================== Delete ====================

    /// Delete a part; deleting a canonical grouped part removes its whole group
    pub async fn delete_record(&self, id: &str) -> Result<SyncReport> {
        let part = self.parts.get_part(id).await?;

        let siblings = match GroupKey::of(&part).filter(|_| is_canonical(&part)) {
            Some(key) => self.group_members(&key).await?,
            None => Vec::new(),
        };

        self.parts.delete_part(&part.id).await?;

        let mut report = SyncReport::default();
        for sibling in siblings.iter().filter(|p| p.id != part.id) {
            let result = self.parts.delete_part(&sibling.id).await;
            if let Err(e) = &result {
                warn!(
                    "Failed to delete {} translation {}: {}",
                    sibling.language, sibling.id, e
                );
            }
            report.record(&sibling.id, result);
        }

        if report.attempted > 0 {
            info!(
                "Deleted part {} and {}/{} translations",
                part.id, report.succeeded, report.attempted
            );
        }
        Ok(report)
    }

    // ==================== Events ====================

    /// Copy an event and every part under it to `new_date`
    pub async fn duplicate_event(&self, event_id: &str, new_date: &str) -> Result<Synced<Event>> {
        let date = parse_date(new_date)?;
        let original = self.events.get_event(event_id).await?;

        let copy = Event {
            id: String::new(),
            date,
            email_sent_at: None,
            created_at: None,
            ..original
        };
        let copy = self.events.save_event(copy).await?;

        let mut parts = self.parts.parts_for_event(event_id).await?;
        sort_parts(&mut parts);

        let mut report = SyncReport::default();
        for part in parts {
            let original_id = part.id.clone();
            let duplicate = Part {
                id: String::new(),
                date,
                event_id: Some(copy.id.clone()),
                created_at: None,
                ..part
            };
            let result = self.parts.save_part(duplicate).await.map(|_| ());
            if let Err(e) = &result {
                warn!("Failed to duplicate part {}: {}", original_id, e);
            }
            report.record(&original_id, result);
        }

        info!(
            "Duplicated event {} to {} with {} parts",
            event_id, copy.id, report.succeeded
        );
        Ok(Synced {
            value: copy,
            report,
        })
    }

    /// Delete an event after deleting every part under it
    pub async fn delete_event(&self, event_id: &str) -> Result<SyncReport> {
        self.events.get_event(event_id).await?;
        let parts = self.parts.parts_for_event(event_id).await?;

        let mut report = SyncReport::default();
        for part in &parts {
            let result = self.parts.delete_part(&part.id).await;
            if let Err(e) = &result {
                warn!("Failed to delete part {}: {}", part.id, e);
            }
            report.record(&part.id, result);
        }

        self.events.delete_event(event_id).await?;
        info!("Deleted event {} and {} parts", event_id, report.succeeded);
        Ok(report)
    }
}
