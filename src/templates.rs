//! Title templates and the fan-out language list, backed by a JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{Error, Result};

/// Title given to a stub when no translated label is known
pub const TRANSLATION_NEEDED: &str = "[Translation needed]";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Languages a canonical part fans out to, canonical included
    #[serde(default)]
    pub languages: Vec<String>,
    /// language -> title used for preparation (order 0) stubs
    #[serde(default)]
    pub preparation: BTreeMap<String, String>,
    #[serde(default)]
    pub templates: Vec<TemplateDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub id: String,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    /// Whether the template is offered when composing a part
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

/// Template configuration shared by the API and the sync engine.
///
/// Every mutation rewrites the whole file. Readers never wait on the disk.
pub struct TemplateStore {
    path: PathBuf,
    config: RwLock<TemplateConfig>,
    writer: Mutex<()>,
}

impl TemplateStore {
    /// Read the configuration file at `path`
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = std::fs::read_to_string(&path).map_err(|e| {
            Error::PersistenceFailed(format!("reading {}: {}", path.display(), e))
        })?;
        let config: TemplateConfig = serde_json::from_str(&data)?;
        info!(
            "Loaded {} templates in {} languages",
            config.templates.len(),
            config.languages.len()
        );
        Ok(Self::with_config(path, config))
    }

    /// Start from an in-memory configuration; the file is written on first mutation
    pub fn with_config(path: impl Into<PathBuf>, config: TemplateConfig) -> Self {
        Self {
            path: path.into(),
            config: RwLock::new(config),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TemplateConfig>> {
        self.config
            .read()
            .map_err(|_| Error::PersistenceFailed("template lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TemplateConfig>> {
        self.config
            .write()
            .map_err(|_| Error::PersistenceFailed("template lock poisoned".to_string()))
    }

    pub fn snapshot(&self) -> Result<TemplateConfig> {
        Ok(self.read()?.clone())
    }

    pub fn languages(&self) -> Result<Vec<String>> {
        Ok(self.read()?.languages.clone())
    }

    /// Title for a new stub in `language`.
    ///
    /// Preparation parts take the preparation label; other parts take the
    /// template's label when a template was used. Anything unresolved gets
    /// [`TRANSLATION_NEEDED`].
    pub fn stub_title(&self, language: &str, order: i32, template_id: Option<&str>) -> Result<String> {
        let config = self.read()?;
        let label = if order == 0 {
            config.preparation.get(language)
        } else {
            template_id
                .filter(|id| !id.is_empty())
                .and_then(|id| config.templates.iter().find(|t| t.id == id))
                .and_then(|t| t.translations.get(language))
        };
        Ok(label
            .cloned()
            .unwrap_or_else(|| TRANSLATION_NEEDED.to_string()))
    }

    pub async fn create(
        &self,
        id: &str,
        translations: BTreeMap<String, String>,
        visible: bool,
    ) -> Result<TemplateDefinition> {
        let id = id.trim().to_lowercase();
        if id.is_empty() {
            return Err(Error::validation("Template ID is required"));
        }

        let template = self
            .commit(|config| {
                if config.templates.iter().any(|t| t.id == id) {
                    return Err(Error::validation("Template ID already exists"));
                }
                require_translations(&config.languages, &translations)?;
                let template = TemplateDefinition {
                    id,
                    translations,
                    visible,
                };
                config.templates.push(template.clone());
                Ok(template)
            })
            .await?;
        info!("Created template {}", template.id);
        Ok(template)
    }

    pub async fn update(
        &self,
        id: &str,
        translations: BTreeMap<String, String>,
        visible: bool,
    ) -> Result<TemplateDefinition> {
        self.commit(|config| {
            let languages = config.languages.clone();
            let template = config
                .templates
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| Error::not_found(format!("template {}", id)))?;
            require_translations(&languages, &translations)?;
            template.translations = translations;
            template.visible = visible;
            Ok(template.clone())
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.commit(|config| {
            let before = config.templates.len();
            config.templates.retain(|t| t.id != id);
            if config.templates.len() == before {
                return Err(Error::not_found(format!("template {}", id)));
            }
            Ok(())
        })
        .await?;
        info!("Deleted template {}", id);
        Ok(())
    }

    /// Apply `edit` to a copy, write the copy out, then publish it.
    ///
    /// The in-memory configuration only changes once the file write succeeded.
    /// Mutations are serialized on `writer`.
    async fn commit<T>(&self, edit: impl FnOnce(&mut TemplateConfig) -> Result<T>) -> Result<T> {
        let _writing = self.writer.lock().await;
        let mut next = self.snapshot()?;
        let outcome = edit(&mut next)?;
        self.persist(&next).await?;
        *self.write()? = next;
        Ok(outcome)
    }

    async fn persist(&self, config: &TemplateConfig) -> Result<()> {
        let data = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, data).await.map_err(|e| {
            Error::PersistenceFailed(format!("writing {}: {}", self.path.display(), e))
        })
    }
}

fn require_translations(languages: &[String], translations: &BTreeMap<String, String>) -> Result<()> {
    for language in languages {
        let present = translations
            .get(language)
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);
        if !present {
            return Err(Error::validation(format!(
                "Missing translation for language: {}",
                language
            )));
        }
    }
    Ok(())
}
