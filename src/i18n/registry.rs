//! Language registry: Single source of truth for all supported languages.
//!
//! Uses `OnceLock` for thread-safe lazy initialization; the registry is
//! immutable after first access.

use std::sync::OnceLock;

use super::strings::{
    EventTitles, ENGLISH_TITLES, FRENCH_TITLES, GERMAN_TITLES, HEBREW_TITLES, ITALIAN_TITLES,
    RUSSIAN_TITLES, SPANISH_TITLES, UKRAINIAN_TITLES,
};

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "he", "en", "ru")
    pub code: &'static str,

    /// English name of the language (e.g., "Hebrew", "Russian")
    pub name: &'static str,

    /// Native name of the language (e.g., "עברית", "Русский")
    pub native_name: &'static str,

    /// Whether this is the canonical language (only one should be true).
    /// Canonical records are authoritative for group-wide fan-out and cascade.
    pub is_canonical: bool,

    /// Default event titles in this language
    pub event_titles: EventTitles,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language exists
    /// * `None` if the language is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all languages in registry order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if no canonical language is found or if multiple canonical
    /// languages are defined (this indicates a configuration error).
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    /// Check if a language code is supported.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

fn language(
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    event_titles: EventTitles,
) -> LanguageConfig {
    LanguageConfig {
        code,
        name,
        native_name,
        is_canonical: false,
        event_titles,
    }
}

/// Default language configurations. Hebrew is canonical.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            is_canonical: true,
            ..language("he", "Hebrew", "עברית", HEBREW_TITLES)
        },
        language("en", "English", "English", ENGLISH_TITLES),
        language("ru", "Russian", "Русский", RUSSIAN_TITLES),
        language("es", "Spanish", "Español", SPANISH_TITLES),
        language("de", "German", "Deutsch", GERMAN_TITLES),
        language("it", "Italian", "Italiano", ITALIAN_TITLES),
        language("fr", "French", "Français", FRENCH_TITLES),
        language("uk", "Ukrainian", "Українська", UKRAINIAN_TITLES),
    ]
}
