//! Language type: validated language handle backed by the registry.

use crate::error::{Error, Result};
use crate::i18n::{LanguageConfig, LanguageRegistry};

/// A validated language.
///
/// Only languages present in the registry can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code
    code: &'static str,
}

impl Language {
    pub const HEBREW: Language = Language { code: "he" };
    pub const ENGLISH: Language = Language { code: "en" };
    pub const RUSSIAN: Language = Language { code: "ru" };
    pub const SPANISH: Language = Language { code: "es" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is registered
    /// * `Err(ValidationFailed)` otherwise
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None if code.len() != 2 => Err(Error::validation(
                "Invalid language code, must be 2-letter ISO 639-1 code",
            )),
            None => Err(Error::validation(format!("Unknown language code: '{}'", code))),
        }
    }

    /// Get the canonical language (Hebrew).
    pub fn canonical() -> Language {
        Language {
            code: LanguageRegistry::get().canonical().code,
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is not in the registry, which cannot happen for a
    /// `Language` built via `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hebrew_constant_is_canonical() {
        assert_eq!(Language::HEBREW.code(), "he");
        assert!(Language::HEBREW.is_canonical());
    }

    #[test]
    fn test_non_canonical_constants() {
        assert!(!Language::ENGLISH.is_canonical());
        assert!(!Language::RUSSIAN.is_canonical());
        assert_eq!(Language::SPANISH.config().name, "Spanish");
    }

    #[test]
    fn test_from_code_known() {
        let language = Language::from_code("fr").expect("Should succeed");
        assert_eq!(language.code(), "fr");
        assert_eq!(language.config().name, "French");
    }

    #[test]
    fn test_from_code_unknown_two_letters() {
        let err = Language::from_code("pt").unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));
        assert!(err.to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_wrong_length() {
        let err = Language::from_code("heb").unwrap_err();
        assert!(err.to_string().contains("2-letter"));
        assert!(Language::from_code("").is_err());
    }

    #[test]
    fn test_canonical_is_hebrew() {
        assert_eq!(Language::canonical(), Language::HEBREW);
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Language::RUSSIAN.to_string(), "ru");
    }
}
