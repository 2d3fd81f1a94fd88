//! Internationalization: the registry of languages content may be written in.
//!
//! # Architecture
//!
//! - `registry`: single source of truth for supported languages and their metadata
//! - `language`: validated `Language` handle, Hebrew is canonical
//! - `strings`: localized default event titles
//!
//! # Example
//!
//! ```rust,ignore
//! use study_materials::i18n::{Language, LanguageRegistry};
//!
//! let canonical = Language::canonical();
//! assert_eq!(canonical.code(), "he");
//!
//! let russian = Language::from_code("ru")?;
//! let languages = LanguageRegistry::get().list_all();
//! ```

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::EventTitles;
