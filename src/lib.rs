pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod i18n;
pub mod model;
pub mod retry;
pub mod store;
pub mod sync;
pub mod templates;
