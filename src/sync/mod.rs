//! Multilingual groups: identity, display ordering and the engine that keeps
//! a group's language records in step.

pub mod engine;
pub mod group;
pub mod ordering;

pub use engine::{SyncEngine, SyncReport, Synced};
pub use group::{is_canonical, GroupKey};
