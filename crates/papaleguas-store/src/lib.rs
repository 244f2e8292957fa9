pub mod collection;
pub mod queries;
pub mod seed;

use papaleguas_types::models::{ContactSubmission, TimelineEntry, User};
use thiserror::Error;

pub use collection::{Collection, Record};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} collection lock poisoned")]
    Poisoned(&'static str),
    #[error("{0}")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// In-memory backing store, one collection per entity type.
///
/// Constructed once at startup and shared behind an `Arc`. Nothing survives
/// a process restart.
pub struct Store {
    users: Collection<User>,
    timeline: Collection<TimelineEntry>,
    contacts: Collection<ContactSubmission>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            users: Collection::new("users"),
            timeline: Collection::new("timeline"),
            contacts: Collection::new("contacts"),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
