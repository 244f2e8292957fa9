use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the entity store. Starts at 1 per collection.
pub type Id = u64;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Admin,
}

/// Every authenticated user currently holds exactly this set.
pub fn default_capabilities() -> BTreeSet<Capability> {
    BTreeSet::from([Capability::Admin])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub username: String,
    /// Argon2id PHC string, never sent over the wire.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// A milestone in the company history. `year` is a free-form label such as
/// "2005" or "Hoje".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub year: String,
    pub image_url: Option<String>,
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimelineEntry {
    pub title: String,
    pub description: String,
    pub year: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub order: i64,
}

/// Partial update. `image_url` distinguishes "absent" (`None`) from an
/// explicit `null` (`Some(None)`), which clears the image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntryPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub image_url: Option<Option<String>>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl TimelineEntryPatch {
    pub fn apply(self, entry: &mut TimelineEntry) {
        if let Some(title) = self.title {
            entry.title = title;
        }
        if let Some(description) = self.description {
            entry.description = description;
        }
        if let Some(year) = self.year {
            entry.year = year;
        }
        if let Some(image_url) = self.image_url {
            entry.image_url = image_url;
        }
        if let Some(order) = self.order {
            entry.order = order;
        }
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}
