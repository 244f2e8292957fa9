use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::{debug, info};

use papaleguas_store::Store;
use papaleguas_types::api::MessageResponse;
use papaleguas_types::models::{Id, NewTimelineEntry, TimelineEntry, TimelineEntryPatch};

use crate::auth::AppState;
use crate::error::{ApiError, Result, parse_id};
use crate::session::Identity;
use crate::validation::{self, Mode};

const ENTRY: &str = "Timeline entry";

/// CRUD over the company history. Inputs arrive already validated; the
/// service never sees `id` or `createdAt` from a caller.
#[derive(Clone)]
pub struct TimelineService {
    store: Arc<Store>,
}

impl TimelineService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Ascending by `order`, equal orders by id.
    pub fn list_all(&self) -> Result<Vec<TimelineEntry>> {
        Ok(self.store.list_timeline_entries()?)
    }

    pub fn get_one(&self, id: Id) -> Result<TimelineEntry> {
        self.store.get_timeline_entry(id)?.ok_or(ApiError::NotFound(ENTRY))
    }

    /// Duplicate or sparse `order` values are accepted as given.
    pub fn create(&self, input: NewTimelineEntry) -> Result<TimelineEntry> {
        let entry = self.store.create_timeline_entry(input)?;
        info!("Timeline entry {} created (order {})", entry.id, entry.order);
        Ok(entry)
    }

    pub fn update(&self, id: Id, patch: TimelineEntryPatch) -> Result<TimelineEntry> {
        let entry = self
            .store
            .update_timeline_entry(id, patch)?
            .ok_or(ApiError::NotFound(ENTRY))?;
        info!("Timeline entry {} updated", id);
        Ok(entry)
    }

    pub fn delete(&self, id: Id) -> Result<()> {
        if !self.store.delete_timeline_entry(id)? {
            return Err(ApiError::NotFound(ENTRY));
        }
        info!("Timeline entry {} deleted", id);
        Ok(())
    }
}

// -- Handlers --

pub async fn list_entries(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.timeline.list_all()?))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    Ok(Json(state.timeline.get_one(id)?))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(body) = payload?;
    let input: NewTimelineEntry = validation::parse(&body, validation::TIMELINE_ENTRY, Mode::Create)?;
    let entry = state.timeline.create(input)?;
    debug!("Entry {} created by user {}", entry.id, identity.user_id);
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let patch: TimelineEntryPatch = validation::parse(&body, validation::TIMELINE_ENTRY, Mode::Partial)?;
    Ok(Json(state.timeline.update(id, patch)?))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    state.timeline.delete(id)?;
    Ok(Json(MessageResponse::new("Timeline entry deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TimelineService {
        TimelineService::new(Arc::new(Store::new()))
    }

    fn input(title: &str, order: i64) -> NewTimelineEntry {
        NewTimelineEntry {
            title: title.into(),
            description: "Y".into(),
            year: "2021".into(),
            image_url: None,
            order,
        }
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let s = service();
        let created = s.create(input("X", 6)).unwrap();
        assert_eq!(s.get_one(created.id).unwrap(), created);
        assert_eq!(created.image_url, None);
    }

    #[test]
    fn test_create_update_get_reflects_merge() {
        let s = service();
        let created = s.create(input("X", 6)).unwrap();
        let patch = TimelineEntryPatch {
            title: Some("Z".into()),
            image_url: Some(Some("https://example.com/z.jpg".into())),
            ..Default::default()
        };
        let updated = s.update(created.id, patch).unwrap();
        let fetched = s.get_one(created.id).unwrap();
        assert_eq!(updated, fetched);
        assert_eq!(fetched.title, "Z");
        assert_eq!(fetched.description, created.description);
        assert_eq!(fetched.order, 6);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[test]
    fn test_duplicate_orders_accepted() {
        let s = service();
        let a = s.create(input("a", 1)).unwrap();
        let b = s.create(input("b", 1)).unwrap();
        let listed: Vec<Id> = s.list_all().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(listed, vec![a.id, b.id]);
    }

    #[test]
    fn test_delete_signals() {
        let s = service();
        assert!(matches!(s.delete(999), Err(ApiError::NotFound(_))));
        assert!(matches!(s.delete(999), Err(ApiError::NotFound(_))));

        let e = s.create(input("a", 1)).unwrap();
        assert!(s.delete(e.id).is_ok());
        assert!(matches!(s.delete(e.id), Err(ApiError::NotFound(_))));
        assert!(matches!(s.get_one(e.id), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_update_missing() {
        let s = service();
        assert!(matches!(
            s.update(1, TimelineEntryPatch::default()),
            Err(ApiError::NotFound(_))
        ));
        assert!(s.list_all().unwrap().is_empty());
    }
}
