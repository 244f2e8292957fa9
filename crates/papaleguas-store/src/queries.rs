use chrono::{DateTime, Utc};
use papaleguas_types::models::{
    ContactSubmission, Id, NewContactSubmission, NewTimelineEntry, NewUser, TimelineEntry,
    TimelineEntryPatch, User,
};
use tracing::debug;

use crate::{Record, Result, Store, StoreError};

impl Record for User {
    type New = NewUser;

    fn assign(new: NewUser, id: Id, _now: DateTime<Utc>) -> Self {
        User { id, username: new.username, password_hash: new.password_hash }
    }
}

impl Record for TimelineEntry {
    type New = NewTimelineEntry;

    fn assign(new: NewTimelineEntry, id: Id, now: DateTime<Utc>) -> Self {
        TimelineEntry {
            id,
            title: new.title,
            description: new.description,
            year: new.year,
            image_url: new.image_url,
            order: new.order,
            created_at: now,
        }
    }
}

impl Record for ContactSubmission {
    type New = NewContactSubmission;

    fn assign(new: NewContactSubmission, id: Id, now: DateTime<Utc>) -> Self {
        ContactSubmission {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            service: new.service,
            message: new.message,
            created_at: now,
        }
    }
}

impl Store {
    // -- Users --

    /// Usernames are unique; a duplicate is a `Conflict`.
    pub fn create_user(&self, user: NewUser) -> Result<User> {
        self.users.insert_checked(user, |new, rows| {
            if rows.values().any(|u| u.username == new.username) {
                return Err(StoreError::Conflict(format!("username '{}' is taken", new.username)));
            }
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users.find(|u| u.username == username)
    }

    pub fn get_user_by_id(&self, id: Id) -> Result<Option<User>> {
        self.users.get(id)
    }

    // -- Timeline --

    /// Ascending by `order`, ties broken by id.
    pub fn list_timeline_entries(&self) -> Result<Vec<TimelineEntry>> {
        let mut entries = self.timeline.list()?;
        entries.sort_by_key(|e| (e.order, e.id));
        Ok(entries)
    }

    pub fn get_timeline_entry(&self, id: Id) -> Result<Option<TimelineEntry>> {
        self.timeline.get(id)
    }

    pub fn create_timeline_entry(&self, entry: NewTimelineEntry) -> Result<TimelineEntry> {
        let entry = self.timeline.insert(entry)?;
        debug!("Inserted timeline entry {}", entry.id);
        Ok(entry)
    }

    pub fn update_timeline_entry(
        &self,
        id: Id,
        patch: TimelineEntryPatch,
    ) -> Result<Option<TimelineEntry>> {
        self.timeline.update(id, |entry| patch.apply(entry))
    }

    pub fn delete_timeline_entry(&self, id: Id) -> Result<bool> {
        self.timeline.delete(id)
    }

    // -- Contact submissions --

    pub fn create_contact_submission(
        &self,
        submission: NewContactSubmission,
    ) -> Result<ContactSubmission> {
        self.contacts.insert(submission)
    }

    /// Newest first; submissions sharing a timestamp fall back to id, newest first.
    pub fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>> {
        let mut submissions = self.contacts.list()?;
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(submissions)
    }
}
