use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use papaleguas_types::models::Id;

use crate::{Result, StoreError};

/// A row type that can live in a [`Collection`].
///
/// `assign` is the only way to build a record from its insert payload, so the
/// id and creation timestamp always come from the collection.
pub trait Record: Clone {
    type New;

    fn assign(new: Self::New, id: Id, now: DateTime<Utc>) -> Self;
}

struct Rows<T> {
    next_id: Id,
    rows: BTreeMap<Id, T>,
}

/// Keyed collection with a monotonic id counter.
///
/// Counter and map sit behind the same lock: two inserts never share an id and
/// ids are never reused, even after delete.
pub struct Collection<T> {
    name: &'static str,
    inner: Mutex<Rows<T>>,
}

impl<T: Record> Collection<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(Rows { next_id: 1, rows: BTreeMap::new() }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Rows<T>>> {
        self.inner.lock().map_err(|_| StoreError::Poisoned(self.name))
    }

    pub fn insert(&self, new: T::New) -> Result<T> {
        self.insert_checked(new, |_, _| Ok(()))
    }

    /// Insert after `check` has seen the pending payload and the current rows,
    /// all under one lock.
    pub fn insert_checked<F>(&self, new: T::New, check: F) -> Result<T>
    where
        F: FnOnce(&T::New, &BTreeMap<Id, T>) -> Result<()>,
    {
        let mut guard = self.lock()?;
        check(&new, &guard.rows)?;

        let id = guard.next_id;
        guard.next_id += 1;
        let record = T::assign(new, id, Utc::now());
        guard.rows.insert(id, record.clone());
        Ok(record)
    }

    pub fn get(&self, id: Id) -> Result<Option<T>> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    /// All records in id order.
    pub fn list(&self) -> Result<Vec<T>> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    pub fn find<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.lock()?.rows.values().find(|r| predicate(r)).cloned())
    }

    /// Mutate a record in place. Returns `None` when `id` is unknown.
    pub fn update<F>(&self, id: Id, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut guard = self.lock()?;
        Ok(guard.rows.get_mut(&id).map(|record| {
            f(record);
            record.clone()
        }))
    }

    pub fn delete(&self, id: Id) -> Result<bool> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Id,
        text: String,
        created_at: DateTime<Utc>,
    }

    impl Record for Note {
        type New = String;

        fn assign(text: String, id: Id, now: DateTime<Utc>) -> Self {
            Note { id, text, created_at: now }
        }
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let c = Collection::<Note>::new("notes");
        let ids: Vec<Id> = (0..5).map(|i| c.insert(format!("n{i}")).unwrap().id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let c = Collection::<Note>::new("notes");
        let a = c.insert("a".into()).unwrap();
        let b = c.insert("b".into()).unwrap();
        assert!(c.delete(b.id).unwrap());
        assert!(c.delete(a.id).unwrap());
        let d = c.insert("d".into()).unwrap();
        assert_eq!(d.id, 3);
        assert_eq!(c.list().unwrap(), vec![d]);
    }

    #[test]
    fn test_delete_reports_missing() {
        let c = Collection::<Note>::new("notes");
        let a = c.insert("a".into()).unwrap();
        assert!(!c.delete(99).unwrap());
        assert!(c.delete(a.id).unwrap());
        assert!(!c.delete(a.id).unwrap());
    }

    #[test]
    fn test_update_missing_has_no_side_effect() {
        let c = Collection::<Note>::new("notes");
        c.insert("a".into()).unwrap();
        let result = c.update(42, |n| n.text = "changed".into()).unwrap();
        assert!(result.is_none());
        assert_eq!(c.list().unwrap()[0].text, "a");
    }

    #[test]
    fn test_update_returns_new_value() {
        let c = Collection::<Note>::new("notes");
        let a = c.insert("a".into()).unwrap();
        let updated = c.update(a.id, |n| n.text = "b".into()).unwrap().unwrap();
        assert_eq!(updated.text, "b");
        assert_eq!(updated.created_at, a.created_at);
        assert_eq!(c.get(a.id).unwrap(), Some(updated));
    }

    #[test]
    fn test_insert_checked_rejects_without_consuming_id() {
        let c = Collection::<Note>::new("notes");
        c.insert("dup".into()).unwrap();
        let err = c.insert_checked("dup".into(), |new, rows| {
            if rows.values().any(|n| &n.text == new) {
                return Err(StoreError::Conflict("duplicate".into()));
            }
            Ok(())
        });
        assert!(matches!(err, Err(StoreError::Conflict(_))));
        assert_eq!(c.insert("other".into()).unwrap().id, 2);
    }

    #[test]
    fn test_concurrent_inserts_get_distinct_ids() {
        let c = Arc::new(Collection::<Note>::new("notes"));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let c = c.clone();
                thread::spawn(move || {
                    (0..50).map(|i| c.insert(format!("{t}-{i}")).unwrap().id).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<Id> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 400);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&400));
    }
}
