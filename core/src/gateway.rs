//! Persistence gateway: the storage contract the HTTP handlers depend on.
//!
//! # Design
//!
//! Reads are immediate (`find`, `list`, `exists`). Writes are recorded in a
//! [`ChangeSet`] and committed together by [`Repository::save`], which reports
//! how the commit went as a [`SaveOutcome`] instead of raising a fault:
//!
//! - `Committed`: every pending operation was applied.
//! - `NotFound`: an update or remove targeted a row that does not exist.
//! - `ConcurrencyConflict`: a row read at version `n` is no longer at `n`.
//!
//! A commit that does not come back `Committed` applies nothing. Failures of
//! the store itself (id space exhausted, poisoned lock) are `StoreError`s and
//! are always fatal to the request.
//!
//! # Dyn Compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` instead of using `async fn` so the
//! whole database can be shared as `Arc<dyn Database>`.

use crate::entities::{Category, Comment, Entity, EntityKind, Event, Participation, User};
use crate::id::{RecordId, Version};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by gateway operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Faults of the storage layer itself.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No identifier is left to assign to a new record.
    #[error("identifier space exhausted for {0}")]
    IdSpaceExhausted(EntityKind),

    /// A writer panicked while holding the table lock.
    #[error("{0} table is poisoned")]
    Poisoned(EntityKind),
}

/// A stored record together with the row version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    /// The record.
    pub record: T,
    /// Row version at read time.
    pub version: Version,
}

/// One pending write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    /// Insert a new record; the store assigns its id.
    Add(T),
    /// Replace the row identified by `record.id()`.
    Update {
        /// Full replacement.
        record: T,
        /// Version the caller read, if it read the row at all.
        expected: Option<Version>,
    },
    /// Delete a row.
    Remove {
        /// Row to delete.
        id: RecordId,
        /// Version the caller read, if it read the row at all.
        expected: Option<Version>,
    },
}

/// Pending writes for one table, committed by [`Repository::save`].
///
/// # Examples
///
/// ```
/// use eventhub_core::entities::Category;
/// use eventhub_core::gateway::ChangeSet;
///
/// let mut changes = ChangeSet::new();
/// changes.add(Category::new("Tecnologia")).add(Category::new("Esportes"));
/// assert_eq!(changes.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet<T> {
    changes: Vec<Change<T>>,
}

impl<T: Entity> ChangeSet<T> {
    /// An empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Queue an insert.
    pub fn add(&mut self, record: T) -> &mut Self {
        self.changes.push(Change::Add(record));
        self
    }

    /// Queue a full replace of a row that was not read first.
    ///
    /// Only a missing row can make this fail at commit.
    pub fn update(&mut self, record: T) -> &mut Self {
        self.changes.push(Change::Update {
            record,
            expected: None,
        });
        self
    }

    /// Queue a full replace that must still find the row at `expected`.
    pub fn update_tracked(&mut self, record: T, expected: Version) -> &mut Self {
        self.changes.push(Change::Update {
            record,
            expected: Some(expected),
        });
        self
    }

    /// Queue a delete of a row that was not read first.
    pub fn remove(&mut self, id: RecordId) -> &mut Self {
        self.changes.push(Change::Remove { id, expected: None });
        self
    }

    /// Queue a delete that must still find the row at `expected`.
    pub fn remove_tracked(&mut self, id: RecordId, expected: Version) -> &mut Self {
        self.changes.push(Change::Remove {
            id,
            expected: Some(expected),
        });
        self
    }

    /// Number of pending writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Pending writes in the order they were queued.
    pub fn iter(&self) -> std::slice::Iter<'_, Change<T>> {
        self.changes.iter()
    }
}

impl<T: Entity> Default for ChangeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for ChangeSet<T> {
    type Item = Change<T>;
    type IntoIter = std::vec::IntoIter<Change<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Result of committing a [`ChangeSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum SaveOutcome<T> {
    /// Every write was applied. Holds the stored form of each added or
    /// updated record, in queue order.
    Committed(Vec<T>),

    /// An update or remove targeted a missing row. Nothing was applied.
    NotFound(RecordId),

    /// A tracked row changed since it was read. Nothing was applied.
    ConcurrencyConflict {
        /// Row that changed.
        id: RecordId,
        /// Version the writer read.
        expected: Version,
        /// Version found at commit.
        actual: Version,
    },
}

impl<T> SaveOutcome<T> {
    /// Returns true for `Committed`.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Storage for one entity type.
pub trait Repository<T: Entity>: Send + Sync {
    /// Look a record up by primary key. Absence is `Ok(None)`.
    fn find(&self, id: RecordId) -> StoreFuture<'_, Option<Versioned<T>>>;

    /// Every stored record, ordered by id.
    fn list(&self) -> StoreFuture<'_, Vec<T>>;

    /// Whether a record with `id` is stored.
    fn exists(&self, id: RecordId) -> StoreFuture<'_, bool>;

    /// Commit `changes` atomically.
    fn save(&self, changes: ChangeSet<T>) -> StoreFuture<'_, SaveOutcome<T>>;
}

/// The whole backing store: one repository per entity type.
pub trait Database: Send + Sync {
    /// Category storage.
    fn categories(&self) -> &dyn Repository<Category>;

    /// Event storage.
    fn events(&self) -> &dyn Repository<Event>;

    /// Participation storage.
    fn participations(&self) -> &dyn Repository<Participation>;

    /// User storage.
    fn users(&self) -> &dyn Repository<User>;

    /// Comment storage.
    fn comments(&self) -> &dyn Repository<Comment>;

    /// Succeeds when every table can be read.
    fn ping(&self) -> StoreFuture<'_, ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_set_keeps_queue_order() {
        let mut changes = ChangeSet::new();
        changes
            .add(Category::new("Tecnologia"))
            .update_tracked(Category::new("Esportes").with_id(RecordId::new(2)), Version::new(3))
            .remove(RecordId::new(9));

        let queued: Vec<_> = changes.into_iter().collect();
        assert_eq!(
            queued,
            vec![
                Change::Add(Category::new("Tecnologia")),
                Change::Update {
                    record: Category::new("Esportes").with_id(RecordId::new(2)),
                    expected: Some(Version::new(3)),
                },
                Change::Remove {
                    id: RecordId::new(9),
                    expected: None,
                },
            ]
        );
    }

    #[test]
    fn new_change_set_is_empty() {
        let changes: ChangeSet<User> = ChangeSet::default();
        assert!(changes.is_empty());
        assert_eq!(changes.len(), 0);
    }

    #[test]
    fn only_committed_counts_as_committed() {
        assert!(SaveOutcome::<User>::Committed(Vec::new()).is_committed());
        assert!(!SaveOutcome::<User>::NotFound(RecordId::new(1)).is_committed());
    }

    #[test]
    fn store_error_messages_name_the_table() {
        let err = StoreError::IdSpaceExhausted(EntityKind::Category);
        assert_eq!(err.to_string(), "identifier space exhausted for Categoria");
    }
}
