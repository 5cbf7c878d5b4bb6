//! A single in-memory table.

use eventhub_core::gateway::{
    Change, ChangeSet, Repository, SaveOutcome, StoreError, StoreFuture, Versioned,
};
use eventhub_core::{Entity, RecordId, Version};
use std::collections::{BTreeMap, HashMap};
use std::future;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
struct Row<T> {
    record: T,
    version: Version,
}

#[derive(Debug)]
struct TableState<T> {
    rows: BTreeMap<RecordId, Row<T>>,
    /// Highest id ever handed out; ids are never reused.
    last_id: RecordId,
}

impl<T: Entity> TableState<T> {
    /// Dry run of `changes`: the first operation that cannot apply, if any.
    fn check(&self, changes: &ChangeSet<T>) -> Result<Option<SaveOutcome<T>>, StoreError> {
        // Effect of earlier operations in the same set: `None` marks a removed row.
        let mut pending: HashMap<RecordId, Option<Version>> = HashMap::new();
        let mut last_id = self.last_id;

        for change in changes.iter() {
            let (id, expected) = match change {
                Change::Add(_) => {
                    last_id = last_id.next().ok_or(StoreError::IdSpaceExhausted(T::KIND))?;
                    pending.insert(last_id, Some(Version::INITIAL));
                    continue;
                }
                Change::Update { record, expected } => (record.id(), *expected),
                Change::Remove { id, expected } => (*id, *expected),
            };

            let current = pending
                .get(&id)
                .copied()
                .unwrap_or_else(|| self.rows.get(&id).map(|row| row.version));
            let Some(actual) = current else {
                return Ok(Some(SaveOutcome::NotFound(id)));
            };
            if let Some(expected) = expected {
                if expected != actual {
                    return Ok(Some(SaveOutcome::ConcurrencyConflict {
                        id,
                        expected,
                        actual,
                    }));
                }
            }

            let after = match change {
                Change::Remove { .. } => None,
                _ => Some(actual.next()),
            };
            pending.insert(id, after);
        }

        Ok(None)
    }

    /// Apply `changes`, which `check` has already accepted.
    fn apply(&mut self, changes: ChangeSet<T>) -> Vec<T> {
        let mut stored = Vec::new();

        for change in changes {
            match change {
                Change::Add(record) => {
                    let Some(id) = self.last_id.next() else {
                        continue;
                    };
                    self.last_id = id;
                    let record = record.with_id(id);
                    self.rows.insert(
                        id,
                        Row {
                            record: record.clone(),
                            version: Version::INITIAL,
                        },
                    );
                    stored.push(record);
                }
                Change::Update { record, .. } => {
                    if let Some(row) = self.rows.get_mut(&record.id()) {
                        row.record = record.clone();
                        row.version = row.version.next();
                        stored.push(record);
                    }
                }
                Change::Remove { id, .. } => {
                    self.rows.remove(&id);
                }
            }
        }

        stored
    }
}

/// Rows of one entity type, keyed and ordered by id.
///
/// Every row carries a version that starts at `Version::INITIAL` and moves
/// forward on each committed update. Ids start at 1 and are never reused,
/// even after the row holding one is removed.
#[derive(Debug)]
pub struct Table<T> {
    state: RwLock<TableState<T>>,
}

impl<T: Entity> Table<T> {
    /// An empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_after(RecordId::UNASSIGNED)
    }

    /// An empty table whose first assigned id follows `last_id`.
    #[must_use]
    pub const fn starting_after(last_id: RecordId) -> Self {
        Self {
            state: RwLock::new(TableState {
                rows: BTreeMap::new(),
                last_id,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TableState<T>>, StoreError> {
        self.state.read().map_err(|_| StoreError::Poisoned(T::KIND))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TableState<T>>, StoreError> {
        self.state.write().map_err(|_| StoreError::Poisoned(T::KIND))
    }

    pub(crate) fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }

    fn find_now(&self, id: RecordId) -> Result<Option<Versioned<T>>, StoreError> {
        Ok(self.read()?.rows.get(&id).map(|row| Versioned {
            record: row.record.clone(),
            version: row.version,
        }))
    }

    fn list_now(&self) -> Result<Vec<T>, StoreError> {
        Ok(self
            .read()?
            .rows
            .values()
            .map(|row| row.record.clone())
            .collect())
    }

    fn exists_now(&self, id: RecordId) -> Result<bool, StoreError> {
        Ok(self.read()?.rows.contains_key(&id))
    }

    fn save_now(&self, changes: ChangeSet<T>) -> Result<SaveOutcome<T>, StoreError> {
        let mut state = self.write()?;

        if let Some(rejected) = state.check(&changes)? {
            tracing::debug!(table = %T::KIND, outcome = ?rejected, "change set rejected");
            return Ok(rejected);
        }

        let pending = changes.len();
        let stored = state.apply(changes);
        tracing::debug!(table = %T::KIND, pending, rows = state.rows.len(), "change set committed");

        Ok(SaveOutcome::Committed(stored))
    }
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for Table<T> {
    fn find(&self, id: RecordId) -> StoreFuture<'_, Option<Versioned<T>>> {
        Box::pin(future::ready(self.find_now(id)))
    }

    fn list(&self) -> StoreFuture<'_, Vec<T>> {
        Box::pin(future::ready(self.list_now()))
    }

    fn exists(&self, id: RecordId) -> StoreFuture<'_, bool> {
        Box::pin(future::ready(self.exists_now(id)))
    }

    fn save(&self, changes: ChangeSet<T>) -> StoreFuture<'_, SaveOutcome<T>> {
        Box::pin(future::ready(self.save_now(changes)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use eventhub_core::{Category, User};

    fn committed<T: std::fmt::Debug>(outcome: SaveOutcome<T>) -> Vec<T> {
        match outcome {
            SaveOutcome::Committed(records) => records,
            other => panic!("expected commit, got {other:?}"),
        }
    }

    async fn insert(table: &Table<Category>, name: &str) -> Category {
        let mut changes = ChangeSet::new();
        changes.add(Category::new(name));
        committed(table.save(changes).await.unwrap()).remove(0)
    }

    #[tokio::test]
    async fn add_assigns_sequential_ids() {
        let table = Table::new();
        let first = insert(&table, "Tecnologia").await;
        let second = insert(&table, "Esportes").await;

        assert_eq!(first.id, RecordId::new(1));
        assert_eq!(second.id, RecordId::new(2));
    }

    #[tokio::test]
    async fn body_id_is_ignored_on_add() {
        let table = Table::new();
        let mut changes = ChangeSet::new();
        changes.add(Category::new("Tecnologia").with_id(RecordId::new(77)));

        let stored = committed(table.save(changes).await.unwrap());
        assert_eq!(stored[0].id, RecordId::new(1));
        assert!(!table.exists(RecordId::new(77)).await.unwrap());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_remove() {
        let table = Table::new();
        let first = insert(&table, "Tecnologia").await;

        let mut changes = ChangeSet::new();
        changes.remove(first.id);
        assert!(table.save(changes).await.unwrap().is_committed());

        let second = insert(&table, "Esportes").await;
        assert_eq!(second.id, RecordId::new(2));
    }

    #[tokio::test]
    async fn find_returns_record_with_version() {
        let table = Table::new();
        let stored = insert(&table, "Tecnologia").await;

        let found = table.find(stored.id).await.unwrap().expect("row exists");
        assert_eq!(found.record, stored);
        assert_eq!(found.version, Version::INITIAL);
        assert!(table.find(RecordId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let table = Table::new();
        for name in ["Cinema", "Arte", "Boliche"] {
            insert(&table, name).await;
        }

        let ids: Vec<_> = table.list().await.unwrap().iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let table = Table::new();
        let stored = insert(&table, "Tecnologia").await;

        let mut changes = ChangeSet::new();
        changes.update(Category::new("Inovação").with_id(stored.id));
        assert!(table.save(changes).await.unwrap().is_committed());

        let found = table.find(stored.id).await.unwrap().unwrap();
        assert_eq!(found.record.name.as_deref(), Some("Inovação"));
        assert_eq!(found.version, Version::new(1));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let table: Table<User> = Table::new();
        let mut changes = ChangeSet::new();
        changes.update(User::default().with_id(RecordId::new(5)));

        let outcome = table.save(changes).await.unwrap();
        assert_eq!(outcome, SaveOutcome::NotFound(RecordId::new(5)));
        assert!(table.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stale_tracked_update_conflicts() {
        let table = Table::new();
        let stored = insert(&table, "Tecnologia").await;
        let read = table.find(stored.id).await.unwrap().unwrap();

        // Another writer commits first.
        let mut other = ChangeSet::new();
        other.update(Category::new("Esportes").with_id(stored.id));
        assert!(table.save(other).await.unwrap().is_committed());

        let mut changes = ChangeSet::new();
        changes.update_tracked(Category::new("Cinema").with_id(stored.id), read.version);
        let outcome = table.save(changes).await.unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::ConcurrencyConflict {
                id: stored.id,
                expected: Version::INITIAL,
                actual: Version::new(1),
            }
        );
        let current = table.find(stored.id).await.unwrap().unwrap();
        assert_eq!(current.record.name.as_deref(), Some("Esportes"));
    }

    #[tokio::test]
    async fn rejected_change_set_applies_nothing() {
        let table = Table::new();
        let mut changes = ChangeSet::new();
        changes
            .add(Category::new("Tecnologia"))
            .remove(RecordId::new(42));

        let outcome = table.save(changes).await.unwrap();
        assert_eq!(outcome, SaveOutcome::NotFound(RecordId::new(42)));
        assert!(table.list().await.unwrap().is_empty());

        // The id the rejected add would have used is still free.
        let stored = insert(&table, "Esportes").await;
        assert_eq!(stored.id, RecordId::new(1));
    }

    #[tokio::test]
    async fn operations_see_earlier_operations_in_the_same_set() {
        let table = Table::new();
        let stored = insert(&table, "Tecnologia").await;

        let mut changes = ChangeSet::new();
        changes
            .update_tracked(Category::new("Esportes").with_id(stored.id), Version::INITIAL)
            .remove_tracked(stored.id, Version::new(1));
        assert!(table.save(changes).await.unwrap().is_committed());
        assert!(!table.exists(stored.id).await.unwrap());

        let mut twice = ChangeSet::new();
        twice.remove(RecordId::new(1)).remove(RecordId::new(1));
        assert_eq!(
            table.save(twice).await.unwrap(),
            SaveOutcome::NotFound(RecordId::new(1))
        );
    }

    #[tokio::test]
    async fn exhausted_id_space_is_a_store_error() {
        let table = Table::starting_after(RecordId::new(u32::MAX));
        let mut changes = ChangeSet::new();
        changes.add(Category::new("Tecnologia"));

        let err = table.save(changes).await.unwrap_err();
        assert!(matches!(err, StoreError::IdSpaceExhausted(_)));
    }

    #[tokio::test]
    async fn empty_change_set_commits() {
        let table: Table<Category> = Table::new();
        let outcome = table.save(ChangeSet::new()).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Committed(Vec::new()));
    }
}
