//! In-memory database for the eventhub API.
//!
//! One [`Table`] per entity type, each behind its own lock. Nothing is
//! persisted; the database lives exactly as long as the value that owns it,
//! which makes a fresh instance per test the normal way to isolate tests.
//!
//! # Example
//!
//! ```
//! use eventhub_core::prelude::*;
//! use eventhub_memory::InMemoryDatabase;
//!
//! # async fn demo() -> Result<(), StoreError> {
//! let db = InMemoryDatabase::new();
//! let mut changes = ChangeSet::new();
//! changes.add(Category::new("Tecnologia"));
//! let outcome = db.categories().save(changes).await?;
//! assert!(outcome.is_committed());
//! # Ok(())
//! # }
//! ```
//!
//! Foreign keys (`Event::category_id`, `Participation::event_id`, ...) are
//! stored as given and never checked, and removing a row does not cascade.

pub mod table;

pub use table::Table;

use eventhub_core::gateway::{Database, Repository, StoreFuture};
use eventhub_core::{Category, Comment, Event, Participation, User};
use std::future;

/// The process-wide store: five independent tables.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    categories: Table<Category>,
    events: Table<Event>,
    participations: Table<Participation>,
    users: Table<User>,
    comments: Table<Comment>,
}

impl InMemoryDatabase {
    /// An empty database.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            categories: Table::new(),
            events: Table::new(),
            participations: Table::new(),
            users: Table::new(),
            comments: Table::new(),
        }
    }
}

impl Database for InMemoryDatabase {
    fn categories(&self) -> &dyn Repository<Category> {
        &self.categories
    }

    fn events(&self) -> &dyn Repository<Event> {
        &self.events
    }

    fn participations(&self) -> &dyn Repository<Participation> {
        &self.participations
    }

    fn users(&self) -> &dyn Repository<User> {
        &self.users
    }

    fn comments(&self) -> &dyn Repository<Comment> {
        &self.comments
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        let result = self
            .categories
            .ping()
            .and_then(|()| self.events.ping())
            .and_then(|()| self.participations.ping())
            .and_then(|()| self.users.ping())
            .and_then(|()| self.comments.ping());
        Box::pin(future::ready(result))
    }
}
