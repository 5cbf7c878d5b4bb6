//! # Eventhub Core
//!
//! Entities, validation rules and the persistence gateway behind the eventhub
//! REST API.
//!
//! ## Core Concepts
//!
//! - **Entity**: one of the five resource types (Category, Event,
//!   Participation, User, Comment)
//! - **Validate**: pure field-level checks run before any storage call
//! - **Repository**: find/list/exists plus an atomic `save` of a `ChangeSet`
//! - **`SaveOutcome`**: `Committed`, `NotFound` or `ConcurrencyConflict`,
//!   returned by `save` instead of a thrown fault
//!
//! ## Example
//!
//! ```ignore
//! use eventhub_core::prelude::*;
//!
//! async fn rename(db: &dyn Database, id: RecordId) -> Result<bool, StoreError> {
//!     let Some(current) = db.categories().find(id).await? else {
//!         return Ok(false);
//!     };
//!     let mut changes = ChangeSet::new();
//!     changes.update_tracked(Category::new("Esportes").with_id(id), current.version);
//!     Ok(db.categories().save(changes).await?.is_committed())
//! }
//! ```

pub mod entities;
pub mod gateway;
pub mod id;
pub mod validation;

pub use entities::{Category, Comment, Entity, EntityKind, Event, Participation, User};
pub use gateway::{
    Change, ChangeSet, Database, Repository, SaveOutcome, StoreError, StoreFuture, Versioned,
};
pub use id::{ParseRecordIdError, RecordId, Version};
pub use validation::{Validate, ValidationErrors};

/// Everything a handler or a store implementation usually needs.
pub mod prelude {
    pub use crate::entities::{Category, Comment, Entity, EntityKind, Event, Participation, User};
    pub use crate::gateway::{
        ChangeSet, Database, Repository, SaveOutcome, StoreError, StoreFuture, Versioned,
    };
    pub use crate::id::{RecordId, Version};
    pub use crate::validation::{Validate, ValidationErrors};
}
