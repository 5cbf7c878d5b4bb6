//! Application state for Axum handlers.

use eventhub_core::Database;
use std::fmt;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Holds the one database instance the process serves from. Tests build a
/// fresh state per case.
///
/// # Examples
///
/// ```ignore
/// use eventhub_memory::InMemoryDatabase;
/// use std::sync::Arc;
///
/// let state = AppState::new(Arc::new(InMemoryDatabase::new()));
/// let app = build_router(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    db: Arc<dyn Database>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// The database handlers read from and write to.
    #[must_use]
    pub fn db(&self) -> &dyn Database {
        self.db.as_ref()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
