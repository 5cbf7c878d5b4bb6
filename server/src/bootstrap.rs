//! Database construction and startup data.

use eventhub_core::{Category, ChangeSet, Database, Entity, SaveOutcome, StoreError};
use eventhub_memory::InMemoryDatabase;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;

/// Name of the category inserted at startup when seeding is enabled.
pub const SEED_CATEGORY: &str = "Categoria de Teste";

/// Create the process-wide database, seeded when the configuration asks for it.
///
/// # Errors
///
/// Returns a [`StoreError`] if the seed data cannot be written.
pub async fn build_database(config: &Config) -> Result<Arc<dyn Database>, StoreError> {
    let db: Arc<dyn Database> = Arc::new(InMemoryDatabase::new());
    if config.seed_data {
        seed(db.as_ref()).await?;
    }
    Ok(db)
}

/// Insert the sample category unless one with the same name exists.
///
/// # Errors
///
/// Returns a [`StoreError`] if the category table cannot be read or written.
pub async fn seed(db: &dyn Database) -> Result<(), StoreError> {
    let categories = db.categories();
    let sample = Category::new(SEED_CATEGORY);

    if sample.conflict(&categories.list().await?).is_some() {
        info!(category = SEED_CATEGORY, "Seed data already present");
        return Ok(());
    }

    let mut changes = ChangeSet::new();
    changes.add(sample);
    match categories.save(changes).await? {
        SaveOutcome::Committed(stored) => {
            info!(records = stored.len(), "Seed data inserted");
        }
        outcome => {
            warn!(?outcome, "Seed data not inserted");
        }
    }
    Ok(())
}
