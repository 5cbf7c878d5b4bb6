//! Events.

use super::{Entity, EntityKind};
use crate::gateway::{Database, Repository};
use crate::id::RecordId;
use crate::validation::Validate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event that users can take part in.
///
/// The category reference is not checked against stored categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Primary key.
    #[serde(rename = "EventoId", default)]
    pub id: RecordId,

    /// Event name.
    #[serde(rename = "Nome", default)]
    pub name: Option<String>,

    /// When the event takes place.
    #[serde(rename = "Data", default)]
    pub date: Option<DateTime<Utc>>,

    /// Where the event takes place.
    #[serde(rename = "Local", default)]
    pub location: Option<String>,

    /// Owning category.
    #[serde(rename = "CategoriaId", default)]
    pub category_id: Option<RecordId>,
}

impl Validate for Event {}

impl Entity for Event {
    const KIND: EntityKind = EntityKind::Event;

    fn id(&self) -> RecordId {
        self.id
    }

    fn with_id(self, id: RecordId) -> Self {
        Self { id, ..self }
    }

    fn repository(db: &dyn Database) -> &dyn Repository<Self> {
        db.events()
    }
}
