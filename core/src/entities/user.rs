//! Users.

use super::{Entity, EntityKind};
use crate::gateway::{Database, Repository};
use crate::id::RecordId;
use crate::validation::Validate;
use serde::{Deserialize, Serialize};

/// A user who comments on and participates in events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Primary key.
    #[serde(rename = "UsuarioId", default)]
    pub id: RecordId,

    /// Display name.
    #[serde(rename = "Nome", default)]
    pub name: Option<String>,
}

impl Validate for User {}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> RecordId {
        self.id
    }

    fn with_id(self, id: RecordId) -> Self {
        Self { id, ..self }
    }

    fn repository(db: &dyn Database) -> &dyn Repository<Self> {
        db.users()
    }
}
