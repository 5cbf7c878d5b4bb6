//! Comments written by users.

use super::{Entity, EntityKind};
use crate::gateway::{Database, Repository};
use crate::id::RecordId;
use crate::validation::Validate;
use serde::{Deserialize, Serialize};

/// A comment authored by a [`User`](super::User).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Primary key.
    #[serde(rename = "ComentarioId", default)]
    pub id: RecordId,

    /// Comment body.
    #[serde(rename = "Texto", default)]
    pub text: Option<String>,

    /// Author.
    #[serde(rename = "UsuarioId", default)]
    pub user_id: RecordId,
}

impl Validate for Comment {}

impl Entity for Comment {
    const KIND: EntityKind = EntityKind::Comment;

    fn id(&self) -> RecordId {
        self.id
    }

    fn with_id(self, id: RecordId) -> Self {
        Self { id, ..self }
    }

    fn repository(db: &dyn Database) -> &dyn Repository<Self> {
        db.comments()
    }
}
