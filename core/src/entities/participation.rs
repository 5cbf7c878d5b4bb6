//! A user's participation in an event.

use super::{Entity, EntityKind};
use crate::gateway::{Database, Repository};
use crate::id::RecordId;
use crate::validation::Validate;
use serde::{Deserialize, Serialize};

/// Links a [`User`](super::User) to an [`Event`](super::Event).
///
/// Both references are stored as given; nothing checks that the event or the
/// user exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    /// Primary key.
    #[serde(rename = "ParticipacaoId", default)]
    pub id: RecordId,

    /// Referenced event.
    #[serde(rename = "EventoId", default)]
    pub event_id: RecordId,

    /// Referenced user.
    #[serde(rename = "UsuarioId", default)]
    pub user_id: RecordId,

    /// Whether the user confirmed attendance.
    #[serde(rename = "Confirmado", default)]
    pub confirmed: bool,
}

impl Validate for Participation {}

impl Entity for Participation {
    const KIND: EntityKind = EntityKind::Participation;

    fn id(&self) -> RecordId {
        self.id
    }

    fn with_id(self, id: RecordId) -> Self {
        Self { id, ..self }
    }

    fn repository(db: &dyn Database) -> &dyn Repository<Self> {
        db.participations()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_defaults_to_false() {
        let participation: Participation =
            serde_json::from_value(serde_json::json!({ "EventoId": 2, "UsuarioId": 3 })).unwrap();

        assert_eq!(participation.event_id, RecordId::new(2));
        assert_eq!(participation.user_id, RecordId::new(3));
        assert!(!participation.confirmed);
    }

    #[test]
    fn negative_reference_is_a_decode_error() {
        let result = serde_json::from_value::<Participation>(serde_json::json!({ "EventoId": -1 }));
        assert!(result.is_err());
    }
}
