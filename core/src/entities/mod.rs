//! The five resource types exposed by the API.
//!
//! Every entity is a plain serde record whose wire names follow the
//! PascalCase Portuguese keys clients already send (`CategoriaId`, `Nome`,
//! ...). The [`Entity`] trait is what lets the gateway and the HTTP handlers
//! treat all of them through one generic protocol.

pub mod category;
pub mod comment;
pub mod event;
pub mod participation;
pub mod user;

pub use category::Category;
pub use comment::Comment;
pub use event::Event;
pub use participation::Participation;
pub use user::User;

use crate::gateway::{Database, Repository};
use crate::id::RecordId;
use crate::validation::Validate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminates the resource types and owns their user-facing messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// [`Category`]
    Category,
    /// [`Event`]
    Event,
    /// [`Participation`]
    Participation,
    /// [`User`]
    User,
    /// [`Comment`]
    Comment,
}

impl EntityKind {
    /// Every kind, in route-table order.
    pub const ALL: [Self; 5] = [
        Self::Category,
        Self::Event,
        Self::Participation,
        Self::User,
        Self::Comment,
    ];

    /// Display name of the resource.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Category => "Categoria",
            Self::Event => "Evento",
            Self::Participation => "Participante",
            Self::User => "Usuário",
            Self::Comment => "Comentário",
        }
    }

    /// Path segment under `/api` that serves this resource.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Category => "categoria",
            Self::Event => "evento",
            Self::Participation => "participante",
            Self::User => "usuario",
            Self::Comment => "comentario",
        }
    }

    /// Message returned when a lookup by id finds nothing.
    #[must_use]
    pub const fn not_found_message(self) -> &'static str {
        match self {
            Self::Category => "Categoria não encontrada.",
            Self::Event => "Evento não encontrado.",
            Self::Participation => "Participante não encontrado.",
            Self::User => "Usuário não encontrado.",
            Self::Comment => "Comentário não encontrado.",
        }
    }

    /// Message returned when the id in a PUT path and the id in its body differ.
    #[must_use]
    pub const fn id_mismatch_message(self) -> &'static str {
        match self {
            Self::Category => "ID fornecido não coincide com o da categoria.",
            Self::Event => "ID fornecido não coincide com o do evento.",
            Self::Participation => "ID fornecido não corresponde ao ID do participante.",
            Self::User => "ID fornecido não coincide com o do usuário.",
            Self::Comment => "ID fornecido não coincide com o do comentário.",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record the gateway can store and the API can serve.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Validate + Send + Sync + 'static
{
    /// Which resource this is.
    const KIND: EntityKind;

    /// The record's primary key (`RecordId::UNASSIGNED` before it is stored).
    fn id(&self) -> RecordId;

    /// The same record carrying `id`.
    #[must_use]
    fn with_id(self, id: RecordId) -> Self;

    /// The repository holding records of this type.
    fn repository(db: &dyn Database) -> &dyn Repository<Self>;

    /// Business-uniqueness check against the records already stored.
    ///
    /// Returns the message to report when `self` collides with one of
    /// `existing`. Most resources have no such rule.
    fn conflict(&self, _existing: &[Self]) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_distinct() {
        let mut routes: Vec<_> = EntityKind::ALL.iter().map(|k| k.route()).collect();
        routes.sort_unstable();
        routes.dedup();
        assert_eq!(routes.len(), EntityKind::ALL.len());
    }

    #[test]
    fn display_uses_resource_name() {
        assert_eq!(EntityKind::Category.to_string(), "Categoria");
        assert_eq!(EntityKind::User.to_string(), "Usuário");
    }

    #[test]
    fn category_messages() {
        assert_eq!(
            EntityKind::Category.not_found_message(),
            "Categoria não encontrada."
        );
        assert_eq!(
            EntityKind::Participation.id_mismatch_message(),
            "ID fornecido não corresponde ao ID do participante."
        );
    }
}
