//! Event categories.

use super::{Entity, EntityKind};
use crate::gateway::{Database, Repository};
use crate::id::RecordId;
use crate::validation::{Validate, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Wire name of the category name field.
pub const NAME_FIELD: &str = "Nome";

/// Shortest accepted category name, in characters.
pub const NAME_MIN_LEN: usize = 3;

/// Longest accepted category name, in characters.
pub const NAME_MAX_LEN: usize = 50;

const NAME_REQUIRED: &str = "O nome da categoria é obrigatório.";
const NAME_TOO_LONG: &str = "O nome da categoria não pode exceder 50 caracteres.";
const NAME_TOO_SHORT: &str = "O nome da categoria deve ter pelo menos 3 caracteres.";
const NAME_NOT_LETTERS: &str = "O nome da categoria deve conter apenas letras.";
const NAME_TAKEN: &str = "Categoria com este nome já existe.";

/// A category grouping events.
///
/// ```json
/// { "CategoriaId": 1, "Nome": "Tecnologia" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Primary key.
    #[serde(rename = "CategoriaId", default)]
    pub id: RecordId,

    /// Category name, unique across categories.
    #[serde(rename = "Nome", default)]
    pub name: Option<String>,
}

impl Category {
    /// A new, unsaved category.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::UNASSIGNED,
            name: Some(name.into()),
        }
    }
}

/// Letters (including accented Latin `à-ú` / `À-Ú`) and whitespace.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || ('à'..='ú').contains(&c)
        || ('À'..='Ú').contains(&c)
        || c.is_whitespace()
}

impl Validate for Category {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        // Length rules apply to any present name, blank or not.
        match self.name.as_deref() {
            None => errors.add(NAME_FIELD, NAME_REQUIRED),
            Some(name) => {
                if name.trim().is_empty() {
                    errors.add(NAME_FIELD, NAME_REQUIRED);
                }
                let len = name.chars().count();
                if len > NAME_MAX_LEN {
                    errors.add(NAME_FIELD, NAME_TOO_LONG);
                }
                if len < NAME_MIN_LEN {
                    errors.add(NAME_FIELD, NAME_TOO_SHORT);
                }
                if !name.chars().all(is_name_char) {
                    errors.add(NAME_FIELD, NAME_NOT_LETTERS);
                }
            }
        }

        errors.into_result()
    }
}

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> RecordId {
        self.id
    }

    fn with_id(self, id: RecordId) -> Self {
        Self { id, ..self }
    }

    fn repository(db: &dyn Database) -> &dyn Repository<Self> {
        db.categories()
    }

    fn conflict(&self, existing: &[Self]) -> Option<&'static str> {
        let name = self.name.as_deref()?;
        existing
            .iter()
            .any(|other| other.name.as_deref() == Some(name))
            .then_some(NAME_TAKEN)
    }
}
