//! Field-level validation of incoming records.
//!
//! Validation runs before any persistence call and is purely structural: it
//! looks at one record and nothing else. Failures are collected per field so a
//! client sees every broken rule at once.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Validation failures keyed by the wire name of the offending field.
///
/// Serializes as a JSON object mapping each field to its list of messages:
///
/// ```json
/// { "Nome": ["O nome da categoria deve ter pelo menos 3 caracteres."] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    /// Create an empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a failure for `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Messages recorded for `field`, if any.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Iterate over `(field, messages)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.0.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }

    /// Returns true if no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of recorded messages across all fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the error set itself when it holds at least one failure.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Structural validation of a record.
///
/// Records without rules keep the default implementation, which accepts
/// everything.
pub trait Validate {
    /// Check the record against its field rules.
    ///
    /// # Errors
    ///
    /// Returns every failed rule, keyed by field.
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}
