//! Record identifiers and row versions.
//!
//! `RecordId` is the primary key of every stored entity and `Version` is the
//! per-row concurrency token the persistence gateway uses to detect writes
//! that happened between a read and a commit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for `RecordId` parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseRecordIdError {
    /// The text is not an integer at all.
    #[error("Invalid record ID: {0}")]
    Malformed(String),

    /// An integer no store could have handed out (negative or above `u32::MAX`).
    #[error("Record ID out of range: {0}")]
    OutOfRange(String),
}

/// Primary key of a stored record.
///
/// Identifiers are non-negative integers assigned by the store when a record
/// is first saved. `RecordId::UNASSIGNED` (0) marks a record that has not been
/// stored yet; the store never hands it out.
///
/// On the wire a `RecordId` is a plain JSON number, so a negative or
/// fractional value is rejected while the body is decoded.
///
/// # Examples
///
/// ```
/// use eventhub_core::id::RecordId;
///
/// let id = RecordId::new(7);
/// assert_eq!(id.value(), 7);
/// assert!(id.is_assigned());
/// assert!(!RecordId::UNASSIGNED.is_assigned());
/// ```
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(u32);

impl RecordId {
    /// Placeholder id carried by records that were never stored.
    pub const UNASSIGNED: Self = Self(0);

    /// Create a `RecordId` from its numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns true if the id was handed out by a store.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// The id following this one, or `None` once the id space is exhausted.
    ///
    /// # Examples
    ///
    /// ```
    /// use eventhub_core::id::RecordId;
    ///
    /// assert_eq!(RecordId::UNASSIGNED.next(), Some(RecordId::new(1)));
    /// assert_eq!(RecordId::new(u32::MAX).next(), None);
    /// ```
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RecordId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<RecordId> for u32 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl FromStr for RecordId {
    type Err = ParseRecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseRecordIdError::Malformed(s.to_string()))?;
        u32::try_from(value)
            .map(Self)
            .map_err(|_| ParseRecordIdError::OutOfRange(s.to_string()))
    }
}

/// Row version used for optimistic concurrency control.
///
/// A row is stored at `Version::INITIAL` and every committed update moves it
/// to `next()`. A writer that read version `n` and commits against a row that
/// is no longer at `n` gets a concurrency conflict instead of overwriting the
/// other writer's change.
///
/// # Examples
///
/// ```
/// use eventhub_core::id::Version;
///
/// let v0 = Version::INITIAL;
/// assert_eq!(v0.next(), Version::new(1));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(u64);

impl Version {
    /// The version of a freshly inserted row.
    pub const INITIAL: Self = Self(0);

    /// Create a new `Version` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the version number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Get the next version (current + 1).
    ///
    /// Saturates at `u64::MAX`; a row would need that many updates first.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
