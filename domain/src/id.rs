//! Repository identifiers: generation and syntax validation.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

/// Length of the canonical hyphenated form, e.g. `ff521081-0c83-42ce-8bdc-2521549bbeca`.
const HYPHENATED_LEN: usize = 36;

/// Opaque unique identifier of a repository record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryId(Uuid);

impl RepositoryId {
    /// Parse the canonical lowercase 8-4-4-4-12 hexadecimal form of a
    /// version 4 or 5 identifier (or the nil id). Uppercase, braced, URN and
    /// simple forms are rejected, so one record has exactly one valid spelling.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidId(s.to_string());
        if s.len() != HYPHENATED_LEN {
            return Err(invalid());
        }
        let uuid = Uuid::try_parse(s).map_err(|_| invalid())?;
        if uuid.hyphenated().to_string() != s {
            return Err(invalid());
        }
        if !(uuid.is_nil() || matches!(uuid.get_version_num(), 4 | 5)) {
            return Err(invalid());
        }
        Ok(Self(uuid))
    }
}

impl From<Uuid> for RepositoryId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl Display for RepositoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Whether `s` is a well-formed identifier. Does not check existence.
pub fn is_valid_id(s: &str) -> bool {
    RepositoryId::parse(s).is_ok()
}

/// Identifier generator interface.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> RepositoryId;
}

/// Random (version 4) identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn next_id(&self) -> RepositoryId {
        RepositoryId(Uuid::new_v4())
    }
}
