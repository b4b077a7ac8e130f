//! Domain library for the repository likes service.
//!
//! Holds the record types, the identifier service, the store port (trait),
//! and error definitions. Keep HTTP and other IO concerns out of this crate.

use thiserror::Error;

pub use id::{is_valid_id, IdGenerator, RepositoryId, UuidV4Generator};

/// A described code repository with a like counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    pub id: RepositoryId,
    pub url: String,
    pub title: String,
    /// Technology tags, in the order the client supplied them.
    pub techs: Vec<String>,
    /// Only ever incremented by the like operation.
    pub likes: u64,
}

impl Repository {
    /// Create a new record with a zero like counter.
    pub fn new(id: RepositoryId, input: NewRepository) -> Self {
        Self {
            id,
            url: input.url,
            title: input.title,
            techs: input.techs,
            likes: 0,
        }
    }
}

/// Input data for creating a new repository record. Empty values are allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewRepository {
    pub url: String,
    pub title: String,
    pub techs: Vec<String>,
}

/// Partial update of a repository record.
///
/// A field that is `None` keeps its current value. An empty `url` or `title`
/// is treated as not provided, so neither can be cleared through an update.
/// `techs` is replaced wholesale whenever a list is provided, including an
/// empty one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepositoryPatch {
    pub url: Option<String>,
    pub title: Option<String>,
    pub techs: Option<Vec<String>>,
}

impl RepositoryPatch {
    /// Build the updated record. `id` and `likes` are carried over untouched.
    pub fn apply(&self, current: &Repository) -> Repository {
        Repository {
            id: current.id,
            url: non_empty(&self.url).unwrap_or(&current.url).to_string(),
            title: non_empty(&self.title).unwrap_or(&current.title).to_string(),
            techs: self.techs.as_ref().unwrap_or(&current.techs).clone(),
            likes: current.likes,
        }
    }

    pub fn is_empty(&self) -> bool {
        non_empty(&self.url).is_none() && non_empty(&self.title).is_none() && self.techs.is_none()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Store port for repository records.
///
/// Implementations must serialize every call: each method is one critical
/// section over the whole collection.
pub trait RepositoryStore: Send + Sync {
    /// All records in insertion order.
    fn list(&self) -> Result<Vec<Repository>, CoreError>;
    /// Append a record. Fails with `AlreadyExists` if the id is taken.
    fn insert(&self, repo: Repository) -> Result<(), CoreError>;
    fn get(&self, id: &RepositoryId) -> Result<Option<Repository>, CoreError>;
    /// Apply a patch in place, keeping the record's position.
    fn update(&self, id: &RepositoryId, patch: &RepositoryPatch)
        -> Result<Repository, CoreError>;
    /// Atomically increment the like counter by one.
    fn like(&self, id: &RepositoryId) -> Result<Repository, CoreError>;
    /// Remove a record, closing the gap it leaves.
    fn delete(&self, id: &RepositoryId) -> Result<(), CoreError>;
}

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid repository id: {0}")]
    InvalidId(String),
    #[error("repository not found")]
    NotFound,
    #[error("repository id already exists")]
    AlreadyExists,
    #[error("store error: {0}")]
    Store(String),
}

pub mod adapters;
pub mod id;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Repository {
        Repository {
            id: RepositoryId::parse("ff521081-0c83-42ce-8bdc-2521549bbeca").expect("valid id"),
            url: "https://github.com/acme/widget".into(),
            title: "Widget".into(),
            techs: vec!["Rust".into(), "Axum".into()],
            likes: 7,
        }
    }

    #[test]
    fn new_record_starts_with_zero_likes() {
        let repo = Repository::new(
            UuidV4Generator.next_id(),
            NewRepository {
                url: "u".into(),
                title: "t".into(),
                techs: vec!["a".into()],
            },
        );
        assert_eq!(repo.likes, 0);
        assert_eq!(repo.techs, vec!["a".to_string()]);
    }

    #[test]
    fn patch_replaces_only_provided_fields() {
        let current = sample();
        let patch = RepositoryPatch {
            title: Some("X".into()),
            ..Default::default()
        };
        let updated = patch.apply(&current);
        assert_eq!(updated.title, "X");
        assert_eq!(updated.url, current.url);
        assert_eq!(updated.techs, current.techs);
        assert_eq!(updated.likes, 7);
        assert_eq!(updated.id, current.id);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let current = sample();
        let patch = RepositoryPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(&current), current);
    }

    #[test]
    fn empty_strings_fall_back_to_current_values() {
        let current = sample();
        let patch = RepositoryPatch {
            url: Some(String::new()),
            title: Some(String::new()),
            techs: None,
        };
        assert!(patch.is_empty());
        assert_eq!(patch.apply(&current), current);
    }

    #[test]
    fn provided_techs_replace_wholesale() {
        let current = sample();
        let patch = RepositoryPatch {
            techs: Some(vec!["Go".into()]),
            ..Default::default()
        };
        assert_eq!(patch.apply(&current).techs, vec!["Go".to_string()]);

        let clear = RepositoryPatch {
            techs: Some(Vec::new()),
            ..Default::default()
        };
        assert!(clear.apply(&current).techs.is_empty());
    }
}
