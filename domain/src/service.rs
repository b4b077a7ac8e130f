use tracing::info;

use crate::{
    CoreError, IdGenerator, NewRepository, Repository, RepositoryId, RepositoryPatch,
    RepositoryStore,
};

/// Application service for listing, creating, updating, deleting and liking
/// repository records.
///
/// Generic over the store and the id generator so tests can run against a
/// fresh in-memory store and a deterministic generator.
pub struct RepositoryService<S: RepositoryStore, G: IdGenerator> {
    store: S,
    ids: G,
}

impl<S: RepositoryStore, G: IdGenerator> RepositoryService<S, G> {
    pub fn new(store: S, ids: G) -> Self {
        Self { store, ids }
    }

    /// All records in insertion order.
    pub fn list(&self) -> Result<Vec<Repository>, CoreError> {
        self.store.list()
    }

    /// Create a record with a freshly minted id and zero likes.
    ///
    /// An id collision fails with `AlreadyExists` instead of overwriting.
    pub fn create(&self, input: NewRepository) -> Result<Repository, CoreError> {
        let repo = Repository::new(self.ids.next_id(), input);
        self.store.insert(repo.clone())?;
        info!(id = %repo.id, "repository created");
        Ok(repo)
    }

    /// Update url, title and/or techs, keeping position and likes. A patch
    /// that provides nothing returns the record unchanged without a write.
    pub fn update(
        &self,
        id: &RepositoryId,
        patch: &RepositoryPatch,
    ) -> Result<Repository, CoreError> {
        if patch.is_empty() {
            return self.store.get(id)?.ok_or(CoreError::NotFound);
        }
        let repo = self.store.update(id, patch)?;
        info!(id = %repo.id, "repository updated");
        Ok(repo)
    }

    pub fn delete(&self, id: &RepositoryId) -> Result<(), CoreError> {
        self.store.delete(id)?;
        info!(id = %id, "repository deleted");
        Ok(())
    }

    /// Increment the like counter by exactly one.
    pub fn like(&self, id: &RepositoryId) -> Result<Repository, CoreError> {
        let repo = self.store.like(id)?;
        info!(id = %repo.id, likes = repo.likes, "repository liked");
        Ok(repo)
    }
}
