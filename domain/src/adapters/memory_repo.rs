use std::sync::{Mutex, MutexGuard};

use crate::{CoreError, Repository, RepositoryId, RepositoryPatch, RepositoryStore};

/// Process-local store keeping records in insertion order. Every operation
/// holds the internal mutex for its whole duration; lookups are linear scans.
pub struct InMemoryRepo {
    inner: Mutex<Vec<Repository>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    /// Start with a pre-loaded collection, e.g. demo data. Records go through
    /// `insert`, so a duplicate id fails with `AlreadyExists`.
    pub fn with_records(records: Vec<Repository>) -> Result<Self, CoreError> {
        let repo = Self::new();
        for record in records {
            repo.insert(record)?;
        }
        Ok(repo)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Repository>>, CoreError> {
        self.inner
            .lock()
            .map_err(|_| CoreError::Store("mutex poisoned".into()))
    }

    fn position(repos: &[Repository], id: &RepositoryId) -> Result<usize, CoreError> {
        repos
            .iter()
            .position(|r| r.id == *id)
            .ok_or(CoreError::NotFound)
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryStore for InMemoryRepo {
    fn list(&self) -> Result<Vec<Repository>, CoreError> {
        Ok(self.lock()?.clone())
    }

    fn insert(&self, repo: Repository) -> Result<(), CoreError> {
        let mut repos = self.lock()?;
        if repos.iter().any(|r| r.id == repo.id) {
            return Err(CoreError::AlreadyExists);
        }
        repos.push(repo);
        Ok(())
    }

    fn get(&self, id: &RepositoryId) -> Result<Option<Repository>, CoreError> {
        Ok(self.lock()?.iter().find(|r| r.id == *id).cloned())
    }

    fn update(
        &self,
        id: &RepositoryId,
        patch: &RepositoryPatch,
    ) -> Result<Repository, CoreError> {
        let mut repos = self.lock()?;
        let idx = Self::position(&repos, id)?;
        let updated = patch.apply(&repos[idx]);
        repos[idx] = updated.clone();
        Ok(updated)
    }

    fn like(&self, id: &RepositoryId) -> Result<Repository, CoreError> {
        let mut repos = self.lock()?;
        let idx = Self::position(&repos, id)?;
        let repo = &mut repos[idx];
        repo.likes = repo.likes.saturating_add(1);
        Ok(repo.clone())
    }

    fn delete(&self, id: &RepositoryId) -> Result<(), CoreError> {
        let mut repos = self.lock()?;
        let idx = Self::position(&repos, id)?;
        repos.remove(idx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdGenerator, NewRepository, UuidV4Generator};
    use std::sync::Arc;
    use std::thread;

    fn record(title: &str) -> Repository {
        Repository::new(
            UuidV4Generator.next_id(),
            NewRepository {
                url: format!("https://github.com/acme/{}", title.to_lowercase()),
                title: title.to_string(),
                techs: vec!["Rust".into()],
            },
        )
    }

    fn titles(repo: &InMemoryRepo) -> Vec<String> {
        repo.list().unwrap().into_iter().map(|r| r.title).collect()
    }

    #[test]
    fn insert_and_list_preserve_order() {
        let repo = InMemoryRepo::new();
        for t in ["A", "B", "C"] {
            repo.insert(record(t)).unwrap();
        }
        assert_eq!(titles(&repo), ["A", "B", "C"]);
    }

    #[test]
    fn insert_rejects_duplicate_id_without_overwriting() {
        let repo = InMemoryRepo::new();
        let first = record("A");
        repo.insert(first.clone()).unwrap();

        let mut clash = record("B");
        clash.id = first.id;
        let err = repo.insert(clash).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyExists));
        assert_eq!(repo.get(&first.id).unwrap(), Some(first));
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn with_records_keeps_order() {
        let repo = InMemoryRepo::with_records(vec![record("A"), record("B")]).unwrap();
        assert_eq!(titles(&repo), ["A", "B"]);
    }

    #[test]
    fn with_records_rejects_duplicate_ids() {
        let first = record("A");
        let mut clash = record("B");
        clash.id = first.id;
        let res = InMemoryRepo::with_records(vec![first, clash]);
        assert!(matches!(res, Err(CoreError::AlreadyExists)));
    }

    #[test]
    fn update_keeps_position_and_likes() {
        let repo = InMemoryRepo::new();
        let (a, b, c) = (record("A"), record("B"), record("C"));
        for r in [&a, &b, &c] {
            repo.insert(r.clone()).unwrap();
        }
        repo.like(&b.id).unwrap();

        let patch = RepositoryPatch {
            title: Some("B2".into()),
            ..Default::default()
        };
        let updated = repo.update(&b.id, &patch).unwrap();
        assert_eq!(updated.title, "B2");
        assert_eq!(updated.likes, 1);
        assert_eq!(titles(&repo), ["A", "B2", "C"]);
    }

    #[test]
    fn delete_closes_the_gap() {
        let repo = InMemoryRepo::new();
        let (a, b, c) = (record("A"), record("B"), record("C"));
        for r in [&a, &b, &c] {
            repo.insert(r.clone()).unwrap();
        }
        repo.delete(&b.id).unwrap();
        assert_eq!(titles(&repo), ["A", "C"]);
        assert_eq!(repo.get(&b.id).unwrap(), None);
    }

    #[test]
    fn missing_id_is_not_found() {
        let repo = InMemoryRepo::new();
        let id = UuidV4Generator.next_id();
        assert!(matches!(repo.like(&id), Err(CoreError::NotFound)));
        assert!(matches!(repo.delete(&id), Err(CoreError::NotFound)));
        assert!(matches!(
            repo.update(&id, &RepositoryPatch::default()),
            Err(CoreError::NotFound)
        ));
    }

    #[test]
    fn concurrent_likes_are_not_lost() {
        let repo = Arc::new(InMemoryRepo::new());
        let target = record("A");
        let other = record("B");
        repo.insert(target.clone()).unwrap();
        repo.insert(other.clone()).unwrap();

        let id = target.id;
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    for _ in 0..50 {
                        repo.like(&id).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(repo.get(&target.id).unwrap().unwrap().likes, 400);
        assert_eq!(repo.get(&other.id).unwrap().unwrap().likes, 0);
    }
}
