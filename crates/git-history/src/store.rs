use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use git_hash::ObjectId;
use git_object::ObjectType;
use git_odb::ObjectStore;
use tracing::debug;

use crate::{Commit, HistoryError};

/// Memoizing commit cache over an object store.
///
/// Each id is fetched and decoded at most once per store. Hits share a read
/// lock; a miss takes the write lock, checks again and loads while holding
/// it, so concurrent callers missing on the same id wait for one load and
/// all observe the same `Arc<Commit>`. Entries are never evicted or
/// invalidated.
pub struct CommitStore<S> {
    odb: S,
    cache: RwLock<HashMap<ObjectId, Arc<Commit>>>,
}

impl<S: ObjectStore> CommitStore<S> {
    pub fn new(odb: S) -> Self {
        Self {
            odb,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying object store.
    pub fn odb(&self) -> &S {
        &self.odb
    }

    /// Fetch a commit, decoding it on first use.
    pub fn get(&self, id: &ObjectId) -> Result<Arc<Commit>, HistoryError> {
        if let Some(commit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return Ok(Arc::clone(commit));
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(commit) = cache.get(id) {
            return Ok(Arc::clone(commit));
        }

        debug!(%id, "commit cache miss");
        let commit = Arc::new(self.load(id)?);
        cache.insert(*id, Arc::clone(&commit));
        Ok(commit)
    }

    /// The `n`th parent of `commit`, or `None` when it has fewer parents.
    pub fn parent(&self, commit: &Commit, n: usize) -> Result<Option<Arc<Commit>>, HistoryError> {
        commit.parent_id(n).map(|id| self.get(&id)).transpose()
    }

    /// Number of cached commits.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(&self, id: &ObjectId) -> Result<Commit, HistoryError> {
        let raw = self.odb.read_raw(id)?;
        if raw.obj_type != ObjectType::Commit {
            return Err(HistoryError::NotACommit(*id, raw.obj_type));
        }
        let data = raw.into_bytes()?;
        Ok(Commit::decode(*id, &data)?)
    }
}
