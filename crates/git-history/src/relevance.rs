//! Deciding whether a commit touched a path.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use bstr::BStr;
use git_hash::ObjectId;
use git_object::{FileMode, ObjectType, Tree};
use git_odb::ObjectStore;
use lru::LruCache;
use tracing::trace;

use crate::{Commit, CommitStore, HistoryError};

/// Reports whether `path` is a change point at `commit`.
pub trait PathRelevance {
    /// True when the state of `path` at `commit` differs from its state at
    /// every parent; for a root commit, true when the path exists.
    fn changed_at(&self, commit: &Commit, path: &str) -> Result<bool, HistoryError>;
}

/// What a tree records for a path: mode and object id.
type Entry = (FileMode, ObjectId);

/// [`PathRelevance`] by comparing tree entries.
///
/// The entry at `path` (mode and id, or absence) in the commit's tree is
/// compared with the entry in each parent's tree. Decoded trees are kept
/// in a bounded LRU cache, since consecutive commits share most subtrees.
pub struct TreeDiffRelevance<'a, S> {
    store: &'a CommitStore<S>,
    trees: Mutex<LruCache<ObjectId, Arc<Tree>>>,
}

impl<'a, S: ObjectStore> TreeDiffRelevance<'a, S> {
    pub fn new(store: &'a CommitStore<S>, tree_cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(tree_cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            trees: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// The entry for `path` below the tree `root`, or `None` if absent.
    ///
    /// An empty path names the root tree itself.
    pub fn entry_at(&self, root: ObjectId, path: &str) -> Result<Option<Entry>, HistoryError> {
        let mut current: Entry = (FileMode::Tree, root);
        for component in path.split('/').filter(|c| !c.is_empty()) {
            if !current.0.is_tree() {
                return Ok(None);
            }
            let tree = self.tree(current.1)?;
            match tree.find(BStr::new(component)) {
                Some(entry) => current = (entry.mode, entry.oid),
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn tree(&self, id: ObjectId) -> Result<Arc<Tree>, HistoryError> {
        if let Some(tree) = self.lock().get(&id) {
            return Ok(Arc::clone(tree));
        }

        let raw = self.store.odb().read_raw(&id)?;
        if raw.obj_type != ObjectType::Tree {
            return Err(HistoryError::NotATree(id, raw.obj_type));
        }
        let tree = Arc::new(Tree::parse(&raw.into_bytes()?)?);
        self.lock().put(id, Arc::clone(&tree));
        Ok(tree)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<ObjectId, Arc<Tree>>> {
        self.trees.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: ObjectStore> PathRelevance for TreeDiffRelevance<'_, S> {
    fn changed_at(&self, commit: &Commit, path: &str) -> Result<bool, HistoryError> {
        let here = self.entry_at(commit.tree(), path)?;
        if commit.is_root() {
            return Ok(here.is_some());
        }

        for n in 0..commit.parent_count() {
            let Some(parent) = self.store.parent(commit, n)? else {
                continue;
            };
            if self.entry_at(parent.tree(), path)? == here {
                trace!(id = %commit.id(), parent = %parent.id(), path, "path same as parent");
                return Ok(false);
            }
        }
        Ok(true)
    }
}
