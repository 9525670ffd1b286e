use bstr::{BStr, ByteSlice};
use git_hash::ObjectId;
use git_object::{ObjectError, Signature};

/// A decoded commit together with the id it was stored under.
///
/// Immutable once built; the commit store hands out `Arc<Commit>` so every
/// result list shares the same values. Parents are reached through
/// [`CommitStore::parent`](crate::CommitStore::parent) or
/// [`Repository::parent`](crate::Repository::parent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    id: ObjectId,
    inner: git_object::Commit,
}

impl Commit {
    /// Decode commit content (no object header) stored under `id`.
    pub fn decode(id: ObjectId, data: &[u8]) -> Result<Self, ObjectError> {
        Ok(Self {
            id,
            inner: git_object::Commit::parse(data)?,
        })
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Root tree of this commit.
    pub fn tree(&self) -> ObjectId {
        self.inner.tree
    }

    /// Parent ids in order; index 0 is the first parent.
    pub fn parent_ids(&self) -> &[ObjectId] {
        &self.inner.parents
    }

    pub fn parent_id(&self, n: usize) -> Option<ObjectId> {
        self.inner.parents.get(n).copied()
    }

    pub fn parent_count(&self) -> usize {
        self.inner.parents.len()
    }

    /// More than one parent.
    pub fn is_merge(&self) -> bool {
        self.inner.is_merge()
    }

    pub fn is_root(&self) -> bool {
        self.inner.is_root()
    }

    pub fn author(&self) -> &Signature {
        &self.inner.author
    }

    pub fn committer(&self) -> &Signature {
        &self.inner.committer
    }

    /// Committer timestamp in seconds since the epoch; the ordering key of
    /// merge lists.
    pub fn when(&self) -> i64 {
        self.inner.committer.date.timestamp
    }

    pub fn message(&self) -> &BStr {
        self.inner.message.as_bstr()
    }

    /// First line of the message.
    pub fn summary(&self) -> &BStr {
        self.inner.summary()
    }
}
