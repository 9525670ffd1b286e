//! Object database for git.
//!
//! Hands back objects as a `(type, size, stream)` triple through the
//! [`ObjectStore`] trait. [`ObjectDatabase`] searches the loose object
//! directory first and then any alternate object directories. Packfiles are
//! not read.

pub mod alternates;
mod loose;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use git_hash::ObjectId;
use git_object::ObjectType;

pub use error::OdbError;
pub use loose::{LooseObjectStore, LooseObjectStream};

mod error {
    use std::path::PathBuf;

    use git_hash::ObjectId;

    #[derive(Debug, thiserror::Error)]
    pub enum OdbError {
        #[error("object not found: {0}")]
        NotFound(ObjectId),

        #[error("corrupt object {oid}: {reason}")]
        Corrupt { oid: ObjectId, reason: String },

        #[error("decompression error for {oid}: {source}")]
        Decompress {
            oid: ObjectId,
            #[source]
            source: std::io::Error,
        },

        #[error("hash mismatch for {expected}: content hashes to {actual}")]
        HashMismatch { expected: ObjectId, actual: ObjectId },

        #[error("object content exceeds its declared size of {declared} bytes")]
        Oversized { declared: usize },

        #[error("alternates error: {0}")]
        Alternates(String),

        #[error("circular alternates chain detected at {0}")]
        CircularAlternates(PathBuf),

        #[error("object parse error: {0}")]
        Object(#[from] git_object::ObjectError),

        #[error("hash error: {0}")]
        Hash(#[from] git_hash::HashError),

        #[error(transparent)]
        Io(#[from] std::io::Error),
    }

    impl OdbError {
        /// Does this error mean the object simply is not there?
        pub fn is_not_found(&self) -> bool {
            matches!(self, Self::NotFound(_))
        }
    }
}

/// Upper bound on the buffer reserved up front from a declared size.
const MAX_PREALLOC: usize = 64 * 1024;

/// An object as retrieved from storage: type, declared size and a reader
/// over the content bytes (header already consumed).
pub struct RawObject<'a> {
    pub obj_type: ObjectType,
    pub size: usize,
    pub reader: Box<dyn Read + Send + 'a>,
}

impl<'a> RawObject<'a> {
    pub fn new(obj_type: ObjectType, size: usize, reader: impl Read + Send + 'a) -> Self {
        Self {
            obj_type,
            size,
            reader: Box::new(reader),
        }
    }

    /// Drain the content stream into memory.
    ///
    /// Fails with a truncation error if the stream ends before `size` bytes
    /// and with [`OdbError::Oversized`] if it runs past them. The declared
    /// size comes from untrusted headers, so it only bounds the read.
    pub fn into_bytes(self) -> Result<Vec<u8>, OdbError> {
        let limit = (self.size as u64).saturating_add(1);
        let mut data = Vec::with_capacity(self.size.min(MAX_PREALLOC));
        self.reader.take(limit).read_to_end(&mut data)?;
        if data.len() > self.size {
            return Err(OdbError::Oversized {
                declared: self.size,
            });
        }
        if data.len() < self.size {
            return Err(git_object::ObjectError::Truncated {
                expected: self.size,
                actual: data.len(),
            }
            .into());
        }
        Ok(data)
    }
}

impl std::fmt::Debug for RawObject<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawObject")
            .field("obj_type", &self.obj_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Anything that can hand back raw objects by id.
pub trait ObjectStore: Send + Sync {
    /// Retrieve an object; a missing object is [`OdbError::NotFound`].
    fn read_raw(&self, oid: &ObjectId) -> Result<RawObject<'_>, OdbError>;

    /// Check if an object exists.
    fn contains(&self, oid: &ObjectId) -> bool;
}

impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    fn read_raw(&self, oid: &ObjectId) -> Result<RawObject<'_>, OdbError> {
        (**self).read_raw(oid)
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        (**self).contains(oid)
    }
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn read_raw(&self, oid: &ObjectId) -> Result<RawObject<'_>, OdbError> {
        (**self).read_raw(oid)
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        (**self).contains(oid)
    }
}

/// Object database over a loose object directory and its alternates.
pub struct ObjectDatabase {
    loose: LooseObjectStore,
    alternates: Vec<ObjectDatabase>,
    objects_dir: PathBuf,
}

impl ObjectDatabase {
    /// Open the object database at the given objects directory.
    ///
    /// Alternates listed in `info/alternates` are loaded eagerly; a circular
    /// chain is an error, a missing alternate directory is skipped.
    pub fn open(objects_dir: impl AsRef<Path>) -> Result<Self, OdbError> {
        let objects_dir = objects_dir.as_ref().to_path_buf();
        let alternates = alternates::load_alternates(&objects_dir)?;
        Ok(Self::with_alternates(objects_dir, alternates))
    }

    pub(crate) fn with_alternates(objects_dir: PathBuf, alternates: Vec<ObjectDatabase>) -> Self {
        Self {
            loose: LooseObjectStore::open(&objects_dir),
            alternates,
            objects_dir,
        }
    }

    /// Verify the hash of every object read, here and in all alternates.
    pub fn set_verify(&mut self, verify: bool) {
        self.loose.set_verify(verify);
        for alt in &mut self.alternates {
            alt.set_verify(verify);
        }
    }

    /// Get the path to the objects directory.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Alternate databases consulted after the loose store, in file order.
    pub fn alternates(&self) -> &[ObjectDatabase] {
        &self.alternates
    }
}

impl ObjectStore for ObjectDatabase {
    fn read_raw(&self, oid: &ObjectId) -> Result<RawObject<'_>, OdbError> {
        match self.loose.read_raw(oid) {
            Err(e) if e.is_not_found() => {}
            other => return other,
        }
        for alt in &self.alternates {
            match alt.read_raw(oid) {
                Err(e) if e.is_not_found() => continue,
                other => return other,
            }
        }
        Err(OdbError::NotFound(*oid))
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        self.loose.contains(oid) || self.alternates.iter().any(|alt| alt.contains(oid))
    }
}
