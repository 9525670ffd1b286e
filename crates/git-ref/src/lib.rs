//! Reference resolution for history queries.
//!
//! Resolves branch and tag names to commit ids through the files backend
//! (`FilesRefStore`): loose ref files under the git directory, falling back
//! to the `packed-refs` table, following symbolic refs up to a fixed depth.
//! Nothing here writes refs.

mod error;
pub mod files;
mod name;

pub use error::RefError;
pub use files::packed::{PackedRef, PackedRefs};
pub use files::{FilesRefStore, MAX_SYMREF_DEPTH};
pub use name::RefName;

use git_hash::ObjectId;

/// A git reference: either direct (points to an OID) or symbolic (points to another ref).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Direct { name: RefName, target: ObjectId },
    Symbolic { name: RefName, target: RefName },
}

impl Reference {
    pub fn name(&self) -> &RefName {
        match self {
            Reference::Direct { name, .. } | Reference::Symbolic { name, .. } => name,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Reference::Symbolic { .. })
    }

    /// Get the target OID if this is a direct ref.
    pub fn target_oid(&self) -> Option<ObjectId> {
        match self {
            Reference::Direct { target, .. } => Some(*target),
            Reference::Symbolic { .. } => None,
        }
    }

    /// Get the symbolic target if this is a symbolic ref.
    pub fn symbolic_target(&self) -> Option<&RefName> {
        match self {
            Reference::Symbolic { target, .. } => Some(target),
            Reference::Direct { .. } => None,
        }
    }
}
