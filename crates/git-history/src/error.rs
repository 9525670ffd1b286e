use std::path::PathBuf;

use git_hash::{HashError, ObjectId};
use git_object::{ObjectError, ObjectType};
use git_odb::OdbError;
use git_ref::RefError;

/// Errors produced by history queries.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("invalid commit id '{id}': {source}")]
    InvalidId {
        id: String,
        #[source]
        source: HashError,
    },

    #[error("object {0} is a {1}, not a commit")]
    NotACommit(ObjectId, ObjectType),

    #[error("object {0} is a {1}, not a tree")]
    NotATree(ObjectId, ObjectType),

    #[error("{before} is not on the first-parent chain of {last}")]
    BeforeNotFound { last: ObjectId, before: ObjectId },

    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[source] regex::Error),

    #[error("unknown revision '{0}': not a commit id, branch or tag")]
    UnknownRevision(String),

    #[error("not a git repository (or any of the parent directories): {0}")]
    RepoNotFound(PathBuf),

    #[error("invalid git directory: {path}: {reason}")]
    InvalidGitDir { path: PathBuf, reason: String },

    #[error(transparent)]
    Odb(#[from] OdbError),

    #[error(transparent)]
    Ref(#[from] RefError),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse failure class, for callers mapping errors onto responses
/// (404 / 400 / 5xx and the like).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A ref, object, repository or match is absent.
    NotFound,
    /// Bad identifier text, corrupt object bytes, bad ref content.
    MalformedInput,
    /// Storage access failed.
    Io,
}

impl HistoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BeforeNotFound { .. } | Self::UnknownRevision(_) | Self::RepoNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InvalidId { .. }
            | Self::NotACommit(..)
            | Self::NotATree(..)
            | Self::InvalidPattern(_)
            | Self::InvalidGitDir { .. }
            | Self::Object(_) => ErrorKind::MalformedInput,
            Self::Io(_) => ErrorKind::Io,
            Self::Odb(e) => match e {
                OdbError::NotFound(_) => ErrorKind::NotFound,
                OdbError::Io(_) | OdbError::Alternates(_) => ErrorKind::Io,
                OdbError::Corrupt { .. }
                | OdbError::Oversized { .. }
                | OdbError::Decompress { .. }
                | OdbError::HashMismatch { .. }
                | OdbError::CircularAlternates(_)
                | OdbError::Object(_)
                | OdbError::Hash(_) => ErrorKind::MalformedInput,
            },
            Self::Ref(e) => match e {
                RefError::NotFound(_) => ErrorKind::NotFound,
                RefError::IoPath { .. } => ErrorKind::Io,
                RefError::InvalidName(_)
                | RefError::SymrefLoop(_)
                | RefError::Parse(_)
                | RefError::Hash(_) => ErrorKind::MalformedInput,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
