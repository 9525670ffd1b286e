//! Commit history queries over a git repository.
//!
//! Branch and tag names resolve to commits through [`git_ref`]; commits are
//! decoded once and shared through a [`CommitStore`]. On top of that sit the
//! depth-first [`walk`] with its [`Visitor`] strategies, optionally limited to
//! commits that touched a path, and the chronological [`commits_before`]
//! builder. [`Repository`] ties it together.

mod commit;
pub mod discover;
mod env;
mod error;
pub mod merge_list;
pub mod relevance;
mod repository;
mod store;
pub mod walk;

pub use commit::Commit;
pub use env::EnvOverrides;
pub use error::{ErrorKind, HistoryError};
pub use merge_list::commits_before;
pub use relevance::{PathRelevance, TreeDiffRelevance};
pub use repository::{Repository, RepositoryOptions};
pub use store::CommitStore;
pub use walk::{walk, PathFilter, Visit, Visitor};

/// Commits per history page.
pub const ITEMS_PER_PAGE: usize = 50;

/// Most results a message search returns.
pub const ITEMS_PER_SEARCH: usize = 100;
