//! Depth-first ancestry walks driven by a [`Visitor`].

use std::collections::HashSet;
use std::sync::Arc;

use bstr::ByteSlice;
use git_hash::ObjectId;
use git_odb::ObjectStore;
use regex::Regex;
use tracing::trace;

use crate::relevance::PathRelevance;
use crate::{Commit, CommitStore, HistoryError};

/// What a visitor decided about one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Add to the result and keep walking.
    Keep,
    /// Leave out of the result but keep walking its ancestry.
    Skip,
    /// End the walk now; the current commit is not kept.
    Stop,
}

/// Per-commit decision strategy for [`walk`].
#[derive(Debug, Clone)]
pub enum Visitor {
    /// Keep every commit.
    Counter,
    /// Skip the first `skip` candidates, keep the next `take`, then stop.
    Pager { skip: usize, take: usize },
    /// Keep commits whose message matches `pattern`, at most `cap` of them.
    Searcher { pattern: Regex, cap: usize },
}

impl Visitor {
    pub fn pager(skip: usize, take: usize) -> Self {
        Self::Pager { skip, take }
    }

    /// Case-insensitive message search keeping at most `cap` matches.
    pub fn searcher(keyword: &str, cap: usize) -> Result<Self, HistoryError> {
        let pattern = regex::RegexBuilder::new(keyword)
            .case_insensitive(true)
            .build()
            .map_err(HistoryError::InvalidPattern)?;
        Ok(Self::Searcher { pattern, cap })
    }

    /// Decide about `commit`, updating the remaining quota.
    pub fn visit(&mut self, commit: &Commit) -> Visit {
        match self {
            Self::Counter => Visit::Keep,
            Self::Pager { skip, take } => {
                if *skip > 0 {
                    *skip -= 1;
                    Visit::Skip
                } else if *take > 0 {
                    *take -= 1;
                    Visit::Keep
                } else {
                    Visit::Stop
                }
            }
            Self::Searcher { pattern, cap } => {
                if *cap == 0 {
                    Visit::Stop
                } else if pattern.is_match(&commit.message().to_str_lossy()) {
                    *cap -= 1;
                    Visit::Keep
                } else {
                    Visit::Skip
                }
            }
        }
    }

    /// True once no further commit could be kept.
    pub fn is_done(&self) -> bool {
        match self {
            Self::Counter => false,
            Self::Pager { take, .. } => *take == 0,
            Self::Searcher { cap, .. } => *cap == 0,
        }
    }
}

/// Restricts a walk to commits that changed `path`.
#[derive(Clone, Copy)]
pub struct PathFilter<'a> {
    pub relevance: &'a dyn PathRelevance,
    pub path: &'a str,
}

impl<'a> PathFilter<'a> {
    pub fn new(relevance: &'a dyn PathRelevance, path: &'a str) -> Self {
        Self { relevance, path }
    }
}

/// Walk the ancestry of `start` depth first, parent 0 before parent 1.
///
/// Every reachable commit is visited at most once. With a `filter`, commits
/// that did not change the path are still traversed but never offered to
/// the visitor. Returns the kept commits in visitation order. The walk
/// ends as soon as the visitor is done, without reading further commits.
pub fn walk<S: ObjectStore>(
    store: &CommitStore<S>,
    start: &ObjectId,
    visitor: &mut Visitor,
    filter: Option<PathFilter<'_>>,
) -> Result<Vec<Arc<Commit>>, HistoryError> {
    let mut kept = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![*start];

    while let Some(id) = stack.pop() {
        if visitor.is_done() {
            break;
        }
        if !seen.insert(id) {
            continue;
        }

        let commit = store.get(&id)?;
        let relevant = match filter {
            Some(f) => f.relevance.changed_at(&commit, f.path)?,
            None => true,
        };

        if relevant {
            match visitor.visit(&commit) {
                Visit::Keep => kept.push(Arc::clone(&commit)),
                Visit::Skip => {}
                Visit::Stop => {
                    trace!(%id, "visitor stopped walk");
                    break;
                }
            }
        } else {
            trace!(%id, "path untouched, skipping");
        }

        stack.extend(
            commit
                .parent_ids()
                .iter()
                .rev()
                .filter(|p| !seen.contains(*p))
                .copied(),
        );
    }

    Ok(kept)
}
