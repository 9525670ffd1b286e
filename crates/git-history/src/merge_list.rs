//! Chronological lists of everything reachable from a commit.
//!
//! Every merge opens a new insertion anchor: commits found below it are
//! placed after the merge by committer time, so the branches that met
//! at the merge are interleaved instead of listed one after the other.

use std::sync::Arc;

use git_hash::ObjectId;
use git_odb::ObjectStore;
use tracing::{debug, trace};

use crate::{Commit, CommitStore, HistoryError};

struct Node {
    commit: Arc<Commit>,
    next: Option<usize>,
}

/// Singly linked list stored in a vector; links are indices.
#[derive(Default)]
struct MergeList {
    nodes: Vec<Node>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl MergeList {
    fn push_back(&mut self, commit: Arc<Commit>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node { commit, next: None });
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        idx
    }

    fn insert_after(&mut self, at: usize, commit: Arc<Commit>) -> usize {
        let idx = self.nodes.len();
        let next = self.nodes[at].next;
        self.nodes.push(Node { commit, next });
        self.nodes[at].next = Some(idx);
        if self.tail == Some(at) {
            self.tail = Some(idx);
        }
        idx
    }

    /// Where `commit` belongs when scanning forward from `anchor`, or `None`
    /// if the scan meets `commit` itself.
    fn position(&self, anchor: usize, commit: &Commit) -> Option<usize> {
        let when = commit.when();
        let mut cur = anchor;
        loop {
            let here = &self.nodes[cur].commit;
            if here.id() == commit.id() {
                return None;
            }
            let Some(next) = self.nodes[cur].next else {
                return Some(cur);
            };
            if here.when() == when {
                return Some(cur);
            }
            if here.when() > when && self.nodes[next].commit.when() < when {
                return Some(cur);
            }
            cur = next;
        }
    }

    fn into_vec(self) -> Vec<Arc<Commit>> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut cur = self.head;
        while let Some(idx) = cur {
            cur = self.nodes[idx].next;
            out.push(Arc::clone(&self.nodes[idx].commit));
        }
        out
    }
}

/// All commits reachable from `start`, newest first along each line of
/// history, with merged branches interleaved by committer time.
///
/// `start` is always first. A commit reached again through another path
/// from the same merge is not repeated. Single-threaded per call; on error
/// the partial list is discarded.
pub fn commits_before<S: ObjectStore>(
    store: &CommitStore<S>,
    start: &ObjectId,
) -> Result<Vec<Arc<Commit>>, HistoryError> {
    let mut list = MergeList::default();
    // (commit to place, anchor to scan from)
    let mut work: Vec<(ObjectId, Option<usize>)> = vec![(*start, None)];

    while let Some((id, anchor)) = work.pop() {
        let commit = store.get(&id)?;

        let placed = match anchor {
            None => list.push_back(Arc::clone(&commit)),
            Some(anchor) => match list.position(anchor, &commit) {
                Some(at) => list.insert_after(at, Arc::clone(&commit)),
                None => {
                    trace!(%id, "already listed");
                    continue;
                }
            },
        };

        let child_anchor = if commit.is_merge() { Some(placed) } else { anchor };
        work.extend(commit.parent_ids().iter().rev().map(|p| (*p, child_anchor)));
    }

    let commits = list.into_vec();
    debug!(start = %start, count = commits.len(), "built merge list");
    Ok(commits)
}
