use std::path::{Path, PathBuf};
use std::sync::Arc;

use git_hash::ObjectId;
use git_odb::{ObjectDatabase, ObjectStore};
use git_ref::{FilesRefStore, RefError, RefName};
use tracing::instrument;

use crate::discover;
use crate::env::EnvOverrides;
use crate::merge_list;
use crate::relevance::TreeDiffRelevance;
use crate::walk::{walk, PathFilter, Visitor};
use crate::{Commit, CommitStore, HistoryError, ITEMS_PER_PAGE, ITEMS_PER_SEARCH};

/// Tunables for an opened repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Re-hash every object read and fail on mismatch.
    pub verify_objects: bool,
    /// Decoded trees kept per path query.
    pub tree_cache_capacity: usize,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            verify_objects: false,
            tree_cache_capacity: 256,
        }
    }
}

/// History queries over one repository.
///
/// Owns the ref store and the commit cache; every returned commit is shared
/// with the cache. Safe to query from several threads at once.
pub struct Repository<S = ObjectDatabase> {
    git_dir: PathBuf,
    refs: FilesRefStore,
    commits: CommitStore<S>,
    options: RepositoryOptions,
}

impl<S> std::fmt::Debug for Repository<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("git_dir", &self.git_dir)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Repository<ObjectDatabase> {
    /// Open the repository at `path`, either its git dir or its work tree root.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        Self::open_with(path, RepositoryOptions::default())
    }

    pub fn open_with(
        path: impl AsRef<Path>,
        options: RepositoryOptions,
    ) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        let dot_git = path.join(".git");
        let git_dir = if discover::is_git_dir(path) {
            discover::open_git_dir(path)?
        } else if dot_git.is_dir() {
            discover::open_git_dir(&dot_git)?
        } else if dot_git.is_file() {
            let target = discover::parse_gitdir_file(&dot_git)?;
            discover::open_git_dir(&path.join(target))?
        } else {
            return Err(HistoryError::RepoNotFound(path.to_path_buf()));
        };
        Self::from_git_dir(git_dir, &EnvOverrides::from_env(), options)
    }

    /// Find the repository containing `start` by walking up.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let env = EnvOverrides::from_env();
        let git_dir = discover::discover_git_dir_with_env(start.as_ref(), &env)?;
        Self::from_git_dir(git_dir, &env, RepositoryOptions::default())
    }

    fn from_git_dir(
        git_dir: PathBuf,
        env: &EnvOverrides,
        options: RepositoryOptions,
    ) -> Result<Self, HistoryError> {
        let objects_dir = env
            .object_directory
            .clone()
            .unwrap_or_else(|| git_dir.join("objects"));
        let mut odb = ObjectDatabase::open(&objects_dir)?;
        odb.set_verify(options.verify_objects);
        Ok(Self::from_parts(git_dir, odb, options))
    }
}

impl<S: ObjectStore> Repository<S> {
    /// Assemble a repository from an object store of any kind; refs are read
    /// from `git_dir`.
    pub fn from_parts(git_dir: impl Into<PathBuf>, odb: S, options: RepositoryOptions) -> Self {
        let git_dir = git_dir.into();
        Self {
            refs: FilesRefStore::new(&git_dir),
            commits: CommitStore::new(odb),
            git_dir,
            options,
        }
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    pub fn refs(&self) -> &FilesRefStore {
        &self.refs
    }

    pub fn commit_store(&self) -> &CommitStore<S> {
        &self.commits
    }

    pub fn commit_id_of_branch(&self, branch: &str) -> Result<ObjectId, HistoryError> {
        Ok(self.refs.branch_oid(branch)?)
    }

    /// Tip commit of `refs/heads/<branch>`.
    pub fn commit_of_branch(&self, branch: &str) -> Result<Arc<Commit>, HistoryError> {
        let id = self.commit_id_of_branch(branch)?;
        self.commit_by_id(&id)
    }

    pub fn commit_id_of_tag(&self, tag: &str) -> Result<ObjectId, HistoryError> {
        Ok(self.refs.tag_oid(tag)?)
    }

    /// Commit named by `refs/tags/<tag>`.
    pub fn commit_of_tag(&self, tag: &str) -> Result<Arc<Commit>, HistoryError> {
        let id = self.commit_id_of_tag(tag)?;
        self.commit_by_id(&id)
    }

    pub fn commit_by_id(&self, id: &ObjectId) -> Result<Arc<Commit>, HistoryError> {
        self.commits.get(id)
    }

    /// Commit by its 40-character hex id.
    pub fn commit(&self, hex: &str) -> Result<Arc<Commit>, HistoryError> {
        self.commit_by_id(&parse_id(hex)?)
    }

    /// The `n`th parent of `commit`, if it has one.
    pub fn parent(&self, commit: &Commit, n: usize) -> Result<Option<Arc<Commit>>, HistoryError> {
        self.commits.parent(commit, n)
    }

    /// Resolve a full hex id, a branch, a tag or a full ref name, in that
    /// order.
    pub fn resolve_revision(&self, rev: &str) -> Result<ObjectId, HistoryError> {
        if ObjectId::is_valid_hex(rev) {
            return parse_id(rev);
        }
        for name in [RefName::branch(rev), RefName::tag(rev), RefName::new(rev)] {
            if let Some(id) = self.lookup_ref(name)? {
                return Ok(id);
            }
        }
        Err(HistoryError::UnknownRevision(rev.to_string()))
    }

    /// Number of commits reachable from `hex`, itself included.
    #[instrument(skip(self))]
    pub fn commits_count(&self, hex: &str) -> Result<usize, HistoryError> {
        let id = parse_id(hex)?;
        Ok(walk(&self.commits, &id, &mut Visitor::Counter, None)?.len())
    }

    /// Number of commits reachable from `branch` that changed `path`.
    #[instrument(skip(self))]
    pub fn file_commits_count(&self, branch: &str, path: &str) -> Result<usize, HistoryError> {
        let id = self.commit_id_of_branch(branch)?;
        let relevance = self.relevance();
        let filter = PathFilter::new(&relevance, path);
        Ok(walk(&self.commits, &id, &mut Visitor::Counter, Some(filter))?.len())
    }

    /// `last` and its first-parent ancestors, stopping before `before`.
    ///
    /// Empty when `last` is `before`. Fails with
    /// [`HistoryError::BeforeNotFound`] if the first-parent chain ends
    /// without meeting `before`.
    #[instrument(skip_all, fields(last = %last.id(), before = %before.id()))]
    pub fn commits_between(
        &self,
        last: &Commit,
        before: &Commit,
    ) -> Result<Vec<Arc<Commit>>, HistoryError> {
        let mut out = Vec::new();
        let mut current = self.commits.get(&last.id())?;
        while current.id() != before.id() {
            let parent = self.commits.parent(&current, 0)?;
            out.push(current);
            current = parent.ok_or(HistoryError::BeforeNotFound {
                last: last.id(),
                before: before.id(),
            })?;
        }
        Ok(out)
    }

    /// Everything reachable from `hex`, merged branches interleaved by time.
    #[instrument(skip(self))]
    pub fn commits_before(&self, hex: &str) -> Result<Vec<Arc<Commit>>, HistoryError> {
        let id = parse_id(hex)?;
        merge_list::commits_before(&self.commits, &id)
    }

    /// Up to [`ITEMS_PER_SEARCH`] commits reachable from `hex` whose message
    /// matches `keyword`, a case-insensitive regular expression.
    #[instrument(skip(self))]
    pub fn search_commits(
        &self,
        hex: &str,
        keyword: &str,
    ) -> Result<Vec<Arc<Commit>>, HistoryError> {
        let id = parse_id(hex)?;
        let mut visitor = Visitor::searcher(keyword, ITEMS_PER_SEARCH)?;
        walk(&self.commits, &id, &mut visitor, None)
    }

    /// Page `page` (1-based) of the history of `hex`.
    #[instrument(skip(self))]
    pub fn commits_by_range(&self, hex: &str, page: usize) -> Result<Vec<Arc<Commit>>, HistoryError> {
        let id = parse_id(hex)?;
        walk(&self.commits, &id, &mut page_visitor(page), None)
    }

    /// Page `page` (1-based) of the commits on `branch` that changed `path`.
    #[instrument(skip(self))]
    pub fn commits_by_file_and_range(
        &self,
        branch: &str,
        path: &str,
        page: usize,
    ) -> Result<Vec<Arc<Commit>>, HistoryError> {
        let id = self.commit_id_of_branch(branch)?;
        let relevance = self.relevance();
        let filter = PathFilter::new(&relevance, path);
        walk(&self.commits, &id, &mut page_visitor(page), Some(filter))
    }

    /// The most recent commit at or before `hex` that changed `path`.
    #[instrument(skip(self))]
    pub fn commit_of_rel_path(
        &self,
        hex: &str,
        path: &str,
    ) -> Result<Option<Arc<Commit>>, HistoryError> {
        let id = parse_id(hex)?;
        let relevance = self.relevance();
        let filter = PathFilter::new(&relevance, path);
        let found = walk(&self.commits, &id, &mut Visitor::pager(0, 1), Some(filter))?;
        Ok(found.into_iter().next())
    }

    fn relevance(&self) -> TreeDiffRelevance<'_, S> {
        TreeDiffRelevance::new(&self.commits, self.options.tree_cache_capacity)
    }

    fn lookup_ref(
        &self,
        name: Result<RefName, RefError>,
    ) -> Result<Option<ObjectId>, HistoryError> {
        let name = match name {
            Ok(name) => name,
            Err(RefError::InvalidName(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match self.refs.resolve_to_oid(&name) {
            Ok(id) => Ok(Some(id)),
            Err(RefError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_id(hex: &str) -> Result<ObjectId, HistoryError> {
    ObjectId::from_hex(hex).map_err(|source| HistoryError::InvalidId {
        id: hex.to_string(),
        source,
    })
}

fn page_visitor(page: usize) -> Visitor {
    Visitor::pager(page.saturating_sub(1) * ITEMS_PER_PAGE, ITEMS_PER_PAGE)
}
