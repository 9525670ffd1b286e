//! Locating the git directory of a repository.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::env::EnvOverrides;
use crate::HistoryError;

/// Find the git directory by walking up from `start`, honouring `GIT_DIR`
/// and `GIT_CEILING_DIRECTORIES`.
pub fn discover_git_dir(start: &Path) -> Result<PathBuf, HistoryError> {
    discover_git_dir_with_env(start, &EnvOverrides::from_env())
}

/// [`discover_git_dir`] with explicit overrides.
///
/// At each level, in order: a `.git` directory, a `.git` file holding
/// `gitdir: <path>`, then the directory itself when it is a bare
/// repository. A ceiling directory is never examined.
pub fn discover_git_dir_with_env(
    start: &Path,
    env: &EnvOverrides,
) -> Result<PathBuf, HistoryError> {
    if let Some(git_dir) = &env.git_dir {
        let git_dir = if git_dir.is_absolute() {
            git_dir.clone()
        } else {
            start.join(git_dir)
        };
        return open_git_dir(&git_dir);
    }

    let start = std::fs::canonicalize(start)
        .map_err(|_| HistoryError::RepoNotFound(start.to_path_buf()))?;
    let ceilings: Vec<PathBuf> = env
        .ceiling_directories
        .iter()
        .filter_map(|p| std::fs::canonicalize(p).ok())
        .collect();

    let mut current = start.as_path();
    loop {
        if ceilings.iter().any(|c| c == current) {
            break;
        }

        let dot_git = current.join(".git");
        if dot_git.is_dir() {
            debug!(path = %dot_git.display(), "found .git directory");
            return open_git_dir(&dot_git);
        }
        if dot_git.is_file() {
            let target = parse_gitdir_file(&dot_git)?;
            let target = if target.is_absolute() {
                target
            } else {
                current.join(target)
            };
            debug!(path = %target.display(), "following gitdir redirect");
            return open_git_dir(&target);
        }
        if is_git_dir(current) {
            debug!(path = %current.display(), "found bare repository");
            return Ok(current.to_path_buf());
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    Err(HistoryError::RepoNotFound(start))
}

/// Open a known git directory, checking that it looks like one.
pub fn open_git_dir(git_dir: &Path) -> Result<PathBuf, HistoryError> {
    let git_dir = std::fs::canonicalize(git_dir)
        .map_err(|_| HistoryError::RepoNotFound(git_dir.to_path_buf()))?;
    if !is_git_dir(&git_dir) {
        return Err(HistoryError::InvalidGitDir {
            path: git_dir,
            reason: "missing HEAD, objects/, or refs/".to_string(),
        });
    }
    Ok(git_dir)
}

/// Has `HEAD`, `objects/` and `refs/`.
pub fn is_git_dir(path: &Path) -> bool {
    path.join("HEAD").is_file() && path.join("objects").is_dir() && path.join("refs").is_dir()
}

/// Read the target of a `.git` file (`gitdir: <path>`).
pub fn parse_gitdir_file(path: &Path) -> Result<PathBuf, HistoryError> {
    let content = std::fs::read_to_string(path).map_err(|e| HistoryError::InvalidGitDir {
        path: path.to_path_buf(),
        reason: format!("cannot read .git file: {e}"),
    })?;
    let content = content.trim();
    content
        .strip_prefix("gitdir: ")
        .map(PathBuf::from)
        .ok_or_else(|| HistoryError::InvalidGitDir {
            path: path.to_path_buf(),
            reason: format!("expected 'gitdir: <path>', got: {content}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_git_dir(path: &Path) {
        std::fs::create_dir_all(path.join("objects")).unwrap();
        std::fs::create_dir_all(path.join("refs/heads")).unwrap();
        std::fs::write(path.join("HEAD"), "ref: refs/heads/main\n").unwrap();
    }

    #[test]
    fn finds_dot_git_from_subdirectory() {
        let tmp = tempfile::tempdir().unwrap();
        make_git_dir(&tmp.path().join(".git"));
        let sub = tmp.path().join("src/deep");
        std::fs::create_dir_all(&sub).unwrap();

        let found = discover_git_dir_with_env(&sub, &EnvOverrides::default()).unwrap();
        assert_eq!(found, tmp.path().join(".git").canonicalize().unwrap());
    }

    #[test]
    fn follows_gitdir_file() {
        let tmp = tempfile::tempdir().unwrap();
        make_git_dir(&tmp.path().join("real.git"));
        let work = tmp.path().join("work");
        std::fs::create_dir_all(&work).unwrap();
        std::fs::write(work.join(".git"), "gitdir: ../real.git\n").unwrap();

        let found = discover_git_dir_with_env(&work, &EnvOverrides::default()).unwrap();
        assert_eq!(found, tmp.path().join("real.git").canonicalize().unwrap());
    }

    #[test]
    fn bare_repository_is_its_own_git_dir() {
        let tmp = tempfile::tempdir().unwrap();
        make_git_dir(tmp.path());
        let found = discover_git_dir_with_env(tmp.path(), &EnvOverrides::default()).unwrap();
        assert_eq!(found, tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn ceiling_stops_search() {
        let tmp = tempfile::tempdir().unwrap();
        make_git_dir(&tmp.path().join(".git"));
        let sub = tmp.path().join("sub");
        std::fs::create_dir_all(&sub).unwrap();

        let env = EnvOverrides {
            ceiling_directories: vec![tmp.path().to_path_buf()],
            ..Default::default()
        };
        let err = discover_git_dir_with_env(&sub, &env).unwrap_err();
        assert!(matches!(err, HistoryError::RepoNotFound(_)));
    }

    #[test]
    fn git_dir_override_must_be_valid() {
        let tmp = tempfile::tempdir().unwrap();
        let env = EnvOverrides {
            git_dir: Some(tmp.path().to_path_buf()),
            ..Default::default()
        };
        let err = discover_git_dir_with_env(tmp.path(), &env).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidGitDir { .. }));
    }

    #[test]
    fn malformed_gitdir_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join(".git");
        std::fs::write(&file, "nonsense\n").unwrap();
        assert!(parse_gitdir_file(&file).is_err());
    }
}
