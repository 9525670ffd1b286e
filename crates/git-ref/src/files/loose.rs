use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::RefError;
use crate::name::RefName;

/// Special refs living at the git directory root that listing reports.
const ROOT_REFS: &[&str] = &["HEAD", "ORIG_HEAD", "FETCH_HEAD", "MERGE_HEAD"];

/// Get the file system path for a loose ref.
pub(crate) fn loose_ref_path(git_dir: &Path, name: &RefName) -> PathBuf {
    git_dir.join(name.as_str())
}

/// Read the raw bytes of a loose ref file.
///
/// Returns `Ok(None)` when no such file exists (a directory of the same
/// name counts as absent); other I/O failures are reported with the path.
pub(crate) fn read_loose_ref(git_dir: &Path, name: &RefName) -> Result<Option<Vec<u8>>, RefError> {
    let path = loose_ref_path(git_dir, name);
    match fs::read(&path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(_) if path.is_dir() => Ok(None),
        Err(source) => Err(RefError::IoPath { path, source }),
    }
}

/// Enumerate loose refs whose names start with `prefix`.
///
/// Returns pairs of (RefName, file path) sorted by ref name. Files whose
/// relative path is not a valid ref name (lock files, editor droppings)
/// are ignored.
pub(crate) fn enumerate_loose_refs(
    git_dir: &Path,
    prefix: Option<&str>,
) -> Result<Vec<(RefName, PathBuf)>, RefError> {
    let mut result = Vec::new();
    collect_recursive(git_dir, &git_dir.join("refs"), prefix, &mut result)?;

    if prefix.map_or(true, str::is_empty) {
        for special in ROOT_REFS {
            let path = git_dir.join(special);
            if path.is_file() {
                if let Ok(name) = RefName::new(*special) {
                    result.push((name, path));
                }
            }
        }
    }

    result.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(result)
}

fn collect_recursive(
    git_dir: &Path,
    dir: &Path,
    prefix: Option<&str>,
    result: &mut Vec<(RefName, PathBuf)>,
) -> Result<(), RefError> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(RefError::IoPath {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    for entry in entries {
        let entry = entry.map_err(|source| RefError::IoPath {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_recursive(git_dir, &path, prefix, result)?;
            continue;
        }

        let Some(name_str) = path.strip_prefix(git_dir).ok().and_then(Path::to_str) else {
            continue;
        };
        // Ref names always use '/', whatever the platform separator.
        let name_str = name_str.replace(std::path::MAIN_SEPARATOR, "/");
        let Ok(name) = RefName::new(name_str) else {
            continue;
        };
        if prefix.map_or(true, |p| name.as_str().starts_with(p)) {
            result.push((name, path));
        }
    }

    Ok(())
}
