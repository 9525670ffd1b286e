//! Alternates file parsing and recursive loading.
//!
//! The file `objects/info/alternates` contains one path per line, pointing
//! to other object directories. Each alternate may have its own alternates
//! file, forming a chain. Circular chains are rejected.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{ObjectDatabase, OdbError};

/// Maximum depth for recursive alternates loading (matches C git).
const MAX_ALTERNATES_DEPTH: usize = 5;

/// Load alternates for the given objects directory.
pub fn load_alternates(objects_dir: &Path) -> Result<Vec<ObjectDatabase>, OdbError> {
    let mut visited = HashSet::new();
    visited.insert(canonical(objects_dir));
    load_recursive(objects_dir, &mut visited, 0)
}

fn load_recursive(
    objects_dir: &Path,
    visited: &mut HashSet<PathBuf>,
    depth: usize,
) -> Result<Vec<ObjectDatabase>, OdbError> {
    if depth >= MAX_ALTERNATES_DEPTH {
        return Err(OdbError::Alternates(format!(
            "alternates chain too deep (>{MAX_ALTERNATES_DEPTH} levels)"
        )));
    }

    let mut result = Vec::new();
    for alt_path in parse_alternates_file(objects_dir)? {
        if !alt_path.is_dir() {
            debug!(path = %alt_path.display(), "skipping missing alternate");
            continue;
        }
        if !visited.insert(canonical(&alt_path)) {
            return Err(OdbError::CircularAlternates(alt_path));
        }

        debug!(path = %alt_path.display(), depth, "loading alternate object directory");
        let nested = load_recursive(&alt_path, visited, depth + 1)?;
        result.push(ObjectDatabase::with_alternates(alt_path, nested));
    }
    Ok(result)
}

/// Read `info/alternates` under `objects_dir` and return the listed paths.
///
/// Blank lines and `#` comments are skipped; relative paths are resolved
/// against `objects_dir`. A missing file yields an empty list.
pub fn parse_alternates_file(objects_dir: &Path) -> Result<Vec<PathBuf>, OdbError> {
    let path = objects_dir.join("info").join("alternates");
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        OdbError::Alternates(format!("failed to read {}: {}", path.display(), e))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| {
            if Path::new(l).is_absolute() {
                PathBuf::from(l)
            } else {
                objects_dir.join(l)
            }
        })
        .collect())
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
