use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use git_hash::ObjectId;

use crate::error::RefError;
use crate::name::RefName;

/// A single entry in the packed-refs file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedRef {
    pub name: RefName,
    pub oid: ObjectId,
}

/// Parsed packed-refs file.
///
/// ```text
/// # pack-refs with: peeled fully-peeled sorted
/// <hex-oid> <refname>
/// ^<hex-oid>   (peeled value of annotated tag above)
/// ```
///
/// Peeled lines are skipped; tags resolve to the tag object itself.
#[derive(Debug, Clone, Default)]
pub struct PackedRefs {
    refs: Vec<PackedRef>,
}

impl PackedRefs {
    /// Parse a packed-refs file.
    pub fn parse(data: &[u8]) -> Result<Self, RefError> {
        let mut refs: Vec<PackedRef> = Vec::new();

        for line in data.lines() {
            if line.is_empty() || line.starts_with(b"#") || line.starts_with(b"^") {
                continue;
            }

            let space_pos = line
                .find_byte(b' ')
                .ok_or_else(|| RefError::Parse("invalid packed-refs line".into()))?;
            let oid = ObjectId::from_hex(&line[..space_pos].to_str_lossy())?;
            let name = RefName::new(line[space_pos + 1..].trim())?;

            refs.push(PackedRef { name, oid });
        }

        refs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { refs })
    }

    /// Load packed-refs from disk. Returns empty if the file doesn't exist.
    pub fn load(git_dir: &Path) -> Result<Self, RefError> {
        match read_packed_refs(git_dir)? {
            Some(data) => Self::parse(&data),
            None => Ok(Self::default()),
        }
    }

    /// All refs, sorted by name.
    pub fn refs(&self) -> &[PackedRef] {
        &self.refs
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Return the raw bytes of the first packed-refs line mentioning `ref_path`.
///
/// Matching is by substring, the same lookup the resolver has always done;
/// header (`#`) and peeled (`^`) lines never match. `Ok(None)` when the
/// file is absent or no line matches.
pub(crate) fn find_line(git_dir: &Path, ref_path: &str) -> Result<Option<Vec<u8>>, RefError> {
    let Some(data) = read_packed_refs(git_dir)? else {
        return Ok(None);
    };
    Ok(data
        .lines()
        .filter(|line| !line.starts_with(b"#") && !line.starts_with(b"^"))
        .find(|line| line.find(ref_path).is_some())
        .map(<[u8]>::to_vec))
}

fn read_packed_refs(git_dir: &Path) -> Result<Option<Vec<u8>>, RefError> {
    let path = packed_refs_path(git_dir);
    match fs::read(&path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(RefError::IoPath { path, source }),
    }
}

fn packed_refs_path(git_dir: &Path) -> PathBuf {
    git_dir.join("packed-refs")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"# pack-refs with: peeled fully-peeled sorted \n\
        bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb refs/heads/beta\n\
        aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa refs/heads/alpha\n\
        cccccccccccccccccccccccccccccccccccccccc refs/tags/v1.0\n\
        ^dddddddddddddddddddddddddddddddddddddddd\n";

    #[test]
    fn parse_empty() {
        assert!(PackedRefs::parse(b"").unwrap().is_empty());
    }

    #[test]
    fn parse_sorts_and_skips_peeled() {
        let packed = PackedRefs::parse(SAMPLE).unwrap();
        let names: Vec<_> = packed.refs().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["refs/heads/alpha", "refs/heads/beta", "refs/tags/v1.0"]);
        assert_eq!(
            packed.refs()[2].oid,
            ObjectId::from_hex("cccccccccccccccccccccccccccccccccccccccc").unwrap()
        );
    }

    #[test]
    fn parse_rejects_garbage_line() {
        assert!(matches!(
            PackedRefs::parse(b"not-a-packed-ref-line\n"),
            Err(RefError::Parse(_))
        ));
    }

    #[test]
    fn find_line_by_substring() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("packed-refs"), SAMPLE).unwrap();

        let line = find_line(dir.path(), "refs/heads/alpha").unwrap().unwrap();
        assert_eq!(line, b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa refs/heads/alpha");

        // Header mentions "sorted" but is never a candidate.
        assert!(find_line(dir.path(), "sorted").unwrap().is_none());
        assert!(find_line(dir.path(), "refs/heads/gamma").unwrap().is_none());
    }

    #[test]
    fn find_line_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_line(dir.path(), "refs/heads/main").unwrap().is_none());
        assert!(PackedRefs::load(dir.path()).unwrap().is_empty());
    }
}
