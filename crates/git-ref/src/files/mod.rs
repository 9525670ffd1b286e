pub(crate) mod loose;
pub mod packed;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use git_hash::{ObjectId, HEX_LEN};
use regex::bytes::Regex;
use tracing::debug;

use crate::error::RefError;
use crate::name::RefName;
use crate::Reference;

use self::packed::PackedRefs;

/// Maximum number of symbolic hops followed before giving up.
pub const MAX_SYMREF_DEPTH: usize = 10;

static SYMREF: OnceLock<Regex> = OnceLock::new();

fn symref_pattern() -> &'static Regex {
    SYMREF.get_or_init(|| Regex::new("ref: (.*)\n").expect("symref pattern compiles"))
}

/// Files-backend ref store (loose refs + packed-refs), read only.
///
/// A loose file always wins over a packed-refs entry for the same name.
pub struct FilesRefStore {
    git_dir: PathBuf,
}

impl FilesRefStore {
    pub fn new(git_dir: impl AsRef<Path>) -> Self {
        Self {
            git_dir: git_dir.as_ref().to_path_buf(),
        }
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Resolve one hop: what `name` itself points to.
    pub fn resolve(&self, name: &RefName) -> Result<Reference, RefError> {
        let content = self.read_ref_content(name)?;
        parse_ref_content(name, &content)
    }

    /// Resolve `name` to an object id, following symbolic refs.
    ///
    /// Fails with [`RefError::SymrefLoop`] after [`MAX_SYMREF_DEPTH`] hops.
    pub fn resolve_to_oid(&self, name: &RefName) -> Result<ObjectId, RefError> {
        let mut current = name.clone();

        for hop in 0..=MAX_SYMREF_DEPTH {
            let content = self.read_ref_content(&current)?;
            match parse_ref_content(&current, &content)? {
                Reference::Direct { target, .. } => return Ok(target),
                Reference::Symbolic { target, .. } => {
                    debug!(from = %current, to = %target, hop, "following symbolic ref");
                    current = target;
                }
            }
        }

        Err(RefError::SymrefLoop(name.to_string()))
    }

    /// Resolve `refs/heads/<branch>`.
    pub fn branch_oid(&self, branch: &str) -> Result<ObjectId, RefError> {
        self.resolve_to_oid(&RefName::branch(branch)?)
    }

    /// Resolve `refs/tags/<tag>`.
    pub fn tag_oid(&self, tag: &str) -> Result<ObjectId, RefError> {
        self.resolve_to_oid(&RefName::tag(tag)?)
    }

    /// Load the packed-refs file.
    pub fn packed_refs(&self) -> Result<PackedRefs, RefError> {
        PackedRefs::load(&self.git_dir)
    }

    /// All refs whose names start with `prefix`, loose and packed, sorted by
    /// name. A loose ref hides a packed entry of the same name.
    pub fn list(&self, prefix: Option<&str>) -> Result<Vec<Reference>, RefError> {
        let mut seen = HashSet::new();
        let mut refs = Vec::new();

        for (name, _path) in loose::enumerate_loose_refs(&self.git_dir, prefix)? {
            // Removed between enumeration and read.
            let Some(content) = loose::read_loose_ref(&self.git_dir, &name)? else {
                continue;
            };
            refs.push(parse_ref_content(&name, &content)?);
            seen.insert(name);
        }

        for pr in self.packed_refs()?.refs() {
            if seen.contains(&pr.name) {
                continue;
            }
            if prefix.map_or(true, |p| pr.name.as_str().starts_with(p)) {
                refs.push(Reference::Direct {
                    name: pr.name.clone(),
                    target: pr.oid,
                });
            }
        }

        refs.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(refs)
    }

    /// Loose file content, or the first packed-refs line naming the ref.
    fn read_ref_content(&self, name: &RefName) -> Result<Vec<u8>, RefError> {
        if let Some(content) = loose::read_loose_ref(&self.git_dir, name)? {
            return Ok(content);
        }
        debug!(name = %name, "no loose ref, consulting packed-refs");
        packed::find_line(&self.git_dir, name.as_str())?
            .ok_or_else(|| RefError::NotFound(name.to_string()))
    }
}

/// Interpret ref content: `ref: <target>\n` is symbolic, anything else must
/// start with a 40-character hex id.
fn parse_ref_content(name: &RefName, content: &[u8]) -> Result<Reference, RefError> {
    if let Some(target) = symref_pattern().captures(content).and_then(|caps| caps.get(1)) {
        return Ok(Reference::Symbolic {
            name: name.clone(),
            target: RefName::new(target.as_bytes())?,
        });
    }

    if content.len() < HEX_LEN {
        return Err(RefError::Parse(format!(
            "{name}: sha1 hash too short ({} bytes)",
            content.len()
        )));
    }
    let hex = String::from_utf8_lossy(&content[..HEX_LEN]);
    Ok(Reference::Direct {
        name: name.clone(),
        target: ObjectId::from_hex(&hex)?,
    })
}
