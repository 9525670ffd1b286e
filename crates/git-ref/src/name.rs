use std::fmt;

use bstr::{BStr, BString, ByteSlice};

use crate::error::RefError;

/// A validated reference path such as `refs/heads/main` or `HEAD`.
///
/// Enforces the essentials of `git-check-ref-format(1)` so a name can be
/// joined onto the git directory without escaping it:
/// - no ASCII control characters or any of `` ~^:?*[\``
/// - no `..`, `//` or `@{`, and not the single character `@`
/// - no leading or trailing `/`, no trailing `.`
/// - no component starting with `.` or ending with `.lock`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefName(BString);

const FORBIDDEN_CHARS: &[u8] = b" ~^:?*[\\";

pub(crate) const HEADS_PREFIX: &str = "refs/heads/";
pub(crate) const TAGS_PREFIX: &str = "refs/tags/";

impl RefName {
    /// Create and validate a ref name.
    pub fn new(name: impl Into<BString>) -> Result<Self, RefError> {
        let name = name.into();
        validate_ref_name(&name)?;
        Ok(Self(name))
    }

    /// `refs/heads/<branch>`.
    pub fn branch(branch: &str) -> Result<Self, RefError> {
        Self::new(format!("{HEADS_PREFIX}{branch}"))
    }

    /// `refs/tags/<tag>`.
    pub fn tag(tag: &str) -> Result<Self, RefError> {
        Self::new(format!("{TAGS_PREFIX}{tag}"))
    }

    /// Get the short name (e.g., `main` from `refs/heads/main`).
    pub fn short_name(&self) -> &BStr {
        let s = self.0.as_bstr();
        for prefix in [HEADS_PREFIX, TAGS_PREFIX, "refs/remotes/"] {
            if let Some(rest) = s.strip_prefix(prefix.as_bytes()) {
                return rest.as_bstr();
            }
        }
        s
    }

    pub fn is_branch(&self) -> bool {
        self.0.starts_with(HEADS_PREFIX.as_bytes())
    }

    pub fn is_tag(&self) -> bool {
        self.0.starts_with(TAGS_PREFIX.as_bytes())
    }

    pub fn as_bstr(&self) -> &BStr {
        self.0.as_bstr()
    }

    /// Get as a string slice. Validated names are ASCII in practice.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("<invalid-utf8>")
    }
}

impl AsRef<BStr> for RefName {
    fn as_ref(&self) -> &BStr {
        self.0.as_bstr()
    }
}

impl fmt::Display for RefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn validate_ref_name(name: &[u8]) -> Result<(), RefError> {
    let invalid = |what: &str| {
        RefError::InvalidName(format!("'{}': {what}", String::from_utf8_lossy(name)))
    };

    if name.is_empty() {
        return Err(RefError::InvalidName("ref name is empty".into()));
    }
    if name == b"@" {
        return Err(invalid("'@' is not a valid ref name"));
    }

    if let Some((i, &b)) = name
        .iter()
        .enumerate()
        .find(|(_, &b)| b < 0x20 || b == 0x7f || FORBIDDEN_CHARS.contains(&b))
    {
        return Err(invalid(&format!("forbidden byte {b:#04x} at position {i}")));
    }

    if name.starts_with(b"/") || name.ends_with(b"/") {
        return Err(invalid("leading or trailing '/'"));
    }
    if name.ends_with(b".") {
        return Err(invalid("ends with '.'"));
    }
    for bad in [b"..", b"//", b"@{"] {
        if name.find(bad).is_some() {
            return Err(invalid(&format!("contains '{}'", bad.as_bstr())));
        }
    }

    for component in name.split_str(b"/") {
        if component.starts_with(b".") {
            return Err(invalid("component starts with '.'"));
        }
        if component.ends_with(b".lock") {
            return Err(invalid("component ends with '.lock'"));
        }
    }

    Ok(())
}
