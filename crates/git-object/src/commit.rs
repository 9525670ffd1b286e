use bstr::{BStr, BString, ByteSlice};
use git_hash::ObjectId;

use crate::{ObjectError, Signature};

/// A decoded git commit object.
///
/// Only the fields history queries consult are kept. Multi-line headers
/// such as `gpgsig` and `mergetag` are recognised and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// OID of the root tree.
    pub tree: ObjectId,
    /// Parent commit OIDs in order; parent 0 is the first parent.
    pub parents: Vec<ObjectId>,
    /// Author identity and timestamp.
    pub author: Signature,
    /// Committer identity and timestamp.
    pub committer: Signature,
    /// Optional encoding header (e.g., "ISO-8859-1").
    pub encoding: Option<BString>,
    /// Commit message (everything after the blank line separator).
    pub message: BString,
}

impl Commit {
    /// Parse commit content from raw bytes (no object header).
    pub fn parse(data: &[u8]) -> Result<Self, ObjectError> {
        let mut tree: Option<ObjectId> = None;
        let mut parents = Vec::new();
        let mut author: Option<Signature> = None;
        let mut committer: Option<Signature> = None;
        let mut encoding: Option<BString> = None;

        let mut pos = 0;
        while pos < data.len() {
            if data[pos] == b'\n' {
                pos += 1;
                break;
            }

            let line_end = line_end(data, pos);
            let line = &data[pos..line_end];
            pos = line_end + 1;

            // Continuation lines of a multi-line header we already skipped.
            if line.first() == Some(&b' ') {
                continue;
            }

            let Some(space_pos) = line.find_byte(b' ') else {
                continue;
            };
            let (key, value) = (&line[..space_pos], &line[space_pos + 1..]);

            match key {
                b"tree" => tree = Some(parse_oid(value, "tree")?),
                b"parent" => parents.push(parse_oid(value, "parent")?),
                b"author" => author = Some(Signature::parse(BStr::new(value))?),
                b"committer" => committer = Some(Signature::parse(BStr::new(value))?),
                b"encoding" => encoding = Some(BString::from(value)),
                _ => {}
            }
        }

        let tree = tree.ok_or(ObjectError::MissingCommitField { field: "tree" })?;
        let author = author.ok_or(ObjectError::MissingCommitField { field: "author" })?;
        let committer =
            committer.ok_or(ObjectError::MissingCommitField { field: "committer" })?;

        Ok(Self {
            tree,
            parents,
            author,
            committer,
            encoding,
            message: BString::from(&data[pos.min(data.len())..]),
        })
    }

    /// Get the first parent (or None for root commits).
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    /// Is this a merge commit? (more than one parent)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Is this a root commit? (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Get just the summary (first line) of the message.
    pub fn summary(&self) -> &BStr {
        let msg: &[u8] = self.message.as_ref();
        match msg.find_byte(b'\n') {
            Some(pos) => BStr::new(&msg[..pos]),
            None => BStr::new(msg),
        }
    }
}

fn line_end(data: &[u8], from: usize) -> usize {
    data[from..]
        .find_byte(b'\n')
        .map(|p| p + from)
        .unwrap_or(data.len())
}

fn parse_oid(value: &[u8], field: &str) -> Result<ObjectId, ObjectError> {
    let hex = std::str::from_utf8(value)
        .map_err(|_| ObjectError::InvalidHeader(format!("non-UTF8 {field} OID")))?;
    Ok(ObjectId::from_hex(hex)?)
}
