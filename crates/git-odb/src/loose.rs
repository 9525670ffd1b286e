//! Loose object storage.
//!
//! Each loose object lives at `objects/XX/YYYY...` where `XX` is the first
//! byte of the OID in hex and `YYYY...` is the rest. The file content is
//! zlib-compressed `"<type> <size>\0<content>"`.

use std::fs;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use git_hash::hasher::Hasher;
use git_hash::ObjectId;
use git_object::header;
use git_object::ObjectType;

use crate::{ObjectStore, OdbError, RawObject};

/// Longest header we accept: `"commit 18446744073709551615\0"` fits easily.
const MAX_HEADER_LEN: u64 = 64;

/// Interface to a loose object directory (`.git/objects/`).
pub struct LooseObjectStore {
    objects_dir: PathBuf,
    verify: bool,
}

impl LooseObjectStore {
    /// Open the loose object store at the given path.
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            verify: false,
        }
    }

    /// Check each object's hash against its id when reading.
    ///
    /// Verification needs the whole object in memory, so verified reads do
    /// not stream.
    pub fn set_verify(&mut self, verify: bool) {
        self.verify = verify;
    }

    /// Get the file path for a given OID.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.objects_dir.join(oid.loose_path())
    }

    /// Open a streaming reader for a loose object.
    ///
    /// The header is parsed immediately; content bytes are decompressed
    /// on demand through the [`Read`] trait.
    pub fn stream(&self, oid: &ObjectId) -> Result<LooseObjectStream, OdbError> {
        let file = open_object(&self.object_path(oid), oid)?;
        let mut decoder = BufReader::new(ZlibDecoder::new(file));

        let mut hdr = Vec::with_capacity(32);
        (&mut decoder)
            .take(MAX_HEADER_LEN)
            .read_until(0, &mut hdr)
            .map_err(|source| OdbError::Decompress { oid: *oid, source })?;
        if hdr.last() != Some(&0) {
            return Err(OdbError::Corrupt {
                oid: *oid,
                reason: "missing header terminator".into(),
            });
        }

        let (obj_type, size, _) = header::parse_header(&hdr)?;
        Ok(LooseObjectStream {
            obj_type,
            size,
            decoder,
            bytes_read: 0,
        })
    }

    /// Read a loose object fully and verify its hash matches the expected OID.
    pub fn read_verified(&self, oid: &ObjectId) -> Result<(ObjectType, Vec<u8>), OdbError> {
        let path = self.object_path(oid);
        let file = open_object(&path, oid)?;

        let mut decompressed = Vec::new();
        ZlibDecoder::new(file)
            .read_to_end(&mut decompressed)
            .map_err(|source| OdbError::Decompress { oid: *oid, source })?;

        let actual = Hasher::digest(&decompressed)?;
        if actual != *oid {
            return Err(OdbError::HashMismatch {
                expected: *oid,
                actual,
            });
        }

        let (obj_type, size, header_len) = header::parse_header(&decompressed)?;
        let content = decompressed.split_off(header_len);
        if content.len() != size {
            return Err(OdbError::Corrupt {
                oid: *oid,
                reason: format!("header says {size} bytes, found {}", content.len()),
            });
        }
        Ok((obj_type, content))
    }
}

impl ObjectStore for LooseObjectStore {
    fn read_raw(&self, oid: &ObjectId) -> Result<RawObject<'_>, OdbError> {
        if self.verify {
            let (obj_type, content) = self.read_verified(oid)?;
            return Ok(RawObject::new(obj_type, content.len(), Cursor::new(content)));
        }
        let stream = self.stream(oid)?;
        Ok(RawObject::new(stream.obj_type, stream.size, stream))
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }
}

fn open_object(path: &Path, oid: &ObjectId) -> Result<fs::File, OdbError> {
    match fs::File::open(path) {
        Ok(f) => Ok(f),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(OdbError::NotFound(*oid)),
        Err(e) => Err(OdbError::Io(e)),
    }
}

/// Streaming reader for a loose object.
///
/// The header has already been parsed; reads yield only the content bytes
/// and never run past the declared size.
pub struct LooseObjectStream {
    obj_type: ObjectType,
    size: usize,
    decoder: BufReader<ZlibDecoder<fs::File>>,
    bytes_read: usize,
}

impl LooseObjectStream {
    pub fn object_type(&self) -> ObjectType {
        self.obj_type
    }

    /// The declared content size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bytes_remaining(&self) -> usize {
        self.size.saturating_sub(self.bytes_read)
    }
}

impl Read for LooseObjectStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.bytes_remaining();
        if remaining == 0 {
            return Ok(0);
        }
        let max_read = remaining.min(buf.len());
        let n = self.decoder.read(&mut buf[..max_read])?;
        self.bytes_read += n;
        Ok(n)
    }
}
