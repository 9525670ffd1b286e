//! Repository fixtures written straight to disk as loose objects, plus an
//! in-memory object store that counts reads.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use git_hash::hasher::Hasher;
use git_hash::ObjectId;
use git_history::{Repository, RepositoryOptions};
use git_object::ObjectType;
use git_odb::{ObjectStore, OdbError, RawObject};

/// Builds a repository under a temp dir, one object at a time.
pub struct Fixture {
    _dir: tempfile::TempDir,
    pub git_dir: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let git_dir = dir.path().join(".git");
        fs::create_dir_all(git_dir.join("objects")).unwrap();
        fs::create_dir_all(git_dir.join("refs/heads")).unwrap();
        fs::create_dir_all(git_dir.join("refs/tags")).unwrap();
        fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        Self { _dir: dir, git_dir }
    }

    pub fn work_tree(&self) -> &Path {
        self.git_dir.parent().unwrap()
    }

    pub fn write_object(&self, kind: &str, content: &[u8]) -> ObjectId {
        let oid = Hasher::hash_object(kind, content).unwrap();
        let mut raw = format!("{kind} {}\0", content.len()).into_bytes();
        raw.extend_from_slice(content);
        self.write_loose(oid, &raw);
        oid
    }

    /// Store `raw` (header included) under `oid` without checking either.
    pub fn write_loose(&self, oid: ObjectId, raw: &[u8]) {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(raw).unwrap();
        let path = self.git_dir.join("objects").join(oid.loose_path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, enc.finish().unwrap()).unwrap();
    }

    /// Tree holding `files` (slash-separated paths to contents).
    pub fn tree(&self, files: &[(&str, &str)]) -> ObjectId {
        let mut root = Dir::default();
        for (path, content) in files {
            root.insert(path, content);
        }
        root.write(self)
    }

    pub fn commit(&self, tree: ObjectId, parents: &[ObjectId], when: i64, msg: &str) -> ObjectId {
        self.write_object("commit", &commit_bytes(tree, parents, when, msg))
    }

    pub fn set_ref(&self, name: &str, content: &str) {
        let path = self.git_dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn set_branch(&self, branch: &str, id: ObjectId) {
        self.set_ref(&format!("refs/heads/{branch}"), &format!("{id}\n"));
    }

    pub fn repo(&self) -> Repository {
        Repository::open_with(&self.git_dir, RepositoryOptions::default()).unwrap()
    }
}

pub fn commit_bytes(tree: ObjectId, parents: &[ObjectId], when: i64, msg: &str) -> Vec<u8> {
    let mut out = format!("tree {tree}\n");
    for p in parents {
        out.push_str(&format!("parent {p}\n"));
    }
    out.push_str(&format!("author Test <test@example.com> {when} +0000\n"));
    out.push_str(&format!("committer Test <test@example.com> {when} +0000\n"));
    out.push_str(&format!("\n{msg}\n"));
    out.into_bytes()
}

#[derive(Default)]
struct Dir {
    files: BTreeMap<String, String>,
    dirs: BTreeMap<String, Dir>,
}

impl Dir {
    fn insert(&mut self, path: &str, content: &str) {
        match path.split_once('/') {
            Some((head, rest)) => self
                .dirs
                .entry(head.to_string())
                .or_default()
                .insert(rest, content),
            None => {
                self.files.insert(path.to_string(), content.to_string());
            }
        }
    }

    fn write(&self, fx: &Fixture) -> ObjectId {
        let mut data = Vec::new();
        for (name, content) in &self.files {
            let oid = fx.write_object("blob", content.as_bytes());
            data.extend_from_slice(format!("100644 {name}\0").as_bytes());
            data.extend_from_slice(oid.as_bytes());
        }
        for (name, dir) in &self.dirs {
            let oid = dir.write(fx);
            data.extend_from_slice(format!("40000 {name}\0").as_bytes());
            data.extend_from_slice(oid.as_bytes());
        }
        fx.write_object("tree", &data)
    }
}

/// Object store backed by a map; counts every `read_raw` call.
#[derive(Default)]
pub struct MemoryStore {
    objects: HashMap<ObjectId, (ObjectType, Vec<u8>)>,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn insert(&mut self, obj_type: ObjectType, content: Vec<u8>) -> ObjectId {
        let oid = Hasher::hash_object(obj_type.as_str(), &content).unwrap();
        self.objects.insert(oid, (obj_type, content));
        oid
    }

    pub fn empty_tree(&mut self) -> ObjectId {
        self.insert(ObjectType::Tree, Vec::new())
    }

    pub fn commit(&mut self, tree: ObjectId, parents: &[ObjectId], when: i64, msg: &str) -> ObjectId {
        self.insert(ObjectType::Commit, commit_bytes(tree, parents, when, msg))
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ObjectStore for MemoryStore {
    fn read_raw(&self, oid: &ObjectId) -> Result<RawObject<'_>, OdbError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let (obj_type, data) = self.objects.get(oid).ok_or(OdbError::NotFound(*oid))?;
        Ok(RawObject::new(*obj_type, data.len(), data.as_slice()))
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        self.objects.contains_key(oid)
    }
}
