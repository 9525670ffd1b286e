//! Shared harness for gitr-history end-to-end tests: a loose-object
//! repository writer and a process runner.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use git_hash::hasher::Hasher;
use git_hash::ObjectId;

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Run the binary in `dir` with the given arguments.
pub fn gitr(dir: &Path, args: &[&str]) -> CommandResult {
    let output = Command::new(env!("CARGO_BIN_EXE_gitr-history"))
        .args(args)
        .current_dir(dir)
        .env_remove("GIT_DIR")
        .env_remove("GIT_OBJECT_DIRECTORY")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run gitr-history");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// A work tree with a `.git` directory populated object by object.
pub struct TestRepo {
    dir: tempfile::TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let git = dir.path().join(".git");
        fs::create_dir_all(git.join("objects")).unwrap();
        fs::create_dir_all(git.join("refs/heads")).unwrap();
        fs::create_dir_all(git.join("refs/tags")).unwrap();
        fs::write(git.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git_dir(&self) -> PathBuf {
        self.dir.path().join(".git")
    }

    fn write_object(&self, kind: &str, content: &[u8]) -> ObjectId {
        let oid = Hasher::hash_object(kind, content).unwrap();
        let mut raw = format!("{kind} {}\0", content.len()).into_bytes();
        raw.extend_from_slice(content);
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&raw).unwrap();
        let path = self.git_dir().join("objects").join(oid.loose_path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, enc.finish().unwrap()).unwrap();
        oid
    }

    /// Flat tree of `(name, content)` files.
    pub fn tree(&self, files: &[(&str, &str)]) -> ObjectId {
        let mut data = Vec::new();
        for (name, content) in files {
            let blob = self.write_object("blob", content.as_bytes());
            data.extend_from_slice(format!("100644 {name}\0").as_bytes());
            data.extend_from_slice(blob.as_bytes());
        }
        self.write_object("tree", &data)
    }

    pub fn commit(&self, tree: ObjectId, parents: &[ObjectId], when: i64, msg: &str) -> ObjectId {
        let mut body = format!("tree {tree}\n");
        for p in parents {
            body.push_str(&format!("parent {p}\n"));
        }
        body.push_str(&format!(
            "author Test Author <test@example.com> {when} +0000\n\
             committer Test Author <test@example.com> {when} +0000\n\n{msg}\n"
        ));
        self.write_object("commit", body.as_bytes())
    }

    pub fn set_ref(&self, name: &str, target: &str) {
        let path = self.git_dir().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("{target}\n")).unwrap();
    }
}
