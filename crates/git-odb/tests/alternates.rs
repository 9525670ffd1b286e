//! Integration tests: alternates chain resolution.
//!
//! Objects from alternate object stores must be reachable through the
//! primary database, including nested alternates, and circular chains must
//! be rejected at open time.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use git_hash::hasher::Hasher;
use git_hash::ObjectId;
use git_object::ObjectType;
use git_odb::{ObjectDatabase, ObjectStore, OdbError};

fn objects_dir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let objects = dir.path().join("objects");
    fs::create_dir_all(&objects).unwrap();
    (dir, objects)
}

fn write_blob(objects: &Path, content: &[u8]) -> ObjectId {
    let oid = Hasher::hash_object("blob", content).unwrap();
    let mut raw = format!("blob {}\0", content.len()).into_bytes();
    raw.extend_from_slice(content);
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&raw).unwrap();
    let path = objects.join(oid.loose_path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, enc.finish().unwrap()).unwrap();
    oid
}

fn set_alternates(objects: &Path, content: &str) {
    let info = objects.join("info");
    fs::create_dir_all(&info).unwrap();
    fs::write(info.join("alternates"), content).unwrap();
}

#[test]
fn read_object_from_alternate() {
    let (_a, objects_a) = objects_dir();
    let (_b, objects_b) = objects_dir();
    let oid = write_blob(&objects_b, b"object in alternate repo\n");
    set_alternates(&objects_a, &format!("{}\n", objects_b.display()));

    let odb = ObjectDatabase::open(&objects_a).unwrap();
    let raw = odb.read_raw(&oid).unwrap();
    assert_eq!(raw.obj_type, ObjectType::Blob);
    assert_eq!(raw.into_bytes().unwrap(), b"object in alternate repo\n");
    assert!(odb.contains(&oid));
}

#[test]
fn nested_alternates_chain() {
    let (_a, objects_a) = objects_dir();
    let (_b, objects_b) = objects_dir();
    let (_c, objects_c) = objects_dir();
    let oid = write_blob(&objects_c, b"deep in the chain\n");

    set_alternates(&objects_a, &format!("{}\n", objects_b.display()));
    set_alternates(&objects_b, &format!("{}\n", objects_c.display()));

    let odb = ObjectDatabase::open(&objects_a).unwrap();
    assert_eq!(odb.alternates().len(), 1);
    assert_eq!(odb.read_raw(&oid).unwrap().into_bytes().unwrap(), b"deep in the chain\n");
}

#[test]
fn relative_alternate_path() {
    let (dir, objects_a) = objects_dir();
    let objects_b = dir.path().join("shared");
    fs::create_dir_all(&objects_b).unwrap();
    let oid = write_blob(&objects_b, b"relative\n");
    set_alternates(&objects_a, "../shared\n");

    let odb = ObjectDatabase::open(&objects_a).unwrap();
    assert!(odb.contains(&oid));
}

#[test]
fn circular_alternates_detected() {
    let (_a, objects_a) = objects_dir();
    let (_b, objects_b) = objects_dir();
    set_alternates(&objects_a, &format!("{}\n", objects_b.display()));
    set_alternates(&objects_b, &format!("{}\n", objects_a.display()));

    assert!(matches!(
        ObjectDatabase::open(&objects_a),
        Err(OdbError::CircularAlternates(_))
    ));
}

#[test]
fn missing_alternate_path_skipped() {
    let (_a, objects_a) = objects_dir();
    set_alternates(&objects_a, "/nonexistent/path/objects\n");

    let odb = ObjectDatabase::open(&objects_a).unwrap();
    assert!(odb.alternates().is_empty());
}

#[test]
fn comments_and_blank_lines_ignored() {
    let (_a, objects_a) = objects_dir();
    let (_b, objects_b) = objects_dir();
    let oid = write_blob(&objects_b, b"filtered alternates test\n");
    set_alternates(
        &objects_a,
        &format!("# comment\n\n{}\n# another\n", objects_b.display()),
    );

    let odb = ObjectDatabase::open(&objects_a).unwrap();
    assert!(odb.contains(&oid));
}

#[test]
fn local_object_wins() {
    let (_a, objects_a) = objects_dir();
    let (_b, objects_b) = objects_dir();
    let oid = write_blob(&objects_a, b"same content\n");
    write_blob(&objects_b, b"same content\n");
    set_alternates(&objects_a, &format!("{}\n", objects_b.display()));

    let mut odb = ObjectDatabase::open(&objects_a).unwrap();
    odb.set_verify(true);
    assert_eq!(odb.read_raw(&oid).unwrap().into_bytes().unwrap(), b"same content\n");
}

#[test]
fn absent_everywhere_is_not_found() {
    let (_a, objects_a) = objects_dir();
    let (_b, objects_b) = objects_dir();
    set_alternates(&objects_a, &format!("{}\n", objects_b.display()));

    let odb = ObjectDatabase::open(&objects_a).unwrap();
    let oid = ObjectId::from_hex("3333333333333333333333333333333333333333").unwrap();
    assert!(matches!(odb.read_raw(&oid), Err(OdbError::NotFound(id)) if id == oid));
}
