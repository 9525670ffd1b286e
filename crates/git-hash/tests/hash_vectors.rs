use git_hash::hasher::Hasher;
use git_hash::ObjectId;

// ── SHA-1 raw digest vectors ────────────────────────────────────────

#[test]
fn sha1_empty_string() {
    let oid = Hasher::digest(b"").unwrap();
    assert_eq!(oid.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
}

#[test]
fn sha1_hello_world() {
    let oid = Hasher::digest(b"hello world").unwrap();
    assert_eq!(oid.to_hex(), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
}

// ── git hash-object compatible vectors ───────────────────────────────

#[test]
fn empty_blob() {
    let oid = Hasher::hash_object("blob", b"").unwrap();
    assert_eq!(oid.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
}

#[test]
fn empty_tree() {
    let oid = Hasher::hash_object("tree", b"").unwrap();
    assert_eq!(oid.to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
}

#[test]
fn hello_world_blob() {
    let oid = Hasher::hash_object("blob", b"hello world").unwrap();
    assert_eq!(oid.to_hex(), "95d09f2b10159347eece71399a7e2e907ea3df4f");
}

// ── Streaming ────────────────────────────────────────────────────────

#[test]
fn streaming_matches_oneshot() {
    let data = b"the quick brown fox jumps over the lazy dog";
    let oneshot = Hasher::digest(data).unwrap();

    let mut hasher = Hasher::new();
    for chunk in data.chunks(7) {
        hasher.update(chunk);
    }
    assert_eq!(oneshot, hasher.finalize().unwrap());
}

#[test]
fn write_trait() {
    use std::io::Write;

    let expected = Hasher::digest(b"hello world").unwrap();
    let mut hasher = Hasher::new();
    hasher.write_all(b"hello world").unwrap();
    assert_eq!(expected, hasher.finalize().unwrap());
}

#[test]
fn object_type_changes_id() {
    let data = b"some content";
    let blob = Hasher::hash_object("blob", data).unwrap();
    let commit = Hasher::hash_object("commit", data).unwrap();
    assert_ne!(blob, commit);
}

#[test]
fn hash_result_parses_back() {
    let oid = Hasher::hash_object("blob", b"test content").unwrap();
    let parsed: ObjectId = oid.to_string().parse().unwrap();
    assert_eq!(oid, parsed);
}
