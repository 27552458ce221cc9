use std::fs;
use std::path::PathBuf;

use serde_cbor;
use serde_json;
use tempdir::TempDir;

use super::*;

fn scratch(name: &str) -> TempDir {
    TempDir::new(name).unwrap()
}

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn pack_round_trip() {
    let samples: Vec<Vec<u8>> = vec![
        b"".to_vec(),
        b"content\n".to_vec(),
        (0..255u8).cycle().take(100_000).collect(),
    ];
    for sample in samples {
        assert_eq!(pack::unpack(&pack::pack(&sample)).unwrap(), sample);
    }
}

#[test]
fn unpack_rejects_garbage() {
    assert!(pack::unpack(b"definitely not gzip").is_err());
}

#[test]
fn refid_keeps_extension() {
    let id = RefId::for_path("some/dir/topology.pdb");
    assert!(id.as_str().ends_with(".pdb"));
    let bare = RefId::for_path("README");
    assert!(!bare.as_str().contains('.'));
}

#[test]
fn refid_is_unique() {
    assert_ne!(RefId::for_path("a.txt"), RefId::for_path("a.txt"));
}

#[test]
fn load_missing_file_fails() {
    let dir = scratch("load_missing");
    match FileStore::inline().load(dir.path().join("nope.txt")) {
        Err(Error(ErrorKind::NotFound(_), _)) => (),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn load_directory_fails() {
    let dir = scratch("load_dir");
    match FileStore::inline().load(dir.path()) {
        Err(Error(ErrorKind::InvalidArgument(_), _)) => (),
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn create_existing_fails() {
    let dir = scratch("create_existing");
    let path = write_file(&dir, "taken.txt", b"already here");
    match FileStore::inline().create(&path) {
        Err(Error(ErrorKind::AlreadyExists(_), _)) => (),
        other => panic!("expected AlreadyExists, got {:?}", other),
    }
}

#[test]
fn inline_round_trip() {
    let dir = scratch("inline_round_trip");
    let path = write_file(&dir, "in.txt", b"content\n");
    let mut fref = FileStore::inline().load(&path).unwrap();
    assert!(!fref.is_staged());
    assert_eq!(fref.read_binary().unwrap(), b"content\n");
    assert_eq!(fref.read_text().unwrap(), "content\n");
    assert_eq!(fref.origin(), Some(path.as_path()));

    fref.write_binary(b"\x00\x01replaced\xff").unwrap();
    assert_eq!(fref.read_binary().unwrap(), b"\x00\x01replaced\xff");
}

#[test]
fn staged_round_trip() {
    let dir = scratch("staged_round_trip");
    let stage = scratch("staged_round_trip_stage");
    let store = FileStore::with_stage_point(stage.path()).unwrap();

    let path = write_file(&dir, "in.dat", b"staged content");
    let mut fref = store.load(&path).unwrap();
    assert!(fref.is_staged());
    // Exactly one compressed object, named by the reference identity
    let objects: Vec<_> = fs::read_dir(stage.path()).unwrap().collect();
    assert_eq!(objects.len(), 1);
    assert_eq!(
        objects[0].as_ref().unwrap().file_name().to_str().unwrap(),
        fref.id().as_str()
    );
    assert_eq!(fref.read_binary().unwrap(), b"staged content");

    fref.write_binary(b"rewritten").unwrap();
    assert!(fref.is_staged());
    assert_eq!(fref.read_binary().unwrap(), b"rewritten");
}

#[test]
fn empty_reference_reads_empty() {
    let dir = scratch("empty_reads");
    let fref = FileStore::inline()
        .create(dir.path().join("pending.txt"))
        .unwrap();
    assert!(fref.is_empty());
    assert_eq!(fref.read_binary().unwrap(), Vec::<u8>::new());
    assert_eq!(fref.read_text().unwrap(), "");
}

#[test]
fn empty_reference_saves_empty_file() {
    let dir = scratch("empty_saves");
    let fref = FileStore::inline()
        .create(dir.path().join("pending.txt"))
        .unwrap();
    let target = dir.path().join("out.txt");
    assert_eq!(fref.save(&target).unwrap(), target);
    assert_eq!(fs::read(&target).unwrap(), Vec::<u8>::new());
}

#[test]
fn create_then_write_creates_staged_object() {
    let dir = scratch("create_write");
    let stage = scratch("create_write_stage");
    let store = FileStore::with_stage_point(stage.path()).unwrap();

    let mut fref = store.create(dir.path().join("out.txt")).unwrap();
    assert!(fref.is_empty());
    fref.write_text("filled in later\n").unwrap();
    assert!(fref.is_staged());
    assert!(stage.path().join(fref.id().as_str()).exists());
    assert_eq!(fref.read_text().unwrap(), "filled in later\n");
}

#[test]
fn save_overwrites_existing_target() {
    let dir = scratch("save_overwrites");
    let path = write_file(&dir, "in.txt", b"new content");
    let target = write_file(&dir, "out.txt", b"old content");
    let fref = FileStore::inline().load(&path).unwrap();
    fref.save(&target).unwrap();
    assert_eq!(fs::read(&target).unwrap(), b"new content");
}

#[test]
fn local_path_is_idempotent() {
    let dir = scratch("local_idempotent");
    let path = write_file(&dir, "in.txt", b"cached content");
    let fref = FileStore::inline().load(&path).unwrap();

    let first = fref.as_local_path().unwrap();
    let second = fref.as_local_path().unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&first).unwrap(), b"cached content");
}

#[test]
fn local_path_recreated_after_external_removal() {
    let dir = scratch("local_recreated");
    let path = write_file(&dir, "in.txt", b"fragile");
    let fref = FileStore::inline().load(&path).unwrap();

    let first = fref.as_local_path().unwrap();
    fs::remove_file(&first).unwrap();
    let second = fref.as_local_path().unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"fragile");
}

#[test]
fn cache_removed_when_last_clone_drops() {
    let dir = scratch("cache_cleanup");
    let path = write_file(&dir, "in.txt", b"transient");
    let fref = FileStore::inline().load(&path).unwrap();
    let clone = fref.clone();

    let local = fref.as_local_path().unwrap();
    assert_eq!(clone.as_local_path().unwrap(), local);

    drop(clone);
    assert!(local.exists(), "cache must outlive remaining clones");
    drop(fref);
    assert!(!local.exists(), "cache must be removed with the last clone");
}

#[test]
fn write_invalidates_cache() {
    let dir = scratch("write_invalidates");
    let path = write_file(&dir, "in.txt", b"before");
    let mut fref = FileStore::inline().load(&path).unwrap();

    let first = fref.as_local_path().unwrap();
    assert_eq!(fs::read(&first).unwrap(), b"before");
    fref.write_binary(b"after").unwrap();
    let second = fref.as_local_path().unwrap();
    assert_eq!(fs::read(&second).unwrap(), b"after");
}

#[test]
fn cbor_round_trip_inline() {
    let dir = scratch("cbor_inline");
    let path = write_file(&dir, "in.txt", b"shipped bytes");
    let fref = FileStore::inline().load(&path).unwrap();

    let wire = serde_cbor::to_vec(&fref).unwrap();
    let back: FileRef = serde_cbor::from_slice(&wire).unwrap();
    assert_eq!(back.id(), fref.id());
    assert_eq!(back.read_binary().unwrap(), b"shipped bytes");
}

#[test]
fn cbor_round_trip_staged() {
    let dir = scratch("cbor_staged");
    let stage = scratch("cbor_staged_stage");
    let store = FileStore::with_stage_point(stage.path()).unwrap();
    let path = write_file(&dir, "in.txt", b"staged and shipped");
    let fref = store.load(&path).unwrap();

    let wire = serde_cbor::to_vec(&fref).unwrap();
    let back: FileRef = serde_cbor::from_slice(&wire).unwrap();
    assert!(back.is_staged());
    assert_eq!(back.read_binary().unwrap(), b"staged and shipped");
}

#[test]
fn json_round_trip_preserves_identity() {
    let dir = scratch("json_round_trip");
    let path = write_file(&dir, "in.txt", b"also as json");
    let fref = FileStore::inline().load(&path).unwrap();

    let wire = serde_json::to_string(&fref).unwrap();
    let back: FileRef = serde_json::from_str(&wire).unwrap();
    assert_eq!(back.id(), fref.id());
    assert_eq!(back.read_binary().unwrap(), b"also as json");
}

#[test]
fn read_text_rejects_invalid_utf8() {
    let dir = scratch("invalid_utf8");
    let path = write_file(&dir, "in.bin", b"\xff\xfe\xfd");
    let fref = FileStore::inline().load(&path).unwrap();
    assert!(fref.read_text().is_err());
}

#[test]
fn default_stage_point_is_adopted_and_reset() {
    let dir = scratch("default_stage");
    let stage = scratch("default_stage_stage");
    let path = write_file(&dir, "in.txt", b"via default");

    set_default_stage_point(Some(stage.path()));
    assert_eq!(default_stage_point(), Some(stage.path().to_path_buf()));
    let fref = FileStore::new().load(&path).unwrap();
    assert!(fref.is_staged());

    // An explicit location still overrides the default.
    let explicit = scratch("default_stage_explicit");
    let store = FileStore::with_stage_point(explicit.path()).unwrap();
    assert_eq!(store.stage_point(), Some(explicit.path()));

    set_default_stage_point(None::<PathBuf>);
    assert_eq!(default_stage_point(), None);
    let fref = FileStore::new().load(&path).unwrap();
    assert!(!fref.is_staged());
}

#[test]
fn upload_stages_inline_content() {
    let dir = scratch("upload");
    let stage = scratch("upload_stage");
    let path = write_file(&dir, "in.txt", b"pushed later");

    let mut fref = FileStore::inline().load(&path).unwrap();
    assert!(!fref.is_staged());
    fref.stage(stage.path()).unwrap();
    assert!(fref.is_staged());
    assert!(stage.path().join(fref.id().as_str()).exists());
    assert_eq!(fref.read_binary().unwrap(), b"pushed later");
}
