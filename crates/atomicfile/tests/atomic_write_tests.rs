//! Integration tests for the public atomic-write surface.
//!
//! These exercise the writer, the replace primitive and the one-shot helper
//! through the crate's public API only:
//! - Discard and commit lifecycles,
//! - Replace semantics on success and failure,
//! - Directory hygiene (no temp siblings left behind),
//! - Racing writers on a single destination.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use atomicfile::{AtomicFile, AtomicFileError, WriteOptions, replace_file, write_file};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

// =============================================================================
// Test Helpers
// =============================================================================

fn entries(dir: &Path) -> Vec<OsString> {
    let mut names: Vec<OsString> = fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name())
        .collect();
    names.sort();
    names
}

fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

// =============================================================================
// Writer lifecycle
// =============================================================================

#[test]
fn open_write_discard_leaves_nothing_behind() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("test.txt");

    let mut file = AtomicFile::new(&path, 0o644)?;
    file.write_all(b"foo")?;
    let temp = file.temp_path().to_path_buf();
    file.discard()?;

    assert!(!path.exists(), "real");
    assert!(!temp.exists(), "temp");
    assert!(entries(tmp.path()).is_empty());
    Ok(())
}

#[test]
fn open_write_commit_publishes_content() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("test.txt");

    let mut file = AtomicFile::new(&path, 0o644)?;
    file.write_all(b"foo")?;
    let temp = file.temp_path().to_path_buf();
    file.commit()?;

    assert!(path.exists(), "real");
    assert!(!temp.exists(), "temp");
    assert_eq!(fs::read_to_string(&path)?, "foo");
    Ok(())
}

#[test]
fn many_small_writes_are_appended_in_order() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("chunks.bin");

    let mut expected = Vec::new();
    let mut file = AtomicFile::new(&path, 0o644)?;
    for i in 0..=255u8 {
        let chunk = [i; 17];
        file.write_all(&chunk)?;
        expected.extend_from_slice(&chunk);
    }
    file.commit()?;

    assert_eq!(fs::read(&path)?, expected);
    Ok(())
}

#[test]
fn writer_stages_next_to_nested_destination() -> TestResult {
    let tmp = TempDir::new()?;
    let nested = tmp.path().join("nested");
    fs::create_dir(&nested)?;

    let mut file = AtomicFile::with_options(nested.join("out.txt"), &WriteOptions::default())?;
    file.write_all(b"nested")?;
    assert_eq!(file.temp_path().parent(), Some(nested.as_path()));
    file.commit()?;

    assert_eq!(fs::read_to_string(nested.join("out.txt"))?, "nested");
    assert_eq!(entries(&nested), vec![OsString::from("out.txt")]);
    Ok(())
}

// =============================================================================
// Replace primitive
// =============================================================================

#[test]
fn replace_moves_source_over_destination() -> TestResult {
    let tmp = TempDir::new()?;
    let src = write_fixture(tmp.path(), "src", "I'm the source");
    let dest = write_fixture(tmp.path(), "dest", "I'm the destination");

    replace_file(&src, &dest)?;

    assert!(dest.exists(), "dest");
    assert!(!src.exists(), "src");
    assert_eq!(fs::read_to_string(&dest)?, "I'm the source");
    Ok(())
}

#[test]
fn failed_replace_modifies_neither_file() -> TestResult {
    let tmp = TempDir::new()?;
    let src = write_fixture(tmp.path(), "src", "source");
    let dest = tmp.path().join("missing-parent").join("dest");

    let err = replace_file(&src, &dest).expect_err("destination parent does not exist");

    match &err {
        AtomicFileError::Replace { src: s, dst: d, .. } => {
            assert_eq!(s, &src.display().to_string());
            assert_eq!(d, &dest.display().to_string());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fs::read_to_string(&src)?, "source");
    assert!(!dest.exists());
    Ok(())
}

// =============================================================================
// One-shot helper
// =============================================================================

#[test]
fn write_file_overwrites_and_leaves_single_entry() -> TestResult {
    let tmp = TempDir::new()?;
    let dest = write_fixture(tmp.path(), "dest.txt", "existing");

    write_file(&dest, b"new content")?;

    assert_eq!(fs::read_to_string(&dest)?, "new content");
    assert_eq!(entries(tmp.path()), vec![OsString::from("dest.txt")]);
    Ok(())
}

#[test]
fn write_file_creates_missing_destination() -> TestResult {
    let tmp = TempDir::new()?;
    let dest = tmp.path().join("fresh.txt");

    write_file(&dest, b"hello")?;

    assert_eq!(fs::read_to_string(&dest)?, "hello");
    assert_eq!(entries(tmp.path()), vec![OsString::from("fresh.txt")]);
    Ok(())
}

#[test]
fn errors_convert_into_io_errors() -> TestResult {
    fn save(path: &Path) -> std::io::Result<()> {
        write_file(path, b"data")?;
        Ok(())
    }

    let tmp = TempDir::new()?;
    let err = save(&tmp.path().join("absent/file")).expect_err("missing parent");

    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    Ok(())
}

// =============================================================================
// Concurrency
// =============================================================================

// Concurrent MoveFileEx calls on one target can fail with sharing violations,
// so the race is only asserted where rename(2) is used.
#[cfg(unix)]
#[test]
fn racing_writers_leave_one_whole_payload() -> TestResult {
    let tmp = TempDir::new()?;
    let dest = tmp.path().join("contended.txt");

    let payloads: Vec<Vec<u8>> = (0..8u8).map(|i| vec![b'a' + i; 64 * 1024]).collect();

    std::thread::scope(|s| {
        for payload in &payloads {
            let dest = &dest;
            s.spawn(move || {
                for _ in 0..4 {
                    write_file(dest, payload).expect("concurrent write_file");
                }
            });
        }
    });

    let content = fs::read(&dest)?;
    assert!(
        payloads.iter().any(|p| *p == content),
        "destination holds a torn or unknown payload"
    );
    assert_eq!(entries(tmp.path()), vec![OsString::from("contended.txt")]);
    Ok(())
}
