//! Tests for loading a synthetic dpkg info directory.

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use verity_core::errors::ProviderError;
use verity_core::traits::ManifestProvider;
use verity_dpkg::DpkgProvider;

const HASH_A: &str = "0cc175b9c0f1b6a831c399e269772661";
const HASH_B: &str = "92eb5ffee6ae2fec3ad71c777531578f";

fn info_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

#[test]
fn test_manifest_from_all_md5sums_files() {
    let dir = info_dir(&[
        ("coreutils.md5sums", &format!("{HASH_A}  usr/bin/ls\n{HASH_B}  usr/bin/cat\n")),
        ("libc6:amd64.md5sums", &format!("{HASH_B}  lib/x86_64-linux-gnu/libc.so.6\n")),
        ("coreutils.list", "/usr/bin/ls\n"),
    ]);
    let provider = DpkgProvider::new(dir.path());

    let db = provider.load_database().unwrap();

    assert_eq!(db.manifest.len(), 3);
    assert_eq!(db.manifest.expected_hash(Path::new("/usr/bin/ls")), Some(HASH_A));
    assert_eq!(
        db.owners.get(Path::new("/lib/x86_64-linux-gnu/libc.so.6")).map(String::as_str),
        Some("libc6:amd64")
    );
    assert_eq!(db.owners.get(Path::new("/usr/bin/cat")).map(String::as_str), Some("coreutils"));
    assert_eq!(db.malformed, 0);
}

#[test]
fn test_manifest_is_sorted_by_path() {
    let dir = info_dir(&[
        ("z.md5sums", &format!("{HASH_A}  a/first\n")),
        ("a.md5sums", &format!("{HASH_A}  z/last\n")),
    ]);
    let manifest = DpkgProvider::new(dir.path()).load_manifest().unwrap();
    let paths: Vec<&Path> = manifest.iter().map(|e| e.path.as_path()).collect();
    assert_eq!(paths, vec![Path::new("/a/first"), Path::new("/z/last")]);
}

#[test]
fn test_malformed_lines_are_skipped() {
    let dir = info_dir(&[(
        "pkg.md5sums",
        &format!("{HASH_A}  usr/bin/ok\nnot a digest line\n\n{HASH_B} single-space\n"),
    )]);
    let db = DpkgProvider::new(dir.path()).load_database().unwrap();
    assert_eq!(db.manifest.len(), 1);
    assert_eq!(db.malformed, 2);
}

#[test]
fn test_exemptions_from_conffiles() {
    let dir = info_dir(&[
        ("openssh-server.conffiles", "/etc/ssh/sshd_config\n/etc/default/ssh\n\n"),
        ("base-files.conffiles", "/etc/issue\n/etc/old.conf remove-on-upgrade\n"),
        ("base-files.md5sums", ""),
    ]);
    let exemptions = DpkgProvider::new(dir.path()).load_exemptions().unwrap();

    assert_eq!(exemptions.len(), 4);
    assert!(exemptions.contains(Path::new("/etc/ssh/sshd_config")));
    assert!(exemptions.contains(Path::new("/etc/old.conf")));
}

#[test]
fn test_missing_info_dir() {
    let dir = TempDir::new().unwrap();
    let missing: PathBuf = dir.path().join("info");
    let err = DpkgProvider::new(&missing).load_manifest().unwrap_err();
    assert!(matches!(err, ProviderError::DatabaseMissing { path } if path == missing));
}

#[test]
fn test_empty_info_dir_gives_empty_manifest() {
    let dir = TempDir::new().unwrap();
    let provider = DpkgProvider::new(dir.path());
    assert!(provider.load_manifest().unwrap().is_empty());
    assert!(provider.load_exemptions().unwrap().is_empty());
}

#[test]
fn test_non_utf8_paths_do_not_abort_loading() {
    let dir = info_dir(&[("good.md5sums", &format!("{HASH_A}  usr/bin/good\n"))]);
    let mut latin1 = format!("{HASH_B}  usr/share/doc/caf").into_bytes();
    latin1.extend_from_slice(b"\xe9\n");
    std::fs::write(dir.path().join("bad.md5sums"), &latin1).unwrap();
    std::fs::write(dir.path().join("bad.conffiles"), b"/etc/caf\xe9.conf\n").unwrap();
    let provider = DpkgProvider::new(dir.path());

    let db = provider.load_database().unwrap();

    assert_eq!(db.manifest.len(), 2);
    assert_eq!(db.malformed, 0);
    assert_eq!(db.manifest.expected_hash(Path::new("/usr/bin/good")), Some(HASH_A));
    let cafe = Path::new(OsStr::from_bytes(b"/usr/share/doc/caf\xe9"));
    assert_eq!(db.manifest.expected_hash(cafe), Some(HASH_B));
    assert_eq!(db.owners.get(cafe).map(String::as_str), Some("bad"));

    let exemptions = provider.load_exemptions().unwrap();
    assert!(exemptions.contains(Path::new(OsStr::from_bytes(b"/etc/caf\xe9.conf"))));
}
