//! End-to-end runs of the `nxmeta` binary against files in a scratch dir.

use nxmeta_core::container::INI1_MAGIC;
use nxmeta_core::trust::TRUST_BUNDLE_MAGIC;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn nxmeta(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nxmeta"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run nxmeta")
}

fn trust_bundle(entries: &[(u32, u32, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&TRUST_BUNDLE_MAGIC.to_le_bytes());
    buf.extend_from_slice(&(entries.len() as u32).to_le_bytes());

    let mut data_offset = entries.len() * 0x10;
    for (id, status, data) in entries {
        for word in [*id, *status, data.len() as u32, data_offset as u32] {
            buf.extend_from_slice(&word.to_le_bytes());
        }
        data_offset += data.len();
    }
    for (_, _, data) in entries {
        buf.extend_from_slice(data);
    }
    buf
}

fn empty_ini1() -> Vec<u8> {
    let mut buf = Vec::new();
    for word in [INI1_MAGIC, 0x10, 0, 0] {
        buf.extend_from_slice(&word.to_le_bytes());
    }
    buf
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> String {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_show_prints_parsed_tree() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "trust.bdf", &trust_bundle(&[(1, 1, b"cert")]));

    let output = nxmeta(&["show", &path]);

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["TrustBundle"]["entries"][0]["id"], 1);
    assert_eq!(value["TrustBundle"]["entries"][0]["data"], "63657274");
}

#[test]
fn test_diff_prints_change_set() {
    let dir = TempDir::new().unwrap();
    let prev = write(dir.path(), "prev.bdf", &trust_bundle(&[(1, 1, b"cert")]));
    let cur = write(
        dir.path(),
        "cur.bdf",
        &trust_bundle(&[(1, 1, b"cert"), (2, 1, b"new")]),
    );

    let output = nxmeta(&["diff", &prev, &cur]);

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["TrustBundle"]["added"][0]["id"], 2);
    assert!(value["TrustBundle"].get("removed").is_none());
}

#[test]
fn test_diff_of_different_formats_fails() {
    let dir = TempDir::new().unwrap();
    let prev = write(dir.path(), "ini1.bin", &empty_ini1());
    let cur = write(dir.path(), "trust.bdf", &trust_bundle(&[]));

    let output = nxmeta(&["diff", &prev, &cur]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("ERR_FORMAT_MISMATCH"));
}

#[test]
fn test_show_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.npdm");

    let output = nxmeta(&["show", &missing.to_string_lossy()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_NOT_FOUND"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_batch_reports_results_and_skips() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "prev.bin", &empty_ini1());
    write(dir.path(), "cur.bin", &empty_ini1());
    let manifest = write(
        dir.path(),
        "batch.yaml",
        b"pairs:\n  ini1:\n    prev: prev.bin\n    cur: cur.bin\n  gone:\n    prev: prev.bin\n    cur: missing.bin\n",
    );

    let output = nxmeta(&["--json-logs", "batch", &manifest]);

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert!(value["results"]["ini1"]["InitialProcess"].is_object());
    assert!(value["skipped"]["gone"]
        .as_str()
        .unwrap()
        .contains("ERR_NOT_FOUND"));
}

#[test]
fn test_batch_with_bad_manifest_fails() {
    let dir = TempDir::new().unwrap();
    let manifest = write(dir.path(), "batch.yaml", b"pairs: [1, 2]\n");

    let output = nxmeta(&["batch", &manifest]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_INVALID_MANIFEST"));
}
