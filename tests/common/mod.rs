// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// A fresh, empty build directory for one test.
pub fn setup_build_dir() -> TempDir {
    tempdir().expect("Failed to create temporary directory")
}

/// Writes an executable `/bin/sh` script named `name` into `dir`.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}

/// A test executable that prints a line and exits 0.
pub fn write_passing(dir: &Path, name: &str) -> PathBuf {
    write_script(dir, name, &format!("echo \"{name} ok\""))
}

/// A test executable that exits with the given code.
pub fn write_exiting(dir: &Path, name: &str, code: i32) -> PathBuf {
    write_script(dir, name, &format!("echo \"{name} running\"\nexit {code}"))
}

/// A plain (non-executable) file.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write file");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644))
        .expect("Failed to set file permissions");
    path
}
