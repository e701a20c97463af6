//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the file system checks used during discovery:
//! path expansion, directory checks and the executable-bit test.
//!
//! 此模块提供发现阶段使用的文件系统检查：
//! 路径展开、目录检查以及可执行位检查。

use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// Expands `~` and environment variables in a configured path.
/// Paths that fail to expand (e.g. an unset variable) are returned unchanged.
///
/// # Arguments
/// * `path` - Path as written in the config file or on the command line
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

/// Checks if a path exists and is a directory.
///
/// # Arguments
/// * `path` - Path to check
///
/// # Returns
/// `true` if the path exists and is a directory, `false` otherwise
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Whether the file described by `metadata` carries an execute permission bit.
/// 判断 `metadata` 所描述的文件是否带有可执行权限位。
#[cfg(unix)]
pub fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
pub fn is_executable(_metadata: &Metadata) -> bool {
    true
}

/// Whether a base name has a filename extension (`buildlog.txt`, `rbfm.o`).
/// Leading dots of hidden files do not count.
pub fn has_extension(name: &str) -> bool {
    Path::new(name).extension().is_some()
}
