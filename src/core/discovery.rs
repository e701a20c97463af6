//! # Test Discovery Module / 测试发现模块
//!
//! Scans the configured directories (non-recursively) for test executables.
//! The result is a set; ordering is the planner's job because directory
//! listing order differs between platforms and file systems.
//!
//! 非递归地扫描配置的目录以查找测试可执行文件。
//! 结果是一个集合；排序由计划器负责，因为目录列举顺序因平台和文件系统而异。

use crate::core::config::DiscoveryConfig;
use crate::core::error::ConfigError;
use crate::core::models::TestCandidate;
use crate::infra::fs::{expand_path, has_extension, is_directory, is_executable};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Collects every test candidate inside the configured directories.
///
/// Every directory is validated before any of them is listed, so a typo in
/// the second directory aborts the run without touching the first.
///
/// # Arguments
/// * `config` - Directories, prefix filter and name rules
///
/// # Returns
/// The set of candidates, or a `ConfigError` for a missing or unreadable directory.
///
/// 收集配置目录中的所有测试候选项。
/// 在列举任何目录之前会先校验所有目录。
pub fn discover(config: &DiscoveryConfig) -> Result<BTreeSet<TestCandidate>, ConfigError> {
    let directories: Vec<_> = config.directories.iter().map(|d| expand_path(d)).collect();

    if let Some(missing) = directories.iter().find(|d| !is_directory(d)) {
        return Err(ConfigError::MissingDirectory(missing.clone()));
    }

    let mut candidates = BTreeSet::new();
    for directory in &directories {
        scan_directory(directory, config, &mut candidates)?;
    }

    tracing::debug!(count = candidates.len(), "discovery finished");
    Ok(candidates)
}

fn scan_directory(
    directory: &Path,
    config: &DiscoveryConfig,
    candidates: &mut BTreeSet<TestCandidate>,
) -> Result<(), ConfigError> {
    let unreadable = |source: std::io::Error| ConfigError::UnreadableDirectory {
        path: directory.to_path_buf(),
        source,
    };

    let root = fs::canonicalize(directory).map_err(unreadable)?;
    for entry in fs::read_dir(&root).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if !is_test_name(&name, config) {
            continue;
        }

        // Follows symlinks, so a link to an executable qualifies.
        let Ok(metadata) = fs::metadata(entry.path()) else {
            tracing::debug!(path = %entry.path().display(), "skipping dangling entry");
            continue;
        };
        if !metadata.is_file() || !is_executable(&metadata) {
            tracing::debug!(file = %name, "skipping non-executable file");
            continue;
        }

        if let Some(candidate) = TestCandidate::new(root.join(&name)) {
            candidates.insert(candidate);
        }
    }
    Ok(())
}

/// Name-only part of the discovery rules: test pattern, extension and prefix.
/// 发现规则中仅与名称相关的部分：测试模式、扩展名与前缀。
pub fn is_test_name(name: &str, config: &DiscoveryConfig) -> bool {
    if !name.contains(&config.name_pattern) {
        return false;
    }
    if config.require_no_extension && has_extension(name) {
        return false;
    }
    match &config.prefix {
        Some(prefix) => name.starts_with(prefix.as_str()),
        None => true,
    }
}
