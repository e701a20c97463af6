//! # Error Types Module / 错误类型模块
//!
//! Configuration errors abort a run before (or while) the test plan is built.
//! They are kept apart from per-test failures so the CLI can map them to a
//! dedicated exit code.
//!
//! 配置错误会在构建测试计划之前（或期间）中止运行。
//! 它们与单个测试的失败分开，以便 CLI 将其映射到专用的退出码。

use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems with the suite layout or the runner configuration.
/// 测试套件布局或运行器配置中的致命问题。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A scan directory is missing or is not a directory.
    /// 扫描目录不存在或不是目录。
    #[error("test directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// A scan directory exists but could not be listed.
    #[error("failed to read test directory {}: {source}", .path.display())]
    UnreadableDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more discovered executables fit no group of the ordering table.
    /// 一个或多个已发现的可执行文件不属于排序表中的任何分组。
    #[error("illegal test name format: {}", .0.join(", "))]
    IllegalTestName(Vec<String>),

    #[error("invalid group table: {0}")]
    InvalidGroupTable(String),

    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A shell-style command string from the configuration could not be split.
    #[error("invalid command line `{0}`")]
    InvalidCommand(String),

    /// The optional pre-run build step did not succeed.
    /// 可选的预构建步骤未成功。
    #[error("build command `{command}` failed with exit code {code:?}")]
    BuildFailed { command: String, code: Option<i32> },
}
