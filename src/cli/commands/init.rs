//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which writes a documented
//! default configuration file.
//!
//! 此模块实现 `init` 命令，用于写入带注释的默认配置文件。

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::PathBuf};

use crate::core::models::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::infra::t;

pub(crate) const DEFAULT_CONFIG: &str = r#"# Suite Runner Configuration / 套件运行器配置

# Language for console messages / 控制台消息的语言
# language = "en"

# Optional build step run once before discovery / 发现之前运行一次的可选构建步骤
# build_command = "cmake --build cmake-build-debug"

[discovery]
# Directories scanned for test executables / 扫描测试可执行文件的目录
directories = ["cmake-build-debug"]
# Substring every test name must contain / 每个测试名称必须包含的子串
name_pattern = "test"
# Skip files with an extension such as buildlog.txt / 跳过带扩展名的文件
require_no_extension = true

[ordering]
# "reject" aborts on names outside every group, "append" runs them last
# "reject" 遇到不属于任何分组的名称时中止，"append" 将其放在最后运行
unmatched = "reject"

# Groups run in this order / 分组按此顺序运行
[[ordering.groups]]
name = "rbftest"

[[ordering.groups]]
name = "rbftest_custom"

[[ordering.groups]]
name = "rmtest_create_tables"

[[ordering.groups]]
name = "rmtest_delete_tables"

[[ordering.groups]]
name = "rmtest"

[[ordering.groups]]
name = "rmtest_custom"

[[ordering.groups]]
name = "ixtest"

[[ordering.groups]]
name = "ixtest_custom"

[[ordering.groups]]
name = "qetest"

[[ordering.groups]]
name = "qetest_custom"

[execution]
# "plain" or "memcheck" / "plain" 或 "memcheck"
mode = "plain"
# Per-test limit in seconds, 0 disables / 单个测试的时间限制（秒），0 表示不限制
timeout_secs = 300

[execution.instrument]
# Wrapper used in memcheck mode / memcheck 模式使用的包装命令
command = "valgrind --leak-check=full --track-origins=yes"

[execution.instrument.env]
GLIBCXX_FORCE_NEW = "1"
G_SLICE = "always-malloc"
G_DEBUG = "gc-friendly"

[classifier]
# Case-insensitive stdout marker printed by failing tests / 失败测试打印的标记（不区分大小写）
failure_marker = "test case failed"
# Treat any stderr output as failure / 将任何 stderr 输出视为失败
strict_stderr = false
"#;

/// Executes the init command with the provided arguments.
///
/// # Arguments
/// * `output` - Path for the new configuration file
/// * `force` - Whether to overwrite an existing file
/// * `locale` - Language for messages
///
/// # Returns
/// The process exit code; refusing to overwrite an existing file is a
/// configuration error.
pub fn execute(output: PathBuf, force: bool, locale: &str) -> Result<u8> {
    // Check if file already exists
    if output.exists() && !force {
        println!(
            "{}",
            t!("init.file_exists", locale = locale, path = output.display()).red()
        );
        println!("{}", t!("init.use_force", locale = locale).yellow());
        return Ok(EXIT_CONFIG_ERROR);
    }

    // Create parent directories if needed
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            t!("init.create_parent_dir_failed", locale = locale, path = parent.display()).to_string()
        })?;
    }

    fs::write(&output, DEFAULT_CONFIG).with_context(|| {
        t!("init.write_failed", locale = locale, path = output.display()).to_string()
    })?;

    println!(
        "{}",
        t!("init.success", locale = locale, path = output.display()).green()
    );
    println!("{}", t!("init.next_steps", locale = locale));

    Ok(EXIT_SUCCESS)
}
