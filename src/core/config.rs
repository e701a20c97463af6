//! # Configuration Module / 配置模块
//!
//! `SuiteConfig` is the single value that drives a run. It is assembled from
//! built-in defaults, an optional TOML file and command-line overrides, and is
//! then passed explicitly into discovery, planning, execution and
//! classification.
//!
//! `SuiteConfig` 是驱动一次运行的唯一配置值。它由内置默认值、可选的 TOML
//! 文件和命令行覆盖项组合而成，随后被显式传入发现、计划、执行和分类各阶段。

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default directory scanned when no `--directory` is given.
pub const DEFAULT_DIRECTORY: &str = "cmake-build-debug";

/// Default name of the configuration file written by `init`.
pub const DEFAULT_CONFIG_FILE: &str = "SuiteRunner.toml";

/// Text the cooperating test binaries print when an internal check fails.
pub const DEFAULT_FAILURE_MARKER: &str = "test case failed";

/// Default group precedence, highest first.
/// 默认分组优先级，从高到低。
pub const DEFAULT_GROUPS: &[&str] = &[
    "rbftest",
    "rbftest_custom",
    "rmtest_create_tables",
    "rmtest_delete_tables",
    "rmtest",
    "rmtest_custom",
    "ixtest",
    "ixtest_custom",
    "qetest",
    "qetest_custom",
];

/// How each test executable is launched.
/// 每个测试可执行文件的启动方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Run the binary directly.
    /// 直接运行二进制文件。
    #[default]
    Plain,
    /// Run the binary under the memory-checking wrapper.
    /// 在内存检查包装器下运行二进制文件。
    Memcheck,
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "memcheck" => Ok(Self::Memcheck),
            other => Err(format!("unknown execution mode `{other}`")),
        }
    }
}

/// What to do with executables whose name fits no group.
/// 对名称不属于任何分组的可执行文件的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Abort with an "illegal test name format" error.
    #[default]
    Reject,
    /// Run them after every known group, in path order.
    Append,
}

impl std::str::FromStr for UnmatchedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "append" => Ok(Self::Append),
            other => Err(format!("unknown unmatched policy `{other}`")),
        }
    }
}

/// One entry of the ordering table. Its rank is its position in the table.
/// 排序表中的一项。其优先级即其在表中的位置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    /// Canonical group name, e.g. `rmtest_create_tables`.
    pub name: String,
}

impl GroupRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Directories scanned (non-recursively) for test executables.
    pub directories: Vec<PathBuf>,
    /// Only keep executables whose base name starts with this string.
    pub prefix: Option<String>,
    /// Substring every test base name must contain.
    pub name_pattern: String,
    /// Skip files such as `buildlog.txt` or `foo_test.o`.
    pub require_no_extension: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            directories: vec![PathBuf::from(DEFAULT_DIRECTORY)],
            prefix: None,
            name_pattern: "test".to_string(),
            require_no_extension: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderingConfig {
    pub unmatched: UnmatchedPolicy,
    /// Group table, highest precedence first.
    pub groups: Vec<GroupRule>,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            unmatched: UnmatchedPolicy::default(),
            groups: DEFAULT_GROUPS.iter().map(|name| GroupRule::new(*name)).collect(),
        }
    }
}

/// Wrapper command and environment used in `memcheck` mode.
/// `memcheck` 模式下使用的包装命令和环境变量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstrumentConfig {
    /// Shell-style command line placed in front of the test path.
    pub command: String,
    /// Allocator knobs that make allocation patterns visible to the analyzer.
    pub env: BTreeMap<String, String>,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        let env = [
            ("GLIBCXX_FORCE_NEW", "1"),
            ("G_SLICE", "always-malloc"),
            ("G_DEBUG", "gc-friendly"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            command: "valgrind --leak-check=full --track-origins=yes".to_string(),
            env,
        }
    }
}

impl InstrumentConfig {
    /// Expands `~`/`$VAR` and splits the wrapper into argv form.
    /// 展开 `~`/`$VAR` 并将包装命令拆分为 argv 形式。
    pub fn wrapper_argv(&self) -> Result<Vec<String>, ConfigError> {
        split_command(&self.command)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    pub mode: ExecutionMode,
    /// Per-test limit in seconds. `0` means no limit.
    pub timeout_secs: u64,
    pub instrument: InstrumentConfig,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            timeout_secs: 300,
            instrument: InstrumentConfig::default(),
        }
    }
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Knobs of the pass/fail decision.
/// 通过/失败判定的可调参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Case-insensitive stdout marker signalling an internal assertion failure.
    /// An empty marker disables the rule.
    pub failure_marker: String,
    /// Any stderr output fails the test. Catches silent corruption at the cost
    /// of failing tests that merely print a warning.
    pub strict_stderr: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            failure_marker: DEFAULT_FAILURE_MARKER.to_string(),
            strict_stderr: false,
        }
    }
}

/// The complete runner configuration, usually loaded from `SuiteRunner.toml`.
/// 完整的运行器配置，通常从 `SuiteRunner.toml` 加载。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Language for console messages (e.g. "en", "zh-CN").
    /// 控制台消息的语言（例如 "en"、"zh-CN"）。
    pub language: Option<String>,
    /// Optional opaque build step executed once before discovery.
    pub build_command: Option<String>,
    pub discovery: DiscoveryConfig,
    pub ordering: OrderingConfig,
    pub execution: ExecutionConfig,
    pub classifier: ClassifierConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            language: None,
            build_command: None,
            discovery: DiscoveryConfig::default(),
            ordering: OrderingConfig::default(),
            execution: ExecutionConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Command-line values that take precedence over the config file.
/// 优先于配置文件的命令行参数值。
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub prefix: Option<String>,
    pub directories: Option<Vec<PathBuf>>,
    pub mode: Option<ExecutionMode>,
    pub strict_stderr: bool,
    pub timeout_secs: Option<u64>,
    pub unmatched: Option<UnmatchedPolicy>,
    pub allow_extensions: bool,
}

impl SuiteConfig {
    /// Parses a configuration from TOML text. Missing sections keep their defaults.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration file at `path`, or the defaults when no path is given.
    /// 加载 `path` 处的配置文件；未提供路径时返回默认配置。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(prefix) = overrides.prefix {
            self.discovery.prefix = Some(prefix);
        }
        if let Some(directories) = overrides.directories.filter(|d| !d.is_empty()) {
            self.discovery.directories = directories;
        }
        if overrides.allow_extensions {
            self.discovery.require_no_extension = false;
        }
        if let Some(mode) = overrides.mode {
            self.execution.mode = mode;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.execution.timeout_secs = timeout_secs;
        }
        if let Some(unmatched) = overrides.unmatched {
            self.ordering.unmatched = unmatched;
        }
        if overrides.strict_stderr {
            self.classifier.strict_stderr = true;
        }
    }
}

/// Expands `~`/`$VAR` in a shell-style command line and splits it into argv form.
pub fn split_command(command: &str) -> Result<Vec<String>, ConfigError> {
    let expanded = shellexpand::full(command)
        .map_err(|_| ConfigError::InvalidCommand(command.to_string()))?
        .to_string();
    match shlex::split(&expanded) {
        Some(parts) if !parts.is_empty() => Ok(parts),
        _ => Err(ConfigError::InvalidCommand(command.to_string())),
    }
}
