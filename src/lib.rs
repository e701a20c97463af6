//! # Suite Runner Library / Suite Runner 库
//!
//! This library provides the core functionality for the Suite Runner tool,
//! a sequential orchestrator for directories of pre-built test executables.
//! It discovers the executables, orders them by dependency-aware test groups,
//! runs each one in isolation and classifies the outcome.
//!
//! 此库为 Suite Runner 工具提供核心功能，
//! 这是一个面向预构建测试可执行文件目录的顺序编排器。
//! 它发现可执行文件，按照感知依赖关系的测试分组排序，逐个隔离运行并判定结果。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration, discovery, planning, execution and classification
//! - `infra` - Process capture, file system checks and i18n
//! - `reporting` - Console output
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 配置、发现、计划、执行与分类
//! - `infra` - 进程输出捕获、文件系统检查与国际化
//! - `reporting` - 控制台输出
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::classifier;
pub use core::config;
pub use core::discovery;
pub use core::execution;
pub use core::models;
pub use core::planner;

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

/// Picks the console language.
///
/// An explicit choice wins; otherwise the system locale is used. The full
/// locale (e.g. "zh-CN") is tried first, then its language part (e.g. "en"
/// from "en-US"), and finally "en".
///
/// 选择控制台语言。显式指定优先，否则使用系统区域设置。
pub fn resolve_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale.as_str()) {
        return locale;
    }
    locale
        .split(['-', '_'])
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
        .to_string()
}
