//! # Commands Module / 命令模块
//!
//! One module per subcommand, plus the configuration and planning steps that
//! `run` and `list` share.
//!
//! 每个子命令一个模块，另外包含 `run` 与 `list` 共用的配置和计划步骤。

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::{
    config::{Overrides, SuiteConfig},
    discovery, planner,
    models::TestPlan,
};
use crate::infra::t;

pub mod init;
pub mod list;
pub mod run;

/// Loads the config file (if any), applies the command-line overrides and
/// activates the configured language unless `--lang` was given.
///
/// # Returns
/// The effective configuration and the locale to print with.
pub(crate) fn load_config(
    config_path: Option<&Path>,
    overrides: Overrides,
    requested_language: Option<String>,
) -> Result<(SuiteConfig, String)> {
    let early_locale = crate::resolve_locale(requested_language.as_deref());
    let mut config = SuiteConfig::load(config_path)
        .with_context(|| t!("config_load_failed", locale = &early_locale).to_string())?;
    config.apply(overrides);

    let language = requested_language.or_else(|| config.language.clone());
    let locale = crate::resolve_locale(language.as_deref());
    rust_i18n::set_locale(&locale);
    tracing::debug!(?config, "effective configuration");
    Ok((config, locale))
}

/// Discovery followed by ordering. Both fail with a `ConfigError`.
/// 先发现后排序。两者都以 `ConfigError` 失败。
pub(crate) fn discover_and_plan(config: &SuiteConfig) -> Result<TestPlan> {
    let candidates = discovery::discover(&config.discovery)?;
    let plan = planner::plan_execution(candidates, &config.ordering)?;
    Ok(plan)
}
