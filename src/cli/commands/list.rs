//! # List Command Module / 列表命令模块
//!
//! Prints the ordered plan with each test's group, without running anything.
//! Useful for checking a new test's position before committing it.
//!
//! 打印带有分组信息的有序计划，但不运行任何测试。

use anyhow::Result;
use std::path::PathBuf;

use crate::{
    cli::commands::{discover_and_plan, load_config},
    core::{config::Overrides, models::EXIT_SUCCESS},
    reporting::console,
};

pub fn execute(
    config_path: Option<PathBuf>,
    overrides: Overrides,
    requested_language: Option<String>,
) -> Result<u8> {
    let (config, locale) = load_config(config_path.as_deref(), overrides, requested_language)?;
    let plan = discover_and_plan(&config)?;
    console::print_plan_with_groups(&plan, &locale);
    Ok(EXIT_SUCCESS)
}
