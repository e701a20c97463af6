//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: optional build step, discovery,
//! ordering, then one test at a time through the executor and classifier,
//! finishing with the summary.
//!
//! 此模块实现 `run` 命令：可选的构建步骤、发现、排序，
//! 然后逐个测试经过执行器和分类器，最后输出摘要。

use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    cli::commands::{discover_and_plan, load_config},
    core::{
        config::{ExecutionMode, Overrides, SuiteConfig, split_command},
        error::ConfigError,
        execution::{Executor, TestRun},
        models::{RunSummary, TestPlan, EXIT_SUCCESS},
    },
    infra::t,
    reporting::console,
};

/// Executes the run command with the provided arguments.
///
/// # Arguments
/// * `config_path` - Optional path to the TOML configuration file
/// * `overrides` - Values given on the command line
/// * `requested_language` - Value of `--lang`, if any
///
/// # Returns
/// The process exit code: 0 when every test passed, 1 when any failed,
/// 130 when interrupted. Configuration errors are returned as `Err`.
pub async fn execute(
    config_path: Option<PathBuf>,
    overrides: Overrides,
    requested_language: Option<String>,
) -> Result<u8> {
    let (config, locale) = load_config(config_path.as_deref(), overrides, requested_language)?;

    print_header(&config, &locale);

    if let Some(build_command) = &config.build_command {
        run_build_command(build_command, &locale).await?;
    }

    let plan = discover_and_plan(&config)?;
    let executor = Executor::new(&config.execution, &config.classifier)?;

    console::print_plan(&plan, &locale);
    if plan.is_empty() {
        println!("{}", t!("no_tests_to_run", locale = &locale).green());
        return Ok(EXIT_SUCCESS);
    }

    let stop_token = setup_signal_handler(&locale);
    let summary = run_tests(&plan, &executor, &stop_token, &locale).await;

    console::print_summary(&summary, &locale);
    Ok(summary.exit_code())
}

fn print_header(config: &SuiteConfig, locale: &str) {
    let started = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    println!(
        "{}",
        t!("run.started_at", locale = locale, time = started).cyan()
    );

    let mode = match config.execution.mode {
        ExecutionMode::Plain => t!("run.mode_plain", locale = locale),
        ExecutionMode::Memcheck => t!("run.mode_memcheck", locale = locale),
    };
    println!("{}", t!("run.mode", locale = locale, mode = mode).cyan());

    match config.execution.timeout() {
        Some(limit) => println!(
            "{}",
            t!("run.timeout", locale = locale, secs = limit.as_secs()).cyan()
        ),
        None => println!("{}", t!("run.no_timeout", locale = locale).yellow()),
    }
    if config.classifier.strict_stderr {
        println!("{}", t!("run.strict_stderr", locale = locale).yellow());
    }
}

/// Runs the opaque build step once before discovery.
/// A failed build is a setup error: nothing would be worth running.
async fn run_build_command(command: &str, locale: &str) -> Result<()> {
    let parts = split_command(command)?;
    println!(
        "{}",
        t!("run.building", locale = locale, command = command).blue()
    );

    let status = tokio::process::Command::new(&parts[0])
        .args(&parts[1..])
        .status()
        .await
        .with_context(|| t!("run.build_spawn_failed", locale = locale, command = command).to_string())?;

    if !status.success() {
        return Err(ConfigError::BuildFailed {
            command: command.to_string(),
            code: status.code(),
        }
        .into());
    }
    Ok(())
}

/// Sets up a signal handler for graceful shutdown.
/// The token kills the running test and stops the loop.
fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            return;
        }
        println!("\n{}", t!("shutdown_signal", locale = &locale).yellow());
        token_clone.cancel();
    });

    token
}

/// Runs the planned tests one after another.
/// Each test is classified and reported before the next one starts.
///
/// 依次运行计划中的测试。
/// 每个测试在下一个测试开始之前完成分类和报告。
async fn run_tests(
    plan: &TestPlan,
    executor: &Executor<'_>,
    stop_token: &CancellationToken,
    locale: &str,
) -> RunSummary {
    let mut summary = RunSummary::new(plan.len());
    console::print_start(locale);

    for (i, candidate) in plan.candidates().enumerate() {
        if stop_token.is_cancelled() {
            summary.mark_interrupted();
            break;
        }
        console::print_progress(i + 1, plan.len(), locale);

        match executor.run_test_case(candidate, stop_token).await {
            TestRun::Completed(result) => {
                console::print_test_block(&result, locale);
                summary.record(result);
            }
            TestRun::Interrupted => {
                summary.mark_interrupted();
                break;
            }
        }
    }

    summary
}
