//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the run to the console: the planned test list before
//! execution, one block per finished test, and the partitioned summary at the
//! end. Text is localized and colored.
//!
//! 此模块将运行过程打印到控制台：执行前的计划测试列表、每个已完成测试的输出块，
//! 以及最后按通过/失败划分的摘要。文本经过本地化并带有颜色。

use colored::*;
use crate::core::models::{ExecutionResult, RunSummary, TestPlan};
use crate::infra::t;

const SEPARATOR: &str = "=======================================";

/// Prints the planned run order, exactly as the plan holds it, so an
/// interrupted run can be compared against what was planned.
///
/// 打印计划的运行顺序（与计划完全一致），以便中断的运行可以与计划进行比对。
///
/// # Output Format / 输出格式
/// ```text
/// ALL TESTS:
/// /abs/build/rbftest_01
/// /abs/build/rmtest_create_tables
/// ```
pub fn print_plan(plan: &TestPlan, locale: &str) {
    println!("{}", t!("report.all_tests", locale = locale).bold());
    for candidate in plan.candidates() {
        println!("{}", candidate);
    }
}

/// Like `print_plan`, with the group that placed each test.
/// 与 `print_plan` 类似，但附带放置每个测试的分组。
pub fn print_plan_with_groups(plan: &TestPlan, locale: &str) {
    println!("{}", t!("report.all_tests", locale = locale).bold());
    let unmatched = t!("report.unmatched_group", locale = locale);
    for entry in plan.entries() {
        let group = entry.group.as_deref().unwrap_or(unmatched.as_ref());
        println!("  {:<24} {}", group.cyan(), entry.candidate);
    }
    println!(
        "{}",
        t!("report.plan_size", locale = locale, count = plan.len()).bold()
    );
}

pub fn print_start(locale: &str) {
    println!("{}", t!("report.start_running", locale = locale).blue());
}

pub fn print_progress(current: usize, total: usize, locale: &str) {
    println!(
        "{}",
        t!("report.progress", locale = locale, current = current, total = total).dimmed()
    );
}

/// Prints the per-test block: name, stdout, stderr when non-empty, exit code,
/// and the failure reason for failed tests.
///
/// 打印单个测试的输出块：名称、stdout、非空时的 stderr、退出码，
/// 以及失败测试的失败原因。
///
/// # Output Format / 输出格式
/// ```text
/// ========= rbftest_01 ==========
/// <stdout>
/// <stderr>
/// Exit code: 0
/// ```
pub fn print_test_block(result: &ExecutionResult, locale: &str) {
    println!("========= {} ==========", result.name().bold());
    print_stream(&result.stdout);
    if !result.stderr.is_empty() {
        print_stream(&result.stderr);
    }

    let exit_line = match result.exit_code {
        Some(code) => t!("report.exit_code", locale = locale, code = code),
        None => t!("report.exit_code_none", locale = locale),
    };
    println!("{}", exit_line);

    if let Some(reason) = result.failure_reason() {
        let marker = if reason.is_infrastructure() {
            t!("report.infra_marker", locale = locale).magenta().bold()
        } else {
            t!("report.fail_marker", locale = locale).red().bold()
        };
        println!(
            "{} {} ({:.2?})",
            marker,
            reason.describe(locale),
            result.duration
        );
    }
    println!();
}

fn print_stream(text: &str) {
    if text.is_empty() {
        return;
    }
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

/// Prints the passed and failed names in run order, then the totals line.
///
/// 按运行顺序打印通过和失败的测试名称，然后打印总计行。
///
/// # Output Format / 输出格式
/// ```text
/// =======================================
/// Success Tests:
/// rbftest_01
/// =======================================
/// Fail Tests:
/// rmtest_01
/// rmtest_02 [INFRA] timed out
/// =======================================
/// TOTAL: 3, SUCCESS: 1, FAIL: 2
/// ```
pub fn print_summary(summary: &RunSummary, locale: &str) {
    if summary.is_interrupted() {
        println!(
            "\n{}",
            t!(
                "report.interrupted",
                locale = locale,
                done = summary.total(),
                planned = summary.planned()
            )
            .yellow()
            .bold()
        );
    }

    println!("{}", SEPARATOR);
    println!("{}", t!("report.success_tests", locale = locale).green().bold());
    for result in summary.passed() {
        println!("{}", result.name());
    }

    println!("{}", SEPARATOR);
    println!("{}", t!("report.fail_tests", locale = locale).red().bold());
    for result in summary.failed() {
        match result.failure_reason() {
            Some(reason) if reason.is_infrastructure() => println!(
                "{} {} {}",
                result.name(),
                t!("report.infra_marker", locale = locale).magenta(),
                reason.describe(locale)
            ),
            _ => println!("{}", result.name()),
        }
    }

    println!("{}", SEPARATOR);
    println!(
        "{}",
        t!(
            "report.totals",
            locale = locale,
            total = summary.total(),
            success = summary.passed().len(),
            fail = summary.failed().len()
        )
        .bold()
    );
    let infra = summary.infrastructure_failures();
    if infra > 0 {
        println!(
            "{}",
            t!("report.infra_count", locale = locale, count = infra).magenta()
        );
    }

    if summary.is_interrupted() {
        return;
    }
    if summary.failed().is_empty() {
        println!("\n{}", t!("report.all_passed", locale = locale).green().bold());
    } else {
        println!("\n{}", t!("report.some_failed", locale = locale).red().bold());
    }
}
