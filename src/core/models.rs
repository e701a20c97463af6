//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures that flow through the
//! pipeline: discovered candidates, the ordered plan, per-test execution
//! results and the run summary.
//!
//! 此模块定义了在流水线中流转的核心数据结构：
//! 已发现的候选项、有序的执行计划、单个测试的执行结果以及运行摘要。

use crate::infra::t;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Exit code when every test passed.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code when at least one test failed (logically or for infrastructure reasons).
pub const EXIT_TEST_FAILURE: u8 = 1;
/// Exit code for configuration and setup errors.
pub const EXIT_CONFIG_ERROR: u8 = 2;
/// Exit code when the run was interrupted by Ctrl-C.
pub const EXIT_INTERRUPTED: u8 = 130;

/// An executable file eligible to be run as a test.
/// Identity and ordering are defined by the absolute path.
///
/// 可作为测试运行的可执行文件。
/// 其身份与排序由绝对路径决定。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestCandidate {
    path: PathBuf,
    name: String,
}

impl TestCandidate {
    /// Builds a candidate from an absolute path. Returns `None` when the path
    /// has no UTF-8 file name.
    pub fn new(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self { path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The base name, e.g. `rmtest_create_tables_01`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TestCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// One position of the ordered plan.
/// 有序计划中的一个位置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTest {
    pub candidate: TestCandidate,
    /// The group that placed this test, `None` for appended unmatched tests.
    pub group: Option<String>,
}

/// The finalized, dependency-respecting sequence of tests to execute.
/// Built once by the planner and read-only afterwards.
///
/// 最终确定的、尊重依赖关系的测试执行序列。
/// 由计划器构建一次，之后只读。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestPlan {
    entries: Vec<PlannedTest>,
}

impl TestPlan {
    pub(crate) fn new(entries: Vec<PlannedTest>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PlannedTest] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &TestCandidate> {
        self.entries.iter().map(|entry| &entry.candidate)
    }

    /// Base names in run order.
    pub fn names(&self) -> Vec<&str> {
        self.candidates().map(TestCandidate::name).collect()
    }
}

/// Enumerates the reasons a test can fail.
/// Launch failures and timeouts are infrastructure problems, the rest are
/// verdicts about the test itself.
///
/// 枚举测试失败的原因。
/// 启动失败和超时属于基础设施问题，其余则是对测试本身的判定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The process exited with a non-zero code or was killed by a signal.
    /// 进程以非零退出码退出或被信号终止。
    NonZeroExit,
    /// Stdout contained the agreed failure marker.
    /// 标准输出包含约定的失败标记。
    FailureMarker,
    /// Strict mode: something was written to stderr.
    /// 严格模式：有内容写入了标准错误。
    UnexpectedStderr,
    /// The executable could not be started.
    /// 无法启动可执行文件。
    LaunchFailed,
    /// The test exceeded its time limit and was killed.
    /// 测试超出时间限制并被终止。
    Timeout,
}

impl FailureReason {
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, FailureReason::LaunchFailed | FailureReason::Timeout)
    }

    /// Localized, human-readable description.
    pub fn describe(&self, locale: &str) -> String {
        match self {
            FailureReason::NonZeroExit => t!("reason.non_zero_exit", locale = locale),
            FailureReason::FailureMarker => t!("reason.failure_marker", locale = locale),
            FailureReason::UnexpectedStderr => t!("reason.unexpected_stderr", locale = locale),
            FailureReason::LaunchFailed => t!("reason.launch_failed", locale = locale),
            FailureReason::Timeout => t!("reason.timeout", locale = locale),
        }
        .to_string()
    }
}

/// The pass/fail decision for one run.
/// 单次运行的通过/失败判定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pass,
    Fail(FailureReason),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Everything captured from one test execution, together with its verdict.
/// Created by the executor and never mutated after classification.
///
/// 一次测试执行所捕获的全部内容及其判定结果。
/// 由执行器创建，分类后不再修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub candidate: TestCandidate,
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process never started, timed out or died from a signal.
    pub exit_code: Option<i32>,
    pub duration: Duration,
    pub verdict: Verdict,
}

impl ExecutionResult {
    pub fn name(&self) -> &str {
        self.candidate.name()
    }

    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self.verdict {
            Verdict::Pass => None,
            Verdict::Fail(reason) => Some(reason),
        }
    }

    pub fn is_infrastructure_failure(&self) -> bool {
        self.failure_reason()
            .is_some_and(|reason| reason.is_infrastructure())
    }
}

/// Accumulates results in run order and derives the process exit code.
/// Passed and failed lists partition the recorded results.
///
/// 按运行顺序累积结果并推导进程退出码。
/// 通过列表与失败列表对已记录的结果构成划分。
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    planned: usize,
    passed: Vec<ExecutionResult>,
    failed: Vec<ExecutionResult>,
    interrupted: bool,
}

impl RunSummary {
    pub fn new(planned: usize) -> Self {
        Self {
            planned,
            ..Self::default()
        }
    }

    pub fn record(&mut self, result: ExecutionResult) {
        if result.passed() {
            self.passed.push(result);
        } else {
            self.failed.push(result);
        }
    }

    pub fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn planned(&self) -> usize {
        self.planned
    }

    pub fn passed(&self) -> &[ExecutionResult] {
        &self.passed
    }

    pub fn failed(&self) -> &[ExecutionResult] {
        &self.failed
    }

    /// Number of results recorded so far.
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }

    pub fn infrastructure_failures(&self) -> usize {
        self.failed
            .iter()
            .filter(|r| r.is_infrastructure_failure())
            .count()
    }

    /// 0 when nothing failed, 1 otherwise; interrupted runs report 130.
    pub fn exit_code(&self) -> u8 {
        if self.interrupted {
            EXIT_INTERRUPTED
        } else if self.failed.is_empty() {
            EXIT_SUCCESS
        } else {
            EXIT_TEST_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, verdict: Verdict) -> ExecutionResult {
        ExecutionResult {
            candidate: TestCandidate::new(PathBuf::from("/suite").join(name)).unwrap(),
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(0),
            duration: Duration::ZERO,
            verdict,
        }
    }

    #[test]
    fn candidate_name_is_the_base_name() {
        let candidate = TestCandidate::new(PathBuf::from("/build/rbftest_01")).unwrap();
        assert_eq!(candidate.name(), "rbftest_01");
        assert_eq!(candidate.path(), Path::new("/build/rbftest_01"));
        assert!(TestCandidate::new(PathBuf::from("/")).is_none());
    }

    #[test]
    fn summary_partitions_results_in_run_order() {
        let mut summary = RunSummary::new(3);
        summary.record(result("a_test", Verdict::Pass));
        summary.record(result("b_test", Verdict::Fail(FailureReason::NonZeroExit)));
        summary.record(result("c_test", Verdict::Pass));

        let passed: Vec<_> = summary.passed().iter().map(|r| r.name()).collect();
        let failed: Vec<_> = summary.failed().iter().map(|r| r.name()).collect();
        assert_eq!(passed, vec!["a_test", "c_test"]);
        assert_eq!(failed, vec!["b_test"]);
        assert_eq!(summary.total(), summary.planned());
        assert_eq!(summary.exit_code(), EXIT_TEST_FAILURE);
    }

    #[test]
    fn exit_code_is_zero_only_without_failures() {
        let mut summary = RunSummary::new(1);
        assert_eq!(summary.exit_code(), EXIT_SUCCESS);
        summary.record(result("a_test", Verdict::Pass));
        assert_eq!(summary.exit_code(), EXIT_SUCCESS);
        summary.record(result("b_test", Verdict::Fail(FailureReason::Timeout)));
        assert_eq!(summary.exit_code(), EXIT_TEST_FAILURE);
        assert_eq!(summary.infrastructure_failures(), 1);
    }

    #[test]
    fn interrupted_run_has_its_own_exit_code() {
        let mut summary = RunSummary::new(2);
        summary.record(result("a_test", Verdict::Pass));
        summary.mark_interrupted();
        assert_eq!(summary.exit_code(), EXIT_INTERRUPTED);
    }

    #[test]
    fn only_launch_and_timeout_are_infrastructure() {
        assert!(FailureReason::LaunchFailed.is_infrastructure());
        assert!(FailureReason::Timeout.is_infrastructure());
        assert!(!FailureReason::NonZeroExit.is_infrastructure());
        assert!(!FailureReason::FailureMarker.is_infrastructure());
        assert!(!FailureReason::UnexpectedStderr.is_infrastructure());
    }
}
