//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! This module runs a single test executable, either directly or under the
//! memory-checking wrapper, and turns what happened into an
//! `ExecutionResult`. Launch failures and timeouts become infrastructure
//! failures; everything else goes through the classifier.
//!
//! 此模块运行单个测试可执行文件（直接运行或在内存检查包装器下运行），
//! 并将运行情况转换为 `ExecutionResult`。启动失败和超时被记为基础设施故障，
//! 其余情况交由分类器判定。

use std::ffi::OsString;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        classifier::classify,
        config::{ClassifierConfig, ExecutionConfig, ExecutionMode},
        error::ConfigError,
        models::{ExecutionResult, FailureReason, TestCandidate, Verdict},
    },
    infra::command::{self, CapturedOutput, ProcessOutcome},
};

/// What became of one scheduled test.
/// 一个已调度测试的结果。
#[derive(Debug)]
pub enum TestRun {
    Completed(ExecutionResult),
    /// The run was cancelled while this test was executing; its child was killed.
    /// 该测试执行期间运行被取消；其子进程已被终止。
    Interrupted,
}

/// Launches test executables according to the execution and classifier settings.
/// The wrapper command is validated once, when the executor is built.
#[derive(Debug)]
pub struct Executor<'a> {
    config: &'a ExecutionConfig,
    classifier: &'a ClassifierConfig,
    wrapper: Vec<String>,
}

impl<'a> Executor<'a> {
    pub fn new(
        config: &'a ExecutionConfig,
        classifier: &'a ClassifierConfig,
    ) -> Result<Self, ConfigError> {
        let wrapper = match config.mode {
            ExecutionMode::Plain => Vec::new(),
            ExecutionMode::Memcheck => config.instrument.wrapper_argv()?,
        };
        Ok(Self {
            config,
            classifier,
            wrapper,
        })
    }

    /// The argv that will be executed for `candidate`.
    /// 针对 `candidate` 将要执行的 argv。
    pub fn command_line(&self, candidate: &TestCandidate) -> Vec<OsString> {
        self.wrapper
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(candidate.path().as_os_str().to_owned()))
            .collect()
    }

    fn build_command(&self, candidate: &TestCandidate) -> Command {
        let argv = self.command_line(candidate);
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        if self.config.mode == ExecutionMode::Memcheck {
            cmd.envs(&self.config.instrument.env);
        }
        cmd
    }

    /// Runs one test to completion, timeout or cancellation.
    ///
    /// # Arguments
    /// * `candidate` - The test executable to run
    /// * `cancel` - Token fired on Ctrl-C; kills the running child
    ///
    /// # Returns
    /// `TestRun::Completed` with a classified result, or `TestRun::Interrupted`.
    pub async fn run_test_case(
        &self,
        candidate: &TestCandidate,
        cancel: &CancellationToken,
    ) -> TestRun {
        let cmd = self.build_command(candidate);
        tracing::debug!(
            test = candidate.name(),
            command = ?self.command_line(candidate),
            mode = ?self.config.mode,
            "spawning test"
        );

        let start_time = Instant::now();
        let outcome = command::spawn_and_capture(cmd, self.config.timeout(), cancel).await;
        let duration = start_time.elapsed();

        match outcome {
            Err(e) => {
                tracing::warn!(test = candidate.name(), error = %e, "failed to launch test");
                TestRun::Completed(infrastructure_failure(
                    candidate,
                    CapturedOutput {
                        stdout: String::new(),
                        stderr: e.to_string(),
                    },
                    duration,
                    FailureReason::LaunchFailed,
                ))
            }
            Ok(ProcessOutcome::TimedOut { limit, output }) => {
                tracing::warn!(test = candidate.name(), limit = ?limit, "test timed out");
                TestRun::Completed(infrastructure_failure(
                    candidate,
                    output,
                    duration,
                    FailureReason::Timeout,
                ))
            }
            Ok(ProcessOutcome::Cancelled { .. }) => {
                tracing::info!(test = candidate.name(), "test cancelled");
                TestRun::Interrupted
            }
            Ok(ProcessOutcome::Exited { status, output }) => {
                let exit_code = command::exit_code_of(&status);
                let verdict = classify(self.classifier, exit_code, &output.stdout, &output.stderr);
                TestRun::Completed(ExecutionResult {
                    candidate: candidate.clone(),
                    stdout: output.stdout,
                    stderr: output.stderr,
                    exit_code,
                    duration,
                    verdict,
                })
            }
        }
    }
}

fn infrastructure_failure(
    candidate: &TestCandidate,
    output: CapturedOutput,
    duration: Duration,
    reason: FailureReason,
) -> ExecutionResult {
    ExecutionResult {
        candidate: candidate.clone(),
        stdout: output.stdout,
        stderr: output.stderr,
        exit_code: None,
        duration,
        verdict: Verdict::Fail(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::InstrumentConfig;
    use std::path::PathBuf;

    fn candidate() -> TestCandidate {
        TestCandidate::new(PathBuf::from("/build/rbftest_01")).unwrap()
    }

    #[test]
    fn plain_mode_runs_the_binary_directly() {
        let config = ExecutionConfig::default();
        let classifier = ClassifierConfig::default();
        let executor = Executor::new(&config, &classifier).unwrap();
        assert_eq!(
            executor.command_line(&candidate()),
            vec![OsString::from("/build/rbftest_01")]
        );
    }

    #[test]
    fn memcheck_mode_prefixes_the_wrapper() {
        let config = ExecutionConfig {
            mode: ExecutionMode::Memcheck,
            instrument: InstrumentConfig {
                command: "valgrind -q --leak-check=full".to_string(),
                ..InstrumentConfig::default()
            },
            ..ExecutionConfig::default()
        };
        let classifier = ClassifierConfig::default();
        let executor = Executor::new(&config, &classifier).unwrap();
        let argv: Vec<String> = executor
            .command_line(&candidate())
            .into_iter()
            .map(|s| s.into_string().unwrap())
            .collect();
        assert_eq!(argv, vec!["valgrind", "-q", "--leak-check=full", "/build/rbftest_01"]);
    }

    #[test]
    fn invalid_wrapper_is_a_configuration_error() {
        let config = ExecutionConfig {
            mode: ExecutionMode::Memcheck,
            instrument: InstrumentConfig {
                command: "valgrind 'unterminated".to_string(),
                ..InstrumentConfig::default()
            },
            ..ExecutionConfig::default()
        };
        let classifier = ClassifierConfig::default();
        assert!(matches!(
            Executor::new(&config, &classifier),
            Err(ConfigError::InvalidCommand(_))
        ));
    }

    #[test]
    fn wrapper_is_ignored_in_plain_mode() {
        let config = ExecutionConfig {
            instrument: InstrumentConfig {
                command: "valgrind 'unterminated".to_string(),
                ..InstrumentConfig::default()
            },
            ..ExecutionConfig::default()
        };
        let classifier = ClassifierConfig::default();
        assert!(Executor::new(&config, &classifier).is_ok());
    }
}
