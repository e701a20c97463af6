//! # Execution Tests / 执行测试
//!
//! Runs real test executables through the `Executor` and checks the
//! classified results.
//!
//! 通过 `Executor` 运行真实的测试可执行文件并检查分类结果。
#![cfg(unix)]

mod common;

use common::{setup_build_dir, write_script};
use std::collections::BTreeMap;
use std::path::Path;
use suite_runner::config::{ClassifierConfig, ExecutionConfig, ExecutionMode, InstrumentConfig};
use suite_runner::execution::{Executor, TestRun};
use suite_runner::models::{ExecutionResult, FailureReason, TestCandidate, Verdict};
use tokio_util::sync::CancellationToken;

async fn run_with(
    path: &Path,
    config: &ExecutionConfig,
    classifier: &ClassifierConfig,
) -> ExecutionResult {
    let executor = Executor::new(config, classifier).unwrap();
    let candidate = TestCandidate::new(path.to_path_buf()).unwrap();
    match executor
        .run_test_case(&candidate, &CancellationToken::new())
        .await
    {
        TestRun::Completed(result) => result,
        TestRun::Interrupted => panic!("test was not expected to be interrupted"),
    }
}

async fn run(path: &Path) -> ExecutionResult {
    run_with(path, &ExecutionConfig::default(), &ClassifierConfig::default()).await
}

#[cfg(test)]
mod classification_tests {
    use super::*;

    #[tokio::test]
    async fn test_clean_exit_passes() {
        let dir = setup_build_dir();
        let path = write_script(dir.path(), "rbftest_01", "echo 'All 4 checks passed'");

        let result = run(&path).await;

        assert!(result.passed());
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout, "All 4 checks passed\n");
        assert_eq!(result.name(), "rbftest_01");
    }

    #[tokio::test]
    async fn test_non_zero_exit_fails() {
        let dir = setup_build_dir();
        let path = write_script(dir.path(), "rbftest_02", "exit 2");

        let result = run(&path).await;

        assert_eq!(result.verdict, Verdict::Fail(FailureReason::NonZeroExit));
        assert_eq!(result.exit_code, Some(2));
        assert!(!result.is_infrastructure_failure());
    }

    #[tokio::test]
    async fn test_failure_marker_fails_despite_zero_exit() {
        let dir = setup_build_dir();
        let path = write_script(
            dir.path(),
            "rmtest_01",
            "echo 'Scan done'\necho '[rmtest_01] Test Case Failed!'\nexit 0",
        );

        let result = run(&path).await;

        assert_eq!(result.verdict, Verdict::Fail(FailureReason::FailureMarker));
        assert_eq!(result.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_stderr_only_fails_in_strict_mode() {
        let dir = setup_build_dir();
        let path = write_script(dir.path(), "ixtest_01", "echo 'warning: slow disk' 1>&2");

        let lenient = run(&path).await;
        assert!(lenient.passed());
        assert_eq!(lenient.stderr, "warning: slow disk\n");

        let strict = ClassifierConfig {
            strict_stderr: true,
            ..ClassifierConfig::default()
        };
        let result = run_with(&path, &ExecutionConfig::default(), &strict).await;
        assert_eq!(result.verdict, Verdict::Fail(FailureReason::UnexpectedStderr));
    }

    #[tokio::test]
    async fn test_death_by_signal_fails() {
        let dir = setup_build_dir();
        let path = write_script(dir.path(), "qetest_01", "kill -TERM $$");

        let result = run(&path).await;

        assert_eq!(result.verdict, Verdict::Fail(FailureReason::NonZeroExit));
        assert_eq!(result.exit_code, Some(128 + 15));
    }
}

#[cfg(test)]
mod infrastructure_tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_is_an_infrastructure_failure() {
        let dir = setup_build_dir();
        let path = write_script(dir.path(), "qetest_02", "echo 'looping'\nexec sleep 30");
        let config = ExecutionConfig {
            timeout_secs: 1,
            ..ExecutionConfig::default()
        };

        let result = run_with(&path, &config, &ClassifierConfig::default()).await;

        assert_eq!(result.verdict, Verdict::Fail(FailureReason::Timeout));
        assert!(result.is_infrastructure_failure());
        assert_eq!(result.exit_code, None);
        assert_eq!(result.stdout, "looping\n");
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_launch_failure() {
        let dir = setup_build_dir();
        let path = dir.path().join("rbftest_gone");

        let result = run(&path).await;

        assert_eq!(result.verdict, Verdict::Fail(FailureReason::LaunchFailed));
        assert!(result.is_infrastructure_failure());
        assert!(!result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_token_interrupts_the_test() {
        let dir = setup_build_dir();
        let path = write_script(dir.path(), "rbftest_03", "exec sleep 30");
        let config = ExecutionConfig::default();
        let classifier = ClassifierConfig::default();
        let executor = Executor::new(&config, &classifier).unwrap();
        let candidate = TestCandidate::new(path).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(matches!(
            executor.run_test_case(&candidate, &cancel).await,
            TestRun::Interrupted
        ));
    }
}

#[cfg(test)]
mod memcheck_tests {
    use super::*;

    fn memcheck_config() -> ExecutionConfig {
        // `env` stands in for the memory checker: it runs the test with the
        // instrumentation variables set.
        ExecutionConfig {
            mode: ExecutionMode::Memcheck,
            instrument: InstrumentConfig {
                command: "env".to_string(),
                env: BTreeMap::from([("SUITE_RUNNER_PROBE".to_string(), "on".to_string())]),
            },
            ..ExecutionConfig::default()
        }
    }

    #[tokio::test]
    async fn test_memcheck_mode_runs_under_the_wrapper_with_its_environment() {
        let dir = setup_build_dir();
        let path = write_script(dir.path(), "rmtest_02", "echo \"probe=$SUITE_RUNNER_PROBE\"");

        let result = run_with(&path, &memcheck_config(), &ClassifierConfig::default()).await;

        assert!(result.passed());
        assert_eq!(result.stdout, "probe=on\n");
    }

    #[tokio::test]
    async fn test_plain_mode_does_not_set_instrumentation_variables() {
        let dir = setup_build_dir();
        let path = write_script(dir.path(), "rmtest_03", "echo \"probe=$SUITE_RUNNER_PROBE\"");
        let config = ExecutionConfig {
            mode: ExecutionMode::Plain,
            ..memcheck_config()
        };

        let result = run_with(&path, &config, &ClassifierConfig::default()).await;

        assert_eq!(result.stdout, "probe=\n");
    }

    #[tokio::test]
    async fn test_missing_wrapper_is_a_launch_failure() {
        let dir = setup_build_dir();
        let path = write_script(dir.path(), "rmtest_04", "exit 0");
        let config = ExecutionConfig {
            mode: ExecutionMode::Memcheck,
            instrument: InstrumentConfig {
                command: "/definitely/not/valgrind".to_string(),
                ..InstrumentConfig::default()
            },
            ..ExecutionConfig::default()
        };

        let result = run_with(&path, &config, &ClassifierConfig::default()).await;

        assert_eq!(result.verdict, Verdict::Fail(FailureReason::LaunchFailed));
    }
}
