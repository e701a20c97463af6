//! # Result Classifier Module / 结果分类模块
//!
//! Decides PASS or FAIL for a finished test from its exit code and captured
//! text. The decision is a pure function of its inputs.
//!
//! 根据退出码和捕获的文本判定已结束测试的通过或失败。
//! 该判定是其输入的纯函数。
//!
//! Rules, first hit wins:
//! 1. exit code other than 0 (or no exit code at all);
//! 2. stdout contains the failure marker, ignoring case. The binaries under
//!    test print this marker when one of their own checks fails, which may
//!    happen without a non-zero exit;
//! 3. with `strict_stderr`, any non-blank stderr.

use crate::core::config::ClassifierConfig;
use crate::core::models::{FailureReason, Verdict};

pub fn classify(
    config: &ClassifierConfig,
    exit_code: Option<i32>,
    stdout: &str,
    stderr: &str,
) -> Verdict {
    if exit_code != Some(0) {
        return Verdict::Fail(FailureReason::NonZeroExit);
    }
    if contains_marker(stdout, &config.failure_marker) {
        return Verdict::Fail(FailureReason::FailureMarker);
    }
    if config.strict_stderr && !stderr.trim().is_empty() {
        return Verdict::Fail(FailureReason::UnexpectedStderr);
    }
    Verdict::Pass
}

fn contains_marker(stdout: &str, marker: &str) -> bool {
    !marker.is_empty() && stdout.to_lowercase().contains(&marker.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> ClassifierConfig {
        ClassifierConfig {
            strict_stderr: true,
            ..ClassifierConfig::default()
        }
    }

    #[test]
    fn clean_zero_exit_passes() {
        let config = ClassifierConfig::default();
        assert_eq!(classify(&config, Some(0), "All 5 checks passed\n", ""), Verdict::Pass);
    }

    #[test]
    fn non_zero_exit_fails() {
        let config = ClassifierConfig::default();
        assert_eq!(
            classify(&config, Some(134), "", ""),
            Verdict::Fail(FailureReason::NonZeroExit)
        );
        assert_eq!(
            classify(&config, None, "", ""),
            Verdict::Fail(FailureReason::NonZeroExit)
        );
    }

    #[test]
    fn marker_fails_despite_zero_exit() {
        let config = ClassifierConfig::default();
        assert_eq!(
            classify(
                &config,
                Some(0),
                "All 5 checks passed, test case failed: check 3",
                ""
            ),
            Verdict::Fail(FailureReason::FailureMarker)
        );
    }

    #[test]
    fn marker_match_ignores_case() {
        let config = ClassifierConfig::default();
        assert_eq!(
            classify(&config, Some(0), "[rbftest_03] TEST CASE FAILED", ""),
            Verdict::Fail(FailureReason::FailureMarker)
        );
    }

    #[test]
    fn marker_on_stderr_only_does_not_count() {
        let config = ClassifierConfig::default();
        assert_eq!(classify(&config, Some(0), "", "test case failed"), Verdict::Pass);
    }

    #[test]
    fn exit_code_takes_priority_over_marker() {
        let config = ClassifierConfig::default();
        assert_eq!(
            classify(&config, Some(1), "test case failed", "boom"),
            Verdict::Fail(FailureReason::NonZeroExit)
        );
    }

    #[test]
    fn empty_marker_disables_the_rule() {
        let config = ClassifierConfig {
            failure_marker: String::new(),
            ..ClassifierConfig::default()
        };
        assert_eq!(classify(&config, Some(0), "test case failed", ""), Verdict::Pass);
    }

    #[test]
    fn stderr_only_matters_in_strict_mode() {
        let lenient = ClassifierConfig::default();
        assert_eq!(classify(&lenient, Some(0), "ok", "warning: slow disk"), Verdict::Pass);
        assert_eq!(
            classify(&strict(), Some(0), "ok", "warning: slow disk"),
            Verdict::Fail(FailureReason::UnexpectedStderr)
        );
        assert_eq!(classify(&strict(), Some(0), "ok", " \n"), Verdict::Pass);
    }

    #[test]
    fn verdict_is_a_pure_function() {
        let inputs = [
            (Some(0), "fine", ""),
            (Some(0), "Test Case Failed", ""),
            (Some(2), "", ""),
            (Some(0), "", "leak"),
        ];
        for config in [ClassifierConfig::default(), strict()] {
            for (code, out, err) in inputs {
                assert_eq!(classify(&config, code, out, err), classify(&config, code, out, err));
            }
        }
    }
}
