//! # Test Execution Planner Module / 测试执行计划模块
//!
//! Turns the discovered candidate set into a total, dependency-respecting run
//! order. The order is driven by an explicit group table: each group has a
//! canonical name and a rank (its position in the table), and every candidate
//! is assigned to at most one group.
//!
//! 将已发现的候选集合转换为一个全序的、尊重依赖关系的运行顺序。
//! 顺序由显式的分组表驱动：每个分组有一个规范名称和一个优先级（即它在表中的位置），
//! 每个候选项最多被分配到一个分组。
//!
//! ## Matching / 匹配规则
//!
//! - Exact tier: the base name equals the group name (`rmtest_create_tables`).
//! - Suffix tier: the base name is `<group>_<suffix>` where the suffix is
//!   alphanumeric and starts with a digit (`rbftest_custom_01`, `rmtest_01b`).
//!   The split happens at the last separator, so `rbftest_custom_01` belongs
//!   to `rbftest_custom` and never to `rbftest`.
//!
//! The exact tier is consulted across the whole table before the suffix tier.

use crate::core::config::{GroupRule, OrderingConfig, UnmatchedPolicy};
use crate::core::error::ConfigError;
use crate::core::models::{PlannedTest, TestCandidate, TestPlan};
use std::collections::HashSet;

/// Character separating a group name from a test's numeric suffix.
pub const GROUP_SEPARATOR: char = '_';

/// How a base name relates to a group.
/// 基础名称与分组之间的匹配方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Suffixed,
}

impl GroupRule {
    /// The match predicate of this rule.
    pub fn match_tier(&self, name: &str) -> Option<MatchTier> {
        if name == self.name {
            return Some(MatchTier::Exact);
        }
        let (stem, suffix) = name.rsplit_once(GROUP_SEPARATOR)?;
        (stem == self.name && is_test_suffix(suffix)).then_some(MatchTier::Suffixed)
    }
}

fn is_test_suffix(suffix: &str) -> bool {
    suffix.starts_with(|c: char| c.is_ascii_digit())
        && suffix.chars().all(|c| c.is_ascii_alphanumeric())
}

/// A validated group table, highest precedence first.
/// 经过校验的分组表，按优先级从高到低排列。
#[derive(Debug, Clone)]
pub struct GroupTable<'a> {
    rules: &'a [GroupRule],
}

impl<'a> GroupTable<'a> {
    /// Validates the rules: names must be non-empty, free of whitespace and unique.
    pub fn new(rules: &'a [GroupRule]) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for rule in rules {
            if rule.name.is_empty() || rule.name.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidGroupTable(format!(
                    "group name `{}` must be non-empty and contain no whitespace",
                    rule.name
                )));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(ConfigError::InvalidGroupTable(format!(
                    "group `{}` is listed more than once",
                    rule.name
                )));
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &'a [GroupRule] {
        self.rules
    }

    /// Rank of the group a base name belongs to, if any.
    /// 基础名称所属分组的优先级（如有）。
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.find(name, MatchTier::Exact)
            .or_else(|| self.find(name, MatchTier::Suffixed))
    }

    fn find(&self, name: &str, tier: MatchTier) -> Option<usize> {
        self.rules
            .iter()
            .position(|rule| rule.match_tier(name) == Some(tier))
    }
}

/// Creates the ordered test plan for the discovered candidates.
///
/// Candidates are first sorted by absolute path, which is the tie-break inside
/// a group. Each group, in rank order, then takes every still-unplaced
/// candidate assigned to it. Candidates fitting no group are rejected or
/// appended according to `config.unmatched`.
///
/// # Arguments
/// * `candidates` - The discovered candidates, in any order
/// * `config` - Group table and unmatched-name policy
///
/// # Returns
/// The `TestPlan`, or a `ConfigError` for an invalid table or illegal test names.
///
/// 为已发现的候选项创建有序的测试计划。
pub fn plan_execution(
    candidates: impl IntoIterator<Item = TestCandidate>,
    config: &OrderingConfig,
) -> Result<TestPlan, ConfigError> {
    let table = GroupTable::new(&config.groups)?;

    let mut sorted: Vec<TestCandidate> = candidates.into_iter().collect();
    sorted.sort();
    sorted.dedup();

    let assigned: Vec<(TestCandidate, Option<usize>)> = sorted
        .into_iter()
        .map(|candidate| {
            let rank = table.rank_of(candidate.name());
            (candidate, rank)
        })
        .collect();

    let mut entries = Vec::with_capacity(assigned.len());
    for (rank, rule) in table.rules().iter().enumerate() {
        entries.extend(
            assigned
                .iter()
                .filter(|(_, assigned_rank)| *assigned_rank == Some(rank))
                .map(|(candidate, _)| PlannedTest {
                    candidate: candidate.clone(),
                    group: Some(rule.name.clone()),
                }),
        );
    }

    let unmatched: Vec<&TestCandidate> = assigned
        .iter()
        .filter(|(_, rank)| rank.is_none())
        .map(|(candidate, _)| candidate)
        .collect();

    if !unmatched.is_empty() {
        match config.unmatched {
            UnmatchedPolicy::Reject => {
                return Err(ConfigError::IllegalTestName(
                    unmatched.iter().map(|c| c.name().to_string()).collect(),
                ));
            }
            UnmatchedPolicy::Append => {
                tracing::debug!(count = unmatched.len(), "appending tests outside every group");
                entries.extend(unmatched.into_iter().map(|candidate| PlannedTest {
                    candidate: candidate.clone(),
                    group: None,
                }));
            }
        }
    }

    Ok(TestPlan::new(entries))
}
