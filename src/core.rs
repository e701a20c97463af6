//! # Core Module / 核心模块
//!
//! This module contains the pipeline of the suite runner: configuration,
//! discovery, planning, execution, classification and the data models
//! passed between them.
//!
//! 此模块包含套件运行器的流水线：配置、发现、计划、执行、分类，
//! 以及在它们之间传递的数据模型。

pub mod classifier;
pub mod config;
pub mod discovery;
pub mod error;
pub mod execution;
pub mod models;
pub mod planner;

// Re-exports
pub use config::SuiteConfig;
pub use error::ConfigError;
pub use execution::{Executor, TestRun};
pub use models::{ExecutionResult, RunSummary, TestCandidate, TestPlan};
