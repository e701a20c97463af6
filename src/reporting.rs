//! # Reporting Module / 报告模块
//!
//! This module handles the display of the run on the console: the planned
//! order, per-test blocks and the final summary, with internationalization
//! support.
//!
//! 此模块处理运行过程在控制台上的显示：计划顺序、单个测试输出块和最终摘要，
//! 支持国际化。

pub mod console;

// Re-export common reporting functions
pub use console::{print_plan, print_summary, print_test_block};
