//! # xuetong-algo - 算术练习内容生成库
//!
//! 本 crate 提供纯 Rust 实现的练习题生成算法:
//!
//! - **Problem Generator** - 按运算与难度生成带计数图示的算术题
//! - **Distractor Generator** - 为选择题生成合理的错误选项
//!
//! ## 设计理念
//!
//! - **纯函数** - 除随机源外无副作用，所有分支按构造保证整数答案
//! - **可复现** - 随机源可注入 (`ChaCha8Rng`)，相同种子产生相同题目序列
//!
//! ## 模块结构
//!
//! - [`types`] - 运算、难度、题目与图示分组
//! - [`generator`] - 题目生成
//! - [`distractor`] - 选择题干扰项
//!
//! ## 使用示例
//!
//! ```rust
//! use xuetong_algo::{Difficulty, Operation, ProblemGenerator};
//!
//! let mut generator = ProblemGenerator::with_seed(7);
//! let problem = generator.generate(Operation::Division, Difficulty::Medium);
//! assert_eq!(problem.operands[0] % problem.operands[1], 0);
//!
//! let options = generator.options(&problem, 4);
//! assert!(options.contains(&problem.answer));
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod distractor;
pub mod generator;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

/// 重新导出题目生成器
pub use generator::{generate_batch_with, generate_with, ProblemGenerator};

/// 重新导出干扰项生成
pub use distractor::{options_with, DEFAULT_OPTION_COUNT};
