//! Common Types and Constants
//!
//! Shared data structures used by the generator and distractor modules.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==================== Constants ====================

/// Rendering palette for visual groups
pub const PALETTE: [&str; 7] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE",
];

/// Smallest operand drawn for any operation
pub const MIN_OPERAND: u32 = 1;

// ==================== Errors ====================

/// 枚举解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("未知运算类型: {0}")]
    UnknownOperation(String),

    #[error("未知难度: {0}")]
    UnknownDifficulty(String),
}

// ==================== Operation ====================

/// Arithmetic operation of a practice problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
        }
    }

    /// Prefix used in generated problem ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Operation::Addition => "add",
            Operation::Subtraction => "sub",
            Operation::Multiplication => "mul",
            Operation::Division => "div",
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operation::Addition => '+',
            Operation::Subtraction => '-',
            Operation::Multiplication => '×',
            Operation::Division => '÷',
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "addition" => Ok(Operation::Addition),
            "subtraction" => Ok(Operation::Subtraction),
            "multiplication" => Ok(Operation::Multiplication),
            "division" => Ok(Operation::Division),
            _ => Err(ParseError::UnknownOperation(s.to_string())),
        }
    }
}

// ==================== Difficulty ====================

/// Difficulty level of a practice problem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Operand range for addition and subtraction
    pub fn number_range(&self) -> RangeInclusive<u32> {
        match self {
            Difficulty::Easy => MIN_OPERAND..=10,
            Difficulty::Medium => MIN_OPERAND..=20,
            Difficulty::Hard => MIN_OPERAND..=50,
        }
    }

    /// Per-operand cap for multiplication and division, kept small so the
    /// groups stay renderable
    pub fn product_cap(&self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 12,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseError::UnknownDifficulty(s.to_string())),
        }
    }
}

// ==================== Visual Groups ====================

/// Icon drawn for counting aids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Apple,
    Balloon,
    Star,
    Heart,
    Animal,
}

impl IconKind {
    pub const ALL: [IconKind; 5] = [
        IconKind::Apple,
        IconKind::Balloon,
        IconKind::Star,
        IconKind::Heart,
        IconKind::Animal,
    ];
}

/// A cluster of identical icons representing one operand or partial product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualGroup {
    pub icon_kind: IconKind,
    pub count: u32,
    /// Hex color from [`PALETTE`]
    pub color: String,
}

// ==================== Problem ====================

/// A generated practice problem. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeProblem {
    pub id: String,
    pub operation: Operation,
    pub question_text: String,
    pub operands: [u32; 2],
    pub answer: u32,
    pub difficulty: Difficulty,
    pub visual_groups: Vec<VisualGroup>,
}

impl PracticeProblem {
    /// 判断用户答案是否正确
    pub fn is_correct(&self, answer: u32) -> bool {
        answer == self.answer
    }

    /// Total icons across all visual groups
    pub fn icon_total(&self) -> u32 {
        self.visual_groups.iter().map(|g| g.count).sum()
    }
}
