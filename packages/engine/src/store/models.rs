//! 持久化数据模型
//!
//! 所有记录以 JSON (camelCase) 形式保存。读取时缺失的字段使用默认值，
//! 以便旧版本写入的数据在新增字段后仍可解析。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xuetong_algo::{Difficulty, Operation};

use crate::store::{StoreError, StoreResult};

/// `round(100 * correct / total)`，分母为 0 时返回 0
pub fn accuracy_percent(correct: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

// ============================================================
// 练习成绩
// ============================================================

/// 一次完成的算术练习
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResultRecord {
    pub operation: Operation,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// 答对题数 (旧字段名 `score`)
    #[serde(default, alias = "score")]
    pub correct_count: u32,
    /// 作答总数 (旧字段名 `totalProblems`)
    #[serde(default, alias = "totalProblems")]
    pub total_attempted: u32,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
}

impl PracticeResultRecord {
    pub fn new(
        operation: Operation,
        difficulty: Difficulty,
        correct_count: u32,
        total_attempted: u32,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<Self> {
        let record = Self {
            operation,
            difficulty,
            correct_count,
            total_attempted,
            timestamp,
        };
        record.validate()?;
        Ok(record)
    }

    /// 检查 `correct_count <= total_attempted`
    pub fn validate(&self) -> StoreResult<()> {
        if self.correct_count > self.total_attempted {
            return Err(StoreError::InvalidRecord(format!(
                "答对题数 {} 超过作答总数 {}",
                self.correct_count, self.total_attempted
            )));
        }
        Ok(())
    }

    pub fn accuracy_percent(&self) -> u32 {
        accuracy_percent(self.correct_count as u64, self.total_attempted as u64)
    }
}

// ============================================================
// 字母学习进度
// ============================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Bangla,
    #[default]
    English,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterProgressRecord {
    pub letter_id: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
}

// ============================================================
// 收藏的故事
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStoryRecord {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
}

// ============================================================
// 单例对象
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub language: Language,
    pub volume: f64,
    pub sound_effects: bool,
    pub haptic_feedback: bool,
    pub theme: Theme,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: Language::English,
            volume: 0.8,
            sound_effects: true,
            haptic_feedback: true,
            theme: Theme::Light,
        }
    }
}
