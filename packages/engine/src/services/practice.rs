use chrono::Utc;
use xuetong_algo::{Difficulty, Operation, PracticeProblem};

use crate::services::records::ProgressRecords;
use crate::store::{accuracy_percent, PracticeResultRecord, StoreResult};

/// Running tally of one practice session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSession {
    operation: Operation,
    difficulty: Difficulty,
    score: u32,
    total: u32,
}

impl PracticeSession {
    pub fn new(operation: Operation, difficulty: Difficulty) -> Self {
        Self {
            operation,
            difficulty,
            score: 0,
            total: 0,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Record an answer; returns whether it was correct
    pub fn submit(&mut self, problem: &PracticeProblem, answer: u32) -> bool {
        let correct = problem.is_correct(answer);
        self.total += 1;
        if correct {
            self.score += 1;
        }
        correct
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn accuracy_percent(&self) -> u32 {
        accuracy_percent(self.score as u64, self.total as u64)
    }

    pub fn to_record(&self) -> StoreResult<PracticeResultRecord> {
        PracticeResultRecord::new(
            self.operation,
            self.difficulty,
            self.score,
            self.total,
            Utc::now(),
        )
    }

    /// Persist the session. Sessions with no attempts are not recorded.
    pub async fn finish(
        self,
        records: &ProgressRecords,
    ) -> StoreResult<Option<PracticeResultRecord>> {
        if self.total == 0 {
            tracing::debug!(operation = %self.operation, "empty practice session discarded");
            return Ok(None);
        }

        let record = self.to_record()?;
        records.save_math_score(&record).await?;
        tracing::info!(
            operation = %self.operation,
            difficulty = %self.difficulty,
            score = self.score,
            total = self.total,
            "practice session recorded"
        );
        Ok(Some(record))
    }
}
