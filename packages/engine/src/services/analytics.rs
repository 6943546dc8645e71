use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::services::badge::{self, Achievements};
use crate::store::{
    accuracy_percent, CollectionKey, FavoriteStoryRecord, LetterProgressRecord,
    PracticeResultRecord, RecordStore, StoreResult,
};

/// Window used for streak computation
pub const STREAK_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallProgress {
    pub letters_learned: u32,
    pub math_problems_completed: u64,
    pub stories_created: u32,
    pub accuracy_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub recent_math_scores: Vec<PracticeResultRecord>,
    pub recent_letter_records: Vec<LetterProgressRecord>,
    /// Local calendar date -> number of records
    pub daily_activity: BTreeMap<NaiveDate, u32>,
}

#[derive(Clone)]
pub struct ProgressAnalytics {
    store: RecordStore,
}

impl ProgressAnalytics {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub async fn overall_progress(&self) -> StoreResult<OverallProgress> {
        let letters: Vec<LetterProgressRecord> =
            self.store.read_all(CollectionKey::LearningProgress).await?;
        let scores: Vec<PracticeResultRecord> =
            self.store.read_all(CollectionKey::MathScores).await?;
        let stories: Vec<FavoriteStoryRecord> =
            self.store.read_all(CollectionKey::FavoriteStories).await?;

        Ok(summarize(&letters, &scores, stories.len()))
    }

    pub async fn recent_activity(&self, days: u32) -> StoreResult<RecentActivity> {
        self.recent_activity_at(days, Local::now()).await
    }

    pub async fn recent_activity_at(
        &self,
        days: u32,
        now: DateTime<Local>,
    ) -> StoreResult<RecentActivity> {
        let scores: Vec<PracticeResultRecord> =
            self.store.read_all(CollectionKey::MathScores).await?;
        let letters: Vec<LetterProgressRecord> =
            self.store.read_all(CollectionKey::LearningProgress).await?;

        Ok(filter_recent(scores, letters, days, now))
    }

    pub async fn achievements(&self) -> StoreResult<Achievements> {
        let progress = self.overall_progress().await?;
        Ok(badge::evaluate(&progress))
    }

    pub async fn learning_streak(&self) -> StoreResult<u32> {
        self.learning_streak_at(Local::now()).await
    }

    pub async fn learning_streak_at(&self, now: DateTime<Local>) -> StoreResult<u32> {
        let activity = self.recent_activity_at(STREAK_WINDOW_DAYS, now).await?;
        let dates: Vec<NaiveDate> = activity.daily_activity.into_keys().collect();
        Ok(streak_from_dates(&dates, now.date_naive()))
    }

    pub fn log_session(&self, duration_minutes: u32) {
        tracing::info!(duration_minutes, "learning session logged");
    }
}

pub fn summarize(
    letters: &[LetterProgressRecord],
    scores: &[PracticeResultRecord],
    stories_created: usize,
) -> OverallProgress {
    let letters_learned = letters.iter().filter(|p| p.completed).count() as u32;

    let (correct, total) = scores.iter().fold((0u64, 0u64), |(c, t), s| {
        (c + s.correct_count as u64, t + s.total_attempted as u64)
    });

    OverallProgress {
        letters_learned,
        math_problems_completed: total,
        stories_created: stories_created as u32,
        accuracy_percent: accuracy_percent(correct, total),
    }
}

pub fn filter_recent(
    scores: Vec<PracticeResultRecord>,
    letters: Vec<LetterProgressRecord>,
    days: u32,
    now: DateTime<Local>,
) -> RecentActivity {
    // 窗口超出 chrono 可表示范围时，全部记录都算近期
    let cutoff = now
        .checked_sub_signed(Duration::days(days as i64))
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let recent_math_scores: Vec<PracticeResultRecord> =
        scores.into_iter().filter(|s| s.timestamp >= cutoff).collect();
    let recent_letter_records: Vec<LetterProgressRecord> =
        letters.into_iter().filter(|l| l.timestamp >= cutoff).collect();

    let mut daily_activity = BTreeMap::new();
    for ts in recent_math_scores
        .iter()
        .map(|s| s.timestamp)
        .chain(recent_letter_records.iter().map(|l| l.timestamp))
    {
        *daily_activity.entry(local_date(ts)).or_insert(0) += 1;
    }

    RecentActivity {
        recent_math_scores,
        recent_letter_records,
        daily_activity,
    }
}

/// Consecutive active days ending today or yesterday. `dates` must be sorted
/// ascending and free of duplicates.
pub fn streak_from_dates(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&latest) = dates.last() else {
        return 0;
    };

    let yesterday = today - Duration::days(1);
    if latest != today && latest != yesterday {
        return 0;
    }

    let mut streak = 1;
    for pair in dates.windows(2).rev() {
        if pair[1].signed_duration_since(pair[0]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

fn local_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_streak_empty_is_zero() {
        assert_eq!(streak_from_dates(&[], day(2024, 5, 10)), 0);
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let dates = [day(2024, 5, 8), day(2024, 5, 9), day(2024, 5, 10)];
        assert_eq!(streak_from_dates(&dates, day(2024, 5, 10)), 3);
    }

    #[test]
    fn test_streak_stops_at_gap() {
        let dates = [day(2024, 5, 7), day(2024, 5, 10)];
        assert_eq!(streak_from_dates(&dates, day(2024, 5, 10)), 1);

        let dates = [day(2024, 5, 1), day(2024, 5, 2), day(2024, 5, 5), day(2024, 5, 6)];
        assert_eq!(streak_from_dates(&dates, day(2024, 5, 6)), 2);
    }

    #[test]
    fn test_streak_alive_from_yesterday() {
        let dates = [day(2024, 5, 8), day(2024, 5, 9)];
        assert_eq!(streak_from_dates(&dates, day(2024, 5, 10)), 2);
    }

    #[test]
    fn test_streak_broken_after_two_idle_days() {
        let dates = [day(2024, 5, 7), day(2024, 5, 8)];
        assert_eq!(streak_from_dates(&dates, day(2024, 5, 10)), 0);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let dates = [day(2024, 2, 28), day(2024, 2, 29), day(2024, 3, 1)];
        assert_eq!(streak_from_dates(&dates, day(2024, 3, 1)), 3);
    }

    #[test]
    fn test_filter_recent_with_huge_window_keeps_everything() {
        let now = Local::now();
        let old = PracticeResultRecord::new(
            xuetong_algo::Operation::Addition,
            xuetong_algo::Difficulty::Easy,
            1,
            2,
            DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
        )
        .unwrap();

        let activity = filter_recent(vec![old], Vec::new(), u32::MAX, now);
        assert_eq!(activity.recent_math_scores.len(), 1);
        assert_eq!(activity.daily_activity.len(), 1);
    }

    #[test]
    fn test_summarize_guards_zero_attempts() {
        let progress = summarize(&[], &[], 0);
        assert_eq!(progress, OverallProgress::default());
    }
}
