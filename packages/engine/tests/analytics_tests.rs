mod common;

use chrono::Utc;

use common::{days_ago, fixed_now, letter, math};
use xuetong_engine::store::{CollectionKey, RecordStore};
use xuetong_engine::{Badge, OverallProgress, ProgressAnalytics, ProgressRecords};

async fn seed_math(store: &RecordStore, records: &[(u32, u32)]) {
    for &(correct, total) in records {
        store
            .append(CollectionKey::MathScores, &math(correct, total, Utc::now()))
            .await
            .unwrap();
    }
}

// ============================================================================
// overall_progress
// ============================================================================

#[tokio::test]
async fn test_empty_store_has_zero_accuracy() {
    let analytics = ProgressAnalytics::new(RecordStore::in_memory());
    let progress = analytics.overall_progress().await.unwrap();
    assert_eq!(progress, OverallProgress::default());
    assert_eq!(progress.accuracy_percent, 0);
}

#[tokio::test]
async fn test_accuracy_is_pooled_over_all_sessions() {
    let store = RecordStore::in_memory();
    seed_math(&store, &[(7, 10), (3, 10)]).await;

    let progress = ProgressAnalytics::new(store)
        .overall_progress()
        .await
        .unwrap();
    assert_eq!(progress.accuracy_percent, 50);
    assert_eq!(progress.math_problems_completed, 20);
}

#[tokio::test]
async fn test_letters_and_stories_are_counted() {
    let store = RecordStore::in_memory();
    let records = ProgressRecords::new(store.clone());
    let now = Utc::now();

    records.save_letter_progress(&letter("a", true, now)).await.unwrap();
    records.save_letter_progress(&letter("b", false, now)).await.unwrap();
    records.save_letter_progress(&letter("c", true, now)).await.unwrap();
    records
        .save_favorite_story("The Fox", "Once upon a time", vec!["fox".to_string()])
        .await
        .unwrap();

    let progress = ProgressAnalytics::new(store)
        .overall_progress()
        .await
        .unwrap();
    assert_eq!(progress.letters_learned, 2);
    assert_eq!(progress.stories_created, 1);
    assert_eq!(progress.math_problems_completed, 0);
}

#[tokio::test]
async fn test_overall_progress_is_idempotent() {
    let store = RecordStore::in_memory();
    seed_math(&store, &[(4, 5), (1, 3)]).await;
    let analytics = ProgressAnalytics::new(store);

    let first = analytics.overall_progress().await.unwrap();
    let second = analytics.overall_progress().await.unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// recent_activity
// ============================================================================

#[tokio::test]
async fn test_recent_activity_filters_and_buckets_by_day() {
    let store = RecordStore::in_memory();
    let now = fixed_now();

    for days in [0, 0, 2, 9] {
        store
            .append(CollectionKey::MathScores, &math(1, 1, days_ago(now, days)))
            .await
            .unwrap();
    }
    store
        .append(
            CollectionKey::LearningProgress,
            &letter("a", true, days_ago(now, 2)),
        )
        .await
        .unwrap();

    let activity = ProgressAnalytics::new(store)
        .recent_activity_at(7, now)
        .await
        .unwrap();

    assert_eq!(activity.recent_math_scores.len(), 3);
    assert_eq!(activity.recent_letter_records.len(), 1);

    let today = now.date_naive();
    let two_days_ago = today - chrono::Duration::days(2);
    assert_eq!(activity.daily_activity.len(), 2);
    assert_eq!(activity.daily_activity.get(&today), Some(&2));
    assert_eq!(activity.daily_activity.get(&two_days_ago), Some(&2));
}

// ============================================================================
// learning_streak
// ============================================================================

async fn streak_for(days_active: &[i64]) -> u32 {
    let store = RecordStore::in_memory();
    let now = fixed_now();
    for &days in days_active {
        store
            .append(CollectionKey::MathScores, &math(1, 1, days_ago(now, days)))
            .await
            .unwrap();
    }
    ProgressAnalytics::new(store)
        .learning_streak_at(now)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_streak_of_three_consecutive_days() {
    assert_eq!(streak_for(&[0, 1, 2]).await, 3);
}

#[tokio::test]
async fn test_streak_stops_at_gap() {
    assert_eq!(streak_for(&[0, 3]).await, 1);
}

#[tokio::test]
async fn test_streak_without_activity_is_zero() {
    assert_eq!(streak_for(&[]).await, 0);
}

#[tokio::test]
async fn test_streak_still_counts_from_yesterday() {
    assert_eq!(streak_for(&[1, 2]).await, 2);
}

#[tokio::test]
async fn test_streak_broken_when_last_activity_is_old() {
    assert_eq!(streak_for(&[2, 3, 4]).await, 0);
}

#[tokio::test]
async fn test_streak_mixes_letters_and_math() {
    let store = RecordStore::in_memory();
    let now = fixed_now();
    store
        .append(CollectionKey::MathScores, &math(1, 1, days_ago(now, 0)))
        .await
        .unwrap();
    store
        .append(
            CollectionKey::LearningProgress,
            &letter("k", false, days_ago(now, 1)),
        )
        .await
        .unwrap();

    let streak = ProgressAnalytics::new(store)
        .learning_streak_at(now)
        .await
        .unwrap();
    assert_eq!(streak, 2);
}

#[tokio::test]
async fn test_streak_window_is_thirty_days() {
    let days: Vec<i64> = (0..=40).collect();
    assert_eq!(streak_for(&days).await, 31);
}

// ============================================================================
// achievements
// ============================================================================

#[tokio::test]
async fn test_achievements_follow_stored_progress() {
    let store = RecordStore::in_memory();
    seed_math(&store, &[(8, 10), (9, 10)]).await;

    let achievements = ProgressAnalytics::new(store)
        .achievements()
        .await
        .unwrap();

    assert_eq!(
        achievements.badges,
        vec![Badge::MathBeginner, Badge::SharpShooter]
    );
    assert_eq!(
        achievements.next_milestone,
        "Learn 10 more letters to become a Letter Explorer!"
    );
}

#[tokio::test]
async fn test_log_session_does_not_touch_store() {
    let store = RecordStore::in_memory();
    let analytics = ProgressAnalytics::new(store.clone());
    analytics.log_session(15);

    let progress = analytics.overall_progress().await.unwrap();
    assert_eq!(progress, OverallProgress::default());
}

#[tokio::test]
async fn test_recent_activity_with_oversized_window() {
    let store = RecordStore::in_memory();
    let now = fixed_now();
    store
        .append(CollectionKey::MathScores, &math(2, 2, days_ago(now, 4000)))
        .await
        .unwrap();
    let analytics = ProgressAnalytics::new(store);

    let activity = analytics.recent_activity(u32::MAX).await.unwrap();
    assert_eq!(activity.recent_math_scores.len(), 1);

    let activity = analytics.recent_activity(365 * 300_000).await.unwrap();
    assert_eq!(activity.recent_math_scores.len(), 1);
}
