//! Typed progress records over the record store
//!
//! Math scores, letter progress, favorite stories, and the profile/settings
//! singletons.

use chrono::Utc;
use xuetong_algo::{Difficulty, Operation};

use crate::store::{
    AppSettings, CollectionKey, FavoriteStoryRecord, Language, LetterProgressRecord,
    PracticeResultRecord, RecordStore, SingletonKey, StoreResult, UserProfile,
};

#[derive(Clone)]
pub struct ProgressRecords {
    store: RecordStore,
}

impl ProgressRecords {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    // ========== 练习成绩 ==========

    pub async fn save_math_score(&self, record: &PracticeResultRecord) -> StoreResult<()> {
        record.validate()?;
        self.store.append(CollectionKey::MathScores, record).await
    }

    pub async fn math_scores(&self) -> StoreResult<Vec<PracticeResultRecord>> {
        self.store.read_all(CollectionKey::MathScores).await
    }

    /// Best per-session accuracy (0-100) for an operation/difficulty pair
    pub async fn best_math_score(
        &self,
        operation: Operation,
        difficulty: Difficulty,
    ) -> StoreResult<f64> {
        let best = self
            .math_scores()
            .await?
            .iter()
            .filter(|s| s.operation == operation && s.difficulty == difficulty)
            .filter(|s| s.total_attempted > 0)
            .map(|s| s.correct_count as f64 / s.total_attempted as f64 * 100.0)
            .fold(0.0, f64::max);
        Ok(best)
    }

    // ========== 字母进度 ==========

    pub async fn save_letter_progress(&self, record: &LetterProgressRecord) -> StoreResult<()> {
        self.store
            .append(CollectionKey::LearningProgress, record)
            .await
    }

    pub async fn learning_progress(&self) -> StoreResult<Vec<LetterProgressRecord>> {
        self.store.read_all(CollectionKey::LearningProgress).await
    }

    /// First stored record for a letter in the given language
    pub async fn letter_progress(
        &self,
        letter_id: &str,
        language: Language,
    ) -> StoreResult<Option<LetterProgressRecord>> {
        Ok(self
            .learning_progress()
            .await?
            .into_iter()
            .find(|p| p.letter_id == letter_id && p.language == language))
    }

    // ========== 收藏故事 ==========

    pub async fn save_favorite_story(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        words: Vec<String>,
    ) -> StoreResult<FavoriteStoryRecord> {
        let story = FavoriteStoryRecord {
            title: title.into(),
            content: content.into(),
            words,
            timestamp: Utc::now(),
        };
        self.store
            .append(CollectionKey::FavoriteStories, &story)
            .await?;
        Ok(story)
    }

    pub async fn favorite_stories(&self) -> StoreResult<Vec<FavoriteStoryRecord>> {
        self.store.read_all(CollectionKey::FavoriteStories).await
    }

    pub async fn delete_favorite_story(&self, index: usize) -> StoreResult<()> {
        self.store
            .delete_at(CollectionKey::FavoriteStories, index)
            .await
    }

    // ========== 用户资料与设置 ==========

    pub async fn save_user_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        self.store.set(SingletonKey::UserProfile, profile).await
    }

    pub async fn user_profile(&self) -> StoreResult<Option<UserProfile>> {
        self.store.get(SingletonKey::UserProfile).await
    }

    pub async fn save_settings(&self, settings: &AppSettings) -> StoreResult<()> {
        self.store.set(SingletonKey::Settings, settings).await
    }

    /// Stored settings, or the defaults when none were saved
    pub async fn settings(&self) -> StoreResult<AppSettings> {
        Ok(self
            .store
            .get::<AppSettings>(SingletonKey::Settings)
            .await?
            .unwrap_or_default())
    }

    pub async fn set_onboarding_completed(&self, completed: bool) -> StoreResult<()> {
        self.store
            .set(SingletonKey::OnboardingCompleted, &completed)
            .await
    }

    pub async fn is_onboarding_completed(&self) -> StoreResult<bool> {
        Ok(self
            .store
            .get::<bool>(SingletonKey::OnboardingCompleted)
            .await?
            .unwrap_or(false))
    }

    pub async fn clear_all(&self) -> StoreResult<()> {
        self.store.reset().await
    }
}
