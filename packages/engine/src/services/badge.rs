use serde::{Deserialize, Serialize};

use crate::services::analytics::OverallProgress;

pub const LETTER_EXPLORER_LETTERS: u32 = 10;
pub const ALPHABET_MASTER_LETTERS: u32 = 26;
pub const MATH_BEGINNER_PROBLEMS: u64 = 10;
pub const MATH_PRO_PROBLEMS: u64 = 50;
pub const MATH_CHAMPION_PROBLEMS: u64 = 100;
pub const SHARP_SHOOTER_ACCURACY: u32 = 80;
pub const PERFECTIONIST_ACCURACY: u32 = 95;
pub const STORYTELLER_STORIES: u32 = 5;
pub const AUTHOR_STORIES: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    LetterExplorer,
    AlphabetMaster,
    MathBeginner,
    MathPro,
    MathChampion,
    SharpShooter,
    Perfectionist,
    Storyteller,
    Author,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::LetterExplorer => "📚 Letter Explorer",
            Badge::AlphabetMaster => "🎓 Alphabet Master",
            Badge::MathBeginner => "🧮 Math Beginner",
            Badge::MathPro => "🔢 Math Pro",
            Badge::MathChampion => "🏆 Math Champion",
            Badge::SharpShooter => "🎯 Sharp Shooter",
            Badge::Perfectionist => "⭐ Perfectionist",
            Badge::Storyteller => "📖 Storyteller",
            Badge::Author => "✍️ Author",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievements {
    pub badges: Vec<Badge>,
    pub next_milestone: String,
}

impl Achievements {
    pub fn labels(&self) -> Vec<&'static str> {
        self.badges.iter().map(Badge::label).collect()
    }
}

/// Every badge whose threshold is met, in display order. Thresholds are
/// independent, so higher tiers come with the lower ones.
pub fn earned_badges(progress: &OverallProgress) -> Vec<Badge> {
    let checks = [
        (progress.letters_learned >= LETTER_EXPLORER_LETTERS, Badge::LetterExplorer),
        (progress.letters_learned >= ALPHABET_MASTER_LETTERS, Badge::AlphabetMaster),
        (progress.math_problems_completed >= MATH_BEGINNER_PROBLEMS, Badge::MathBeginner),
        (progress.math_problems_completed >= MATH_PRO_PROBLEMS, Badge::MathPro),
        (progress.math_problems_completed >= MATH_CHAMPION_PROBLEMS, Badge::MathChampion),
        (progress.accuracy_percent >= SHARP_SHOOTER_ACCURACY, Badge::SharpShooter),
        (progress.accuracy_percent >= PERFECTIONIST_ACCURACY, Badge::Perfectionist),
        (progress.stories_created >= STORYTELLER_STORIES, Badge::Storyteller),
        (progress.stories_created >= AUTHOR_STORIES, Badge::Author),
    ];

    checks
        .into_iter()
        .filter_map(|(met, badge)| met.then_some(badge))
        .collect()
}

/// Nearest unmet entry-level milestone, letters first, then math, then stories
pub fn next_milestone(progress: &OverallProgress) -> String {
    if progress.letters_learned < LETTER_EXPLORER_LETTERS {
        format!(
            "Learn {} more letters to become a Letter Explorer!",
            LETTER_EXPLORER_LETTERS - progress.letters_learned
        )
    } else if progress.math_problems_completed < MATH_BEGINNER_PROBLEMS {
        format!(
            "Solve {} more problems to become a Math Beginner!",
            MATH_BEGINNER_PROBLEMS - progress.math_problems_completed
        )
    } else if progress.stories_created < STORYTELLER_STORIES {
        format!(
            "Create {} more stories to become a Storyteller!",
            STORYTELLER_STORIES - progress.stories_created
        )
    } else {
        "Keep learning!".to_string()
    }
}

pub fn evaluate(progress: &OverallProgress) -> Achievements {
    Achievements {
        badges: earned_badges(progress),
        next_milestone: next_milestone(progress),
    }
}
