#![allow(dead_code)]

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use xuetong_engine::algo::{Difficulty, Operation};
use xuetong_engine::store::{Language, LetterProgressRecord, PracticeResultRecord};

/// Fixed local "now" so day arithmetic does not depend on the wall clock
pub fn fixed_now() -> DateTime<Local> {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .and_then(|dt| dt.and_local_timezone(Local).single())
        .expect("noon is unambiguous")
}

pub fn days_ago(now: DateTime<Local>, days: i64) -> DateTime<Utc> {
    (now - Duration::days(days)).with_timezone(&Utc)
}

pub fn math(correct: u32, total: u32, timestamp: DateTime<Utc>) -> PracticeResultRecord {
    PracticeResultRecord::new(
        Operation::Addition,
        Difficulty::Easy,
        correct,
        total,
        timestamp,
    )
    .expect("valid record")
}

pub fn letter(letter_id: &str, completed: bool, timestamp: DateTime<Utc>) -> LetterProgressRecord {
    LetterProgressRecord {
        letter_id: letter_id.to_string(),
        language: Language::English,
        completed,
        score: None,
        timestamp,
    }
}
