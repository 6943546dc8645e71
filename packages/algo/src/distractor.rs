//! Multiple-choice distractors
//!
//! Wrong answers are drawn as `answer ± offset` with `offset ∈ [1, 10]`, so
//! they stay close enough to the correct value to be plausible.

use rand::prelude::*;

use crate::types::PracticeProblem;

/// Options shown for a multiple-choice round
pub const DEFAULT_OPTION_COUNT: usize = 4;

/// Largest offset between a distractor and the correct answer
const MAX_OFFSET: u32 = 10;

/// Random draws before falling back to deterministic padding
const MAX_DRAW_ATTEMPTS: usize = 1000;

/// Build `count` distinct options containing `problem.answer` exactly once.
///
/// Every distractor is positive. Draws are capped at [`MAX_DRAW_ATTEMPTS`];
/// after that the set is padded with `answer + 1`, `answer + 2`, ... so the
/// call always terminates. The result is shuffled. A `count` of 0 is
/// treated as 1.
pub fn options_with<R: Rng + ?Sized>(
    rng: &mut R,
    problem: &PracticeProblem,
    count: usize,
) -> Vec<u32> {
    let count = count.max(1);
    let answer = problem.answer;

    let mut options = Vec::with_capacity(count);
    options.push(answer);

    let mut attempts = 0;
    while options.len() < count && attempts < MAX_DRAW_ATTEMPTS {
        attempts += 1;

        let offset = rng.gen_range(1..=MAX_OFFSET);
        let candidate = if rng.gen_bool(0.5) {
            answer.checked_add(offset)
        } else {
            answer.checked_sub(offset)
        };

        match candidate {
            Some(value) if value > 0 && !options.contains(&value) => options.push(value),
            _ => {}
        }
    }

    let mut k = 1u32;
    while options.len() < count {
        let value = answer.saturating_add(k);
        if !options.contains(&value) {
            options.push(value);
        }
        k += 1;
    }

    options.shuffle(rng);
    options
}
