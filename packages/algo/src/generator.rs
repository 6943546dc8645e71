//! Practice Problem Generator
//!
//! Produces arithmetic problems scaled by difficulty, with visual groups for
//! pictorial counting.
//!
//! Construction guarantees:
//! - subtraction never goes negative (second operand drawn from `[min, a]`)
//! - division is always exact (dividend built as divisor × quotient)
//! - multiplication is shown as `a` groups of `b` icons

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::distractor;
use crate::types::{
    Difficulty, IconKind, Operation, PracticeProblem, VisualGroup, MIN_OPERAND, PALETTE,
};

// ==================== Generator ====================

/// Seedable problem generator
pub struct ProblemGenerator {
    rng: ChaCha8Rng,
}

impl Default for ProblemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemGenerator {
    /// Create a generator seeded from the system clock
    pub fn new() -> Self {
        let seed = {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        };
        Self::with_seed(seed)
    }

    /// Create a generator with a fixed seed (for testing)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Reset the random source
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn generate(&mut self, operation: Operation, difficulty: Difficulty) -> PracticeProblem {
        generate_with(&mut self.rng, operation, difficulty)
    }

    pub fn generate_batch(
        &mut self,
        count: usize,
        operations: &[Operation],
        difficulty: Difficulty,
    ) -> Vec<PracticeProblem> {
        generate_batch_with(&mut self.rng, count, operations, difficulty)
    }

    /// Multiple-choice options for `problem`, see [`distractor::options_with`]
    pub fn options(&mut self, problem: &PracticeProblem, count: usize) -> Vec<u32> {
        distractor::options_with(&mut self.rng, problem, count)
    }
}

// ==================== Generation ====================

/// Generate one problem from the given random source
pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    operation: Operation,
    difficulty: Difficulty,
) -> PracticeProblem {
    match operation {
        Operation::Addition => generate_addition(rng, difficulty),
        Operation::Subtraction => generate_subtraction(rng, difficulty),
        Operation::Multiplication => generate_multiplication(rng, difficulty),
        Operation::Division => generate_division(rng, difficulty),
    }
}

/// Generate `count` problems, each with an operation drawn uniformly from
/// `operations`. An empty operation set yields no problems.
pub fn generate_batch_with<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    operations: &[Operation],
    difficulty: Difficulty,
) -> Vec<PracticeProblem> {
    if operations.is_empty() {
        return Vec::new();
    }

    let mut problems = Vec::with_capacity(count);
    for _ in 0..count {
        let operation = operations[rng.gen_range(0..operations.len())];
        problems.push(generate_with(rng, operation, difficulty));
    }
    problems
}

fn generate_addition<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> PracticeProblem {
    let range = difficulty.number_range();
    let a = rng.gen_range(range.clone());
    let b = rng.gen_range(range);

    let icon = pick_icon(rng);
    let (first, second) = pick_two_colors(rng);
    let visual_groups = vec![group(icon, a, first), group(icon, b, second)];

    build(rng, Operation::Addition, difficulty, [a, b], a + b, visual_groups)
}

fn generate_subtraction<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> PracticeProblem {
    let range = difficulty.number_range();
    let a = rng.gen_range(range.clone());
    let b = rng.gen_range(*range.start()..=a);

    let icon = pick_icon(rng);
    let (first, second) = pick_two_colors(rng);
    let visual_groups = vec![group(icon, a, first), group(icon, b, second)];

    build(rng, Operation::Subtraction, difficulty, [a, b], a - b, visual_groups)
}

fn generate_multiplication<R: Rng + ?Sized>(
    rng: &mut R,
    difficulty: Difficulty,
) -> PracticeProblem {
    let cap = difficulty.product_cap();
    let a = rng.gen_range(MIN_OPERAND..=cap);
    let b = rng.gen_range(MIN_OPERAND..=cap);

    let icon = pick_icon(rng);
    let start = rng.gen_range(0..PALETTE.len());
    let visual_groups = (0..a as usize)
        .map(|i| group(icon, b, PALETTE[(start + i) % PALETTE.len()]))
        .collect();

    build(rng, Operation::Multiplication, difficulty, [a, b], a * b, visual_groups)
}

fn generate_division<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> PracticeProblem {
    let cap = difficulty.product_cap();
    let divisor = rng.gen_range(MIN_OPERAND..=cap);
    let quotient = rng.gen_range(MIN_OPERAND..=cap);
    let dividend = divisor * quotient;

    let icon = pick_icon(rng);
    let color = PALETTE[rng.gen_range(0..PALETTE.len())];
    let visual_groups = vec![group(icon, dividend, color)];

    build(
        rng,
        Operation::Division,
        difficulty,
        [dividend, divisor],
        quotient,
        visual_groups,
    )
}

// ==================== Helpers ====================

fn build<R: Rng + ?Sized>(
    rng: &mut R,
    operation: Operation,
    difficulty: Difficulty,
    operands: [u32; 2],
    answer: u32,
    visual_groups: Vec<VisualGroup>,
) -> PracticeProblem {
    PracticeProblem {
        id: format!("{}-{:08x}", operation.id_prefix(), rng.gen::<u32>()),
        operation,
        question_text: format!("{} {} {} = ?", operands[0], operation.symbol(), operands[1]),
        operands,
        answer,
        difficulty,
        visual_groups,
    }
}

fn group(icon_kind: IconKind, count: u32, color: &str) -> VisualGroup {
    VisualGroup {
        icon_kind,
        count,
        color: color.to_string(),
    }
}

fn pick_icon<R: Rng + ?Sized>(rng: &mut R) -> IconKind {
    IconKind::ALL[rng.gen_range(0..IconKind::ALL.len())]
}

/// Two distinct palette entries
fn pick_two_colors<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
    let first = rng.gen_range(0..PALETTE.len());
    let second = (first + rng.gen_range(1..PALETTE.len())) % PALETTE.len();
    (PALETTE[first], PALETTE[second])
}
