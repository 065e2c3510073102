//! Arithmetic question synthesis.
//!
//! Every question carries four distinct candidate answers. Distractors are
//! either drawn close to the correct result, or split between a pool of
//! sign-representable numbers and a pool of larger numbers so that an exact
//! count of the values on screen can only be read as LIBRAS glyphs.

use crate::glyphs::{self, MAX_REPRESENTABLE};
use crate::logger;
use crate::models::{OperandGlyphs, Operation, Question, Tier};
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OPTION_COUNT: usize = 4;
pub const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;
/// Operands, result and distractors.
pub const VALUES_PER_QUESTION: usize = 3 + DISTRACTOR_COUNT;
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

const NEARBY_SPREAD: i64 = 5;
const NEARBY_TRIES: usize = 100;
const MIN_DIVISOR: u32 = 2;
const MAX_DIVISOR: u32 = 10;
const LARGE_POOL_SPAN: u32 = 15;
const LARGE_POOL_MIN_SIZE: u32 = 25;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("representable target {target} exceeds the {max} values shown per question")]
    TargetOutOfRange { target: usize, max: usize },
    #[error("no {operation} question could be built after {attempts} attempts (target {target:?})")]
    Exhausted {
        operation: Operation,
        target: Option<usize>,
        attempts: usize,
    },
}

/// Inclusive operand bounds as entered. `bounds()` gives the range actually
/// sampled: at least 1, never inverted, capped at [`OperandRange::MAX_BOUND`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRange {
    pub min: u32,
    pub max: u32,
}

impl OperandRange {
    pub const MAX_BOUND: u32 = 9_999;

    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn bounds(&self) -> (u32, u32) {
        let lo = self.min.clamp(1, Self::MAX_BOUND);
        let hi = self.max.clamp(lo, Self::MAX_BOUND);
        (lo, hi)
    }

    pub fn contains(&self, value: u32) -> bool {
        let (lo, hi) = self.bounds();
        (lo..=hi).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRanges {
    pub addition: OperandRange,
    pub subtraction: OperandRange,
    pub multiplication: OperandRange,
    /// Bounds the quotient; divisors are always 2 to 10.
    pub division: OperandRange,
}

impl OperationRanges {
    pub fn get(&self, operation: Operation) -> OperandRange {
        match operation {
            Operation::Addition => self.addition,
            Operation::Subtraction => self.subtraction,
            Operation::Multiplication => self.multiplication,
            Operation::Division => self.division,
        }
    }

    pub fn get_mut(&mut self, operation: Operation) -> &mut OperandRange {
        match operation {
            Operation::Addition => &mut self.addition,
            Operation::Subtraction => &mut self.subtraction,
            Operation::Multiplication => &mut self.multiplication,
            Operation::Division => &mut self.division,
        }
    }
}

impl Default for OperationRanges {
    fn default() -> Self {
        Self {
            addition: OperandRange::new(1, 30),
            subtraction: OperandRange::new(1, 50),
            multiplication: OperandRange::new(1, 10),
            division: OperandRange::new(1, 10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistractorPolicy {
    /// Offsets of -5..=4 around the result.
    Nearby,
    /// Exactly `target` representable values among the six shown.
    Tiered { target: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyParams {
    pub range: OperandRange,
    pub distractors: DistractorPolicy,
}

impl DifficultyParams {
    pub fn nearby(range: OperandRange) -> Self {
        Self {
            range,
            distractors: DistractorPolicy::Nearby,
        }
    }

    pub fn for_tier(range: OperandRange, tier: Tier) -> Self {
        Self {
            range,
            distractors: DistractorPolicy::Tiered {
                target: tier.representable_target(),
            },
        }
    }
}

/// Shape of the default session: `per_operation` questions of every
/// operation in each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPlan {
    pub per_operation: usize,
    pub ranges: OperationRanges,
}

impl TierPlan {
    pub fn question_count(&self) -> usize {
        Tier::ALL.len() * Operation::ALL.len() * self.per_operation
    }
}

impl Default for TierPlan {
    fn default() -> Self {
        Self {
            per_operation: 1,
            ranges: OperationRanges::default(),
        }
    }
}

pub struct QuestionGenerator<R = ThreadRng> {
    rng: R,
    next_id: u32,
    max_attempts: usize,
}

impl QuestionGenerator<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for QuestionGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuestionGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            next_id: 1,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Restarts id numbering; ids are unique within one assembled set.
    pub fn reset_ids(&mut self) {
        self.next_id = 1;
    }

    pub fn shuffle(&mut self, questions: &mut [Question]) {
        questions.shuffle(&mut self.rng);
    }

    pub fn generate(
        &mut self,
        operation: Operation,
        params: &DifficultyParams,
    ) -> Result<Question, GeneratorError> {
        if let DistractorPolicy::Tiered { target } = params.distractors
            && target > VALUES_PER_QUESTION
        {
            return Err(GeneratorError::TargetOutOfRange {
                target,
                max: VALUES_PER_QUESTION,
            });
        }

        for _ in 0..self.max_attempts {
            let (operand1, operand2, result) = self.draw_operands(operation, params.range);
            let Some(distractors) =
                self.draw_distractors(result, operand1, operand2, params.distractors)
            else {
                continue;
            };

            let mut options = Vec::with_capacity(OPTION_COUNT);
            options.push(result);
            options.extend(distractors);
            options.shuffle(&mut self.rng);

            let id = self.next_id;
            self.next_id += 1;

            return Ok(Question {
                id,
                operation,
                operand1,
                operand2,
                result,
                options,
                glyphs: OperandGlyphs::for_operands(operand1, operand2),
                tier: None,
            });
        }

        let target = match params.distractors {
            DistractorPolicy::Tiered { target } => Some(target),
            DistractorPolicy::Nearby => None,
        };
        logger::error(&format!(
            "Question generation gave up: {} range {:?} target {:?} after {} attempts",
            operation, params.range, target, self.max_attempts
        ));
        Err(GeneratorError::Exhausted {
            operation,
            target,
            attempts: self.max_attempts,
        })
    }

    /// Builds the default session: every operation once per tier (times
    /// `plan.per_operation`), then shuffled so tier and operation order
    /// carry no signal.
    pub fn default_session(&mut self, plan: &TierPlan) -> Result<Vec<Question>, GeneratorError> {
        self.reset_ids();
        let mut questions = Vec::with_capacity(plan.question_count());

        for tier in Tier::ALL {
            for operation in Operation::ALL {
                let params = DifficultyParams::for_tier(plan.ranges.get(operation), tier);
                for _ in 0..plan.per_operation {
                    let mut question = self.generate(operation, &params)?;
                    question.tier = Some(tier);
                    questions.push(question);
                }
            }
        }

        questions.shuffle(&mut self.rng);
        logger::log(&format!("Generated default session of {} questions", questions.len()));
        Ok(questions)
    }

    fn draw_operands(&mut self, operation: Operation, range: OperandRange) -> (u32, u32, u32) {
        let (lo, hi) = range.bounds();
        match operation {
            Operation::Addition => {
                let a = self.rng.gen_range(lo..=hi);
                let b = self.rng.gen_range(lo..=hi);
                (a, b, a + b)
            }
            Operation::Multiplication => {
                let a = self.rng.gen_range(lo..=hi);
                let b = self.rng.gen_range(lo..=hi);
                (a, b, a * b)
            }
            Operation::Subtraction => {
                // Subtrahend first, then a strictly larger minuend.
                let subtrahend_hi = if hi > lo { hi - 1 } else { lo };
                let b = self.rng.gen_range(lo..=subtrahend_hi);
                let a = self.rng.gen_range(b + 1..=hi.max(b + 1));
                (a, b, a - b)
            }
            Operation::Division => {
                // Quotient and divisor first so the dividend divides exactly.
                let quotient = self.rng.gen_range(lo..=hi);
                let divisor_hi = hi.clamp(MIN_DIVISOR, MAX_DIVISOR);
                let divisor = self.rng.gen_range(MIN_DIVISOR..=divisor_hi);
                (quotient * divisor, divisor, quotient)
            }
        }
    }

    fn draw_distractors(
        &mut self,
        result: u32,
        operand1: u32,
        operand2: u32,
        policy: DistractorPolicy,
    ) -> Option<Vec<u32>> {
        match policy {
            DistractorPolicy::Nearby => self.nearby_distractors(result),
            DistractorPolicy::Tiered { target } => {
                let base = glyphs::count_representable([operand1, operand2, result]);
                let needed = target.checked_sub(base)?;
                if needed > DISTRACTOR_COUNT {
                    return None;
                }
                Some(self.pooled_distractors(result, needed))
            }
        }
    }

    fn nearby_distractors(&mut self, result: u32) -> Option<Vec<u32>> {
        let mut distractors = Vec::with_capacity(DISTRACTOR_COUNT);
        for _ in 0..NEARBY_TRIES {
            if distractors.len() == DISTRACTOR_COUNT {
                break;
            }
            let candidate = result as i64 + self.rng.gen_range(-NEARBY_SPREAD..NEARBY_SPREAD);
            if candidate <= 0 {
                continue;
            }
            let candidate = candidate as u32;
            if candidate != result && !distractors.contains(&candidate) {
                distractors.push(candidate);
            }
        }
        (distractors.len() == DISTRACTOR_COUNT).then_some(distractors)
    }

    fn pooled_distractors(&mut self, result: u32, representable: usize) -> Vec<u32> {
        let sign_pool: Vec<u32> = glyphs::representable_range()
            .filter(|v| *v != result)
            .collect();

        let large_lo = result
            .saturating_sub(LARGE_POOL_SPAN)
            .max(MAX_REPRESENTABLE + 1);
        let large_hi = (result + LARGE_POOL_SPAN).max(large_lo + LARGE_POOL_MIN_SIZE - 1);
        let large_pool: Vec<u32> = (large_lo..=large_hi).filter(|v| *v != result).collect();

        let mut distractors: Vec<u32> = sign_pool
            .choose_multiple(&mut self.rng, representable)
            .copied()
            .collect();
        distractors.extend(
            large_pool
                .choose_multiple(&mut self.rng, DISTRACTOR_COUNT - representable)
                .copied(),
        );
        distractors
    }
}
