//! Custom question sets built from ranges a teacher types in.

use crate::generator::{
    DifficultyParams, GeneratorError, OperandRange, OperationRanges, QuestionGenerator,
};
use crate::logger;
use crate::models::{Operation, Question};
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

pub const QUESTIONS_PER_OPERATION: usize = 3;

lazy_static! {
    static ref LEADING_INTEGER: Regex =
        Regex::new(r"^\s*([+-]?)(\d+)").expect("leading integer pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    Min,
    Max,
}

/// Ranges the teacher form starts with.
pub fn default_ranges() -> OperationRanges {
    OperationRanges {
        addition: OperandRange::new(1, 20),
        subtraction: OperandRange::new(1, 20),
        multiplication: OperandRange::new(1, 10),
        division: OperandRange::new(2, 20),
    }
}

/// Reads a bound the way the form always has: leading digits win, trailing
/// text is ignored, and anything without leading digits (or negative) is 0.
pub fn parse_bound(input: &str) -> u32 {
    let Some(caps) = LEADING_INTEGER.captures(input) else {
        return 0;
    };
    if &caps[1] == "-" {
        return 0;
    }
    caps[2].parse::<u32>().unwrap_or(u32::MAX)
}

pub fn set_bound(ranges: &mut OperationRanges, operation: Operation, field: RangeField, input: &str) {
    let value = parse_bound(input);
    let range = ranges.get_mut(operation);
    match field {
        RangeField::Min => range.min = value,
        RangeField::Max => range.max = value,
    }
}

/// Three questions per operation from the caller's ranges, numbered 1..=12
/// and shuffled, ready for `QuizSession::replace_questions`.
pub fn generate_from_ranges<R: Rng>(
    generator: &mut QuestionGenerator<R>,
    ranges: &OperationRanges,
) -> Result<Vec<Question>, GeneratorError> {
    generator.reset_ids();
    let mut questions = Vec::with_capacity(Operation::ALL.len() * QUESTIONS_PER_OPERATION);

    for operation in Operation::ALL {
        let params = DifficultyParams::nearby(ranges.get(operation));
        for _ in 0..QUESTIONS_PER_OPERATION {
            questions.push(generator.generate(operation, &params)?);
        }
    }

    generator.shuffle(&mut questions);
    logger::log(&format!(
        "Generated {} teacher questions from {:?}",
        questions.len(),
        ranges
    ));
    Ok(questions)
}
