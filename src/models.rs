use crate::glyphs;
use crate::session::Score;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Addition => "+",
            Operation::Subtraction => "-",
            Operation::Multiplication => "×",
            Operation::Division => "÷",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Operation::Addition => "Soma",
            Operation::Subtraction => "Subtração",
            Operation::Multiplication => "Multiplicação",
            Operation::Division => "Divisão",
        }
    }

    /// Applies the operation, returning `None` when the result would not be a
    /// positive whole number.
    pub fn apply(&self, a: u32, b: u32) -> Option<u32> {
        let value = match self {
            Operation::Addition => a.checked_add(b)?,
            Operation::Subtraction => a.checked_sub(b)?,
            Operation::Multiplication => a.checked_mul(b)?,
            Operation::Division => {
                if b == 0 || a % b != 0 {
                    return None;
                }
                a / b
            }
        };
        (value > 0).then_some(value)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Difficulty bucket. Each tier fixes how many of the six values shown with
/// a question (two operands, the result and three distractors) must have a
/// sign in the glyph table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn representable_target(&self) -> usize {
        match self {
            Tier::Easy => 2,
            Tier::Medium => 4,
            Tier::Hard => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Easy => "Fácil",
            Tier::Medium => "Médio",
            Tier::Hard => "Difícil",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandGlyphs {
    pub operand1: String,
    pub operand2: String,
}

impl OperandGlyphs {
    pub fn for_operands(operand1: u32, operand2: u32) -> Self {
        Self {
            operand1: glyphs::render(operand1).into_owned(),
            operand2: glyphs::render(operand2).into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub operation: Operation,
    pub operand1: u32,
    pub operand2: u32,
    pub result: u32,
    pub options: Vec<u32>,
    pub glyphs: OperandGlyphs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

impl Question {
    pub fn prompt(&self) -> String {
        format!(
            "{} {} {} = ?",
            self.operand1,
            self.operation.symbol(),
            self.operand2
        )
    }

    pub fn is_correct(&self, answer: u32) -> bool {
        answer == self.result
    }

    pub fn distractors(&self) -> impl Iterator<Item = u32> + '_ {
        self.options.iter().copied().filter(|o| *o != self.result)
    }

    /// Representable values among the operands, the result and the
    /// distractors. Fixed once the question is generated.
    pub fn representable_count(&self) -> usize {
        let shown = [self.operand1, self.operand2, self.result]
            .into_iter()
            .chain(self.distractors());
        glyphs::count_representable(shown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Aluno",
            Role::Teacher => "Professor",
        }
    }
}

/// Running totals kept per account by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub correct: u32,
    pub incorrect: u32,
    pub solved: u32,
}

impl Stats {
    pub fn plus(&self, score: &Score) -> Stats {
        Stats {
            correct: self.correct + score.correct as u32,
            incorrect: self.incorrect + score.incorrect as u32,
            solved: self.solved + score.answered as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub stats: Stats,
}

impl UserSession {
    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A non-blocking message for the user, e.g. a failed stats write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Login,
    Quiz,
    QuizQuitConfirm,
    Results,
    Teacher,
}
