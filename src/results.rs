use crate::models::Question;
use crate::session::{QuizSession, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Excellent,
    VeryGood,
    Good,
    KeepPracticing,
}

impl Performance {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Performance::Excellent,
            70.. => Performance::VeryGood,
            50.. => Performance::Good,
            _ => Performance::KeepPracticing,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Performance::Excellent => "Excelente!",
            Performance::VeryGood => "Muito Bom!",
            Performance::Good => "Bom!",
            Performance::KeepPracticing => "Continue Praticando!",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Performance::Excellent => "🏆",
            Performance::VeryGood => "🎉",
            Performance::Good => "👏",
            Performance::KeepPracticing => "💪",
        }
    }
}

/// A wrongly answered question as listed on the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem<'a> {
    /// 1-based position in the quiz.
    pub position: usize,
    pub question: &'a Question,
    pub given: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultsSummary {
    pub correct: usize,
    pub incorrect: usize,
    pub total: usize,
    pub percentage: u32,
}

impl ResultsSummary {
    pub fn from_score(score: &Score) -> Self {
        let percentage = if score.total == 0 {
            0
        } else {
            ((score.correct as f64 / score.total as f64) * 100.0).round() as u32
        };
        Self {
            correct: score.correct,
            incorrect: score.incorrect,
            total: score.total,
            percentage,
        }
    }

    pub fn for_session(session: &QuizSession) -> Self {
        Self::from_score(&session.score())
    }

    pub fn performance(&self) -> Performance {
        Performance::from_percentage(self.percentage)
    }
}

pub fn review<'a>(questions: &'a [Question], answers: &[u32]) -> Vec<ReviewItem<'a>> {
    questions
        .iter()
        .zip(answers)
        .enumerate()
        .filter(|(_, (q, a))| !q.is_correct(**a))
        .map(|(i, (question, given))| ReviewItem {
            position: i + 1,
            question,
            given: *given,
        })
        .collect()
}
