use crate::generator::{GeneratorError, QuestionGenerator, TierPlan};
use crate::logger;
use crate::models::Question;
use rand::Rng;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingAnswer(usize),
    Complete,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("the quiz is already complete")]
    AlreadyComplete,
    #[error("the quiz has no questions")]
    NoQuestions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub incorrect: usize,
    pub answered: usize,
    pub total: usize,
}

impl Score {
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }
}

/// Scores the answered prefix of `questions`.
pub fn score_answers(questions: &[Question], answers: &[u32]) -> Score {
    let correct = questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| q.is_correct(**a))
        .count();
    let answered = answers.len().min(questions.len());
    Score {
        correct,
        incorrect: answered - correct,
        answered,
        total: questions.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub index: usize,
    pub given: u32,
    pub expected: u32,
    pub correct: bool,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Answered { outcome: AnswerOutcome, score: Score },
    Completed(Score),
    /// `previous` is the score of the discarded question list.
    Restarted { previous: Score, total: usize },
    Replaced { previous: Score, total: usize },
}

pub type Listener = Box<dyn FnMut(&SessionEvent) + Send>;

/// One learner's pass over a question list.
///
/// The answer list doubles as the position: the current question is
/// `questions[answers.len()]`, and the session is complete once every
/// question has an answer.
pub struct QuizSession {
    questions: Vec<Question>,
    answers: Vec<u32>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions", &self.questions.len())
            .field("answers", &self.answers)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            answers: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn start<R: Rng>(
        generator: &mut QuestionGenerator<R>,
        plan: &TierPlan,
    ) -> Result<Self, GeneratorError> {
        Ok(Self::new(generator.default_session(plan)?))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[u32] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.answers.len()
    }

    pub fn state(&self) -> SessionState {
        if self.answers.len() < self.questions.len() {
            SessionState::AwaitingAnswer(self.answers.len())
        } else {
            SessionState::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        if self.questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        self.questions
            .get(self.answers.len())
            .ok_or(SessionError::AlreadyComplete)
    }

    /// Records `value` for the current question and advances. Rejected
    /// without touching the answers once the session is complete. The caller
    /// guards against submitting twice for the same question.
    pub fn submit_answer(&mut self, value: u32) -> Result<AnswerOutcome, SessionError> {
        let question = self.current_question()?;
        let index = self.answers.len();
        let expected = question.result;
        let correct = question.is_correct(value);

        self.answers.push(value);
        let outcome = AnswerOutcome {
            index,
            given: value,
            expected,
            correct,
            complete: self.is_complete(),
        };

        let score = self.score();
        self.emit(SessionEvent::Answered { outcome, score });
        if outcome.complete {
            logger::log(&format!(
                "Quiz complete: {}/{} correct",
                score.correct, score.total
            ));
            self.emit(SessionEvent::Completed(score));
        }
        Ok(outcome)
    }

    pub fn score(&self) -> Score {
        score_answers(&self.questions, &self.answers)
    }

    /// Draws a fresh default question list and clears the answers. On a
    /// generator error the current session is left as it was.
    pub fn restart<R: Rng>(
        &mut self,
        generator: &mut QuestionGenerator<R>,
        plan: &TierPlan,
    ) -> Result<(), GeneratorError> {
        let questions = generator.default_session(plan)?;
        let previous = self.score();
        self.questions = questions;
        self.answers.clear();
        let total = self.questions.len();
        self.emit(SessionEvent::Restarted { previous, total });
        Ok(())
    }

    /// Swaps in an externally built question list (the teacher hand-off).
    pub fn replace_questions(&mut self, questions: Vec<Question>) {
        let previous = self.score();
        self.questions = questions;
        self.answers.clear();
        let total = self.questions.len();
        logger::log(&format!("Question list replaced with {} questions", total));
        self.emit(SessionEvent::Replaced { previous, total });
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: SessionEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}
