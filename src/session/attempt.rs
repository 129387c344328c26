use thiserror::Error;

use crate::catalog::question::{Question, SubjectFilter};
use crate::engine::scoring;

/// Caller precondition violations. These are rejections, not failures: the
/// attempt state is unchanged whenever one is returned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AttemptError {
    #[error("cannot start an attempt with no questions")]
    EmptyBatch,
    #[error("the attempt is already completed")]
    NotInProgress,
    #[error("the current question was already answered")]
    AlreadyAnswered,
    #[error("the current question has not been answered yet")]
    NotAnswered,
    #[error("'{0}' is not one of this question's choices")]
    UnknownChoice(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Completed,
}

/// Everything the UI needs to show after a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub chosen: char,
    pub correct_letter: char,
    pub explanation: String,
    /// XP the question is worth; credited only when `correct`.
    pub xp: u64,
}

/// One quiz run over a sampled batch. Idle is represented by the absence of
/// an `Attempt`; constructing one moves straight to `InProgress`.
pub struct Attempt {
    questions: Vec<Question>,
    filter: SubjectFilter,
    cursor: usize,
    correct: u32,
    answers: Vec<Option<char>>,
    phase: Phase,
}

impl Attempt {
    pub fn start(questions: Vec<Question>, filter: SubjectFilter) -> Result<Self, AttemptError> {
        if questions.is_empty() {
            return Err(AttemptError::EmptyBatch);
        }
        let answers = vec![None; questions.len()];
        Ok(Self {
            questions,
            filter,
            cursor: 0,
            correct: 0,
            answers,
            phase: Phase::InProgress,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn filter(&self) -> SubjectFilter {
        self.filter
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn score(&self) -> u32 {
        self.correct
    }

    /// None once the attempt is completed.
    pub fn current(&self) -> Option<&Question> {
        match self.phase {
            Phase::InProgress => self.questions.get(self.cursor),
            Phase::Completed => None,
        }
    }

    pub fn current_answered(&self) -> bool {
        self.answers.get(self.cursor).is_some_and(Option::is_some)
    }

    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.cursor as f64 / self.questions.len() as f64
    }

    /// Grade the current question. Each slot scores at most once; a second
    /// submission for the same slot is rejected rather than double-counted.
    pub fn answer(&mut self, letter: char) -> Result<AnswerFeedback, AttemptError> {
        if self.phase != Phase::InProgress {
            return Err(AttemptError::NotInProgress);
        }
        if self.current_answered() {
            return Err(AttemptError::AlreadyAnswered);
        }
        let question = &self.questions[self.cursor];
        let letter = letter.to_ascii_uppercase();
        if !question.choices.contains_key(&letter) {
            return Err(AttemptError::UnknownChoice(letter));
        }

        self.answers[self.cursor] = Some(letter);
        let correct = question.is_correct(letter);
        if correct {
            self.correct += 1;
        }
        Ok(AnswerFeedback {
            correct,
            chosen: letter,
            correct_letter: question.correct,
            explanation: question.explanation.clone(),
            xp: scoring::xp_for(question.difficulty),
        })
    }

    /// Move to the next question; completes the attempt after the last one.
    /// Only valid once the current question has been answered.
    pub fn advance(&mut self) -> Result<Phase, AttemptError> {
        if self.phase != Phase::InProgress {
            return Err(AttemptError::NotInProgress);
        }
        if !self.current_answered() {
            return Err(AttemptError::NotAnswered);
        }
        self.cursor += 1;
        if self.cursor >= self.questions.len() {
            self.cursor = self.questions.len();
            self.phase = Phase::Completed;
        }
        Ok(self.phase)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::catalog::question::{Difficulty, Subject};

    fn question(id: u32, difficulty: Difficulty) -> Question {
        let mut choices = BTreeMap::new();
        choices.insert('A', "right".to_string());
        choices.insert('B', "wrong".to_string());
        choices.insert('C', "also wrong".to_string());
        Question {
            id,
            subject: Subject::Mathematics,
            topic: "arithmetic".to_string(),
            prompt: format!("question {id}"),
            choices,
            correct: 'A',
            explanation: "A is right".to_string(),
            difficulty,
        }
    }

    fn batch(n: u32) -> Vec<Question> {
        (1..=n).map(|i| question(i, Difficulty::Easy)).collect()
    }

    #[test]
    fn start_rejects_empty_batch() {
        assert_eq!(
            Attempt::start(Vec::new(), SubjectFilter::Any).err(),
            Some(AttemptError::EmptyBatch)
        );
    }

    #[test]
    fn correct_answer_scores_and_reports() {
        let mut attempt = Attempt::start(batch(1), SubjectFilter::Any).unwrap();
        let feedback = attempt.answer('a').unwrap();
        assert!(feedback.correct);
        assert_eq!(feedback.chosen, 'A');
        assert_eq!(feedback.xp, 10);
        assert_eq!(attempt.score(), 1);
    }

    #[test]
    fn wrong_answer_reports_correct_letter() {
        let mut attempt = Attempt::start(batch(1), SubjectFilter::Any).unwrap();
        let feedback = attempt.answer('B').unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_letter, 'A');
        assert_eq!(attempt.score(), 0);
    }

    #[test]
    fn double_answer_is_rejected_not_double_counted() {
        let mut attempt = Attempt::start(batch(2), SubjectFilter::Any).unwrap();
        attempt.answer('A').unwrap();
        assert_eq!(attempt.answer('A').err(), Some(AttemptError::AlreadyAnswered));
        assert_eq!(attempt.score(), 1);
    }

    #[test]
    fn unknown_letter_is_rejected_without_recording() {
        let mut attempt = Attempt::start(batch(1), SubjectFilter::Any).unwrap();
        assert_eq!(attempt.answer('Z').err(), Some(AttemptError::UnknownChoice('Z')));
        assert!(!attempt.current_answered());
        let feedback = attempt.answer('A').unwrap();
        assert!(feedback.correct);
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut attempt = Attempt::start(batch(2), SubjectFilter::Any).unwrap();
        assert_eq!(attempt.advance().err(), Some(AttemptError::NotAnswered));
        attempt.answer('A').unwrap();
        assert_eq!(attempt.advance().unwrap(), Phase::InProgress);
        assert_eq!(attempt.cursor(), 1);
    }

    #[test]
    fn completes_exactly_once_and_rejects_further_calls() {
        let k = 3;
        let mut attempt = Attempt::start(batch(k), SubjectFilter::Any).unwrap();
        for i in 0..k {
            attempt.answer('A').unwrap();
            let phase = attempt.advance().unwrap();
            if i == k - 1 {
                assert_eq!(phase, Phase::Completed);
            } else {
                assert_eq!(phase, Phase::InProgress);
            }
        }
        assert_eq!(attempt.phase(), Phase::Completed);
        assert!(attempt.current().is_none());
        assert_eq!(attempt.advance().err(), Some(AttemptError::NotInProgress));
        assert_eq!(attempt.answer('A').err(), Some(AttemptError::NotInProgress));
        assert!(attempt.cursor() <= attempt.len());
    }
}
