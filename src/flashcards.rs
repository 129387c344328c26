use serde::{Deserialize, Serialize};

use crate::catalog::question::Question;

/// One outstanding miss. Carries snapshots so review works even if the
/// catalog is reseeded with different content.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlashcardEntry {
    pub id: u32,
    pub question_id: u32,
    pub subject: String,
    pub prompt: String,
    pub answer: String,
    pub explanation: String,
}

/// Deduplicated set of missed questions. An entry exists for a question iff
/// the learner has an unmastered miss on it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlashcardDeck {
    cards: Vec<FlashcardEntry>,
    next_id: u32,
}

impl FlashcardDeck {
    /// Insert a card for `question` unless one is already outstanding.
    /// Returns whether a new card was created.
    pub fn record_miss(&mut self, question: &Question) -> bool {
        if self.contains_question(question.id) {
            return false;
        }
        self.next_id += 1;
        self.cards.push(FlashcardEntry {
            id: self.next_id,
            question_id: question.id,
            subject: question.subject.to_key().to_string(),
            prompt: question.prompt.clone(),
            answer: question.correct_display(),
            explanation: question.explanation.clone(),
        });
        true
    }

    pub fn contains_question(&self, question_id: u32) -> bool {
        self.cards.iter().any(|c| c.question_id == question_id)
    }

    pub fn list(&self) -> &[FlashcardEntry] {
        &self.cards
    }

    /// Hard delete; there is no soft-delete state. Returns false when no
    /// such card exists.
    pub fn mark_mastered(&mut self, entry_id: u32) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.id != entry_id);
        self.cards.len() != before
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
