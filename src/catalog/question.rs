use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Mathematics,
    History,
    Chemistry,
    Physics,
    Biology,
    Geography,
}

impl Subject {
    pub fn to_key(self) -> &'static str {
        match self {
            Subject::Mathematics => "mathematics",
            Subject::History => "history",
            Subject::Chemistry => "chemistry",
            Subject::Physics => "physics",
            Subject::Biology => "biology",
            Subject::Geography => "geography",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "mathematics" => Some(Subject::Mathematics),
            "history" => Some(Subject::History),
            "chemistry" => Some(Subject::Chemistry),
            "physics" => Some(Subject::Physics),
            "biology" => Some(Subject::Biology),
            "geography" => Some(Subject::Geography),
            _ => None,
        }
    }

    pub fn all() -> &'static [Subject] {
        &[
            Subject::Mathematics,
            Subject::History,
            Subject::Chemistry,
            Subject::Physics,
            Subject::Biology,
            Subject::Geography,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Subject::Mathematics => "Mathematics",
            Subject::History => "History",
            Subject::Chemistry => "Chemistry",
            Subject::Physics => "Physics",
            Subject::Biology => "Biology",
            Subject::Geography => "Geography",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Which questions an attempt draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectFilter {
    Any,
    Only(Subject),
}

impl SubjectFilter {
    pub fn matches(self, subject: Subject) -> bool {
        match self {
            SubjectFilter::Any => true,
            SubjectFilter::Only(s) => s == subject,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubjectFilter::Any => "All subjects",
            SubjectFilter::Only(s) => s.label(),
        }
    }
}

/// One seeded multiple-choice question. Immutable after seeding; the store
/// never updates or deletes rows.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub subject: Subject,
    pub topic: String,
    pub prompt: String,
    /// Uppercase letter -> display text. 2 to 5 entries; iteration order is
    /// letter order, which is also display order.
    pub choices: BTreeMap<char, String>,
    pub correct: char,
    pub explanation: String,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn letters(&self) -> Vec<char> {
        self.choices.keys().copied().collect()
    }

    pub fn choice_text(&self, letter: char) -> Option<&str> {
        self.choices.get(&letter).map(String::as_str)
    }

    pub fn is_correct(&self, letter: char) -> bool {
        letter == self.correct
    }

    /// Snapshot of the correct choice as shown to the learner, e.g. "C) Au".
    pub fn correct_display(&self) -> String {
        match self.choice_text(self.correct) {
            Some(text) => format!("{}) {}", self.correct, text),
            None => self.correct.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: char) -> Question {
        let mut choices = BTreeMap::new();
        choices.insert('A', "Ou".to_string());
        choices.insert('B', "Ag".to_string());
        choices.insert('C', "Au".to_string());
        Question {
            id: 1,
            subject: Subject::Chemistry,
            topic: "Periodic table".to_string(),
            prompt: "Symbol for gold?".to_string(),
            choices,
            correct,
            explanation: "From the Latin aurum.".to_string(),
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn letters_are_in_display_order() {
        assert_eq!(question('C').letters(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn grading_is_letter_keyed() {
        let q = question('C');
        assert!(q.is_correct('C'));
        assert!(!q.is_correct('A'));
        assert_eq!(q.correct_display(), "C) Au");
    }

    #[test]
    fn subject_keys_round_trip() {
        for &subject in Subject::all() {
            assert_eq!(Subject::from_key(subject.to_key()), Some(subject));
        }
        assert_eq!(Subject::from_key("alchemy"), None);
    }

    #[test]
    fn filter_matches() {
        assert!(SubjectFilter::Any.matches(Subject::Physics));
        assert!(SubjectFilter::Only(Subject::Physics).matches(Subject::Physics));
        assert!(!SubjectFilter::Only(Subject::Physics).matches(Subject::History));
    }
}
