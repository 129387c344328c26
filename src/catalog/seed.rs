use std::collections::BTreeMap;

use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::question::{Difficulty, Question, Subject};

#[derive(Embed)]
#[folder = "assets/questions/"]
struct CatalogAssets;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file {file} is not valid UTF-8")]
    Encoding { file: String },
    #[error("catalog file {file}: {source}")]
    Parse {
        file: String,
        source: toml::de::Error,
    },
    #[error("catalog file {file} names unknown subject '{subject}'")]
    UnknownSubject { file: String, subject: String },
    #[error("question '{prompt}': choice key '{key}' is not a single uppercase letter")]
    BadChoiceKey { prompt: String, key: String },
    #[error("question '{prompt}': expected 2 to 5 choices, found {found}")]
    ChoiceCount { prompt: String, found: usize },
    #[error("question '{prompt}': correct letter '{letter}' has no matching choice")]
    MissingCorrectChoice { prompt: String, letter: char },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    subject: String,
    #[serde(rename = "question")]
    questions: Vec<SeedQuestion>,
}

#[derive(Debug, Deserialize)]
struct SeedQuestion {
    topic: String,
    prompt: String,
    choices: BTreeMap<String, String>,
    correct: String,
    explanation: String,
    difficulty: Difficulty,
}

/// Parse every embedded catalog file into the seed question set.
/// Files are visited in name order and ids are assigned sequentially, so the
/// catalog is deterministic across runs.
pub fn load_catalog() -> Result<Vec<Question>, CatalogError> {
    let mut files: Vec<String> = CatalogAssets::iter().map(|f| f.to_string()).collect();
    files.sort();

    let mut questions = Vec::new();
    let mut next_id: u32 = 1;
    for file in files {
        let Some(asset) = CatalogAssets::get(&file) else {
            continue;
        };
        let content =
            std::str::from_utf8(asset.data.as_ref()).map_err(|_| CatalogError::Encoding {
                file: file.clone(),
            })?;
        let parsed: CatalogFile = toml::from_str(content).map_err(|source| CatalogError::Parse {
            file: file.clone(),
            source,
        })?;
        let subject =
            Subject::from_key(&parsed.subject).ok_or_else(|| CatalogError::UnknownSubject {
                file: file.clone(),
                subject: parsed.subject.clone(),
            })?;

        for seed in parsed.questions {
            questions.push(validate(seed, subject, next_id)?);
            next_id += 1;
        }
    }
    Ok(questions)
}

fn validate(seed: SeedQuestion, subject: Subject, id: u32) -> Result<Question, CatalogError> {
    let mut choices = BTreeMap::new();
    for (key, text) in seed.choices {
        let mut chars = key.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_uppercase() => ch,
            _ => {
                return Err(CatalogError::BadChoiceKey {
                    prompt: seed.prompt,
                    key,
                });
            }
        };
        choices.insert(letter, text);
    }

    if choices.len() < 2 || choices.len() > 5 {
        return Err(CatalogError::ChoiceCount {
            prompt: seed.prompt,
            found: choices.len(),
        });
    }

    let correct = seed.correct.chars().next().unwrap_or(' ');
    if !choices.contains_key(&correct) {
        return Err(CatalogError::MissingCorrectChoice {
            prompt: seed.prompt,
            letter: correct,
        });
    }

    Ok(Question {
        id,
        subject,
        topic: seed.topic,
        prompt: seed.prompt,
        choices,
        correct,
        explanation: seed.explanation,
        difficulty: seed.difficulty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses_and_validates() {
        let catalog = load_catalog().unwrap();
        assert!(!catalog.is_empty());
        for q in &catalog {
            assert!(q.choices.contains_key(&q.correct));
            assert!(q.choices.len() >= 2 && q.choices.len() <= 5);
            assert!(!q.prompt.is_empty());
            assert!(!q.explanation.is_empty());
        }
    }

    #[test]
    fn catalog_ids_are_sequential_and_unique() {
        let catalog = load_catalog().unwrap();
        for (i, q) in catalog.iter().enumerate() {
            assert_eq!(q.id, i as u32 + 1);
        }
    }

    #[test]
    fn catalog_covers_every_subject() {
        let catalog = load_catalog().unwrap();
        for &subject in Subject::all() {
            assert!(
                catalog.iter().any(|q| q.subject == subject),
                "no seed questions for {}",
                subject.label()
            );
        }
    }

    #[test]
    fn rejects_correct_letter_without_choice() {
        let mut choices = BTreeMap::new();
        choices.insert("A".to_string(), "yes".to_string());
        choices.insert("B".to_string(), "no".to_string());
        let seed = SeedQuestion {
            topic: "t".to_string(),
            prompt: "p".to_string(),
            choices,
            correct: "E".to_string(),
            explanation: "e".to_string(),
            difficulty: Difficulty::Easy,
        };
        let err = validate(seed, Subject::History, 1).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingCorrectChoice { letter: 'E', .. }
        ));
    }

    #[test]
    fn rejects_lowercase_choice_key() {
        let mut choices = BTreeMap::new();
        choices.insert("a".to_string(), "yes".to_string());
        choices.insert("B".to_string(), "no".to_string());
        let seed = SeedQuestion {
            topic: "t".to_string(),
            prompt: "p".to_string(),
            choices,
            correct: "B".to_string(),
            explanation: "e".to_string(),
            difficulty: Difficulty::Easy,
        };
        assert!(matches!(
            validate(seed, Subject::History, 1),
            Err(CatalogError::BadChoiceKey { .. })
        ));
    }
}
