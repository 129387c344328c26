use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::question::Question;
use crate::config::Config;
use crate::flashcards::FlashcardDeck;
use crate::session::result::ResultRecord;

const SCHEMA_VERSION: u32 = 1;

/// Cumulative progression state. XP counters only grow; the sole reset path
/// is a schema-version mismatch, which wipes every store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    pub total_xp: u64,
    /// Keyed by `Subject::to_key`.
    pub subject_xp: HashMap<String, u64>,
    pub total_attempts: u32,
    pub streak_days: u32,
    pub best_streak: u32,
    /// "%Y-%m-%d" of the last day with an answered question.
    pub last_active_date: Option<String>,
    /// XP earned on `last_active_date`; rolls to 0 on a date change.
    pub daily_xp: u64,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            total_xp: 0,
            subject_xp: HashMap::new(),
            total_attempts: 0,
            streak_days: 0,
            best_streak: 0,
            last_active_date: None,
            daily_xp: 0,
        }
    }
}

impl ProfileData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionsData {
    pub schema_version: u32,
    pub questions: Vec<Question>,
}

impl Default for QuestionsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            questions: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultsData {
    pub schema_version: u32,
    pub results: Vec<ResultRecord>,
}

impl Default for ResultsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlashcardsData {
    pub schema_version: u32,
    pub deck: FlashcardDeck,
}

impl Default for FlashcardsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            deck: FlashcardDeck::default(),
        }
    }
}

pub const EXPORT_VERSION: u32 = 1;

/// Backup bundle. The question catalog is not exported; it is reseeded from
/// the embedded assets on any fresh install.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub simulado_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub profile: ProfileData,
    pub results: ResultsData,
    pub flashcards: FlashcardsData,
}
