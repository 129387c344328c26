use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::StreakPolicy;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_subject")]
    pub default_subject: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub streak_policy: StreakPolicy,
    #[serde(default = "default_daily_xp_goal")]
    pub daily_xp_goal: u64,
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
}

fn default_question_count() -> usize {
    5
}
fn default_subject() -> String {
    "any".to_string()
}
fn default_theme() -> String {
    "slate-dark".to_string()
}
fn default_daily_xp_goal() -> u64 {
    100
}
fn default_feedback_delay_ms() -> u64 {
    600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            default_subject: default_subject(),
            theme: default_theme(),
            streak_policy: StreakPolicy::default(),
            daily_xp_goal: default_daily_xp_goal(),
            feedback_delay_ms: default_feedback_delay_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("simulado")
            .join("config.toml")
    }

    /// Clamp out-of-range values and reset an unknown subject key to "any".
    /// Call after deserialization to handle hand-edited config files.
    pub fn normalize(&mut self, valid_subjects: &[&str]) {
        self.question_count = self.question_count.clamp(1, 20);
        self.daily_xp_goal = self.daily_xp_goal.clamp(10, 1000);
        self.feedback_delay_ms = self.feedback_delay_ms.min(5000);
        if self.default_subject != "any"
            && !valid_subjects.contains(&self.default_subject.as_str())
        {
            self.default_subject = default_subject();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.question_count, 5);
        assert_eq!(config.default_subject, "any");
        assert_eq!(config.streak_policy, StreakPolicy::Strict);
        assert_eq!(config.daily_xp_goal, 100);
    }

    #[test]
    fn test_config_serde_partial_file_keeps_defaults() {
        let toml_str = r#"
question_count = 10
theme = "paper-light"
streak_policy = "lenient"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.theme, "paper-light");
        assert_eq!(config.streak_policy, StreakPolicy::Lenient);
        assert_eq!(config.feedback_delay_ms, 600);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.question_count, deserialized.question_count);
        assert_eq!(config.default_subject, deserialized.default_subject);
        assert_eq!(config.streak_policy, deserialized.streak_policy);
    }

    #[test]
    fn test_normalize_clamps_and_resets() {
        let mut config = Config::default();
        config.question_count = 0;
        config.daily_xp_goal = 1_000_000;
        config.default_subject = "astrology".to_string();

        config.normalize(&["mathematics", "history"]);

        assert_eq!(config.question_count, 1);
        assert_eq!(config.daily_xp_goal, 1000);
        assert_eq!(config.default_subject, "any");
    }

    #[test]
    fn test_normalize_keeps_valid_subject() {
        let mut config = Config::default();
        config.default_subject = "history".to_string();
        config.normalize(&["mathematics", "history"]);
        assert_eq!(config.default_subject, "history");
    }
}
