use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::question::SubjectFilter;
use crate::session::attempt::Attempt;

/// Summary of one completed attempt. Append-only: records are never updated
/// or deleted once written.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultRecord {
    pub timestamp: DateTime<Utc>,
    pub subject: SubjectFilter,
    pub correct: u32,
    pub total: u32,
    pub xp_earned: u64,
}

impl ResultRecord {
    pub fn from_attempt(attempt: &Attempt, xp_earned: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            subject: attempt.filter(),
            correct: attempt.score(),
            total: attempt.len() as u32,
            xp_earned,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }

    /// TRI-style grade estimate on the 0-1000 scale.
    pub fn estimated_grade(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 1000.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HistorySummary {
    pub total_xp: u64,
    pub attempts: usize,
    /// Percentage over all answered questions; 0 with no history.
    pub accuracy: f64,
}

pub fn summarize(records: &[ResultRecord]) -> HistorySummary {
    let total_xp = records.iter().map(|r| r.xp_earned).sum();
    let correct: u64 = records.iter().map(|r| u64::from(r.correct)).sum();
    let total: u64 = records.iter().map(|r| u64::from(r.total)).sum();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    };
    HistorySummary {
        total_xp,
        attempts: records.len(),
        accuracy,
    }
}

/// The most recent `limit` records, newest first.
pub fn recent(records: &[ResultRecord], limit: usize) -> Vec<&ResultRecord> {
    records.iter().rev().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::question::{Subject, SubjectFilter};

    fn record(correct: u32, total: u32, xp: u64) -> ResultRecord {
        ResultRecord {
            timestamp: Utc::now(),
            subject: SubjectFilter::Only(Subject::History),
            correct,
            total,
            xp_earned: xp,
        }
    }

    #[test]
    fn summary_of_empty_history_reports_zero_accuracy() {
        let summary = summarize(&[]);
        assert_eq!(summary.attempts, 0);
        assert_eq!(summary.total_xp, 0);
        assert_eq!(summary.accuracy, 0.0);
    }

    #[test]
    fn summary_aggregates_across_records() {
        let records = vec![record(4, 4, 90), record(1, 4, 10)];
        let summary = summarize(&records);
        assert_eq!(summary.attempts, 2);
        assert_eq!(summary.total_xp, 100);
        assert!((summary.accuracy - 62.5).abs() < 1e-9);
    }

    #[test]
    fn recent_is_newest_first_and_bounded() {
        let records = vec![record(1, 4, 10), record(2, 4, 20), record(3, 4, 30)];
        let recent = recent(&records, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].correct, 3);
        assert_eq!(recent[1].correct, 2);
    }

    #[test]
    fn estimated_grade_matches_ratio() {
        assert_eq!(record(4, 4, 90).estimated_grade(), 1000.0);
        assert_eq!(record(3, 4, 40).estimated_grade(), 750.0);
        assert_eq!(record(0, 0, 0).estimated_grade(), 0.0);
    }
}
