use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::question::Subject;
use crate::store::schema::ProfileData;

/// Per-subject title thresholds. Every threshold at or below the subject's XP
/// is held at once; titles are never revoked because XP never decreases.
pub const TITLE_TABLE: &[(u64, &str)] = &[
    (100, "Apprentice"),
    (300, "Specialist"),
    (800, "Master"),
];

/// What a gap of more than one day does to the streak counter. The source
/// material never checked the gap; both behaviors are kept selectable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakPolicy {
    /// Increment only when the last active day was yesterday, reset otherwise.
    #[default]
    Strict,
    /// Increment on any day change, however long the gap.
    Lenient,
}

/// Credit earned XP to the global, per-subject, and daily counters. These
/// only ever grow; the sole reset path is a schema-version wipe.
pub fn apply_xp(profile: &mut ProfileData, subject: Subject, amount: u64) {
    profile.total_xp += amount;
    *profile
        .subject_xp
        .entry(subject.to_key().to_string())
        .or_insert(0) += amount;
    profile.daily_xp += amount;
}

/// All titles currently held, rendered as "<Subject> <Title>".
pub fn titles_for(profile: &ProfileData) -> Vec<String> {
    let mut titles = Vec::new();
    for &subject in Subject::all() {
        let xp = profile
            .subject_xp
            .get(subject.to_key())
            .copied()
            .unwrap_or(0);
        for &(threshold, title) in TITLE_TABLE {
            if xp >= threshold {
                titles.push(format!("{} {}", subject.label(), title));
            }
        }
    }
    titles
}

/// Register activity on `today`: rolls the daily XP counter on a date change
/// and updates the streak according to `policy`. Same-day calls are no-ops,
/// so this is safe to invoke on every answered question.
pub fn touch_day(profile: &mut ProfileData, today: NaiveDate, policy: StreakPolicy) {
    let today_str = today.format("%Y-%m-%d").to_string();
    if profile.last_active_date.as_deref() == Some(today_str.as_str()) {
        return;
    }

    profile.daily_xp = 0;

    let last = profile
        .last_active_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
    profile.streak_days = match last {
        None => 1,
        Some(last) => {
            let gap = today.signed_duration_since(last).num_days();
            match policy {
                StreakPolicy::Strict if gap == 1 => profile.streak_days + 1,
                StreakPolicy::Strict => 1,
                StreakPolicy::Lenient => profile.streak_days + 1,
            }
        }
    };
    profile.best_streak = profile.best_streak.max(profile.streak_days);
    profile.last_active_date = Some(today_str);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn apply_xp_feeds_all_counters() {
        let mut profile = ProfileData::default();
        apply_xp(&mut profile, Subject::History, 20);
        apply_xp(&mut profile, Subject::History, 10);
        apply_xp(&mut profile, Subject::Physics, 50);
        assert_eq!(profile.total_xp, 80);
        assert_eq!(profile.subject_xp.get("history"), Some(&30));
        assert_eq!(profile.subject_xp.get("physics"), Some(&50));
        assert_eq!(profile.daily_xp, 80);
    }

    #[test]
    fn titles_unlock_monotonically_and_stack() {
        let mut profile = ProfileData::default();
        assert!(titles_for(&profile).is_empty());

        apply_xp(&mut profile, Subject::Chemistry, 350);
        let titles = titles_for(&profile);
        assert_eq!(
            titles,
            vec![
                "Chemistry Apprentice".to_string(),
                "Chemistry Specialist".to_string()
            ]
        );

        apply_xp(&mut profile, Subject::Chemistry, 500);
        assert_eq!(titles_for(&profile).len(), 3);
    }

    #[test]
    fn same_day_touch_is_a_noop() {
        let mut profile = ProfileData::default();
        touch_day(&mut profile, day("2026-08-07"), StreakPolicy::Strict);
        profile.daily_xp = 40;
        touch_day(&mut profile, day("2026-08-07"), StreakPolicy::Strict);
        assert_eq!(profile.streak_days, 1);
        assert_eq!(profile.daily_xp, 40);
    }

    #[test]
    fn strict_policy_increments_on_consecutive_days() {
        let mut profile = ProfileData::default();
        touch_day(&mut profile, day("2026-08-05"), StreakPolicy::Strict);
        touch_day(&mut profile, day("2026-08-06"), StreakPolicy::Strict);
        touch_day(&mut profile, day("2026-08-07"), StreakPolicy::Strict);
        assert_eq!(profile.streak_days, 3);
        assert_eq!(profile.best_streak, 3);
    }

    #[test]
    fn strict_policy_resets_on_gap() {
        let mut profile = ProfileData::default();
        touch_day(&mut profile, day("2026-08-01"), StreakPolicy::Strict);
        touch_day(&mut profile, day("2026-08-02"), StreakPolicy::Strict);
        touch_day(&mut profile, day("2026-08-05"), StreakPolicy::Strict);
        assert_eq!(profile.streak_days, 1);
        assert_eq!(profile.best_streak, 2);
    }

    #[test]
    fn lenient_policy_increments_across_gaps() {
        let mut profile = ProfileData::default();
        touch_day(&mut profile, day("2026-08-01"), StreakPolicy::Lenient);
        touch_day(&mut profile, day("2026-08-09"), StreakPolicy::Lenient);
        assert_eq!(profile.streak_days, 2);
    }

    #[test]
    fn day_change_resets_daily_xp() {
        let mut profile = ProfileData::default();
        touch_day(&mut profile, day("2026-08-06"), StreakPolicy::Strict);
        profile.daily_xp = 90;
        touch_day(&mut profile, day("2026-08-07"), StreakPolicy::Strict);
        assert_eq!(profile.daily_xp, 0);
    }
}
