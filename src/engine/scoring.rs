use crate::catalog::question::Difficulty;

/// Ordered by minimum XP; `rank_for` depends on this ordering.
pub const RANK_TABLE: &[(u64, &str)] = &[
    (0, "Iron"),
    (100, "Bronze"),
    (300, "Silver"),
    (600, "Gold"),
    (1000, "Diamond"),
    (2000, "Legendary"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rank(usize);

impl Rank {
    pub fn name(self) -> &'static str {
        RANK_TABLE[self.0].1
    }

    pub fn min_xp(self) -> u64 {
        RANK_TABLE[self.0].0
    }
}

/// XP awarded for answering a question of the given difficulty correctly.
pub fn xp_for(difficulty: Difficulty) -> u64 {
    match difficulty {
        Difficulty::Easy => 10,
        Difficulty::Medium => 20,
        Difficulty::Hard => 50,
    }
}

/// Highest rank whose minimum XP is at or below `xp`.
pub fn rank_for(xp: u64) -> Rank {
    let idx = RANK_TABLE
        .iter()
        .rposition(|&(min, _)| min <= xp)
        .unwrap_or(0);
    Rank(idx)
}

/// XP still needed for the next rank, with its name. None at the top rank.
pub fn next_rank(xp: u64) -> Option<(u64, &'static str)> {
    let current = rank_for(xp);
    RANK_TABLE
        .get(current.0 + 1)
        .map(|&(min, name)| (min - xp, name))
}

/// Progress ratio from the current rank floor toward the next, for the
/// dashboard bar. 1.0 at the top rank.
pub fn rank_progress(xp: u64) -> f64 {
    let current = rank_for(xp);
    match RANK_TABLE.get(current.0 + 1) {
        Some(&(next_min, _)) => {
            let floor = current.min_xp();
            (xp - floor) as f64 / (next_min - floor) as f64
        }
        None => 1.0,
    }
}

/// Difficulty the weighted sampler steers toward for a given rank.
pub fn target_difficulty(rank: Rank) -> Difficulty {
    match rank.0 {
        0 | 1 => Difficulty::Easy,
        2 | 3 => Difficulty::Medium,
        _ => Difficulty::Hard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_table() {
        assert_eq!(xp_for(Difficulty::Easy), 10);
        assert_eq!(xp_for(Difficulty::Medium), 20);
        assert_eq!(xp_for(Difficulty::Hard), 50);
    }

    #[test]
    fn test_rank_thresholds() {
        assert_eq!(rank_for(0).name(), "Iron");
        assert_eq!(rank_for(99).name(), "Iron");
        assert_eq!(rank_for(100).name(), "Bronze");
        assert_eq!(rank_for(599).name(), "Silver");
        assert_eq!(rank_for(600).name(), "Gold");
        assert_eq!(rank_for(2000).name(), "Legendary");
        assert_eq!(rank_for(999_999).name(), "Legendary");
    }

    #[test]
    fn test_rank_is_monotone() {
        let mut prev = rank_for(0);
        for xp in (0..3000).step_by(17) {
            let rank = rank_for(xp);
            assert!(rank >= prev);
            prev = rank;
        }
    }

    #[test]
    fn test_next_rank_and_progress() {
        assert_eq!(next_rank(0), Some((100, "Bronze")));
        assert_eq!(next_rank(250), Some((50, "Silver")));
        assert_eq!(next_rank(2500), None);
        assert!((rank_progress(50) - 0.5).abs() < 1e-9);
        assert_eq!(rank_progress(2500), 1.0);
    }

    #[test]
    fn test_target_difficulty_scales_with_rank() {
        assert_eq!(target_difficulty(rank_for(0)), Difficulty::Easy);
        assert_eq!(target_difficulty(rank_for(150)), Difficulty::Easy);
        assert_eq!(target_difficulty(rank_for(400)), Difficulty::Medium);
        assert_eq!(target_difficulty(rank_for(800)), Difficulty::Medium);
        assert_eq!(target_difficulty(rank_for(1200)), Difficulty::Hard);
        assert_eq!(target_difficulty(rank_for(9000)), Difficulty::Hard);
    }
}
