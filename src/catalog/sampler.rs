use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::question::{Question, SubjectFilter};
use crate::engine::scoring::{self, Rank};

/// Uniform sample without replacement. Returns fewer than `count` questions
/// when fewer match the filter; an empty pool yields an empty batch, never an
/// error. Callers surface the empty case to the user.
pub fn sample<R: Rng>(
    pool: &[Question],
    filter: SubjectFilter,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let matching: Vec<&Question> = pool.iter().filter(|q| filter.matches(q.subject)).collect();
    matching
        .choose_multiple(rng, count)
        .map(|q| (*q).clone())
        .collect()
}

/// Difficulty-weighted sample: roughly three quarters of the batch comes from
/// the difficulty matched to the learner's rank, the remainder from the other
/// difficulties, shuffled together. When the rank-matched pool is empty the
/// sampler falls back to a plain uniform draw; when it runs short the batch
/// is topped up from the remaining matches so a thin catalog still fills the
/// requested count where it can.
pub fn weighted_sample<R: Rng>(
    pool: &[Question],
    filter: SubjectFilter,
    count: usize,
    rank: Rank,
    rng: &mut R,
) -> Vec<Question> {
    let target = scoring::target_difficulty(rank);
    let matching: Vec<&Question> = pool.iter().filter(|q| filter.matches(q.subject)).collect();
    let primary: Vec<&Question> = matching
        .iter()
        .copied()
        .filter(|q| q.difficulty == target)
        .collect();
    if primary.is_empty() {
        return sample(pool, filter, count, rng);
    }
    let secondary: Vec<&Question> = matching
        .iter()
        .copied()
        .filter(|q| q.difficulty != target)
        .collect();

    let secondary_want = count / 4;
    let primary_want = count - secondary_want;

    let mut batch: Vec<Question> = primary
        .choose_multiple(rng, primary_want)
        .map(|q| (*q).clone())
        .collect();
    batch.extend(
        secondary
            .choose_multiple(rng, secondary_want)
            .map(|q| (*q).clone()),
    );

    if batch.len() < count {
        let leftover: Vec<&Question> = matching
            .iter()
            .copied()
            .filter(|q| !batch.iter().any(|b| b.id == q.id))
            .collect();
        batch.extend(
            leftover
                .choose_multiple(rng, count - batch.len())
                .map(|q| (*q).clone()),
        );
    }

    batch.shuffle(rng);
    batch
}
