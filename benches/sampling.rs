use std::collections::BTreeMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use simulado::catalog::question::{Difficulty, Question, Subject, SubjectFilter};
use simulado::catalog::sampler;
use simulado::engine::scoring;

fn synthetic_catalog(size: u32) -> Vec<Question> {
    let subjects = Subject::all();
    let difficulties = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
    (0..size)
        .map(|i| {
            let mut choices = BTreeMap::new();
            for letter in ['A', 'B', 'C', 'D', 'E'] {
                choices.insert(letter, format!("choice {letter} for {i}"));
            }
            Question {
                id: i,
                subject: subjects[i as usize % subjects.len()],
                topic: "bench".to_string(),
                prompt: format!("benchmark question {i}"),
                choices,
                correct: 'A',
                explanation: "benchmark explanation".to_string(),
                difficulty: difficulties[i as usize % difficulties.len()],
            }
        })
        .collect()
}

fn bench_uniform_sample(c: &mut Criterion) {
    let catalog = synthetic_catalog(2000);
    c.bench_function("sample_10_of_2000_any", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| {
            let batch = sampler::sample(
                black_box(&catalog),
                SubjectFilter::Any,
                10,
                &mut rng,
            );
            black_box(batch)
        })
    });

    c.bench_function("sample_10_of_2000_filtered", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| {
            let batch = sampler::sample(
                black_box(&catalog),
                SubjectFilter::Only(Subject::History),
                10,
                &mut rng,
            );
            black_box(batch)
        })
    });
}

fn bench_weighted_sample(c: &mut Criterion) {
    let catalog = synthetic_catalog(2000);
    c.bench_function("weighted_sample_10_of_2000", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| {
            let batch = sampler::weighted_sample(
                black_box(&catalog),
                SubjectFilter::Any,
                10,
                scoring::rank_for(450),
                &mut rng,
            );
            black_box(batch)
        })
    });
}

fn bench_rank_lookup(c: &mut Criterion) {
    c.bench_function("rank_for_sweep", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for xp in (0..5000u64).step_by(13) {
                acc += scoring::rank_for(black_box(xp)).name().len();
            }
            black_box(acc)
        })
    });
}

criterion_group!(
    benches,
    bench_uniform_sample,
    bench_weighted_sample,
    bench_rank_lookup
);
criterion_main!(benches);
