use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const MEDIUM_RUNTIME_SAMPLE_SIZE: usize = 15;
const MEDIUM_RUNTIME_WARM_UP_MS: u64 = 500;
const MEDIUM_RUNTIME_MEASURE_MS: u64 = 1000;
const LARGE_RUNTIME_SAMPLE_SIZE: usize = 10;
const LARGE_RUNTIME_WARM_UP_MS: u64 = 800;
const LARGE_RUNTIME_MEASURE_MS: u64 = 1500;
const RNG_SEED: u64 = 0x5EED_2026;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

pub fn apply_medium_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(MEDIUM_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(MEDIUM_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(MEDIUM_RUNTIME_MEASURE_MS));
}

pub fn apply_large_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(LARGE_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(LARGE_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(LARGE_RUNTIME_MEASURE_MS));
}

/// Input shapes for sort benchmarks. An adaptive sort's cost varies with
/// presortedness, so benches sweep these rather than uniform data alone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pattern {
    RandomUniform,
    Sorted,
    Reverse,
    NearlySorted1pctSwaps,
    FewValues16,
    Sawtooth64,
}

pub const ALL_PATTERNS: [Pattern; 6] = [
    Pattern::RandomUniform,
    Pattern::Sorted,
    Pattern::Reverse,
    Pattern::NearlySorted1pctSwaps,
    Pattern::FewValues16,
    Pattern::Sawtooth64,
];

impl Pattern {
    pub fn label(self) -> &'static str {
        match self {
            Pattern::RandomUniform => "random_uniform",
            Pattern::Sorted => "sorted",
            Pattern::Reverse => "reverse",
            Pattern::NearlySorted1pctSwaps => "nearly_sorted_1pct_swaps",
            Pattern::FewValues16 => "few_values_16",
            Pattern::Sawtooth64 => "sawtooth_64",
        }
    }
}

/// Deterministic dataset for a pattern/size pair. The seed is mixed with
/// both so every (pattern, size) cell gets an independent stream.
pub fn dataset(pattern: Pattern, size: usize, salt: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(mix_seed(
        RNG_SEED ^ ((pattern as u64) << 56) ^ (size as u64) ^ salt,
    ));

    match pattern {
        Pattern::RandomUniform => (0..size).map(|_| rng.random()).collect(),
        Pattern::Sorted => (0..size as u64).collect(),
        Pattern::Reverse => (0..size as u64).rev().collect(),
        Pattern::NearlySorted1pctSwaps => {
            let mut data: Vec<u64> = (0..size as u64).collect();
            if size >= 2 {
                let swaps = (size / 100).max(1);
                for _ in 0..swaps {
                    let a = rng.random_range(0..size);
                    let b = rng.random_range(0..size);
                    data.swap(a, b);
                }
            }
            data
        }
        Pattern::FewValues16 => (0..size).map(|_| rng.random_range(0..16) * 17).collect(),
        Pattern::Sawtooth64 => (0..size as u64).map(|i| i % 64).collect(),
    }
}

#[inline]
fn mix_seed(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
