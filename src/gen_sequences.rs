use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Random values are drawn from `0..VALUE_RANGE`.
pub const VALUE_RANGE: i64 = 100;

/// Shapes of synthetic input used to exercise the majority finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum InputDistribution {
    /// One value fills `n/2 + 1` slots, random values the rest, shuffled.
    RandomWithMajority,
    AllSame,
    /// `i % max(3, n/3)`: small repeating cycle, never a majority for `n > 1`.
    NoMajority,
    /// One value fills exactly `n/2` slots and no value exceeds `n/2`, so
    /// there is never a majority for `n > 1`.
    NearlyMajority,
    /// A run of `n/2 + 1` equal values followed by `a[i] = i`.
    SortedWithMajority,
    /// `1` at even indices and `2` at odd ones. A majority only for odd `n`.
    Alternating,
}

impl InputDistribution {
    pub const ALL: [InputDistribution; 6] = [
        InputDistribution::RandomWithMajority,
        InputDistribution::AllSame,
        InputDistribution::NoMajority,
        InputDistribution::NearlyMajority,
        InputDistribution::SortedWithMajority,
        InputDistribution::Alternating,
    ];

    pub fn description(self) -> &'static str {
        match self {
            InputDistribution::RandomWithMajority => "Random array with majority element",
            InputDistribution::AllSame => "All elements identical (best case)",
            InputDistribution::NoMajority => "No majority element exists",
            InputDistribution::NearlyMajority => "Element appears exactly n/2 times",
            InputDistribution::SortedWithMajority => "Sorted array with majority",
            InputDistribution::Alternating => {
                "Alternating pattern (worst case for candidate changes)"
            }
        }
    }
}

/// Generates a sequence of `size` values shaped as `distribution`.
///
/// The same `seed` always gives the same sequence.
///
/// ## Examples
/// ```
/// use majority::gen_sequences::{generate, InputDistribution};
///
/// let v = generate(6, InputDistribution::Alternating, 42);
/// assert_eq!(v, vec![1, 2, 1, 2, 1, 2]);
///
/// let v = generate(5, InputDistribution::AllSame, 42);
/// assert!(v.iter().all(|&x| x == v[0]));
/// ```
pub fn generate(size: usize, distribution: InputDistribution, seed: u64) -> Vec<i64> {
    if size == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut v = vec![0i64; size];

    match distribution {
        InputDistribution::RandomWithMajority => {
            let value = rng.random_range(0..VALUE_RANGE);
            let (head, tail) = v.split_at_mut(size / 2 + 1);
            head.fill(value);
            fill_avoiding(&mut rng, tail, value);
            v.shuffle(&mut rng);
        }
        InputDistribution::AllSame => {
            v.fill(rng.random_range(0..VALUE_RANGE));
        }
        InputDistribution::NoMajority => {
            let period = (size / 3).max(3);
            for (i, x) in v.iter_mut().enumerate() {
                *x = (i % period) as i64;
            }
        }
        InputDistribution::NearlyMajority => {
            let value = rng.random_range(0..VALUE_RANGE);
            let (head, tail) = v.split_at_mut(size / 2);
            head.fill(value);
            fill_avoiding(&mut rng, tail, value);
            // For odd sizes the tail holds n/2 + 1 slots: a tail made of a
            // single value would be a majority of its own.
            if tail.len() > 1 && tail.iter().all(|&x| x == tail[0]) {
                let mut other = (tail[0] + 1) % VALUE_RANGE;
                if other == value {
                    other = (other + 1) % VALUE_RANGE;
                }
                if let Some(last) = tail.last_mut() {
                    *last = other;
                }
            }
        }
        InputDistribution::SortedWithMajority => {
            let value = rng.random_range(0..VALUE_RANGE);
            let run = size / 2 + 1;
            for (i, x) in v.iter_mut().enumerate() {
                *x = if i < run { value } else { i as i64 };
            }
        }
        InputDistribution::Alternating => {
            // For even sizes the last write of 1 wraps to index 0.
            for i in 0..size / 2 + 1 {
                v[i * 2 % size] = 1;
            }
            for i in 0..size / 2 {
                v[(i * 2 + 1) % size] = 2;
            }
        }
    }

    v
}

/// Fills `slots` with random values, remapping `avoid` to its successor.
fn fill_avoiding(rng: &mut StdRng, slots: &mut [i64], avoid: i64) {
    for x in slots.iter_mut() {
        let r = rng.random_range(0..VALUE_RANGE);
        *x = if r == avoid {
            (avoid + 1) % VALUE_RANGE
        } else {
            r
        };
    }
}
