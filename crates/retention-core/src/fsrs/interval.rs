//! Interval selection
//!
//! Inverts the forgetting curve to find how many whole days a memory can go
//! unreviewed before its retrievability drops to the requested retention.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::algorithm::interval_for_retention;

/// Default shortest interval (days)
pub const DEFAULT_MINIMUM_INTERVAL: u32 = 1;

/// Default longest interval (days, ~100 years)
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = 36_500;

/// Intervals shorter than this are never fuzzed
pub const FUZZ_MIN_INTERVAL: u32 = 3;

/// Whole-day interval for `stability` at `requested_retention`, clamped to
/// `[minimum, maximum]` and never below one day.
pub fn next_interval(stability: f64, requested_retention: f64, minimum: u32, maximum: u32) -> u32 {
    let lower = minimum.max(1);
    let upper = maximum.max(lower);
    let raw = interval_for_retention(stability, requested_retention).round();
    if !raw.is_finite() {
        return upper;
    }
    (raw.max(0.0) as u64).clamp(lower as u64, upper as u64) as u32
}

/// Stable seed for a card's fuzz at a given review count.
///
/// FNV-1a over the id bytes, mixed with `reps`, so the same card at the same
/// point in its history always draws the same factor.
pub fn fuzz_seed(card_id: &str, reps: u32) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET;
    for byte in card_id.bytes().chain(reps.to_le_bytes()) {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Perturb `interval` by a factor drawn from `[-fuzz_factor, +fuzz_factor]`.
///
/// The draw depends only on `seed`, so every candidate interval computed for
/// one card review is scaled by the same factor and keeps its ordering. The
/// result stays within `[minimum, maximum]` and at least one day.
pub fn fuzz_interval(interval: u32, fuzz_factor: f64, seed: u64, minimum: u32, maximum: u32) -> u32 {
    let lower = minimum.max(1);
    let upper = maximum.max(lower);
    if interval < FUZZ_MIN_INTERVAL || fuzz_factor <= 0.0 {
        return interval.clamp(lower, upper);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let factor = 1.0 + rng.gen_range(-fuzz_factor..=fuzz_factor);
    let fuzzed = (interval as f64 * factor).round().max(0.0) as u64;
    fuzzed.clamp(lower as u64, upper as u64) as u32
}
