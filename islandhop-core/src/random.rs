//! Seeded random source for the daily lottery.
//!
//! Every stream is keyed by `(day_count, world_id, salt)`. Salting per entity
//! means adding or withdrawing one entity never shifts another entity's draws.
//!
//! The salt hash is 64-bit FNV-1a over the UTF-8 bytes: stable across
//! processes and platforms, unlike `std`'s randomized `DefaultHasher`. The
//! generator is ChaCha8, whose output for a given seed is fixed by
//! `rand_chacha` rather than left to `StdRng`'s unspecified algorithm.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Upper bound (exclusive) of each pre-warm discard run.
const PREWARM_BOUND: u32 = 64;

/// Platform-stable hash of a salt string.
#[must_use]
pub fn stable_hash(salt: &str) -> u64 {
    salt.bytes().fold(FNV_OFFSET, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Derive the raw generator seed.
///
/// `base = world_id + day_count * salt_hash`, `seed = base ^ salt_hash`,
/// all arithmetic wrapping.
#[must_use]
pub fn derive_seed(day_count: u32, world_id: u64, salt: &str) -> u64 {
    let salt_hash = stable_hash(salt);
    let base = world_id.wrapping_add(u64::from(day_count).wrapping_mul(salt_hash));
    base ^ salt_hash
}

/// A deterministic, pre-warmed random stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
    draws: u64,
}

impl SeededRandom {
    /// Seed a stream for one day, one world, one salt. Comes pre-warmed.
    #[must_use]
    pub fn seed(day_count: u32, world_id: u64, salt: &str) -> Self {
        Self::from_raw_seed(derive_seed(day_count, world_id, salt))
    }

    /// Seed directly from a raw value. Comes pre-warmed.
    #[must_use]
    pub fn from_raw_seed(seed: u64) -> Self {
        let mut stream = Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
        };
        stream.prewarm();
        stream.draws = 0;
        stream
    }

    /// Discard two runs of values, each run length drawn from the stream.
    fn prewarm(&mut self) {
        for _ in 0..2 {
            let run = self.next_below(PREWARM_BOUND);
            for _ in 0..run {
                self.next_f64();
            }
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen_range(0.0..1.0)
    }

    /// Uniform draw in `[0, bound)`. `bound` of zero yields zero without drawing.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.draws += 1;
        self.rng.gen_range(0..bound)
    }

    /// `true` with probability `chance`.
    ///
    /// `chance <= 0` (or NaN) is always `false` and `chance >= 1` always
    /// `true`; neither consumes a draw.
    pub fn of_chance(&mut self, chance: f64) -> bool {
        if chance.is_nan() || chance <= 0.0 {
            false
        } else if chance >= 1.0 {
            true
        } else {
            self.next_f64() < chance
        }
    }

    /// Pick one element uniformly, or `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let len = u32::try_from(items.len()).ok()?;
        if len == 0 {
            return None;
        }
        items.get(self.next_below(len) as usize)
    }

    /// Number of real draws taken since seeding (pre-warm excluded).
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.draws
    }
}
