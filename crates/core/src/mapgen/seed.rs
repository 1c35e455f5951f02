//! Seed resolution and the request-local random stream used by layout.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns `requested` verbatim, or a fresh non-zero seed when it is zero.
pub(super) fn resolve_seed(requested: u64) -> u64 {
    if requested != 0 {
        return requested;
    }
    match generate_runtime_seed() {
        0 => 1,
        seed => seed,
    }
}

fn generate_runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy)
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

/// Deterministic random source owned by a single generation call.
#[derive(Clone, Debug)]
pub(super) struct DungeonRng {
    inner: ChaCha8Rng,
}

impl DungeonRng {
    pub(super) fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Uniform value in `[min, max)`; returns `min` when the range is empty.
    pub(super) fn range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = (max - min) as u64;
        min + (self.inner.next_u64() % span) as usize
    }

    /// Signed variant of [`DungeonRng::range`] for grid coordinates.
    pub(super) fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = max.abs_diff(min) as u64;
        min + (self.inner.next_u64() % span) as i32
    }

    pub(super) fn coin(&mut self) -> bool {
        self.inner.next_u64() & 1 == 1
    }

    pub(super) fn pick<T: Copy>(&mut self, first: T, second: T) -> T {
        if self.coin() { second } else { first }
    }
}
