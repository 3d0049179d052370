//! The depth-probe heuristic (spec §4.4): guessing which level a key's leaf
//! lives at without a root-to-leaf descent.
//!
//! A plain point-region quadtree finds a key's leaf by walking down from the
//! root, comparing against the center of each level's cell: `O(depth)`
//! comparisons. `findNode` instead jumps straight to an estimated level `L`
//! by a single `O(1)` signature lookup, verifies the guess against the
//! table, and only falls back to coarser levels (then, failing that, the
//! root) if the guess missed.

use std::sync::atomic::{AtomicU64, Ordering};

/// `nodeTableSize >> (PROBE_LEVEL*2)` nodes are expected to concentrate
/// around a specific depth; `PROBE_LEVEL` is that baseline depth.
pub const PROBE_LEVEL: u8 = 4;

/// How [`super::Quadtree`] derives the probe's starting level `L` from
/// `count = nodeTableSize >> (PROBE_LEVEL*2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeStrategy {
    /// `L` starts at 1 and increments while `count >> 2L > 0`, then adds
    /// `PROBE_LEVEL - 1`, capped at `MAX_LEVEL`.
    #[default]
    Loop,
    /// The same result read directly from `count`'s bit length instead of
    /// the loop's repeated shifts: `L = ceil(bits(count)/2) + PROBE_LEVEL -
    /// 1`, capped at `MAX_LEVEL`. The spec calls this "a fixed cascade of
    /// mask comparisons"; the cascade and this formula select the same `L`
    /// for the same `count`.
    Bitmask,
}

fn guess_level_loop(count: u64, max_level: u8) -> u8 {
    let mut l: u32 = 1;
    while (count >> (2 * l)) > 0 {
        l += 1;
    }
    let total = l + (PROBE_LEVEL as u32 - 1);
    (total as u8).min(max_level)
}

fn guess_level_bitmask(count: u64, max_level: u8) -> u8 {
    debug_assert!(count > 0);
    let bits = 64 - count.leading_zeros();
    let l = (bits + 1) / 2;
    let total = l + (PROBE_LEVEL as u32 - 1);
    (total as u8).min(max_level)
}

/// The cache behind §4.4 step 3: `(L, cell width, cell height)` is reused
/// across calls until `count` changes. Only `L` needs caching here; cell
/// width/height are cheap to recompute from `L` and the tree's fixed
/// bounds, so the cache key is just `count -> L`.
pub(super) struct ProbeCache {
    for_count: AtomicU64,
    level: AtomicU64,
}

impl ProbeCache {
    pub(super) fn new() -> Self {
        ProbeCache {
            for_count: AtomicU64::new(u64::MAX),
            level: AtomicU64::new(0),
        }
    }

    pub(super) fn invalidate(&self) {
        self.for_count.store(u64::MAX, Ordering::Relaxed);
    }
}

/// Returns the probe strategy's guessed starting level for the given
/// `count`, consulting (and refreshing) `cache`.
pub(super) fn guess_level(
    strategy: ProbeStrategy,
    count: u64,
    max_level: u8,
    cache: &ProbeCache,
) -> u8 {
    if cache.for_count.load(Ordering::Relaxed) == count {
        return cache.level.load(Ordering::Relaxed) as u8;
    }
    let level = match strategy {
        ProbeStrategy::Loop => guess_level_loop(count, max_level),
        ProbeStrategy::Bitmask => guess_level_bitmask(count, max_level),
    };
    cache.for_count.store(count, Ordering::Relaxed);
    cache.level.store(level as u64, Ordering::Relaxed);
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_and_bitmask_agree() {
        for count in [1u64, 2, 3, 4, 5, 16, 17, 63, 64, 1000, 100_000] {
            assert_eq!(
                guess_level_loop(count, 14),
                guess_level_bitmask(count, 14),
                "count={count}"
            );
        }
    }

    #[test]
    fn guess_is_capped_at_max_level() {
        assert_eq!(guess_level_loop(u64::MAX, 5), 5);
        assert_eq!(guess_level_bitmask(u64::MAX, 5), 5);
    }

    #[test]
    fn smallest_nonzero_count_starts_at_probe_level() {
        assert_eq!(guess_level_loop(1, MAX_TEST_LEVEL), PROBE_LEVEL);
    }

    const MAX_TEST_LEVEL: u8 = 14;

    #[test]
    fn cache_reuses_level_until_count_changes() {
        let cache = ProbeCache::new();
        let a = guess_level(ProbeStrategy::Bitmask, 16, 14, &cache);
        let b = guess_level(ProbeStrategy::Bitmask, 16, 14, &cache);
        assert_eq!(a, b);
        let c = guess_level(ProbeStrategy::Bitmask, 64, 14, &cache);
        assert_ne!(b, c);
    }
}
