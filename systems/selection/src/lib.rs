#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic weighted selection primitives.
//!
//! Every random decision in the engine flows through a [`SplitMix64`]
//! stream seeded from the host's global seed, so a whole generation run
//! replays bit-identically. Pools draw with replacement; weights are
//! plain integers and a zero weight keeps a key out of the pool entirely.

use ridgeline_core::SelectionError;

/// Deterministic pseudo-random stream with SplitMix64 mixing.
#[derive(Clone, Debug)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Creates a new stream from the provided seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state: seed }
    }

    /// Advances the stream and returns the next raw value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Returns the next value mapped into `[0, 1)` with 53-bit precision.
    pub fn next_unit(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / ((1u64 << 53) as f64);
        let value = self.next_u64() >> 11;
        (value as f64) * SCALE
    }

    /// Returns a value in `[0, bound)`; a zero bound yields zero.
    pub fn next_bounded(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_u64() % bound
    }

    /// Returns a fair coin flip.
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}

#[derive(Clone, Debug)]
struct PoolEntry<T> {
    key: T,
    weight: u32,
    initial_weight: u32,
}

/// Weighted-random pool drawing keys with replacement.
///
/// Entries keep their insertion order so draws depend only on the injected
/// stream. Pool sizes stay in the tens, so draws walk the entries linearly.
#[derive(Clone, Debug)]
pub struct WeightedPool<T> {
    entries: Vec<PoolEntry<T>>,
}

impl<T> Default for WeightedPool<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Clone + PartialEq> WeightedPool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a key with the given weight, replacing an existing entry.
    ///
    /// A zero weight is a no-op: such keys never participate in draws.
    pub fn add(&mut self, key: T, weight: u32) {
        if weight == 0 {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) {
            entry.weight = weight;
            entry.initial_weight = weight;
            return;
        }
        self.entries.push(PoolEntry {
            key,
            weight,
            initial_weight: weight,
        });
    }

    /// Removes the entry for the key; absent keys are ignored.
    pub fn remove(&mut self, key: &T) {
        self.entries.retain(|entry| entry.key != *key);
    }

    /// Updates an existing entry's weight; zero clamps to one.
    ///
    /// Decayed weights bottom out at one, never at zero mass.
    pub fn set_weight(&mut self, key: &T, weight: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == *key) {
            entry.weight = weight.max(1);
        }
    }

    /// Restores an entry's weight to the value it was added with.
    pub fn reset_weight(&mut self, key: &T) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == *key) {
            entry.weight = entry.initial_weight;
        }
    }

    /// Current weight of the key, if present.
    #[must_use]
    pub fn weight(&self, key: &T) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.key == *key)
            .map(|entry| entry.weight)
    }

    /// Reports whether the key participates in draws.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.entries.iter().any(|entry| entry.key == *key)
    }

    /// Number of keys in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the pool has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all current weights.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.weight))
            .sum()
    }

    /// Iterates keys with their current weights in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, u32)> {
        self.entries.iter().map(|entry| (&entry.key, entry.weight))
    }

    /// Draws a key with probability proportional to its weight.
    pub fn draw(&self, rng: &mut SplitMix64) -> Result<T, SelectionError> {
        let total = self.total_weight();
        if total == 0 {
            return Err(SelectionError::EmptyPool);
        }

        let mut remaining = rng.next_bounded(total);
        for entry in &self.entries {
            let weight = u64::from(entry.weight);
            if remaining < weight {
                return Ok(entry.key.clone());
            }
            remaining -= weight;
        }

        // remaining < total, so the walk above always lands inside an entry
        Err(SelectionError::EmptyPool)
    }
}

#[cfg(test)]
mod tests {
    use super::{SplitMix64, WeightedPool};
    use ridgeline_core::SelectionError;

    #[test]
    fn zero_weight_adds_are_ignored() {
        let mut pool = WeightedPool::new();
        pool.add("never", 0);
        assert!(pool.is_empty());
        assert!(!pool.contains(&"never"));
    }

    #[test]
    fn duplicate_add_replaces_weight() {
        let mut pool = WeightedPool::new();
        pool.add("key", 5);
        pool.add("key", 9);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.weight(&"key"), Some(9));
    }

    #[test]
    fn set_weight_clamps_zero_to_one() {
        let mut pool = WeightedPool::new();
        pool.add("key", 5);
        pool.set_weight(&"key", 0);
        assert_eq!(pool.weight(&"key"), Some(1));
    }

    #[test]
    fn reset_weight_restores_initial_value() {
        let mut pool = WeightedPool::new();
        pool.add("key", 8);
        pool.set_weight(&"key", 1);
        pool.reset_weight(&"key");
        assert_eq!(pool.weight(&"key"), Some(8));
    }

    #[test]
    fn draw_from_empty_pool_fails() {
        let pool: WeightedPool<&str> = WeightedPool::new();
        let mut rng = SplitMix64::new(1);
        assert_eq!(pool.draw(&mut rng), Err(SelectionError::EmptyPool));
    }

    #[test]
    fn identical_streams_yield_identical_draws() {
        let mut pool = WeightedPool::new();
        pool.add("a", 3);
        pool.add("b", 7);
        pool.add("c", 2);

        let mut first = SplitMix64::new(0x00c0_ffee);
        let mut second = SplitMix64::new(0x00c0_ffee);
        for _ in 0..256 {
            assert_eq!(pool.draw(&mut first), pool.draw(&mut second));
        }
    }

    #[test]
    fn removed_keys_stop_participating() {
        let mut pool = WeightedPool::new();
        pool.add("a", 3);
        pool.add("b", 7);
        pool.remove(&"a");

        let mut rng = SplitMix64::new(42);
        for _ in 0..64 {
            assert_eq!(pool.draw(&mut rng), Ok("b"));
        }
    }
}
