//! Collection types used across Tabula.
//!
//! Ordered maps are `indexmap` maps hashed with AHash.

pub use ahash::RandomState;

/// Insertion-ordered map hashed with AHash.
///
/// Iteration order is the order in which keys were first inserted. Re-inserting
/// an existing key overwrites its value but keeps its original slot.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, RandomState>;

/// Create an empty [`IndexMap`].
pub fn index_map<K, V>() -> IndexMap<K, V> {
    IndexMap::with_hasher(RandomState::new())
}

/// Create an empty [`IndexMap`] with room for `capacity` entries.
pub fn index_map_with_capacity<K, V>(capacity: usize) -> IndexMap<K, V> {
    IndexMap::with_capacity_and_hasher(capacity, RandomState::new())
}
