use crate::chain::{ChainPool, NodeId};
use crate::error::{ContainerError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

/// Fixed-key SipHash. Equal keys always land in the same bucket, run to run.
pub type DefaultState = BuildHasherDefault<DefaultHasher>;

const MIN_CAPACITY: usize = 4;

/// Largest bucket count a [`TableConfig`] may ask for up front.
pub const MAX_CAPACITY: usize = 1 << 24;

/// Sizing parameters for a [`HashTable`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TableConfig {
    /// Number of buckets allocated up front
    #[serde(default = "default_capacity")]
    pub initial_capacity: usize,

    /// Maximum `len / capacity` ratio before the table doubles
    #[serde(default = "default_load_factor")]
    pub load_factor: f64,
}

fn default_capacity() -> usize {
    16
}

fn default_load_factor() -> f64 {
    0.75
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_capacity(),
            load_factor: default_load_factor(),
        }
    }
}

impl TableConfig {
    pub fn new(initial_capacity: usize, load_factor: f64) -> Self {
        Self {
            initial_capacity,
            load_factor,
        }
    }

    /// Check the load factor and capacity bound, raising tiny capacities to the minimum.
    pub fn validate(self) -> Result<Self> {
        if !(0.1..1.0).contains(&self.load_factor) {
            return Err(ContainerError::InvalidLoadFactor(self.load_factor));
        }
        if self.initial_capacity > MAX_CAPACITY {
            return Err(ContainerError::InvalidCapacity(self.initial_capacity));
        }

        Ok(Self {
            initial_capacity: self.initial_capacity.max(MIN_CAPACITY),
            load_factor: self.load_factor,
        })
    }
}

/// A hash table using separate chaining with head insertion.
///
/// Each bucket holds the head of a singly linked chain. Chain nodes live in a
/// [`ChainPool`] and link to each other by [`NodeId`], so growing the table
/// relinks existing nodes into a larger bucket array without moving them.
///
/// Writes are last-write-wins. Once an insertion pushes the load factor past the
/// configured threshold, capacity doubles and every entry is rehashed.
pub struct HashTable<K, V, S = DefaultState> {
    buckets: Vec<Option<NodeId>>,
    pool: ChainPool<K, V>,
    count: usize,
    load_factor: f64,
    hasher: S,
}

impl<K: Hash + Eq, V> HashTable<K, V> {
    /// Creates an empty table with the default configuration.
    pub fn new() -> Self {
        let config = TableConfig::default();
        Self::build(config.initial_capacity, config.load_factor, DefaultState::default())
    }

    /// Creates an empty table with explicit sizing.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, DefaultState::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> HashTable<K, V, S> {
    /// Creates an empty table with explicit sizing and a caller-supplied hasher.
    ///
    /// The hasher must be deterministic for the lifetime of the table.
    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self::build(config.initial_capacity, config.load_factor, hasher))
    }

    fn build(capacity: usize, load_factor: f64, hasher: S) -> Self {
        Self {
            buckets: vec![None; capacity],
            pool: ChainPool::new(),
            count: 0,
            load_factor,
            hasher,
        }
    }

    /// Inserts or replaces the value for `key`, returning the previous value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let bucket = bucket_index(&self.hasher, &key, self.buckets.len());

        let mut cursor = self.buckets[bucket];
        while let Some(id) = cursor {
            let Some(node) = self.pool.get_mut(id) else {
                debug_assert!(false, "chain links a released node");
                break;
            };
            if node.key == key {
                return Some(std::mem::replace(&mut node.value, value));
            }
            cursor = node.next;
        }

        let head = self.buckets[bucket];
        self.buckets[bucket] = Some(self.pool.alloc(key, value, head));
        self.count += 1;

        if self.count as f64 / self.buckets.len() as f64 > self.load_factor {
            self.grow();
        }

        None
    }

    /// Returns the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key)
            .and_then(|id| self.pool.get(id))
            .map(|node| &node.value)
            .ok_or(ContainerError::KeyNotFound)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.find(key) {
            Some(id) => self
                .pool
                .get_mut(id)
                .map(|node| &mut node.value)
                .ok_or(ContainerError::KeyNotFound),
            None => Err(ContainerError::KeyNotFound),
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Unlinks `key` from its chain and returns its value.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = bucket_index(&self.hasher, key, self.buckets.len());

        let mut prev: Option<NodeId> = None;
        let mut cursor = self.buckets[bucket];
        while let Some(id) = cursor {
            let Some(node) = self.pool.get(id) else {
                debug_assert!(false, "chain links a released node");
                break;
            };
            let next = node.next;

            if Borrow::<Q>::borrow(&node.key) == key {
                let removed = self.pool.release(id).ok_or(ContainerError::KeyNotFound)?;
                match prev {
                    Some(prev_id) => {
                        if let Some(prev_node) = self.pool.get_mut(prev_id) {
                            prev_node.next = next;
                        }
                    }
                    None => self.buckets[bucket] = next,
                }
                self.count -= 1;
                return Ok(removed.value);
            }

            prev = Some(id);
            cursor = next;
        }

        Err(ContainerError::KeyNotFound)
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = bucket_index(&self.hasher, key, self.buckets.len());

        let mut cursor = self.buckets[bucket];
        while let Some(id) = cursor {
            let node = self.pool.get(id)?;
            if Borrow::<Q>::borrow(&node.key) == key {
                return Some(id);
            }
            cursor = node.next;
        }
        None
    }

    /// Doubles the bucket array and relinks every node into its new chain.
    fn grow(&mut self) {
        let new_capacity = self.buckets.len() * 2;
        let old_buckets = std::mem::replace(&mut self.buckets, vec![None; new_capacity]);

        for head in old_buckets {
            let mut cursor = head;
            while let Some(id) = cursor {
                let Some(node) = self.pool.get_mut(id) else {
                    debug_assert!(false, "chain links a released node");
                    break;
                };
                let next = node.next;
                let bucket = bucket_index(&self.hasher, &node.key, new_capacity);

                node.next = self.buckets[bucket];
                self.buckets[bucket] = Some(id);
                cursor = next;
            }
        }

        tracing::debug!(
            capacity = new_capacity,
            entries = self.count,
            "hash table resized"
        );
    }
}

impl<K, V, S> HashTable<K, V, S> {
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Current `len / capacity` ratio.
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.buckets.len() as f64
    }

    /// Removes every entry. Capacity is kept.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|head| *head = None);
        self.pool.clear();
        self.count = 0;
    }

    /// Iterates entries in bucket order, then chain order within a bucket.
    ///
    /// The order is only meaningful until the next mutation.
    pub fn items(&self) -> Items<'_, K, V> {
        Items {
            buckets: &self.buckets,
            pool: &self.pool,
            bucket: 0,
            cursor: None,
            remaining: self.count,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.items().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.items().map(|(_, value)| value)
    }
}

impl<K: Hash + Eq, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.items()).finish()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Extend<(K, V)> for HashTable<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for HashTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Items<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items()
    }
}

fn bucket_index<Q, S>(hasher: &S, key: &Q, capacity: usize) -> usize
where
    Q: Hash + ?Sized,
    S: BuildHasher,
{
    (hasher.hash_one(key) % capacity as u64) as usize
}

/// Borrowing iterator over the entries of a [`HashTable`].
pub struct Items<'a, K, V> {
    buckets: &'a [Option<NodeId>],
    pool: &'a ChainPool<K, V>,
    bucket: usize,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Items<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.cursor.and_then(|id| self.pool.get(id)) {
                self.cursor = node.next;
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&node.key, &node.value));
            }

            self.cursor = *self.buckets.get(self.bucket)?;
            self.bucket += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
