use crate::error::Result;
use crate::hash_table::{HashTable, Items, TableConfig};
use crate::sequence::Sequence;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Key/value facade over a [`HashTable`].
///
/// Adds conversions to and from plain `std` maps, and materializes keys, values
/// and entries into [`Sequence`]s for callers that want a stable snapshot.
pub struct Mapping<K, V> {
    table: HashTable<K, V>,
}

impl<K: Hash + Eq, V> Mapping<K, V> {
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Ok(Self {
            table: HashTable::with_config(config)?,
        })
    }

    /// Bulk-inserts every pair of `plain`.
    pub fn from_plain_mapping(plain: HashMap<K, V>) -> Self {
        plain.into_iter().collect()
    }

    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.table.set(key, value)
    }

    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get(key)
    }

    /// Like [`get`](Self::get), falling back to `default` for an absent key.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get(key).unwrap_or(default)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get_mut(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains(key)
    }

    pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.delete(key)
    }

    /// Snapshot of the entries as a plain `HashMap`.
    pub fn to_plain_mapping(&self) -> HashMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        self.table
            .items()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K, V> Mapping<K, V> {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> Items<'_, K, V> {
        self.table.items()
    }

    pub fn keys(&self) -> Sequence<K>
    where
        K: Clone,
    {
        self.table.keys().cloned().collect()
    }

    pub fn values(&self) -> Sequence<V>
    where
        V: Clone,
    {
        self.table.values().cloned().collect()
    }

    pub fn items(&self) -> Sequence<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.table
            .items()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K: Hash + Eq, V> Default for Mapping<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> From<HashMap<K, V>> for Mapping<K, V> {
    fn from(plain: HashMap<K, V>) -> Self {
        Self::from_plain_mapping(plain)
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for Mapping<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            table: iter.into_iter().collect(),
        }
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for Mapping<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.table.extend(iter);
    }
}

impl<'a, K, V> IntoIterator for &'a Mapping<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Items<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.items()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Mapping<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Mapping").field(&self.table).finish()
    }
}

impl<K: Serialize, V: Serialize> Serialize for Mapping<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContainerError;

    fn stock_levels() -> HashMap<String, u32> {
        [("P001", 50), ("P002", 10), ("P003", 0), ("P004", 7)]
            .into_iter()
            .map(|(sku, qty)| (sku.to_string(), qty))
            .collect()
    }

    #[test]
    fn test_mapping_round_trip() {
        let plain = stock_levels();
        let mapping = Mapping::from_plain_mapping(plain.clone());

        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping.to_plain_mapping(), plain);
    }

    #[test]
    fn test_mapping_round_trip_through_growth() {
        let plain: HashMap<u32, String> = (0..300).map(|i| (i, format!("P{:03}", i))).collect();
        let mapping = Mapping::from(plain.clone());

        assert_eq!(mapping.to_plain_mapping(), plain);
    }

    #[test]
    fn test_mapping_delegates_to_table() {
        let mut mapping = Mapping::new();
        mapping.set("P001".to_string(), 50);
        mapping.set("P001".to_string(), 45);

        assert_eq!(mapping.get("P001"), Ok(&45));
        assert!(mapping.contains("P001"));

        *mapping.get_mut("P001").unwrap() -= 5;
        assert_eq!(mapping.delete("P001"), Ok(40));
        assert_eq!(mapping.get("P001"), Err(ContainerError::KeyNotFound));
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_mapping_get_or() {
        let mapping = Mapping::from(stock_levels());
        let fallback = 0;

        assert_eq!(*mapping.get_or("P002", &fallback), 10);
        assert_eq!(*mapping.get_or("P999", &fallback), 0);
        // The typed lookup still reports the miss
        assert!(mapping.get("P999").is_err());
    }

    #[test]
    fn test_mapping_snapshot_is_independent() {
        let mut mapping = Mapping::from(stock_levels());
        let snapshot = mapping.to_plain_mapping();

        mapping.set("P005".to_string(), 1);
        mapping.delete("P001").unwrap();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.get("P001"), Some(&50));
    }

    #[test]
    fn test_mapping_sequences_match_entries() {
        let mapping = Mapping::from(stock_levels());

        let keys = mapping.keys();
        let values = mapping.values();
        let items = mapping.items();

        assert_eq!(keys.len(), 4);
        assert_eq!(values.iter().sum::<u32>(), 67);
        for (i, (key, value)) in items.iter().enumerate() {
            assert_eq!(keys.get(i), Ok(key));
            assert_eq!(values.get(i), Ok(value));
        }
    }

    #[test]
    fn test_mapping_with_config() {
        let mut mapping = Mapping::with_config(TableConfig::new(4, 0.5)).unwrap();
        mapping.extend((0..10).map(|i| (i, i * i)));

        assert_eq!(mapping.len(), 10);
        assert_eq!(mapping.get(&9), Ok(&81));

        assert!(Mapping::<u8, u8>::with_config(TableConfig::new(4, 2.0)).is_err());
    }

    #[test]
    fn test_mapping_serializes_as_object() {
        let mut mapping = Mapping::new();
        mapping.set("P001", 3);

        assert_eq!(serde_json::to_string(&mapping).unwrap(), r#"{"P001":3}"#);
    }
}
