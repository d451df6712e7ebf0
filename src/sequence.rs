use crate::error::{ContainerError, Result};
use serde::Serialize;
use std::ops::Range;

/// An insertion-ordered collection used to hand results to reports and exports.
///
/// Index access is bounds-checked and reports [`ContainerError::IndexOutOfRange`]
/// instead of panicking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sequence<T> {
    items: Vec<T>,
}

impl<T> Sequence<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Appends an item at the end. Amortized O(1).
    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.items.get(index).ok_or(ContainerError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(ContainerError::IndexOutOfRange { index, len })
    }

    /// Overwrites the item at `index`, returning the old one.
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, item))
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Removes the last item.
    pub fn pop(&mut self) -> Result<T> {
        self.items
            .pop()
            .ok_or(ContainerError::IndexOutOfRange { index: 0, len: 0 })
    }

    /// Removes the item at `index`, shifting later items left.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Removes the item at `index` by moving the last item into its place.
    pub fn swap_remove(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.items.swap_remove(index))
    }

    /// Copies `range` into a new sequence.
    pub fn slice(&self, range: Range<usize>) -> Result<Sequence<T>>
    where
        T: Clone,
    {
        let len = self.items.len();
        let items = self
            .items
            .get(range.clone())
            .ok_or(ContainerError::IndexOutOfRange {
                index: range.end.max(range.start),
                len,
            })?;
        Ok(Sequence {
            items: items.to_vec(),
        })
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(item)
    }

    pub fn position(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|candidate| candidate == item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes every item, keeping the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Snapshot of the items as a plain `Vec`.
    pub fn to_plain_sequence(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(ContainerError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Sequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skus() -> Sequence<String> {
        ["P001", "P002", "P003"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sequence_append_and_get() {
        let mut seq = Sequence::new();
        seq.append(10);
        seq.append(20);
        seq.append(30);

        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(0), Ok(&10));
        assert_eq!(seq.get(2), Ok(&30));
        assert_eq!(seq.last(), Some(&30));
    }

    #[test]
    fn test_sequence_out_of_range() {
        let seq = skus();

        assert_eq!(
            seq.get(3),
            Err(ContainerError::IndexOutOfRange { index: 3, len: 3 })
        );

        let empty: Sequence<u8> = Sequence::new();
        assert!(empty.get(0).is_err());
    }

    #[test]
    fn test_sequence_preserves_insertion_order() {
        let mut seq = Sequence::with_capacity(2);
        for i in (0..100).rev() {
            seq.append(i);
        }

        assert_eq!(seq.to_plain_sequence(), (0..100).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_sequence_set_and_pop() {
        let mut seq = skus();

        assert_eq!(seq.set(1, "P020".to_string()), Ok("P002".to_string()));
        assert_eq!(seq.pop(), Ok("P003".to_string()));
        assert_eq!(seq.len(), 2);
        assert!(seq.set(5, "x".to_string()).is_err());

        seq.clear();
        assert!(seq.pop().is_err());
    }

    #[test]
    fn test_sequence_remove() {
        let mut seq: Sequence<i32> = vec![1, 2, 3, 4].into();

        assert_eq!(seq.remove(1), Ok(2));
        assert_eq!(seq.as_slice(), &[1, 3, 4]);

        assert_eq!(seq.swap_remove(0), Ok(1));
        assert_eq!(seq.as_slice(), &[4, 3]);

        assert!(seq.remove(2).is_err());
    }

    #[test]
    fn test_sequence_slice() {
        let seq: Sequence<i32> = (0..10).collect();

        let middle = seq.slice(3..6).unwrap();
        assert_eq!(middle.into_vec(), vec![3, 4, 5]);

        assert!(seq.slice(8..12).is_err());
        assert!(seq.slice(5..5).unwrap().is_empty());
    }

    #[test]
    fn test_sequence_search() {
        let seq = skus();

        assert!(seq.contains(&"P002".to_string()));
        assert_eq!(seq.position(&"P003".to_string()), Some(2));
        assert_eq!(seq.position(&"P999".to_string()), None);
    }

    #[test]
    fn test_sequence_snapshot_is_independent() {
        let mut seq = skus();
        let snapshot = seq.to_plain_sequence();

        seq.append("P004".to_string());

        assert_eq!(snapshot.len(), 3);
        assert_eq!(seq.len(), 4);
    }

    #[test]
    fn test_sequence_serializes_as_array() {
        let seq: Sequence<i32> = vec![3, 1, 2].into();
        assert_eq!(serde_json::to_string(&seq).unwrap(), "[3,1,2]");
    }
}
