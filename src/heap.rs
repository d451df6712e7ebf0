use crate::error::{ContainerError, Result};
use crate::sequence::Sequence;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ordering used by a [`MinHeap`].
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Direction a ranking is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    /// Smallest key first
    #[default]
    Ascending,
    /// Largest key first
    Descending,
}

impl RankOrder {
    /// Orient an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            RankOrder::Ascending => ordering,
            RankOrder::Descending => ordering.reverse(),
        }
    }
}

/// The element type's own `Ord`, smallest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<T: Ord> Compare<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Orders elements by an extracted key in the given direction.
#[derive(Debug, Clone, Copy)]
pub struct KeyOrder<F> {
    key_fn: F,
    order: RankOrder,
}

impl<F> KeyOrder<F> {
    pub fn new(key_fn: F, order: RankOrder) -> Self {
        Self { key_fn, order }
    }
}

impl<T, K, F> Compare<T> for KeyOrder<F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.order.apply((self.key_fn)(a).cmp(&(self.key_fn)(b)))
    }
}

/// Array-backed binary heap; `items[parent(i)]` never orders after `items[i]`.
///
/// The heap yields the element that orders first under its comparator. With
/// [`RankOrder::Ascending`] that is the smallest key, with
/// [`RankOrder::Descending`] the largest. Elements with equal keys come out in
/// no particular order.
#[derive(Debug, Clone)]
pub struct MinHeap<T, C = NaturalOrder> {
    items: Vec<T>,
    compare: C,
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T: Ord> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F, K> MinHeap<T, KeyOrder<F>>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    /// Heap ordered by `key_fn`, read in `order`.
    pub fn by_key(key_fn: F, order: RankOrder) -> Self {
        Self::with_comparator(KeyOrder::new(key_fn, order))
    }
}

impl<T, C: Compare<T>> MinHeap<T, C> {
    pub fn with_comparator(compare: C) -> Self {
        Self {
            items: Vec::new(),
            compare,
        }
    }

    /// Builds a heap from `items` in O(n).
    pub fn from_vec(items: Vec<T>, compare: C) -> Self {
        let mut heap = Self { items, compare };
        for idx in (0..heap.items.len() / 2).rev() {
            heap.sift_down(idx);
        }
        heap
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Removes and returns the element that orders first.
    pub fn pop(&mut self) -> Result<T> {
        let last = self.items.pop().ok_or(ContainerError::EmptyHeap)?;
        if self.items.is_empty() {
            return Ok(last);
        }

        let top = std::mem::replace(&mut self.items[0], last);
        self.sift_down(0);
        Ok(top)
    }

    pub fn peek(&self) -> Result<&T> {
        self.items.first().ok_or(ContainerError::EmptyHeap)
    }

    /// Pops the first element and pushes `item` with a single sift.
    pub fn replace(&mut self, item: T) -> Result<T> {
        if self.items.is_empty() {
            return Err(ContainerError::EmptyHeap);
        }

        let top = std::mem::replace(&mut self.items[0], item);
        self.sift_down(0);
        Ok(top)
    }

    /// Pushes `item` and pops the first element with a single sift.
    ///
    /// Returns `item` untouched when it already orders before the root.
    pub fn push_pop(&mut self, item: T) -> T {
        let root_first = match self.items.first() {
            Some(root) => self.compare.compare(root, &item) == Ordering::Less,
            None => false,
        };
        if !root_first {
            return item;
        }

        let top = std::mem::replace(&mut self.items[0], item);
        self.sift_down(0);
        top
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements in backing-array order, not pop order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Drains the heap in pop order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.items.len());
        while let Ok(item) = self.pop() {
            sorted.push(item);
        }
        sorted
    }

    pub fn into_sequence(self) -> Sequence<T> {
        Sequence::from(self.into_sorted_vec())
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.compare.compare(&self.items[idx], &self.items[parent]) != Ordering::Less {
                break;
            }
            self.items.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;

            if left < len && self.orders_before(left, smallest) {
                smallest = left;
            }
            if right < len && self.orders_before(right, smallest) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }

            self.items.swap(idx, smallest);
            idx = smallest;
        }
    }

    fn orders_before(&self, a: usize, b: usize) -> bool {
        self.compare.compare(&self.items[a], &self.items[b]) == Ordering::Less
    }
}

impl<T, C: Compare<T>> Extend<T> for MinHeap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        sku: &'static str,
        popularity: u32,
    }

    fn item(sku: &'static str, popularity: u32) -> Item {
        Item { sku, popularity }
    }

    fn assert_heap_property<T, C: Compare<T>>(heap: &MinHeap<T, C>) {
        for i in 1..heap.items.len() {
            let parent = (i - 1) / 2;
            assert_ne!(
                heap.compare.compare(&heap.items[i], &heap.items[parent]),
                Ordering::Less,
                "index {} orders before its parent",
                i
            );
        }
    }

    #[test]
    fn test_heap_pops_in_order() {
        let mut heap = MinHeap::new();
        for value in [42, 7, 19, 3, 88, 3, 61, 0, 25] {
            heap.push(value);
            assert_heap_property(&heap);
        }

        let mut popped = Vec::new();
        while let Ok(value) = heap.pop() {
            assert_heap_property(&heap);
            popped.push(value);
        }

        assert_eq!(popped, vec![0, 3, 3, 7, 19, 25, 42, 61, 88]);
    }

    #[test]
    fn test_heap_descending_popularity() {
        let mut heap = MinHeap::by_key(|i: &Item| i.popularity, RankOrder::Descending);
        heap.push(item("P001", 5));
        heap.push(item("P002", 20));
        heap.push(item("P003", 1));

        assert_eq!(heap.pop().unwrap().popularity, 20);
        assert_eq!(heap.pop().unwrap().popularity, 5);
        assert_eq!(heap.pop().unwrap().popularity, 1);
        assert_eq!(heap.pop(), Err(ContainerError::EmptyHeap));
    }

    #[test]
    fn test_heap_negated_keys_still_rank_highest_first() {
        // (ranking key, raw popularity)
        let mut heap = MinHeap::new();
        heap.extend([(-5, 5), (-20, 20), (-1, 1)]);

        let popularity: Vec<_> = heap.into_sorted_vec().into_iter().map(|(_, p)| p).collect();
        assert_eq!(popularity, vec![20, 5, 1]);
    }

    #[test]
    fn test_heap_empty_errors() {
        let mut heap: MinHeap<i32> = MinHeap::new();

        assert_eq!(heap.peek(), Err(ContainerError::EmptyHeap));
        assert_eq!(heap.pop(), Err(ContainerError::EmptyHeap));
        assert_eq!(heap.replace(1), Err(ContainerError::EmptyHeap));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_heap_peek_does_not_mutate() {
        let mut heap = MinHeap::new();
        heap.extend([5, 2, 9]);

        assert_eq!(heap.peek(), Ok(&2));
        assert_eq!(heap.peek(), Ok(&2));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_heap_from_vec_heapifies() {
        let values: Vec<u32> = (0..200).map(|i| (i * 7919) % 211).collect();
        let heap = MinHeap::from_vec(values.clone(), NaturalOrder);
        assert_heap_property(&heap);

        let mut expected = values;
        expected.sort();
        assert_eq!(heap.into_sorted_vec(), expected);
    }

    #[test]
    fn test_heap_replace_and_push_pop() {
        let mut heap = MinHeap::new();
        heap.extend([4, 8, 6]);

        assert_eq!(heap.replace(10), Ok(4));
        assert_eq!(heap.peek(), Ok(&6));

        // Smaller than the root: handed straight back
        assert_eq!(heap.push_pop(1), 1);
        assert_eq!(heap.len(), 3);

        // Larger than the root: root comes out, item goes in
        assert_eq!(heap.push_pop(7), 6);
        assert_eq!(heap.into_sorted_vec(), vec![7, 8, 10]);
    }

    #[test]
    fn test_heap_push_pop_on_empty() {
        let mut heap: MinHeap<i32> = MinHeap::new();
        assert_eq!(heap.push_pop(3), 3);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_heap_closure_comparator() {
        let mut heap = MinHeap::with_comparator(|a: &f64, b: &f64| b.total_cmp(a));
        heap.extend([0.15, 0.40, 0.05, 0.25]);

        assert_eq!(heap.into_sorted_vec(), vec![0.40, 0.25, 0.15, 0.05]);
    }

    #[test]
    fn test_heap_ties_return_every_element() {
        let mut heap = MinHeap::by_key(|i: &Item| i.popularity, RankOrder::Descending);
        heap.extend([item("A", 3), item("B", 3), item("C", 9), item("D", 3)]);

        let sequence = heap.into_sequence();
        assert_eq!(sequence.get(0).unwrap().sku, "C");

        // Tie order is unspecified, only membership is checked
        let mut tied: Vec<_> = sequence.iter().skip(1).map(|i| i.sku).collect();
        tied.sort();
        assert_eq!(tied, vec!["A", "B", "D"]);
    }

    #[test]
    fn test_rank_order_apply() {
        assert_eq!(RankOrder::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(RankOrder::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(RankOrder::Descending.apply(Ordering::Equal), Ordering::Equal);
    }
}
