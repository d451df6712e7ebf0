use crate::error::Result;
use crate::heap::{Compare, MinHeap, RankOrder};
use crate::mapping::Mapping;
use crate::record::Rankable;
use crate::sequence::Sequence;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A record paired with the score it was ranked by.
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a, R> {
    pub score: f64,
    pub record: &'a R,
}

/// Compares [`Ranked`] entries by score in a fixed direction.
#[derive(Debug, Clone, Copy)]
pub struct ByScore {
    order: RankOrder,
}

impl ByScore {
    pub fn new(order: RankOrder) -> Self {
        Self { order }
    }
}

impl<R> Compare<Ranked<'_, R>> for ByScore {
    fn compare(&self, a: &Ranked<'_, R>, b: &Ranked<'_, R>) -> Ordering {
        self.order.apply(a.score.total_cmp(&b.score))
    }
}

/// 1-based position of a product in a drained ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankPosition {
    pub rank: usize,
    pub score: f64,
}

/// A heap-backed ranking under construction or being drained.
///
/// Builders borrow the input records and never mutate them. Products with
/// equal scores come out in no set order.
#[derive(Debug, Clone)]
pub struct Ranking<'a, R> {
    heap: MinHeap<Ranked<'a, R>, ByScore>,
}

impl<'a, R> Ranking<'a, R> {
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn peek(&self) -> Result<&Ranked<'a, R>> {
        self.heap.peek()
    }

    pub fn pop(&mut self) -> Result<Ranked<'a, R>> {
        self.heap.pop()
    }

    /// Pops at most `n` entries in rank order.
    pub fn top(mut self, n: usize) -> Sequence<Ranked<'a, R>> {
        let mut top = Sequence::with_capacity(n.min(self.len()));
        while top.len() < n {
            match self.heap.pop() {
                Ok(entry) => top.append(entry),
                Err(_) => break,
            }
        }
        top
    }

    /// Drains every entry in rank order.
    pub fn into_sequence(self) -> Sequence<Ranked<'a, R>> {
        self.heap.into_sequence()
    }

    /// Drains the ranking into a SKU lookup of positions.
    pub fn into_positions(self) -> Mapping<String, RankPosition>
    where
        R: Rankable,
    {
        self.into_sequence()
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let position = RankPosition {
                    rank: i + 1,
                    score: entry.score,
                };
                (entry.record.sku().to_string(), position)
            })
            .collect()
    }
}

/// Ranks `records` by `key_fn` in `order`.
pub fn build_ranking<'a, R, F>(records: &'a [R], key_fn: F, order: RankOrder) -> Ranking<'a, R>
where
    F: Fn(&R) -> f64,
{
    let mut heap = MinHeap::with_comparator(ByScore::new(order));
    for record in records {
        heap.push(Ranked {
            score: key_fn(record),
            record,
        });
    }

    tracing::debug!(entries = heap.len(), ?order, "built ranking");
    Ranking { heap }
}

/// Best sellers first.
pub fn build_popularity_ranking<R: Rankable>(records: &[R]) -> Ranking<'_, R> {
    build_ranking(records, |r| r.items_sold(), RankOrder::Descending)
}

/// Deepest discount first.
pub fn build_discount_ranking<R: Rankable>(records: &[R]) -> Ranking<'_, R> {
    build_ranking(records, |r| r.discount_rate(), RankOrder::Descending)
}

/// Fastest sellers per day first.
pub fn build_velocity_ranking<R: Rankable>(records: &[R]) -> Ranking<'_, R> {
    build_ranking(records, |r| r.sales_velocity(), RankOrder::Descending)
}

/// Weights of the blended popularity score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PopularityWeights {
    pub reviews: f64,
    pub sold: f64,
    pub discount: f64,
}

impl Default for PopularityWeights {
    fn default() -> Self {
        Self {
            reviews: 0.4,
            sold: 0.4,
            discount: 0.2,
        }
    }
}

/// Observed bounds of one metric across the ranked cohort.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    lo: f64,
    hi: f64,
}

impl Bounds {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Bounds {
                lo: f64::INFINITY,
                hi: f64::NEG_INFINITY,
            },
            |b, v| Bounds {
                lo: b.lo.min(v),
                hi: b.hi.max(v),
            },
        )
    }

    /// Scales `value` into [0, 1]; 0 when every value is the same.
    fn normalize(&self, value: f64) -> f64 {
        if self.hi - self.lo <= 0.0 {
            return 0.0;
        }
        (value - self.lo) / (self.hi - self.lo)
    }
}

/// Ranks by a weighted blend of reviews, units sold and discount.
///
/// Each metric is min-max normalized over `records` before weighting.
pub fn build_weighted_popularity_ranking<R: Rankable>(
    records: &[R],
    weights: PopularityWeights,
) -> Ranking<'_, R> {
    let reviews = Bounds::of(records.iter().map(|r| r.reviews_count()));
    let sold = Bounds::of(records.iter().map(|r| r.items_sold()));
    let discount = Bounds::of(records.iter().map(|r| r.discount_rate()));

    build_ranking(
        records,
        |r| {
            weights.reviews * reviews.normalize(r.reviews_count())
                + weights.sold * sold.normalize(r.items_sold())
                + weights.discount * discount.normalize(r.discount_rate())
        },
        RankOrder::Descending,
    )
}
