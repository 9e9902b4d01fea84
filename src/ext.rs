//! Method-call surface over every [`Iterator`].

use std::iter::{Chain, Skip, Take};

use num_traits::ToPrimitive;

use crate::combinators::{JoinWith, JoinWithSeq};
use crate::comparer::{EqualityComparer, NaturalOrder, OrderComparer};
use crate::error::Result;
use crate::ordered::{Distinct, Except, GroupBy, GroupJoin, InnerJoin, Intersect, OrderedSequence};
use crate::stats::{self, PercentileMethod};

/// Sequence operations available on any iterator.
///
/// Adapters are lazy: nothing is pulled from `self` until the returned
/// value is iterated. Statistics and [`index_of`](Self::index_of) /
/// [`for_each_while`](Self::for_each_while) are terminal and consume
/// `self` immediately.
///
/// # Examples
/// ```
/// use u_seqkit::SequenceExt;
/// use u_seqkit::comparer::StructuralEquality;
///
/// let v: Vec<i32> = [3, 1, 3, 2]
///     .into_iter()
///     .distinct(StructuralEquality)
///     .join_with(0)
///     .collect();
/// assert_eq!(v, vec![3, 0, 1, 0, 2, 0]);
/// ```
pub trait SequenceExt: Iterator + Sized {
    // ---- combinators ----

    /// Emits every element followed by `separator`, including after the last.
    fn join_with(self, separator: Self::Item) -> JoinWith<Self, Self::Item> {
        JoinWith::new(self, separator)
    }

    /// Emits every element followed by a full pass over `separator`.
    /// `None` passes the source through unchanged.
    fn join_with_seq<S>(self, separator: Option<S>) -> JoinWithSeq<Self, S>
    where
        S: IntoIterator<Item = Self::Item> + Clone,
    {
        JoinWithSeq::new(self, separator)
    }

    fn append<E>(self, extra: E) -> Chain<Self, E::IntoIter>
    where
        E: IntoIterator<Item = Self::Item>,
    {
        self.chain(extra)
    }

    fn prepend<E>(self, extra: E) -> Chain<E::IntoIter, Self>
    where
        E: IntoIterator<Item = Self::Item>,
    {
        extra.into_iter().chain(self)
    }

    /// Skips `start` elements, then yields at most `count`.
    fn subsequence(self, start: usize, count: usize) -> Take<Skip<Self>> {
        self.skip(start).take(count)
    }

    // ---- ordering ----

    /// Stable ascending sort by `key` under `comparer`, realized on iteration.
    fn order_by<'a, K, F, C>(self, key: F, comparer: C) -> OrderedSequence<'a, Self>
    where
        F: Fn(&Self::Item) -> K + 'a,
        C: OrderComparer<K> + 'a,
    {
        OrderedSequence::new(self, key, comparer, false)
    }

    /// Stable descending sort by `key` under `comparer`.
    fn order_by_descending<'a, K, F, C>(self, key: F, comparer: C) -> OrderedSequence<'a, Self>
    where
        F: Fn(&Self::Item) -> K + 'a,
        C: OrderComparer<K> + 'a,
    {
        OrderedSequence::new(self, key, comparer, true)
    }

    /// Ascending sort by the elements' own [`Ord`].
    fn order_by_natural<'a>(self) -> OrderedSequence<'a, Self>
    where
        Self::Item: Ord + Clone,
    {
        OrderedSequence::new(self, |x: &Self::Item| x.clone(), NaturalOrder, false)
    }

    // ---- grouping and joins ----

    fn group_by<K, F, C>(self, key: F, comparer: C) -> GroupBy<Self, K, F, C>
    where
        F: FnMut(&Self::Item) -> K,
        C: EqualityComparer<K>,
    {
        GroupBy::new(self, key, comparer)
    }

    /// One `result(outer, inner)` per pair whose keys are equal under
    /// `comparer`. `inner` is realized on the first pull.
    fn inner_join<J, K, FO, FI, R, T, C>(
        self,
        inner: J,
        outer_key: FO,
        inner_key: FI,
        result: R,
        comparer: C,
    ) -> InnerJoin<Self, J, K, FO, FI, R, C>
    where
        J: IntoIterator,
        FO: FnMut(&Self::Item) -> K,
        FI: FnMut(&J::Item) -> K,
        R: FnMut(&Self::Item, &J::Item) -> T,
        C: EqualityComparer<K>,
    {
        InnerJoin::new(self, inner, outer_key, inner_key, result, comparer)
    }

    /// One `result(outer, matches)` per outer element; `matches` may be empty.
    fn group_join<J, K, FO, FI, R, T, C>(
        self,
        inner: J,
        outer_key: FO,
        inner_key: FI,
        result: R,
        comparer: C,
    ) -> GroupJoin<Self, J, K, FO, FI, R, C>
    where
        J: IntoIterator,
        FO: FnMut(&Self::Item) -> K,
        FI: FnMut(&J::Item) -> K,
        R: FnMut(Self::Item, &[J::Item]) -> T,
        C: EqualityComparer<K>,
    {
        GroupJoin::new(self, inner, outer_key, inner_key, result, comparer)
    }

    // ---- set operations ----

    fn distinct<C>(self, comparer: C) -> Distinct<Self, C>
    where
        Self::Item: Clone,
        C: EqualityComparer<Self::Item>,
    {
        Distinct::new(self, comparer)
    }

    /// Distinct elements of `self` followed by unseen distinct elements of
    /// `second`.
    fn union<J, C>(self, second: J, comparer: C) -> Distinct<Chain<Self, J::IntoIter>, C>
    where
        J: IntoIterator<Item = Self::Item>,
        Self::Item: Clone,
        C: EqualityComparer<Self::Item>,
    {
        Distinct::new(self.chain(second), comparer)
    }

    fn intersect<J, C>(self, second: J, comparer: C) -> Intersect<Self, J, C>
    where
        J: IntoIterator<Item = Self::Item>,
        C: EqualityComparer<Self::Item>,
    {
        Intersect::new(self, second, comparer)
    }

    fn except<J, C>(self, second: J, comparer: C) -> Except<Self, J, C>
    where
        J: IntoIterator<Item = Self::Item>,
        Self::Item: Clone,
        C: EqualityComparer<Self::Item>,
    {
        Except::new(self, second, comparer)
    }

    // ---- terminal helpers ----

    /// Position of the first element equal to `value` under `comparer`.
    ///
    /// Stops at the first match, so an infinite source containing `value`
    /// returns.
    fn index_of<C>(self, value: &Self::Item, comparer: C) -> Option<usize>
    where
        C: EqualityComparer<Self::Item>,
    {
        let mut source = self;
        source.position(|item| comparer.equals(&item, value))
    }

    /// Calls `f` on each element until it returns `false`.
    ///
    /// # Returns
    /// The number of elements visited, including the one that stopped the loop.
    fn for_each_while<F>(self, mut f: F) -> usize
    where
        F: FnMut(Self::Item) -> bool,
    {
        let mut visited = 0;
        for item in self {
            visited += 1;
            if !f(item) {
                break;
            }
        }
        visited
    }

    // ---- statistics ----

    fn variance_population<K, F>(self, key: F) -> Result<f64>
    where
        F: FnMut(Self::Item) -> K,
        K: ToPrimitive,
    {
        stats::variance_population(self, key)
    }

    fn variance_sample<K, F>(self, key: F) -> Result<f64>
    where
        F: FnMut(Self::Item) -> K,
        K: ToPrimitive,
    {
        stats::variance_sample(self, key)
    }

    fn std_dev_population<K, F>(self, key: F) -> Result<f64>
    where
        F: FnMut(Self::Item) -> K,
        K: ToPrimitive,
    {
        stats::std_dev_population(self, key)
    }

    fn std_dev_sample<K, F>(self, key: F) -> Result<f64>
    where
        F: FnMut(Self::Item) -> K,
        K: ToPrimitive,
    {
        stats::std_dev_sample(self, key)
    }

    fn percentile<K, F>(self, key: F, p: f64) -> Result<f64>
    where
        F: FnMut(Self::Item) -> K,
        K: ToPrimitive,
    {
        stats::percentile(self, key, p)
    }

    fn percentile_inclusive<K, F>(self, key: F, p: f64) -> Result<f64>
    where
        F: FnMut(Self::Item) -> K,
        K: ToPrimitive,
    {
        stats::percentile_inclusive(self, key, p)
    }

    fn percentile_exclusive<K, F>(self, key: F, p: f64) -> Result<f64>
    where
        F: FnMut(Self::Item) -> K,
        K: ToPrimitive,
    {
        stats::percentile_exclusive(self, key, p)
    }

    fn percentile_with<K, F>(self, key: F, p: f64, method: PercentileMethod) -> Result<f64>
    where
        F: FnMut(Self::Item) -> K,
        K: ToPrimitive,
    {
        stats::percentile_with(self, key, p, method)
    }
}

impl<I: Iterator> SequenceExt for I {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_statistics_by_method_call() {
        let rows = vec![("a", 2_u32), ("b", 4), ("c", 4), ("d", 4), ("e", 5), ("f", 5), ("g", 7), ("h", 9)];
        let var = rows.iter().variance_population(|r| r.1).unwrap();
        assert!((var - 4.0).abs() < 1e-12);
        let sd = rows.iter().std_dev_population(|r| r.1).unwrap();
        assert!((sd - 2.0).abs() < 1e-12);
        assert_eq!(rows.iter().percentile(|r| r.1, 1.0), Ok(9.0));
        assert_eq!(
            rows.iter().percentile_with(|r| r.1, 0.0, PercentileMethod::Exclusive),
            Err(Error::PercentileOutOfRange {
                percentile: 0.0,
                min: 1.0 / 8.0,
                max: 1.0 - 1.0 / 9.0,
            })
        );
    }

    #[test]
    fn test_statistics_empty_by_method_call() {
        assert_eq!(
            std::iter::empty::<f64>().variance_sample(|x| x),
            Err(Error::EmptySequence)
        );
        assert_eq!(
            std::iter::empty::<f64>().percentile_exclusive(|x| x, 0.5),
            Err(Error::EmptySequence)
        );
    }

    #[test]
    fn test_chaining_adapters() {
        let v: Vec<i32> = (1..=3)
            .prepend([0])
            .append([4])
            .subsequence(1, 3)
            .join_with_seq(Some([-1, -1]))
            .collect();
        assert_eq!(v, vec![1, -1, -1, 2, -1, -1, 3, -1, -1]);
    }
}
