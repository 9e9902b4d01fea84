//! Ordering, grouping, joining and set operations with injected comparers.
//!
//! Each operation takes its comparison logic as an
//! [`OrderComparer`] or [`EqualityComparer`], so a plain closure wrapped by
//! [`crate::comparer`] works as well as a dedicated comparer type.
//!
//! # Evaluation
//!
//! | Operation | Materializes | When |
//! |---|---|---|
//! | [`OrderedSequence`] | whole source | `into_iter` / `into_vec` |
//! | [`GroupBy`] | whole source | first pull |
//! | [`InnerJoin`], [`GroupJoin`] | inner side | first pull |
//! | [`Intersect`], [`Except`] | second side | first pull |
//! | [`Distinct`], union | elements seen so far | per pull |
//!
//! Outer and first sides are always streamed, so `distinct`, `union`,
//! `intersect`, `except` and both joins work over an infinite outer/first
//! source as long as the consumer bounds it.

use std::cmp::Ordering;
use std::fmt;

use crate::collections::{ComparerSet, Grouping, Lookup};
use crate::comparer::{EqualityComparer, OrderComparer};

// ----------------------------------------------------------------------------
// Deferred construction
// ----------------------------------------------------------------------------

/// State built from its inputs on first use.
enum Deferred<P, R> {
    Pending(P),
    Ready(R),
    Poisoned,
}

impl<P, R> Deferred<P, R> {
    fn get_or_build(&mut self, build: impl FnOnce(P) -> R) -> &mut R {
        if let Deferred::Pending(_) = self {
            if let Deferred::Pending(inputs) = std::mem::replace(self, Deferred::Poisoned) {
                *self = Deferred::Ready(build(inputs));
            }
        }
        match self {
            Deferred::Ready(state) => state,
            _ => unreachable!("deferred state poisoned by a panic during construction"),
        }
    }
}

// ----------------------------------------------------------------------------
// Ordering
// ----------------------------------------------------------------------------

type KeyComparison<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + 'a>;

/// A source plus a chain of sort keys, sorted when realized.
///
/// Created by [`SequenceExt::order_by`](crate::SequenceExt::order_by) and
/// friends. Secondary keys added with [`then_by`](Self::then_by) are only
/// consulted when every earlier key compares equal. The sort is stable:
/// elements equal under the whole chain keep their input order.
///
/// Sorting happens when the sequence is turned into an iterator, not when
/// it is built.
///
/// # Examples
/// ```
/// use u_seqkit::SequenceExt;
/// use u_seqkit::comparer::{from_compare, NaturalOrder};
///
/// let people = [("ann", 31), ("bob", 25), ("cid", 31), ("dee", 25)];
/// let sorted: Vec<&str> = people
///     .into_iter()
///     .order_by_descending(|p| p.1, NaturalOrder)
///     .then_by(|p| p.0, from_compare(|a: &&str, b: &&str| b.cmp(a)))
///     .into_iter()
///     .map(|p| p.0)
///     .collect();
/// assert_eq!(sorted, vec!["cid", "ann", "dee", "bob"]);
/// ```
pub struct OrderedSequence<'a, I: Iterator> {
    source: I,
    keys: Vec<KeyComparison<'a, I::Item>>,
}

impl<'a, I: Iterator> OrderedSequence<'a, I> {
    pub(crate) fn new<K, F, C>(source: I, key: F, comparer: C, descending: bool) -> Self
    where
        F: Fn(&I::Item) -> K + 'a,
        C: OrderComparer<K> + 'a,
    {
        Self {
            source,
            keys: vec![key_comparison(key, comparer, descending)],
        }
    }

    /// Adds an ascending secondary key.
    pub fn then_by<K, F, C>(mut self, key: F, comparer: C) -> Self
    where
        F: Fn(&I::Item) -> K + 'a,
        C: OrderComparer<K> + 'a,
    {
        self.keys.push(key_comparison(key, comparer, false));
        self
    }

    /// Adds a descending secondary key.
    pub fn then_by_descending<K, F, C>(mut self, key: F, comparer: C) -> Self
    where
        F: Fn(&I::Item) -> K + 'a,
        C: OrderComparer<K> + 'a,
    {
        self.keys.push(key_comparison(key, comparer, true));
        self
    }

    /// Number of sort keys in the chain.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Realizes and sorts the source.
    pub fn into_vec(self) -> Vec<I::Item> {
        let mut items: Vec<I::Item> = self.source.collect();
        let keys = self.keys;
        items.sort_by(|a, b| {
            keys.iter()
                .map(|compare| compare(a, b))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        tracing::trace!(elements = items.len(), keys = keys.len(), "ordered sequence sorted");
        items
    }
}

impl<'a, I: Iterator> IntoIterator for OrderedSequence<'a, I> {
    type Item = I::Item;
    type IntoIter = std::vec::IntoIter<I::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<I: Iterator> fmt::Debug for OrderedSequence<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedSequence")
            .field("keys", &self.keys.len())
            .finish_non_exhaustive()
    }
}

fn key_comparison<'a, T, K, F, C>(
    key: F,
    comparer: C,
    descending: bool,
) -> KeyComparison<'a, T>
where
    F: Fn(&T) -> K + 'a,
    C: OrderComparer<K> + 'a,
{
    if descending {
        Box::new(move |a: &T, b: &T| comparer.compare(&key(b), &key(a)))
    } else {
        Box::new(move |a: &T, b: &T| comparer.compare(&key(a), &key(b)))
    }
}

// ----------------------------------------------------------------------------
// Grouping
// ----------------------------------------------------------------------------

/// Groups of elements sharing a key, in order of first key occurrence.
///
/// Created by [`SequenceExt::group_by`](crate::SequenceExt::group_by).
/// The whole source is consumed on the first pull.
pub struct GroupBy<I: Iterator, K, F, C> {
    state: Deferred<(I, F, C), std::vec::IntoIter<Grouping<K, I::Item>>>,
}

impl<I: Iterator, K, F, C> GroupBy<I, K, F, C> {
    pub(crate) fn new(source: I, key: F, comparer: C) -> Self {
        Self {
            state: Deferred::Pending((source, key, comparer)),
        }
    }
}

impl<I, K, F, C> Iterator for GroupBy<I, K, F, C>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    C: EqualityComparer<K>,
{
    type Item = Grouping<K, I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.state
            .get_or_build(|(source, key, comparer)| {
                let lookup = Lookup::from_iter_with(source, key, comparer);
                tracing::trace!(groups = lookup.len(), "group_by lookup built");
                lookup.into_groups().into_iter()
            })
            .next()
    }
}

// ----------------------------------------------------------------------------
// Joins
// ----------------------------------------------------------------------------

type InnerInputs<J, FI, C> = (J, FI, C);

/// Relational inner join.
///
/// Created by [`SequenceExt::inner_join`](crate::SequenceExt::inner_join).
/// Yields one result per matching (outer, inner) pair: outer order first,
/// then inner order within a key.
pub struct InnerJoin<O: Iterator, J: IntoIterator, K, FO, FI, R, C> {
    outer: O,
    inner: Deferred<InnerInputs<J, FI, C>, Lookup<K, J::Item, C>>,
    outer_key: FO,
    result: R,
    current: Option<(O::Item, usize, usize)>,
}

impl<O: Iterator, J: IntoIterator, K, FO, FI, R, C> InnerJoin<O, J, K, FO, FI, R, C> {
    pub(crate) fn new(
        outer: O,
        inner: J,
        outer_key: FO,
        inner_key: FI,
        result: R,
        comparer: C,
    ) -> Self {
        Self {
            outer,
            inner: Deferred::Pending((inner, inner_key, comparer)),
            outer_key,
            result,
            current: None,
        }
    }
}

impl<O, J, K, FO, FI, R, C, T> Iterator for InnerJoin<O, J, K, FO, FI, R, C>
where
    O: Iterator,
    J: IntoIterator,
    FO: FnMut(&O::Item) -> K,
    FI: FnMut(&J::Item) -> K,
    R: FnMut(&O::Item, &J::Item) -> T,
    C: EqualityComparer<K>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let lookup = self
            .inner
            .get_or_build(|(inner, key, comparer)| build_inner_lookup(inner, key, comparer));
        loop {
            if let Some((outer, group, pos)) = &mut self.current {
                if let Some(inner) = lookup.group(*group).elements().get(*pos) {
                    *pos += 1;
                    return Some((self.result)(&*outer, inner));
                }
            }
            self.current = None;
            let outer = self.outer.next()?;
            let key = (self.outer_key)(&outer);
            if let Some(group) = lookup.position(&key) {
                self.current = Some((outer, group, 0));
            }
        }
    }
}

/// Relational group join.
///
/// Created by [`SequenceExt::group_join`](crate::SequenceExt::group_join).
/// Yields exactly one result per outer element, paired with the (possibly
/// empty) slice of matching inner elements.
pub struct GroupJoin<O: Iterator, J: IntoIterator, K, FO, FI, R, C> {
    outer: O,
    inner: Deferred<InnerInputs<J, FI, C>, Lookup<K, J::Item, C>>,
    outer_key: FO,
    result: R,
}

impl<O: Iterator, J: IntoIterator, K, FO, FI, R, C> GroupJoin<O, J, K, FO, FI, R, C> {
    pub(crate) fn new(
        outer: O,
        inner: J,
        outer_key: FO,
        inner_key: FI,
        result: R,
        comparer: C,
    ) -> Self {
        Self {
            outer,
            inner: Deferred::Pending((inner, inner_key, comparer)),
            outer_key,
            result,
        }
    }
}

impl<O, J, K, FO, FI, R, C, T> Iterator for GroupJoin<O, J, K, FO, FI, R, C>
where
    O: Iterator,
    J: IntoIterator,
    FO: FnMut(&O::Item) -> K,
    FI: FnMut(&J::Item) -> K,
    R: FnMut(O::Item, &[J::Item]) -> T,
    C: EqualityComparer<K>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let lookup = self
            .inner
            .get_or_build(|(inner, key, comparer)| build_inner_lookup(inner, key, comparer));
        let outer = self.outer.next()?;
        let key = (self.outer_key)(&outer);
        let matches = lookup.get(&key).unwrap_or(&[]);
        Some((self.result)(outer, matches))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.outer.size_hint()
    }
}

fn build_inner_lookup<J, K, FI, C>(inner: J, key: FI, comparer: C) -> Lookup<K, J::Item, C>
where
    J: IntoIterator,
    FI: FnMut(&J::Item) -> K,
    C: EqualityComparer<K>,
{
    let lookup = Lookup::from_iter_with(inner, key, comparer);
    tracing::trace!(keys = lookup.len(), "join inner lookup built");
    lookup
}

// ----------------------------------------------------------------------------
// Set operations
// ----------------------------------------------------------------------------

/// First occurrence of each equality class, in input order.
///
/// Created by [`SequenceExt::distinct`](crate::SequenceExt::distinct) and
/// [`SequenceExt::union`](crate::SequenceExt::union).
pub struct Distinct<I: Iterator, C> {
    source: I,
    seen: ComparerSet<I::Item, C>,
}

impl<I: Iterator, C: EqualityComparer<I::Item>> Distinct<I, C> {
    pub(crate) fn new(source: I, comparer: C) -> Self {
        Self {
            source,
            seen: ComparerSet::new(comparer),
        }
    }
}

impl<I, C> Iterator for Distinct<I, C>
where
    I: Iterator,
    I::Item: Clone,
    C: EqualityComparer<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        loop {
            let item = self.source.next()?;
            if self.seen.insert(item.clone()) {
                return Some(item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.source.size_hint().1)
    }
}

/// Deduplicated elements of the first sequence also present in the second.
///
/// Created by [`SequenceExt::intersect`](crate::SequenceExt::intersect).
pub struct Intersect<I: Iterator, J, C> {
    first: I,
    second: Deferred<(J, C), ComparerSet<I::Item, C>>,
}

impl<I: Iterator, J, C> Intersect<I, J, C> {
    pub(crate) fn new(first: I, second: J, comparer: C) -> Self {
        Self {
            first,
            second: Deferred::Pending((second, comparer)),
        }
    }
}

impl<I, J, C> Iterator for Intersect<I, J, C>
where
    I: Iterator,
    J: IntoIterator<Item = I::Item>,
    C: EqualityComparer<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let remaining = self
            .second
            .get_or_build(|(second, comparer)| ComparerSet::from_iter_with(second, comparer));
        loop {
            let item = self.first.next()?;
            // Removing on match makes later duplicates of `item` miss.
            if remaining.remove(&item) {
                return Some(item);
            }
        }
    }
}

/// Deduplicated elements of the first sequence absent from the second.
///
/// Created by [`SequenceExt::except`](crate::SequenceExt::except).
pub struct Except<I: Iterator, J, C> {
    first: I,
    excluded: Deferred<(J, C), ComparerSet<I::Item, C>>,
}

impl<I: Iterator, J, C> Except<I, J, C> {
    pub(crate) fn new(first: I, second: J, comparer: C) -> Self {
        Self {
            first,
            excluded: Deferred::Pending((second, comparer)),
        }
    }
}

impl<I, J, C> Iterator for Except<I, J, C>
where
    I: Iterator,
    I::Item: Clone,
    J: IntoIterator<Item = I::Item>,
    C: EqualityComparer<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let excluded = self
            .excluded
            .get_or_build(|(second, comparer)| ComparerSet::from_iter_with(second, comparer));
        loop {
            let item = self.first.next()?;
            // Yielded elements join the exclusion set, deduplicating the output.
            if excluded.insert(item.clone()) {
                return Some(item);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use crate::comparer::{NaturalOrder, StructuralEquality};
    use crate::SequenceExt;
    use proptest::prelude::*;

    fn small_vec() -> impl Strategy<Value = Vec<i32>> {
        proptest::collection::vec(0_i32..20, 0..60)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn union_with_self_is_distinct(s in small_vec()) {
            let union: Vec<i32> = s.clone().into_iter().union(s.clone(), StructuralEquality).collect();
            let distinct: Vec<i32> = s.into_iter().distinct(StructuralEquality).collect();
            prop_assert_eq!(union, distinct);
        }

        #[test]
        fn intersect_with_self_is_distinct(s in small_vec()) {
            let inter: Vec<i32> = s.clone().into_iter().intersect(s.clone(), StructuralEquality).collect();
            let distinct: Vec<i32> = s.into_iter().distinct(StructuralEquality).collect();
            prop_assert_eq!(inter, distinct);
        }

        #[test]
        fn except_self_is_empty(s in small_vec()) {
            prop_assert_eq!(s.clone().into_iter().except(s, StructuralEquality).count(), 0);
        }

        #[test]
        fn distinct_has_no_duplicates_and_covers_input(s in small_vec()) {
            let d: Vec<i32> = s.clone().into_iter().distinct(StructuralEquality).collect();
            let mut sorted = d.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), d.len());
            prop_assert!(s.iter().all(|x| d.contains(x)));
        }

        #[test]
        fn order_by_matches_std_stable_sort(
            pairs in proptest::collection::vec((0_u8..5, any::<u16>()), 0..60),
        ) {
            let ours = pairs.clone().into_iter().order_by(|p| p.0, NaturalOrder).into_vec();
            let mut expected = pairs;
            expected.sort_by_key(|p| p.0);
            prop_assert_eq!(ours, expected);
        }

        #[test]
        fn group_by_partitions_input(s in small_vec()) {
            let groups: Vec<_> = s.clone().into_iter().group_by(|x| x % 4, StructuralEquality).collect();
            let total: usize = groups.iter().map(|g| g.len()).sum();
            prop_assert_eq!(total, s.len());
            for g in &groups {
                prop_assert!(g.elements().iter().all(|x| x % 4 == *g.key()));
            }
        }
    }
}
