//! Sequence generation from factories and fixed values.
//!
//! Every generator here is lazy: nothing is produced until the consumer
//! pulls, and an unbounded generator keeps producing for as long as it is
//! pulled. Bound infinite generators with [`Iterator::take`] (or any other
//! short-circuiting adapter) before realizing them.
//!
//! # Restartability
//!
//! A generator built from a pure factory yields the same elements every
//! time it is rebuilt. One that wraps external mutable state, such as a
//! random number generator, does not: see [`crate::random`].

use std::iter::FusedIterator;

/// Creates a sequence by repeatedly calling `factory`.
///
/// - `count == None`: the sequence is infinite.
/// - `count == Some(n)`: `factory` is called exactly `n` times, in emission
///   order, regardless of whether results repeat.
///
/// `factory` is only invoked when an element is pulled, so side effects
/// happen one element at a time.
///
/// # Examples
/// ```
/// use u_seqkit::generate::create;
/// let mut n = 0;
/// let squares: Vec<u32> = create(|| { n += 1; n * n }, Some(4)).collect();
/// assert_eq!(squares, vec![1, 4, 9, 16]);
///
/// let ones: Vec<u8> = create(|| 1, None).take(3).collect();
/// assert_eq!(ones, vec![1, 1, 1]);
/// ```
pub fn create<T, F>(factory: F, count: Option<usize>) -> Create<F>
where
    F: FnMut() -> T,
{
    Create {
        factory,
        remaining: count,
    }
}

/// Iterator returned by [`create`].
#[derive(Debug, Clone)]
pub struct Create<F> {
    factory: F,
    remaining: Option<usize>,
}

impl<T, F> Iterator for Create<F>
where
    F: FnMut() -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match &mut self.remaining {
            None => Some((self.factory)()),
            Some(0) => None,
            Some(n) => {
                *n -= 1;
                Some((self.factory)())
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            None => (usize::MAX, None),
            Some(n) => (n, Some(n)),
        }
    }
}

impl<T, F> FusedIterator for Create<F> where F: FnMut() -> T {}

/// Option-structure form of [`create`].
///
/// The default count is `None`, which makes the generated sequence
/// infinite.
///
/// # Examples
/// ```
/// use u_seqkit::generate::GenerationSpec;
/// let v: Vec<char> = GenerationSpec::new(|| 'x').count(2).into_iter().collect();
/// assert_eq!(v, vec!['x', 'x']);
/// ```
#[derive(Debug, Clone)]
pub struct GenerationSpec<F> {
    factory: F,
    count: Option<usize>,
}

impl<F> GenerationSpec<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            count: None,
        }
    }

    /// Bounds the sequence to exactly `count` elements.
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Returns `true` when no count was set.
    pub fn is_infinite(&self) -> bool {
        self.count.is_none()
    }
}

impl<T, F> IntoIterator for GenerationSpec<F>
where
    F: FnMut() -> T,
{
    type Item = T;
    type IntoIter = Create<F>;

    fn into_iter(self) -> Create<F> {
        create(self.factory, self.count)
    }
}

/// Wraps a finite, ordered collection as a sequence.
///
/// # Examples
/// ```
/// use u_seqkit::generate::from_values;
/// assert_eq!(from_values([1, 2, 3, 4]).sum::<i32>(), 10);
/// ```
pub fn from_values<I: IntoIterator>(values: I) -> I::IntoIter {
    values.into_iter()
}

/// A sequence of exactly one element.
pub fn from_value<T>(value: T) -> std::iter::Once<T> {
    std::iter::once(value)
}

/// Treats an absent sequence as an empty one.
///
/// # Examples
/// ```
/// use u_seqkit::generate::empty_if_none;
/// let missing: Option<Vec<i32>> = None;
/// assert_eq!(empty_if_none(missing).filter(|x| *x > 0).count(), 0);
/// ```
pub fn empty_if_none<I: IntoIterator>(
    source: Option<I>,
) -> std::iter::Flatten<std::option::IntoIter<I>> {
    source.into_iter().flatten()
}

/// Returns `true` if `source` is absent or yields no elements.
///
/// Pulls at most one element.
pub fn is_none_or_empty<I: IntoIterator>(source: Option<I>) -> bool {
    match source {
        None => true,
        Some(s) => s.into_iter().next().is_none(),
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn counted_create_yields_exactly_count(n in 0_usize..500) {
            let mut calls = 0_usize;
            let produced = create(|| { calls += 1; }, Some(n)).count();
            prop_assert_eq!(produced, n);
            prop_assert_eq!(calls, n);
        }

        #[test]
        fn take_bounds_factory_calls(n in 0_usize..200) {
            let mut calls = 0_usize;
            let produced = create(|| { calls += 1; calls }, None).take(n).count();
            prop_assert_eq!(produced, n);
            prop_assert_eq!(calls, n);
        }
    }
}
