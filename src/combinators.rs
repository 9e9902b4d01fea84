//! Concatenation and interleaving adapters.
//!
//! All adapters pull from their source one element at a time and stop the
//! moment the consumer stops, so they are safe over infinite sources.
//! They are usually reached through [`SequenceExt`](crate::SequenceExt).
//!
//! # Separator placement
//!
//! [`JoinWith`] and [`JoinWithSeq`] place the separator after **every**
//! element, including the last one. This is an interleave, not the infix
//! join of `[T]::join`:
//!
//! ```text
//! [0, 1, 2] join_with -137  =>  [0, -137, 1, -137, 2, -137]
//! ```

use std::iter::{self, Chain, FusedIterator, Once};

/// Emits each element followed by a clone of one separator value.
#[derive(Debug, Clone)]
pub struct JoinWith<I, T> {
    source: I,
    separator: T,
    separator_due: bool,
}

impl<I, T> JoinWith<I, T> {
    pub(crate) fn new(source: I, separator: T) -> Self {
        Self {
            source,
            separator,
            separator_due: false,
        }
    }
}

impl<I, T> Iterator for JoinWith<I, T>
where
    I: Iterator<Item = T>,
    T: Clone,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.separator_due {
            self.separator_due = false;
            return Some(self.separator.clone());
        }
        let item = self.source.next()?;
        self.separator_due = true;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.source.size_hint();
        let due = usize::from(self.separator_due);
        (
            lo.saturating_mul(2).saturating_add(due),
            hi.and_then(|h| h.checked_mul(2)?.checked_add(due)),
        )
    }
}

impl<I, T> FusedIterator for JoinWith<I, T>
where
    I: FusedIterator<Item = T>,
    T: Clone,
{
}

/// Emits each element followed by a full pass over a separator sequence.
///
/// The separator is re-iterated for every element by cloning its
/// `IntoIterator` value; nothing is cached between elements. An absent
/// separator makes this a pass-through.
pub struct JoinWithSeq<I, S: IntoIterator> {
    source: I,
    separator: Option<S>,
    current: Option<S::IntoIter>,
}

impl<I, S: IntoIterator> JoinWithSeq<I, S> {
    pub(crate) fn new(source: I, separator: Option<S>) -> Self {
        Self {
            source,
            separator,
            current: None,
        }
    }
}

impl<I, S> Iterator for JoinWithSeq<I, S>
where
    I: Iterator,
    S: IntoIterator<Item = I::Item> + Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if let Some(current) = &mut self.current {
            if let Some(item) = current.next() {
                return Some(item);
            }
        }
        self.current = None;
        let item = self.source.next()?;
        self.current = self.separator.clone().map(IntoIterator::into_iter);
        Some(item)
    }
}

/// Concatenates `element` after `source`.
///
/// Same as `source.append([element])` with the subject first.
///
/// # Examples
/// ```
/// use u_seqkit::combinators::append_to;
/// assert_eq!(append_to(4, [1, 2, 3]).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
/// ```
pub fn append_to<S>(element: S::Item, source: S) -> Chain<S::IntoIter, Once<S::Item>>
where
    S: IntoIterator,
{
    source.into_iter().chain(iter::once(element))
}

/// Concatenates `element` before `source`.
///
/// `source` may be infinite.
///
/// # Examples
/// ```
/// use u_seqkit::combinators::prepend_to;
/// assert_eq!(prepend_to(0, [1, 2]).collect::<Vec<_>>(), vec![0, 1, 2]);
/// ```
pub fn prepend_to<S>(element: S::Item, source: S) -> Chain<Once<S::Item>, S::IntoIter>
where
    S: IntoIterator,
{
    iter::once(element).chain(source)
}

// ============================================================================
// Tests
// ============================================================================
