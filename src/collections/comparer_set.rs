//! Hash set whose notion of equality comes from a comparer.
//!
//! # Algorithm
//!
//! Elements are bucketed by [`EqualityComparer::hash`]; within a bucket, a
//! linear scan with [`EqualityComparer::equals`] decides membership. With a
//! well-distributed hash, operations are expected O(1).
//!
//! If the comparer's hash disagrees with its equality, two "equal" elements
//! can land in different buckets and both be stored. That is a caller
//! contract violation and is not detected.

use std::collections::HashMap;

use crate::comparer::EqualityComparer;

/// Set of `T` under comparer `C`.
///
/// # Examples
/// ```
/// use u_seqkit::collections::ComparerSet;
/// use u_seqkit::comparer::{from_equality_with_hash, structural_hash};
///
/// let mut set = ComparerSet::new(from_equality_with_hash(
///     |a: &i32, b: &i32| a % 10 == b % 10,
///     |x: &i32| structural_hash(&(x % 10)),
/// ));
/// assert!(set.insert(3));
/// assert!(!set.insert(13)); // same last digit
/// assert!(set.contains(&23));
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Clone)]
pub struct ComparerSet<T, C> {
    buckets: HashMap<u64, Vec<T>>,
    len: usize,
    comparer: C,
}

impl<T, C: EqualityComparer<T>> ComparerSet<T, C> {
    pub fn new(comparer: C) -> Self {
        Self {
            buckets: HashMap::new(),
            len: 0,
            comparer,
        }
    }

    /// Builds a set from `values`; later duplicates are dropped.
    pub fn from_iter_with<I: IntoIterator<Item = T>>(values: I, comparer: C) -> Self {
        let mut set = Self::new(comparer);
        for value in values {
            set.insert(value);
        }
        set
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `value` unless an equal element is already present.
    ///
    /// # Returns
    /// `true` if `value` was inserted, `false` if it was a duplicate (in
    /// which case `value` is dropped and the stored element is kept).
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.comparer.hash(&value);
        let bucket = self.buckets.entry(hash).or_default();
        if bucket.iter().any(|held| self.comparer.equals(held, &value)) {
            return false;
        }
        bucket.push(value);
        self.len += 1;
        true
    }

    /// Returns `true` if an element equal to `value` is present.
    pub fn contains(&self, value: &T) -> bool {
        self.buckets
            .get(&self.comparer.hash(value))
            .is_some_and(|bucket| bucket.iter().any(|held| self.comparer.equals(held, value)))
    }

    /// Removes the element equal to `value`, if any.
    ///
    /// # Returns
    /// `true` if an element was removed.
    pub fn remove(&mut self, value: &T) -> bool {
        let hash = self.comparer.hash(value);
        let Some(bucket) = self.buckets.get_mut(&hash) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|held| self.comparer.equals(held, value)) else {
            return false;
        };
        bucket.swap_remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(&hash);
        }
        self.len -= 1;
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
