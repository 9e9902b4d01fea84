//! Comparer capabilities and closure adapters.
//!
//! Ordering and grouping operations need a comparer *object*: something
//! they can hold for the lifetime of the operation and consult repeatedly.
//! This module defines the two capabilities and a single concrete adapter
//! for each, so callers can pass plain closures instead.
//!
//! | Capability | Trait | Closure adapter | Default |
//! |---|---|---|---|
//! | Ordering | [`OrderComparer`] | [`from_compare`], [`from_three_way`] | [`NaturalOrder`] |
//! | Equality | [`EqualityComparer`] | [`from_equality`], [`from_equality_with_hash`] | [`StructuralEquality`] |
//!
//! # Caller contract
//!
//! Nothing here validates the supplied functions. An ordering that is not
//! a total order, or an `equals` whose equal elements hash differently,
//! silently produces wrong orderings and groupings.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Three-way comparison capability used by ordering operations.
pub trait OrderComparer<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Equality-plus-hash capability used by grouping, joining and set
/// operations.
///
/// Implementations must return equal hashes for elements that
/// [`equals`](EqualityComparer::equals) considers equal.
pub trait EqualityComparer<T: ?Sized> {
    fn equals(&self, a: &T, b: &T) -> bool;
    fn hash(&self, value: &T) -> u64;
}

impl<T: ?Sized, C: OrderComparer<T> + ?Sized> OrderComparer<T> for &C {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (**self).compare(a, b)
    }
}

impl<T: ?Sized, C: EqualityComparer<T> + ?Sized> EqualityComparer<T> for &C {
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }

    fn hash(&self, value: &T) -> u64 {
        (**self).hash(value)
    }
}

// ----------------------------------------------------------------------------
// Ordering
// ----------------------------------------------------------------------------

/// [`OrderComparer`] backed by a closure.
#[derive(Clone, Copy)]
pub struct FnOrderComparer<F>(F);

impl<T: ?Sized, F> OrderComparer<T> for FnOrderComparer<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

/// Wraps a comparison closure as an ordering comparer.
///
/// The comparer's result is exactly `compare(a, b)`.
///
/// # Examples
/// ```
/// use u_seqkit::comparer::{from_compare, OrderComparer};
/// use std::cmp::Ordering;
/// let by_len = from_compare(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// assert_eq!(by_len.compare(&"ab", &"abc"), Ordering::Less);
/// ```
pub fn from_compare<T: ?Sized, F>(compare: F) -> FnOrderComparer<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    FnOrderComparer(compare)
}

/// Wraps an integer-returning comparison (negative, zero, positive) as an
/// ordering comparer.
///
/// # Examples
/// ```
/// use u_seqkit::comparer::{from_three_way, OrderComparer};
/// use std::cmp::Ordering;
/// let desc = from_three_way(|a: &i32, b: &i32| b - a);
/// assert_eq!(desc.compare(&1, &2), Ordering::Greater);
/// ```
pub fn from_three_way<T: ?Sized, F>(
    compare: F,
) -> FnOrderComparer<impl Fn(&T, &T) -> Ordering>
where
    F: Fn(&T, &T) -> i32,
{
    FnOrderComparer(move |a: &T, b: &T| compare(a, b).cmp(&0))
}

/// Ordering by the type's own [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> OrderComparer<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another ordering comparer.
#[derive(Debug, Clone, Copy)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: OrderComparer<T>> OrderComparer<T> for Reversed<C> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

// ----------------------------------------------------------------------------
// Equality
// ----------------------------------------------------------------------------

/// Hashes `value` with its [`Hash`] implementation and a fixed-key hasher.
pub fn structural_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// [`EqualityComparer`] backed by an equality closure and a hash closure.
#[derive(Clone, Copy)]
pub struct FnEqualityComparer<E, H> {
    equals: E,
    hash: H,
}

impl<T: ?Sized, E, H> EqualityComparer<T> for FnEqualityComparer<E, H>
where
    E: Fn(&T, &T) -> bool,
    H: Fn(&T) -> u64,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.equals)(a, b)
    }

    fn hash(&self, value: &T) -> u64 {
        (self.hash)(value)
    }
}

/// Wraps an equality closure, hashing with the element's structural hash.
///
/// Only correct when `equals` agrees with the type's `Hash`: a coarser
/// `equals` (e.g. case-insensitive) needs [`from_equality_with_hash`],
/// otherwise elements it deems equal may land in different buckets and be
/// reported as distinct.
///
/// # Examples
/// ```
/// use u_seqkit::comparer::{from_equality, EqualityComparer};
/// let eq = from_equality(|a: &i32, b: &i32| a == b);
/// assert!(eq.equals(&3, &3));
/// assert_eq!(eq.hash(&3), eq.hash(&3));
/// ```
pub fn from_equality<T, E>(equals: E) -> FnEqualityComparer<E, fn(&T) -> u64>
where
    T: Hash + ?Sized,
    E: Fn(&T, &T) -> bool,
{
    FnEqualityComparer {
        equals,
        hash: structural_hash::<T>,
    }
}

/// Wraps an equality closure together with a matching hash closure.
///
/// # Examples
/// ```
/// use u_seqkit::comparer::{from_equality_with_hash, structural_hash, EqualityComparer};
/// let nocase = from_equality_with_hash(
///     |a: &String, b: &String| a.eq_ignore_ascii_case(b),
///     |s: &String| structural_hash(&s.to_ascii_lowercase()),
/// );
/// let (a, b) = ("Rust".to_string(), "rUST".to_string());
/// assert!(nocase.equals(&a, &b));
/// assert_eq!(nocase.hash(&a), nocase.hash(&b));
/// ```
pub fn from_equality_with_hash<T: ?Sized, E, H>(
    equals: E,
    hash: H,
) -> FnEqualityComparer<E, H>
where
    E: Fn(&T, &T) -> bool,
    H: Fn(&T) -> u64,
{
    FnEqualityComparer { equals, hash }
}

/// Equality by the type's own [`Eq`] and [`Hash`] implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEquality;

impl<T: Eq + Hash + ?Sized> EqualityComparer<T> for StructuralEquality {
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn hash(&self, value: &T) -> u64 {
        structural_hash(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
