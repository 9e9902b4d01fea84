//! Random-valued infinite sequences.
//!
//! Each generator owns its RNG and is built on [`create`] with no count,
//! so it is infinite and must be bounded by the consumer.
//!
//! # Reproducibility
//!
//! Pass `Some(seed)` for a deterministic sequence. `None` seeds from the
//! thread-local generator, so two sequences built that way differ. Neither
//! form is restartable: the RNG advances as elements are pulled, and the
//! generator owns no copy of its initial state.

use std::ops::Range;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::generate::create;

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++). The sequence is deterministic for a
/// given seed on the same platform.
///
/// # Examples
/// ```
/// use u_seqkit::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

fn rng_for(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

/// Infinite sequence of uniformly distributed `i32` values in `range`
/// (end exclusive).
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `range` is empty.
///
/// # Examples
/// ```
/// use u_seqkit::random::random_i32;
/// let dice: Vec<i32> = random_i32(Some(7), 1..7).unwrap().take(20).collect();
/// assert_eq!(dice.len(), 20);
/// assert!(dice.iter().all(|d| (1..7).contains(d)));
/// ```
pub fn random_i32(
    seed: Option<u64>,
    range: Range<i32>,
) -> Result<impl Iterator<Item = i32>> {
    if range.is_empty() {
        return Err(Error::invalid_argument(format!(
            "random range {}..{} is empty",
            range.start, range.end
        )));
    }
    let mut rng = rng_for(seed);
    Ok(create(move || rng.random_range(range.clone()), None))
}

/// Infinite sequence of uniformly distributed `f64` values in `[0, 1)`.
///
/// # Examples
/// ```
/// use u_seqkit::random::random_f64;
/// let a: Vec<f64> = random_f64(Some(1)).take(5).collect();
/// let b: Vec<f64> = random_f64(Some(1)).take(5).collect();
/// assert_eq!(a, b);
/// ```
pub fn random_f64(seed: Option<u64>) -> impl Iterator<Item = f64> {
    let mut rng = rng_for(seed);
    create(move || rng.random::<f64>(), None)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);
        let vals1: Vec<f64> = (0..10).map(|_| rng1.random()).collect();
        let vals2: Vec<f64> = (0..10).map(|_| rng2.random()).collect();
        assert_eq!(vals1, vals2);
    }

    #[test]
    fn test_random_i32_seeded_is_reproducible() {
        let a: Vec<i32> = random_i32(Some(99), -5..5).unwrap().take(50).collect();
        let b: Vec<i32> = random_i32(Some(99), -5..5).unwrap().take(50).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|x| (-5..5).contains(x)));
    }

    #[test]
    fn test_random_i32_full_range() {
        let v: Vec<i32> = random_i32(Some(3), i32::MIN..i32::MAX)
            .unwrap()
            .take(100)
            .collect();
        assert_eq!(v.len(), 100);
        assert!(v.iter().all(|&x| x < i32::MAX));
    }

    #[test]
    fn test_random_i32_single_value_range() {
        let v: Vec<i32> = random_i32(None, 4..5).unwrap().take(10).collect();
        assert_eq!(v, vec![4; 10]);
    }

    #[test]
    fn test_random_i32_empty_range() {
        assert!(matches!(
            random_i32(Some(1), 5..5),
            Err(Error::InvalidArgument(_))
        ));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 9..2;
        assert!(random_i32(Some(1), reversed).is_err());
    }

    #[test]
    fn test_random_f64_unit_interval() {
        let v: Vec<f64> = random_f64(Some(5)).take(1000).collect();
        assert!(v.iter().all(|x| (0.0..1.0).contains(x)));
        let mean = v.iter().sum::<f64>() / v.len() as f64;
        assert!((mean - 0.5).abs() < 0.05, "mean of uniform draws: {mean}");
    }

    #[test]
    fn test_random_f64_seeds_differ() {
        let a: Vec<f64> = random_f64(Some(1)).take(5).collect();
        let b: Vec<f64> = random_f64(Some(2)).take(5).collect();
        assert_ne!(a, b);
    }
}
