//! Descriptive statistics over key-extracted sequences.
//!
//! Every estimator takes a sequence and a key selector mapping each element
//! to a number ([`ToPrimitive`]), realizes the keys as `f64`, and returns a
//! [`Result`]. Failures are domain errors, reported before any arithmetic:
//!
//! - an empty sequence ([`Error::EmptySequence`]),
//! - too few elements for the estimator ([`Error::InsufficientData`]),
//! - a percentile outside the convention's range
//!   ([`Error::PercentileOutOfRange`]),
//! - a key that is not a finite real number ([`Error::InvalidKey`]).
//!
//! The input must be finite. An infinite sequence never returns.
//!
//! # Algorithms
//!
//! - **Variance/StdDev**: Welford's online algorithm, streamed without
//!   buffering the keys.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Inclusive percentile**: R-7 linear interpolation, `h = p(n − 1)`
//!   (spreadsheet `PERCENTILE.INC`).
//! - **Exclusive percentile**: R-6 linear interpolation, `h = p(n + 1) − 1`
//!   (spreadsheet `PERCENTILE.EXC`), restricted to
//!   `p ∈ [1/n, 1 − 1/(n + 1)]`.
//!   Reference: Hyndman & Fan (1996), "Sample Quantiles in Statistical
//!   Packages", *The American Statistician* 50(4).

use num_traits::ToPrimitive;

use crate::error::{Error, Result};

/// Percentile convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PercentileMethod {
    /// `h = p(n − 1)`, valid for `p ∈ [0, 1]`.
    #[default]
    Inclusive,
    /// `h = p(n + 1) − 1`, valid for `p ∈ [1/n, 1 − 1/(n + 1)]`.
    Exclusive,
}

fn key_to_f64<K: ToPrimitive>(index: usize, key: K) -> Result<f64> {
    let value = key.to_f64().ok_or(Error::InvalidKey {
        index,
        reason: "not representable as f64",
    })?;
    if !value.is_finite() {
        return Err(Error::InvalidKey {
            index,
            reason: "non-finite",
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Variance and standard deviation
// ---------------------------------------------------------------------------

fn accumulate<I, K, F>(source: I, mut key: F) -> Result<WelfordAccumulator>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> K,
    K: ToPrimitive,
{
    let mut acc = WelfordAccumulator::new();
    for (index, item) in source.into_iter().enumerate() {
        acc.update(key_to_f64(index, key(item))?);
    }
    if acc.count() == 0 {
        return Err(Error::EmptySequence);
    }
    Ok(acc)
}

/// Population variance (denominator `n`) of the extracted keys.
///
/// # Errors
/// [`Error::EmptySequence`] on empty input; [`Error::InvalidKey`] for a key
/// that is not a finite real number.
///
/// # Examples
/// ```
/// use u_seqkit::stats::variance_population;
/// let v = [2, 4, 4, 4, 5, 5, 7, 9];
/// assert!((variance_population(v, |x| x).unwrap() - 4.0).abs() < 1e-12);
/// ```
pub fn variance_population<I, K, F>(source: I, key: F) -> Result<f64>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> K,
    K: ToPrimitive,
{
    Ok(accumulate(source, key)?.population_variance())
}

/// Sample variance (Bessel's correction, denominator `n − 1`).
///
/// # Errors
/// [`Error::EmptySequence`] on empty input, [`Error::InsufficientData`] on a
/// single element; [`Error::InvalidKey`] for a non-finite key.
///
/// # Examples
/// ```
/// use u_seqkit::stats::variance_sample;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance_sample(v, |x| x).unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
pub fn variance_sample<I, K, F>(source: I, key: F) -> Result<f64>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> K,
    K: ToPrimitive,
{
    accumulate(source, key)?.sample_variance()
}

/// Population standard deviation, `sqrt(variance_population)`.
pub fn std_dev_population<I, K, F>(source: I, key: F) -> Result<f64>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> K,
    K: ToPrimitive,
{
    variance_population(source, key).map(f64::sqrt)
}

/// Sample standard deviation, `sqrt(variance_sample)`.
///
/// # Examples
/// ```
/// use u_seqkit::stats::std_dev_sample;
/// let sd = std_dev_sample([2, 4, 4, 4, 5, 5, 7, 9], |x| x).unwrap();
/// assert!((sd - 2.138089935299395).abs() < 1e-10);
/// ```
pub fn std_dev_sample<I, K, F>(source: I, key: F) -> Result<f64>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> K,
    K: ToPrimitive,
{
    variance_sample(source, key).map(f64::sqrt)
}

// ---------------------------------------------------------------------------
// Percentiles
// ---------------------------------------------------------------------------

/// Inclusive percentile of the extracted keys (`p ∈ [0, 1]`).
///
/// # Examples
/// ```
/// use u_seqkit::stats::percentile_inclusive;
/// let data = [5, 1, 4, 2, 3];
/// assert_eq!(percentile_inclusive(data, |x| x, 0.5), Ok(3.0));
/// assert_eq!(percentile_inclusive(data, |x| x, 0.0), Ok(1.0));
/// assert_eq!(percentile_inclusive(data, |x| x, 1.0), Ok(5.0));
/// ```
pub fn percentile_inclusive<I, K, F>(source: I, key: F, p: f64) -> Result<f64>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> K,
    K: ToPrimitive,
{
    KeySnapshot::from_keys(source, key)?.percentile_inclusive(p)
}

/// Exclusive percentile of the extracted keys (`p ∈ [1/n, 1 − 1/(n + 1)]`).
///
/// # Examples
/// ```
/// use u_seqkit::stats::percentile_exclusive;
/// use u_seqkit::Error;
/// let data = [1, 2, 3, 4, 5];
/// assert_eq!(percentile_exclusive(data, |x| x, 0.5), Ok(3.0));
/// assert!(matches!(
///     percentile_exclusive(data, |x| x, 0.1),
///     Err(Error::PercentileOutOfRange { .. })
/// ));
/// ```
pub fn percentile_exclusive<I, K, F>(source: I, key: F, p: f64) -> Result<f64>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> K,
    K: ToPrimitive,
{
    KeySnapshot::from_keys(source, key)?.percentile_exclusive(p)
}

/// Percentile under the default ([`PercentileMethod::Inclusive`]) convention.
pub fn percentile<I, K, F>(source: I, key: F, p: f64) -> Result<f64>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> K,
    K: ToPrimitive,
{
    percentile_with(source, key, p, PercentileMethod::default())
}

/// Percentile under an explicit convention.
pub fn percentile_with<I, K, F>(source: I, key: F, p: f64, method: PercentileMethod) -> Result<f64>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> K,
    K: ToPrimitive,
{
    KeySnapshot::from_keys(source, key)?.percentile(p, method)
}

// ---------------------------------------------------------------------------
// Sorted key snapshot
// ---------------------------------------------------------------------------

/// Finite, ascending-sorted, non-empty snapshot of extracted keys.
///
/// Building one realizes the whole sequence. Reuse a snapshot to query
/// several percentiles without re-sorting.
///
/// # Examples
/// ```
/// use u_seqkit::stats::{KeySnapshot, PercentileMethod};
/// let snap = KeySnapshot::from_keys(["10", "30", "20", "40"], |s| s.parse::<u32>().unwrap()).unwrap();
/// assert_eq!(snap.as_slice(), &[10.0, 20.0, 30.0, 40.0]);
/// assert_eq!(snap.percentile(0.5, PercentileMethod::Inclusive), Ok(25.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KeySnapshot {
    sorted: Vec<f64>,
}

impl KeySnapshot {
    /// Realizes, validates, and sorts the keys of `source`.
    ///
    /// # Errors
    /// [`Error::EmptySequence`] on empty input; [`Error::InvalidKey`] for a
    /// key that is not a finite real number.
    pub fn from_keys<I, K, F>(source: I, mut key: F) -> Result<Self>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> K,
        K: ToPrimitive,
    {
        let mut sorted = source
            .into_iter()
            .enumerate()
            .map(|(index, item)| key_to_f64(index, key(item)))
            .collect::<Result<Vec<f64>>>()?;
        if sorted.is_empty() {
            return Err(Error::EmptySequence);
        }
        // All keys are finite here, so total_cmp agrees with numeric order.
        sorted.sort_unstable_by(f64::total_cmp);
        tracing::trace!(len = sorted.len(), "key snapshot realized");
        Ok(Self { sorted })
    }

    /// Number of keys. Always at least 1.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// The keys in ascending order.
    pub fn as_slice(&self) -> &[f64] {
        &self.sorted
    }

    pub fn percentile(&self, p: f64, method: PercentileMethod) -> Result<f64> {
        match method {
            PercentileMethod::Inclusive => self.percentile_inclusive(p),
            PercentileMethod::Exclusive => self.percentile_exclusive(p),
        }
    }

    /// Inclusive percentile (R-7).
    ///
    /// # Algorithm
    /// 1. `h = (n − 1) × p`
    /// 2. `j = ⌊h⌋`, `g = h − j`
    /// 3. `x[j]` if `j` is the last index, else `x[j] + g × (x[j+1] − x[j])`
    ///
    /// # Errors
    /// [`Error::PercentileOutOfRange`] unless `0 ≤ p ≤ 1`.
    pub fn percentile_inclusive(&self, p: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::PercentileOutOfRange {
                percentile: p,
                min: 0.0,
                max: 1.0,
            });
        }
        let h = (self.len() - 1) as f64 * p;
        Ok(self.interpolate(h))
    }

    /// Exclusive percentile (R-6).
    ///
    /// # Algorithm
    /// 1. Reject `p` outside `[1/n, 1 − 1/(n + 1)]`
    /// 2. `h = (n + 1) × p − 1`
    /// 3. Interpolate between `x[⌊h⌋]` and `x[⌊h⌋ + 1]`; never past the end
    ///
    /// A single-element snapshot has an empty valid range, so every `p` is
    /// rejected.
    ///
    /// # Errors
    /// [`Error::PercentileOutOfRange`] outside the valid range.
    pub fn percentile_exclusive(&self, p: f64) -> Result<f64> {
        let n = self.len() as f64;
        let min = 1.0 / n;
        let max = 1.0 - 1.0 / (n + 1.0);
        if !(min..=max).contains(&p) {
            return Err(Error::PercentileOutOfRange {
                percentile: p,
                min,
                max,
            });
        }
        let h = p * (n + 1.0) - 1.0;
        Ok(self.interpolate(h))
    }

    /// Linear interpolation at fractional index `h ≥ 0`, clamped to the
    /// last key.
    fn interpolate(&self, h: f64) -> f64 {
        let last = self.sorted.len() - 1;
        let j = (h.floor() as usize).min(last);
        if j == last {
            return self.sorted[last];
        }
        let g = h - j as f64;
        let lo = self.sorted[j];
        lo + g * (self.sorted[j + 1] - lo)
    }
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for count, mean and variance.
///
/// Maintains a running mean and sum of squared deviations M₂, avoiding the
/// catastrophic cancellation of the naive formula `Var = E[X²] − (E[X])²`.
///
/// Reference: Welford (1962), *Technometrics* 4(3), pp. 419–420.
///
/// # Examples
/// ```
/// use u_seqkit::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.sample_variance().unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: usize,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a new sample into the accumulator.
    ///
    /// The first sample only initializes the mean. This avoids intermediate
    /// overflow when `delta² > f64::MAX` (e.g., `value ≈ 1e166`).
    pub fn update(&mut self, value: f64) {
        let n1 = self.count;
        self.count += 1;

        if n1 == 0 {
            self.mean_acc = value;
            return;
        }

        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    /// Returns the number of samples seen so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the running mean.
    ///
    /// # Errors
    /// [`Error::EmptySequence`] if no samples have been added.
    pub fn mean(&self) -> Result<f64> {
        if self.count == 0 {
            return Err(Error::EmptySequence);
        }
        Ok(self.mean_acc)
    }

    /// Population variance (n denominator); `0.0` before any sample.
    fn population_variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    /// Returns the sample variance (n − 1 denominator).
    ///
    /// # Errors
    /// [`Error::EmptySequence`] with no samples, [`Error::InsufficientData`]
    /// with exactly one.
    pub fn sample_variance(&self) -> Result<f64> {
        match self.count {
            0 => Err(Error::EmptySequence),
            1 => Err(Error::InsufficientData {
                required: 2,
                actual: 1,
            }),
            n => Ok(self.m2 / (n - 1) as f64),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating finite f64 vectors of reasonable size.
    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(
            prop::num::f64::NORMAL.prop_filter("finite", |x| x.is_finite() && x.abs() < 1e12),
            min_len..=max_len,
        )
    }

    fn naive_variance(data: &[f64], ddof: usize) -> f64 {
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        data.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - ddof as f64)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn variance_non_negative(data in finite_vec(2, 100)) {
            let var = variance_sample(data, |x| x).unwrap();
            prop_assert!(var >= 0.0, "variance must be >= 0, got {}", var);
        }

        #[test]
        fn variance_matches_two_pass(data in proptest::collection::vec(-1e3_f64..1e3, 2..100)) {
            let pop = variance_population(data.iter(), |x| *x).unwrap();
            let sample = variance_sample(data.iter(), |x| *x).unwrap();
            let tol = 1e-8 * naive_variance(&data, 0).max(1.0);
            prop_assert!((pop - naive_variance(&data, 0)).abs() < tol);
            prop_assert!((sample - naive_variance(&data, 1)).abs() < tol * 2.0);
        }

        #[test]
        fn sample_to_population_ratio(data in proptest::collection::vec(-1e3_f64..1e3, 2..100)) {
            let n = data.len() as f64;
            let pop = variance_population(data.iter(), |x| *x).unwrap();
            let sample = variance_sample(data.iter(), |x| *x).unwrap();
            prop_assert!((sample - pop * n / (n - 1.0)).abs() < 1e-8 * sample.max(1.0));
        }

        #[test]
        fn std_dev_is_sqrt_of_variance(data in finite_vec(2, 100)) {
            let var = variance_sample(data.iter(), |x| *x).unwrap();
            let sd = std_dev_sample(data.iter(), |x| *x).unwrap();
            let diff = (sd * sd - var).abs();
            prop_assert!(diff < 1e-10 * var.max(1.0), "sd² should equal variance");
        }

        #[test]
        fn inclusive_extremes_are_min_max(data in finite_vec(1, 100)) {
            let snap = KeySnapshot::from_keys(data.iter(), |x| *x).unwrap();
            let mn = data.iter().copied().fold(f64::INFINITY, f64::min);
            let mx = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(snap.percentile_inclusive(0.0), Ok(mn));
            prop_assert_eq!(snap.percentile_inclusive(1.0), Ok(mx));
        }

        #[test]
        fn percentiles_monotonic(
            data in finite_vec(2, 100),
            p1 in 0.0_f64..=1.0,
            p2 in 0.0_f64..=1.0,
        ) {
            let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
            let snap = KeySnapshot::from_keys(data, |x| x).unwrap();
            for method in [PercentileMethod::Inclusive, PercentileMethod::Exclusive] {
                if let (Ok(q_lo), Ok(q_hi)) = (snap.percentile(lo, method), snap.percentile(hi, method)) {
                    prop_assert!(q_lo <= q_hi + 1e-9 * q_hi.abs().max(1.0), "percentiles should be monotonic");
                }
            }
        }

        #[test]
        fn exclusive_range_is_enforced(n in 2_usize..50, p in 0.0_f64..=1.0) {
            let snap = KeySnapshot::from_keys(0..n, |x| x).unwrap();
            let nf = n as f64;
            let valid = p >= 1.0 / nf && p <= 1.0 - 1.0 / (nf + 1.0);
            let result = snap.percentile_exclusive(p);
            prop_assert_eq!(result.is_ok(), valid);
            if let Ok(q) = result {
                prop_assert!(q >= 0.0 && q <= (n - 1) as f64);
            }
        }

        #[test]
        fn percentile_within_data_bounds(data in finite_vec(1, 100), p in 0.0_f64..=1.0) {
            let snap = KeySnapshot::from_keys(data, |x| x).unwrap();
            let q = snap.percentile_inclusive(p).unwrap();
            let s = snap.as_slice();
            prop_assert!(q >= s[0] && q <= s[s.len() - 1]);
        }
    }
}
