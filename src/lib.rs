//! # u-seqkit
//!
//! Lazy sequence utilities with injectable comparison logic.
//!
//! This crate extends [`Iterator`] with generation, concatenation, ordering,
//! grouping, joining, set operations, and key-selected statistics. Every
//! operation that compares elements takes its comparison as a value, so a
//! closure and a dedicated comparer type are interchangeable.
//!
//! ## Modules
//!
//! - [`generate`] — Lazy finite or infinite sequences from a factory
//! - [`random`] — Seedable random number sequences
//! - [`combinators`] — Separator interleaving, append/prepend
//! - [`comparer`] — Ordering and equality comparers built from closures
//! - [`collections`] — Comparer-backed set and one-to-many lookup
//! - [`ordered`] — Sorting, grouping, joins, and set operations
//! - [`stats`] — Variance, standard deviation, and percentiles
//!
//! Most adapters are reached through the [`SequenceExt`] extension trait.
//!
//! ## Design Philosophy
//!
//! - **Lazy by default**: nothing is pulled until the consumer pulls, and
//!   operations that must realize a side do so on the first pull
//! - **Typed failures**: statistics return [`Result`] with a domain [`Error`]
//! - **Property-based testing**: algebraic laws verified via proptest
//!
//! ## Example
//!
//! ```
//! use u_seqkit::SequenceExt;
//! use u_seqkit::comparer::NaturalOrder;
//! use u_seqkit::generate::create;
//!
//! let mut n = 0;
//! let squares: Vec<u32> = create(|| { n += 1; n * n }, Some(5))
//!     .order_by_descending(|x| *x, NaturalOrder)
//!     .into_iter()
//!     .collect();
//! assert_eq!(squares, vec![25, 16, 9, 4, 1]);
//!
//! let median = [4.0, 1.0, 3.0, 2.0].into_iter().percentile(|x| x, 0.5).unwrap();
//! assert_eq!(median, 2.5);
//! ```

pub mod collections;
pub mod combinators;
pub mod comparer;
pub mod error;
mod ext;
pub mod generate;
pub mod ordered;
pub mod random;
pub mod stats;

pub use error::{Error, Result};
pub use ext::SequenceExt;
