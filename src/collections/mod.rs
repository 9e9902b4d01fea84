//! Hash collections keyed through an [`EqualityComparer`](crate::comparer::EqualityComparer).
//!
//! - [`ComparerSet`]: membership under a caller-supplied equality
//! - [`Lookup`]: key-to-values grouping in first-occurrence order

mod comparer_set;
mod lookup;

pub use comparer_set::ComparerSet;
pub use lookup::{Grouping, Lookup};
