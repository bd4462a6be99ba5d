//! Comparators for ordering records by several keys.
//!
//! A comparator is built from [`Criterion`]s in priority order, each naming a field of a
//! [`Record`] or an extractor function together with an ascending or descending direction:
//!
//! ```ignore
//! use sortby::{Criterion, by};
//!
//! let cmp = by([Criterion::field("name"), Criterion::field("age").desc()]);
//! records.sort_by(cmp.into_fn());
//! ```
//!
//! Extracted [`Value`]s only order against values of the same kind. Anything else, including
//! NaN and missing fields, counts as a tie and defers to the next criterion.

pub mod comparator;
pub mod criterion;

pub use comparator::{Comparator, by};
pub use criterion::{Criterion, ExtractorCriterion, FieldCriterion};
pub use sortby_common::error::{BoxedError, SortError, SortResult};
pub use sortby_common::impl_record;
pub use sortby_common::ordering::SortOrdering;
pub use sortby_common::record::Record;
pub use sortby_common::value::Value;
