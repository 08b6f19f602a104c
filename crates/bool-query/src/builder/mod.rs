//! Fluent builders that accumulate clauses and feed the composition core.
//!
//! [`BodyBuilder`] is the usual entry point. The other builders are what
//! nested callbacks receive and can also be used on their own.

mod aggregation;
mod body;
mod filter;
mod nested;
mod query;

pub use aggregation::{AggregationBuilder, SubAggregationBuilder};
pub use body::{BodyBuilder, SortOrder};
pub use filter::FilterBuilder;
pub use nested::NestedBuilder;
pub use query::QueryBuilder;
