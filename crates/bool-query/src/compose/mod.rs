//! Bool query composition.
//!
//! Four cooperating pieces, leaves first:
//!
//! - [`clause`] builds one leaf clause from a field/value/options triple
//! - [`reducer`] folds clause buckets into a single `bool` clause
//! - [`pusher`] appends clauses to an accumulator, evaluating nested callbacks
//! - [`assembler`] merges queries, filters and aggregations into a request body

pub mod assembler;
pub mod clause;
pub mod pusher;
pub mod reducer;

pub use assembler::{build, build_v1};
pub use clause::build_clause;
pub use pusher::{NestedResult, push_nested_query, push_query};
pub use reducer::to_bool;
