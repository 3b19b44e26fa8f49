//! Natural-language row filtering.

mod filter;

pub use filter::{Comparison, Query, filter_indices, filter_rows};
