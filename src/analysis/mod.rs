//! Aggregation over a month series.
//!
//! Compliance, means, cause frequencies and the weekly calendar grid.

pub mod aggregator;

pub use aggregator::*;
