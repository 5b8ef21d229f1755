//! Month series construction.
//!
//! Turns the per-day entries of an input document into a gap-free
//! [`MonthSeries`](crate::models::MonthSeries).

pub mod builder;

pub use builder::*;
