//! Ship log statistics.
//!
//! The ship log is the content-shipping tracker: one entry per day with
//! post counts per platform. All computation lives in the aggregator.

pub mod aggregator;

pub use aggregator::*;
