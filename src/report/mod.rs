//! Report rendering for every view.

pub mod generator;

pub use generator::*;
