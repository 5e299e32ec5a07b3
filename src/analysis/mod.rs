//! Analysis modules.
//!
//! Aggregations over the medal table that feed both the views and the
//! report assembler.

pub mod aggregator;

pub use aggregator::*;
