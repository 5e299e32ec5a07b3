//! Medal-tally loading.
//!
//! The loader parses the CSV file into a [`MedalTable`](crate::models::MedalTable);
//! the cache keeps one parsed table per file for the life of the process.

pub mod cache;
pub mod loader;

pub use cache::load_cached;
pub use loader::load_table;
