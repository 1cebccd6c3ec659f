//! Run orchestration for wikiharvest.
//!
//! Ties category traversal and per-page extraction together into a single
//! scrape run, and writes the resulting document to disk.

pub mod output;
pub mod pipeline;

pub use output::write_output;
pub use pipeline::{ProgressReporter, SilentProgress, run_scrape};
