//! CLI command implementations
//!
//! - `diff`: load two file versions, run the hybrid engine, and print the
//!   edit script (and optionally its digest)

pub mod diff;
