//! Hybrid line-alignment engine
//!
//! This module contains the two diff passes and the types they share:
//!
//! - `line`: line records and file sequences (the engine's input contract)
//! - `edit`: edit operations, edit scripts, and their token rendering
//! - `myers`: exact shortest-edit-script search over comparison keys
//! - `similarity`: fuzzy matching of leftover lines via content + context scores
//! - `hybrid`: the orchestrator that merges both passes into one script
//!
//! The engine is a pure function of its two input sequences and options;
//! nothing in here keeps state between calls.

pub mod edit;
pub mod hybrid;
pub mod line;
pub mod myers;
pub mod similarity;
