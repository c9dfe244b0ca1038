//! linediff: hybrid line-level diffing for change-tracking tools
//!
//! Computes a total, monotonic alignment between two versions of a text
//! file. An exact shortest-edit-script pass aligns lines whose normalized
//! keys are equal; a fuzzy second pass re-examines the leftovers and links
//! lines that were edited in place (renamed variables, reformatted
//! statements) via weighted content + context similarity, so tools walking
//! commit history see "the same line, modified" instead of an unrelated
//! delete plus insert.

pub mod commands;
pub mod core;
pub mod engine;
pub mod preprocessing;
