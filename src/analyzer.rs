//! Outdated-dependency analysis model and fan-out merge stage.
//!
//! Analysis itself (manifest parsing, registry version resolution) is an
//! external capability; this module owns the data model the core consumes,
//! the capability traits, and the explicit unordered merge point where
//! concurrent per-project analysis results are collected.

pub mod merge;
pub mod traits;
pub mod types;
