//! Time-bucketed averages over daily entries.
//!
//! # Responsibility
//! - Map entries to period keys for a chosen granularity.
//! - Average the four numeric metrics per period.

pub mod bucket;
pub mod period;
