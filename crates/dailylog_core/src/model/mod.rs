//! Domain model for daily metric entries.
//!
//! # Responsibility
//! - Define the canonical record owned by the entry store.
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - Deletion is permanent; there are no tombstones.

pub mod entry;
