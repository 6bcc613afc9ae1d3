//! Durable slot access.
//!
//! # Responsibility
//! - Define the key/value slot contract used by the durable store adapter.
//! - Keep SQLite query details behind that contract.
//!
//! # Invariants
//! - A write replaces the previous slot value in full.
//! - Reading a missing slot is `Ok(None)`, not an error.

pub mod slot_repo;
