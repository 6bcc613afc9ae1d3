//! Identifier generation.
//!
//! # Responsibility
//! - Sequential, human-readable ids for people (`P-NN`) and cases (`C-NN`).
//! - Opaque random tokens for factions, reports and attachments.
//!
//! # Invariants
//! - Sequential ids are derived from the current collection length, not from
//!   the highest id seen. Deleting and then adding can reproduce an id that is
//!   still in use.
//! - Numbers are zero-padded to two digits and widen past 99 (`P-100`).
//! - Generators perform no I/O.

use uuid::Uuid;

pub const PERSON_ID_PREFIX: char = 'P';
pub const CASE_ID_PREFIX: char = 'C';

/// Length of opaque tokens.
pub const OPAQUE_ID_LEN: usize = 9;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Formats the next sequential id for a collection of `current_len` entries.
pub fn sequential_id(prefix: char, current_len: usize) -> String {
    format!("{prefix}-{:02}", current_len + 1)
}

pub fn person_id(current_len: usize) -> String {
    sequential_id(PERSON_ID_PREFIX, current_len)
}

pub fn case_id(current_len: usize) -> String {
    sequential_id(CASE_ID_PREFIX, current_len)
}

/// Renders `entropy` as an opaque lowercase base-36 token.
pub fn opaque_id_from(entropy: u128) -> String {
    let mut remaining = entropy;
    let mut token = [b'0'; OPAQUE_ID_LEN];
    for slot in token.iter_mut().rev() {
        *slot = BASE36_ALPHABET[(remaining % 36) as usize];
        remaining /= 36;
    }
    token.iter().map(|byte| char::from(*byte)).collect()
}

/// Draws a fresh opaque token.
pub fn opaque_id() -> String {
    opaque_id_from(Uuid::new_v4().as_u128())
}
