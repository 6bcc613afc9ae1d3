//! Domain model for the casebook aggregate.
//!
//! # Responsibility
//! - Define canonical data structures for investigators, people, factions,
//!   cases and reports.
//! - Define draft (create) and patch (update) shapes per entity kind.
//!
//! # Invariants
//! - Identifiers are unique within their own collection.
//! - Cross-entity references (person ids, faction names) are soft: they are
//!   never validated against the referenced collection.
//! - Wire names match the persisted blob layout (camelCase).
//!
//! # See also
//! - crate::persist for the durable blob envelope.

pub mod case;
pub mod faction;
pub mod investigator;
pub mod person;
pub mod report;
pub mod state;

/// Photo reference used when an entity has no photo.
pub const NO_PHOTO: &str = "/placeholder.svg";
