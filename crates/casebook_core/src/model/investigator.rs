//! Investigator model and the fixed default roster.
//!
//! # Invariants
//! - The ten roster entries always exist in a loaded aggregate.
//! - Roster rows may be edited (name/photo) but never removed.

use crate::model::NO_PHOTO;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roster ids and display names, in roster order.
const ROSTER: [(&str, &str); 10] = [
    ("hinata", "Hinata"),
    ("luciano", "Luciano"),
    ("miranda", "Miranda"),
    ("lara", "Lara"),
    ("hiro", "Hiro"),
    ("naira", "Naira"),
    ("miguel", "Miguel"),
    ("eloa", "Eloa"),
    ("noah", "Noah"),
    ("lua", "Lua"),
];

/// Seed instant stamped on roster rows.
///
/// Fixed so that two loads of the same payload produce identical states.
const ROSTER_CREATED_AT_SECS: i64 = 0;

/// A user of the tool; one of them is the active session at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investigator {
    pub id: String,
    pub name: String,
    /// URI or [`NO_PHOTO`].
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

/// Updatable investigator fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestigatorPatch {
    pub name: Option<String>,
    pub photo: Option<String>,
}

impl Investigator {
    /// Merges every present patch field into this investigator.
    pub fn apply(&mut self, patch: InvestigatorPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(photo) = patch.photo {
            self.photo = photo;
        }
    }
}

/// Returns a fresh copy of the default roster in its canonical order.
pub fn default_roster() -> Vec<Investigator> {
    let created_at = DateTime::from_timestamp(ROSTER_CREATED_AT_SECS, 0).unwrap_or_default();
    ROSTER
        .iter()
        .map(|(id, name)| Investigator {
            id: (*id).to_string(),
            name: (*name).to_string(),
            photo: NO_PHOTO.to_string(),
            created_at,
        })
        .collect()
}
