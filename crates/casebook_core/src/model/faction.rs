//! Faction model.
//!
//! Membership is derived at query time from `Person.faction` name matches;
//! `members` is kept only for wire compatibility and is not maintained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faction {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Faction {
    pub fn from_draft(id: String, draft: NewFaction, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            members: draft.members,
            created_at,
        }
    }

    /// Merges every present patch field.
    ///
    /// Renaming does not cascade into people referencing the old name.
    pub fn apply(&mut self, patch: FactionPatch) {
        if let Some(value) = patch.name {
            self.name = value;
        }
        if let Some(value) = patch.description {
            self.description = value;
        }
        if let Some(value) = patch.members {
            self.members = value;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFaction {
    pub name: String,
    pub description: String,
    pub members: Vec<String>,
}

impl NewFaction {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub members: Option<Vec<String>>,
}
