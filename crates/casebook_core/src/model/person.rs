//! Person model.
//!
//! # Invariants
//! - `id` follows the sequential `P-NN` scheme at creation time.
//! - `role` is one of the six [`Role`] values; nothing else is representable.
//! - `faction` is a soft reference by faction name; empty means independent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hierarchical role of a person inside (or around) a faction.
///
/// Member listings are ordered by [`Role::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Líder")]
    Leader,
    #[serde(rename = "Sub-Líder")]
    SubLeader,
    #[serde(rename = "Membro")]
    Member,
    #[serde(rename = "Associado")]
    Associate,
    #[serde(rename = "Informante")]
    Informant,
    #[serde(rename = "Suspeito")]
    Suspect,
}

impl Role {
    /// All roles in hierarchy order.
    pub const ALL: [Role; 6] = [
        Role::Leader,
        Role::SubLeader,
        Role::Member,
        Role::Associate,
        Role::Informant,
        Role::Suspect,
    ];

    /// Position in the hierarchy, `0` being the leader.
    pub fn rank(self) -> usize {
        match self {
            Self::Leader => 0,
            Self::SubLeader => 1,
            Self::Member => 2,
            Self::Associate => 3,
            Self::Informant => 4,
            Self::Suspect => 5,
        }
    }

    /// Persisted label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Leader => "Líder",
            Self::SubLeader => "Sub-Líder",
            Self::Member => "Membro",
            Self::Associate => "Associado",
            Self::Informant => "Informante",
            Self::Suspect => "Suspeito",
        }
    }

    /// Parses a persisted label.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.label() == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub photo: String,
    pub phone: String,
    pub vehicle_plate: String,
    pub vehicle_model: String,
    /// Faction name; empty for independents.
    pub faction: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Person {
    /// Builds a person from a draft with caller-provided identity.
    pub fn from_draft(id: String, draft: NewPerson, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            photo: draft.photo,
            phone: draft.phone,
            vehicle_plate: draft.vehicle_plate,
            vehicle_model: draft.vehicle_model,
            faction: draft.faction,
            role: draft.role,
            created_at,
        }
    }

    /// Merges every present patch field.
    pub fn apply(&mut self, patch: PersonPatch) {
        let PersonPatch {
            name,
            photo,
            phone,
            vehicle_plate,
            vehicle_model,
            faction,
            role,
        } = patch;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = photo {
            self.photo = value;
        }
        if let Some(value) = phone {
            self.phone = value;
        }
        if let Some(value) = vehicle_plate {
            self.vehicle_plate = value;
        }
        if let Some(value) = vehicle_model {
            self.vehicle_model = value;
        }
        if let Some(value) = faction {
            self.faction = value;
        }
        if let Some(value) = role {
            self.role = value;
        }
    }

    /// Returns whether this person belongs to no faction.
    pub fn is_independent(&self) -> bool {
        self.faction.trim().is_empty()
    }
}

/// Creation payload for [`Person`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub photo: String,
    pub phone: String,
    pub vehicle_plate: String,
    pub vehicle_model: String,
    pub faction: String,
    pub role: Role,
}

impl NewPerson {
    /// Draft with only name and role set; other fields empty, no photo.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            photo: crate::model::NO_PHOTO.to_string(),
            phone: String::new(),
            vehicle_plate: String::new(),
            vehicle_model: String::new(),
            faction: String::new(),
            role,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub photo: Option<String>,
    pub phone: Option<String>,
    pub vehicle_plate: Option<String>,
    pub vehicle_model: Option<String>,
    pub faction: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::{NewPerson, Person, PersonPatch, Role};
    use chrono::Utc;

    #[test]
    fn role_labels_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_label(role.label()), Some(role));
        }
        assert_eq!(Role::from_label("Chefe"), None);
    }

    #[test]
    fn role_rank_orders_the_hierarchy() {
        let mut shuffled = vec![Role::Suspect, Role::Leader, Role::Member, Role::SubLeader];
        shuffled.sort_by_key(|role| role.rank());
        assert_eq!(
            shuffled,
            vec![Role::Leader, Role::SubLeader, Role::Member, Role::Suspect]
        );
        assert_eq!(Role::Informant.rank(), 4);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut person = Person::from_draft(
            "P-01".to_string(),
            NewPerson::new("Alice", Role::Member),
            Utc::now(),
        );
        person.apply(PersonPatch {
            faction: Some("Serpentes".to_string()),
            role: Some(Role::Leader),
            ..PersonPatch::default()
        });
        assert_eq!(person.name, "Alice");
        assert_eq!(person.faction, "Serpentes");
        assert_eq!(person.role, Role::Leader);
        assert!(!person.is_independent());
    }

    #[test]
    fn blank_faction_is_independent() {
        let mut draft = NewPerson::new("Bob", Role::Suspect);
        draft.faction = "   ".to_string();
        let person = Person::from_draft("P-02".to_string(), draft, Utc::now());
        assert!(person.is_independent());
    }
}
