//! Case file model and its two-state lifecycle.
//!
//! # Responsibility
//! - Define the case record and the `Open -> Closed` transition.
//! - Reject persisted cases whose status and closing fields disagree.
//!
//! # Invariants
//! - `status == Closed` iff `closing_reason` and `closed_at` are both set.
//! - New cases always start `Open`; there is no transition back to `Open`.
//! - `people_involved` holds soft references; dangling ids are tolerated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    #[serde(rename = "Aberto")]
    Open,
    #[serde(rename = "Fechado")]
    Closed,
}

impl CaseStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Aberto",
            Self::Closed => "Fechado",
        }
    }
}

/// Validation failure for persisted or constructed cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseValidationError {
    /// Status and closing fields disagree.
    ClosingFieldsMismatch { id: String, status: CaseStatus },
}

impl Display for CaseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClosingFieldsMismatch { id, status } => {
                let expectation = match status {
                    CaseStatus::Open => "absent",
                    CaseStatus::Closed => "present",
                };
                write!(
                    f,
                    "case {id} has status {} but closingReason/closedAt are not both {expectation}",
                    status.label()
                )
            }
        }
    }
}

impl Error for CaseValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CaseRecord")]
pub struct Case {
    pub id: String,
    pub title: String,
    pub description: String,
    pub people_involved: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_model: Option<String>,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_reason: Option<String>,
    pub investigator_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

/// Unvalidated wire shape; converted into [`Case`] through `validate`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaseRecord {
    id: String,
    title: String,
    description: String,
    #[serde(default)]
    people_involved: Vec<String>,
    #[serde(default)]
    vehicle_plate: Option<String>,
    #[serde(default)]
    vehicle_model: Option<String>,
    status: CaseStatus,
    #[serde(default)]
    closing_reason: Option<String>,
    investigator_id: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    closed_at: Option<DateTime<Utc>>,
}

impl TryFrom<CaseRecord> for Case {
    type Error = CaseValidationError;

    fn try_from(record: CaseRecord) -> Result<Self, Self::Error> {
        let case = Case {
            id: record.id,
            title: record.title,
            description: record.description,
            people_involved: record.people_involved,
            vehicle_plate: record.vehicle_plate,
            vehicle_model: record.vehicle_model,
            status: record.status,
            closing_reason: record.closing_reason,
            investigator_id: record.investigator_id,
            created_at: record.created_at,
            closed_at: record.closed_at,
        };
        case.validate()?;
        Ok(case)
    }
}

impl Case {
    /// Opens a new case from a draft.
    pub fn open(id: String, draft: NewCase, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            people_involved: draft.people_involved,
            vehicle_plate: draft.vehicle_plate,
            vehicle_model: draft.vehicle_model,
            status: CaseStatus::Open,
            closing_reason: None,
            investigator_id: draft.investigator_id,
            created_at,
            closed_at: None,
        }
    }

    /// Checks the status/closing-field coupling.
    pub fn validate(&self) -> Result<(), CaseValidationError> {
        let closing_present = self.closing_reason.is_some() && self.closed_at.is_some();
        let closing_absent = self.closing_reason.is_none() && self.closed_at.is_none();
        let consistent = match self.status {
            CaseStatus::Open => closing_absent,
            CaseStatus::Closed => closing_present,
        };
        if consistent {
            Ok(())
        } else {
            Err(CaseValidationError::ClosingFieldsMismatch {
                id: self.id.clone(),
                status: self.status,
            })
        }
    }

    /// Closes the case with `reason` at `at`.
    ///
    /// Closing an already closed case overwrites reason and timestamp.
    pub fn close(&mut self, reason: impl Into<String>, at: DateTime<Utc>) {
        self.status = CaseStatus::Closed;
        self.closing_reason = Some(reason.into());
        self.closed_at = Some(at);
    }

    pub fn is_open(&self) -> bool {
        self.status == CaseStatus::Open
    }

    pub fn involves(&self, person_id: &str) -> bool {
        self.people_involved.iter().any(|id| id == person_id)
    }

    /// Merges every present patch field. Status is never touched.
    pub fn apply(&mut self, patch: CasePatch) {
        if let Some(value) = patch.title {
            self.title = value;
        }
        if let Some(value) = patch.description {
            self.description = value;
        }
        if let Some(value) = patch.people_involved {
            self.people_involved = value;
        }
        if let Some(value) = patch.vehicle_plate {
            self.vehicle_plate = value;
        }
        if let Some(value) = patch.vehicle_model {
            self.vehicle_model = value;
        }
        if let Some(value) = patch.investigator_id {
            self.investigator_id = value;
        }
    }
}

/// Creation payload for [`Case`]; status is forced to `Open`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCase {
    pub title: String,
    pub description: String,
    pub people_involved: Vec<String>,
    pub vehicle_plate: Option<String>,
    pub vehicle_model: Option<String>,
    pub investigator_id: String,
}

/// Updatable case fields.
///
/// `Some(None)` clears an optional vehicle field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CasePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub people_involved: Option<Vec<String>>,
    pub vehicle_plate: Option<Option<String>>,
    pub vehicle_model: Option<Option<String>>,
    pub investigator_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Case, CasePatch, CaseStatus, CaseValidationError, NewCase};
    use chrono::Utc;

    fn draft() -> NewCase {
        NewCase {
            title: "Caso X".to_string(),
            vehicle_plate: Some("ABC-1234".to_string()),
            investigator_id: "hiro".to_string(),
            ..NewCase::default()
        }
    }

    #[test]
    fn open_starts_without_closing_fields() {
        let case = Case::open("C-01".to_string(), draft(), Utc::now());
        assert_eq!(case.status, CaseStatus::Open);
        assert!(case.closing_reason.is_none());
        assert!(case.closed_at.is_none());
        assert!(case.validate().is_ok());
    }

    #[test]
    fn close_sets_both_closing_fields() {
        let mut case = Case::open("C-01".to_string(), draft(), Utc::now());
        case.close("Resolvido", Utc::now());
        assert!(!case.is_open());
        assert_eq!(case.closing_reason.as_deref(), Some("Resolvido"));
        assert!(case.closed_at.is_some());
        assert!(case.validate().is_ok());
    }

    #[test]
    fn validate_rejects_open_case_with_reason() {
        let mut case = Case::open("C-03".to_string(), draft(), Utc::now());
        case.closing_reason = Some("stray".to_string());
        assert_eq!(
            case.validate().unwrap_err(),
            CaseValidationError::ClosingFieldsMismatch {
                id: "C-03".to_string(),
                status: CaseStatus::Open,
            }
        );
    }

    #[test]
    fn patch_can_clear_vehicle_without_touching_status() {
        let mut case = Case::open("C-01".to_string(), draft(), Utc::now());
        case.close("done", Utc::now());
        case.apply(CasePatch {
            vehicle_plate: Some(None),
            title: Some("Caso Y".to_string()),
            ..CasePatch::default()
        });
        assert_eq!(case.vehicle_plate, None);
        assert_eq!(case.title, "Caso Y");
        assert_eq!(case.status, CaseStatus::Closed);
    }
}
