//! Application state aggregate.
//!
//! # Responsibility
//! - Hold every entity collection plus the active session pointer.
//! - Implement the closed set of in-memory transitions.
//!
//! # Invariants
//! - Transitions are pure in-memory updates: no I/O, no failure.
//! - A transition targeting an unknown id leaves the aggregate unchanged.
//! - `current_investigator`, when set by a transition, names a known investigator.
//! - No transition removes an investigator or cascades across soft references.

use crate::ids::{case_id, opaque_id, person_id};
use crate::model::case::{Case, CasePatch, NewCase};
use crate::model::faction::{Faction, FactionPatch, NewFaction};
use crate::model::investigator::{default_roster, Investigator, InvestigatorPatch};
use crate::model::person::{NewPerson, Person, PersonPatch};
use crate::model::report::{NewReport, Report, ReportPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub investigators: Vec<Investigator>,
    pub people: Vec<Person>,
    pub factions: Vec<Faction>,
    pub cases: Vec<Case>,
    pub reports: Vec<Report>,
    pub current_investigator: Option<String>,
}

impl Default for AppState {
    /// Seed state: default roster, empty collections, no session.
    fn default() -> Self {
        Self {
            investigators: default_roster(),
            people: Vec::new(),
            factions: Vec::new(),
            cases: Vec::new(),
            reports: Vec::new(),
            current_investigator: None,
        }
    }
}

impl AppState {
    /// Returns the seed state used on first run and on load failure.
    pub fn seeded() -> Self {
        Self::default()
    }

    pub fn investigator(&self, id: &str) -> Option<&Investigator> {
        self.investigators.iter().find(|inv| inv.id == id)
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    pub fn faction(&self, id: &str) -> Option<&Faction> {
        self.factions.iter().find(|faction| faction.id == id)
    }

    pub fn case(&self, id: &str) -> Option<&Case> {
        self.cases.iter().find(|case| case.id == id)
    }

    pub fn report(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|report| report.id == id)
    }

    /// Sets the active session. Returns `false` (no change) for unknown ids.
    pub fn select_investigator(&mut self, id: &str) -> bool {
        if self.investigator(id).is_none() {
            return false;
        }
        self.current_investigator = Some(id.to_string());
        true
    }

    pub fn update_investigator(&mut self, id: &str, patch: InvestigatorPatch) -> bool {
        let mut changed = false;
        for inv in self.investigators.iter_mut().filter(|inv| inv.id == id) {
            inv.apply(patch.clone());
            changed = true;
        }
        changed
    }

    pub fn logout(&mut self) {
        self.current_investigator = None;
    }

    /// Appends a person with a length-based sequential id.
    ///
    /// The id is derived from the current collection length, so it may
    /// collide with an existing id after a deletion.
    pub fn add_person(&mut self, draft: NewPerson, now: DateTime<Utc>) -> String {
        let id = person_id(self.people.len());
        self.people.push(Person::from_draft(id.clone(), draft, now));
        id
    }

    /// Patches every person with `id`, including length-based collisions.
    pub fn update_person(&mut self, id: &str, patch: PersonPatch) -> bool {
        let mut changed = false;
        for person in self.people.iter_mut().filter(|person| person.id == id) {
            person.apply(patch.clone());
            changed = true;
        }
        changed
    }

    /// Removes every person with `id`; references elsewhere are kept.
    pub fn delete_person(&mut self, id: &str) -> bool {
        let before = self.people.len();
        self.people.retain(|person| person.id != id);
        self.people.len() != before
    }

    pub fn add_faction(&mut self, draft: NewFaction, now: DateTime<Utc>) -> String {
        let id = opaque_id();
        self.factions.push(Faction::from_draft(id.clone(), draft, now));
        id
    }

    pub fn update_faction(&mut self, id: &str, patch: FactionPatch) -> bool {
        let mut changed = false;
        for faction in self.factions.iter_mut().filter(|faction| faction.id == id) {
            faction.apply(patch.clone());
            changed = true;
        }
        changed
    }

    pub fn delete_faction(&mut self, id: &str) -> bool {
        let before = self.factions.len();
        self.factions.retain(|faction| faction.id != id);
        self.factions.len() != before
    }

    /// Appends an `Open` case with a length-based sequential id.
    pub fn add_case(&mut self, draft: NewCase, now: DateTime<Utc>) -> String {
        let id = case_id(self.cases.len());
        self.cases.push(Case::open(id.clone(), draft, now));
        id
    }

    pub fn update_case(&mut self, id: &str, patch: CasePatch) -> bool {
        let mut changed = false;
        for case in self.cases.iter_mut().filter(|case| case.id == id) {
            case.apply(patch.clone());
            changed = true;
        }
        changed
    }

    /// Closes every case with `id`. Reason emptiness is the caller's concern.
    pub fn close_case(&mut self, id: &str, reason: &str, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for case in self.cases.iter_mut().filter(|case| case.id == id) {
            case.close(reason, now);
            changed = true;
        }
        changed
    }

    pub fn delete_case(&mut self, id: &str) -> bool {
        let before = self.cases.len();
        self.cases.retain(|case| case.id != id);
        self.cases.len() != before
    }

    pub fn add_report(&mut self, draft: NewReport, now: DateTime<Utc>) -> String {
        let id = opaque_id();
        self.reports.push(Report::from_draft(id.clone(), draft, now));
        id
    }

    pub fn update_report(&mut self, id: &str, patch: ReportPatch) -> bool {
        let mut changed = false;
        for report in self.reports.iter_mut().filter(|report| report.id == id) {
            report.apply(patch.clone());
            changed = true;
        }
        changed
    }

    pub fn delete_report(&mut self, id: &str) -> bool {
        let before = self.reports.len();
        self.reports.retain(|report| report.id != id);
        self.reports.len() != before
    }
}
