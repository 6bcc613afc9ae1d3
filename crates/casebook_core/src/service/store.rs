//! Store container: the only write path into the aggregate.
//!
//! # Responsibility
//! - Own the in-memory `AppState` and the slot repository it mirrors to.
//! - Run every mutation as apply -> full persist -> notify subscribers.
//!
//! # Invariants
//! - The slot is read exactly once, in [`CaseStore::open`].
//! - Every mutation persists the whole aggregate, even when it was a no-op.
//! - A failed persist never rolls back or rejects the in-memory mutation.
//! - Mutations run to completion one at a time (`&mut self`).

use crate::model::case::{CasePatch, NewCase};
use crate::model::faction::{FactionPatch, NewFaction};
use crate::model::investigator::InvestigatorPatch;
use crate::model::person::{NewPerson, PersonPatch};
use crate::model::report::{NewReport, ReportPatch};
use crate::model::state::AppState;
use crate::persist::{load_state, save_state};
use crate::repo::slot_repo::SlotRepository;
use chrono::Utc;
use log::{error, info, warn};
use std::collections::BTreeMap;

/// Handle returned by [`CaseStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&AppState)>;

/// Aggregate holder with auto-persisting mutations.
pub struct CaseStore<R: SlotRepository> {
    repo: R,
    state: AppState,
    listeners: BTreeMap<SubscriptionId, Listener>,
    next_subscription: u64,
    persistence_healthy: bool,
}

impl<R: SlotRepository> CaseStore<R> {
    /// Loads the initial aggregate from `repo` (seed fallback on any failure).
    pub fn open(repo: R) -> Self {
        let state = load_state(&repo);
        Self {
            repo,
            state,
            listeners: BTreeMap::new(),
            next_subscription: 0,
            persistence_healthy: true,
        }
    }

    /// Read-only view of the aggregate.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns whether the most recent persist succeeded.
    pub fn persistence_healthy(&self) -> bool {
        self.persistence_healthy
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Registers a listener called with the aggregate after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&AppState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn select_investigator(&mut self, id: &str) {
        self.commit("select_investigator", |state| {
            let changed = state.select_investigator(id);
            if !changed {
                warn!(
                    "event=store_mutation module=store op=select_investigator status=skipped reason=unknown_investigator"
                );
            }
            changed
        });
    }

    pub fn update_investigator(&mut self, id: &str, patch: InvestigatorPatch) {
        self.commit("update_investigator", |state| {
            state.update_investigator(id, patch)
        });
    }

    pub fn logout(&mut self) {
        self.commit("logout", |state| {
            state.logout();
            true
        });
    }

    /// Adds a person and returns its sequential id.
    pub fn add_person(&mut self, draft: NewPerson) -> String {
        let id = self.state.add_person(draft, Utc::now());
        self.persist_and_notify("add_person", true);
        id
    }

    pub fn update_person(&mut self, id: &str, patch: PersonPatch) {
        self.commit("update_person", |state| state.update_person(id, patch));
    }

    pub fn delete_person(&mut self, id: &str) {
        self.commit("delete_person", |state| state.delete_person(id));
    }

    /// Adds a faction and returns its opaque id.
    pub fn add_faction(&mut self, draft: NewFaction) -> String {
        let id = self.state.add_faction(draft, Utc::now());
        self.persist_and_notify("add_faction", true);
        id
    }

    pub fn update_faction(&mut self, id: &str, patch: FactionPatch) {
        self.commit("update_faction", |state| state.update_faction(id, patch));
    }

    pub fn delete_faction(&mut self, id: &str) {
        self.commit("delete_faction", |state| state.delete_faction(id));
    }

    /// Opens a case and returns its sequential id.
    pub fn add_case(&mut self, draft: NewCase) -> String {
        let id = self.state.add_case(draft, Utc::now());
        self.persist_and_notify("add_case", true);
        id
    }

    pub fn update_case(&mut self, id: &str, patch: CasePatch) {
        self.commit("update_case", |state| state.update_case(id, patch));
    }

    /// Closes a case. A second close overwrites reason and timestamp.
    pub fn close_case(&mut self, id: &str, reason: &str) {
        let now = Utc::now();
        self.commit("close_case", |state| state.close_case(id, reason, now));
    }

    pub fn delete_case(&mut self, id: &str) {
        self.commit("delete_case", |state| state.delete_case(id));
    }

    /// Adds a report and returns its opaque id.
    pub fn add_report(&mut self, draft: NewReport) -> String {
        let id = self.state.add_report(draft, Utc::now());
        self.persist_and_notify("add_report", true);
        id
    }

    pub fn update_report(&mut self, id: &str, patch: ReportPatch) {
        self.commit("update_report", |state| state.update_report(id, patch));
    }

    pub fn delete_report(&mut self, id: &str) {
        self.commit("delete_report", |state| state.delete_report(id));
    }

    fn commit(&mut self, op: &'static str, mutate: impl FnOnce(&mut AppState) -> bool) {
        let changed = mutate(&mut self.state);
        self.persist_and_notify(op, changed);
    }

    fn persist_and_notify(&mut self, op: &'static str, changed: bool) {
        match save_state(&self.repo, &self.state) {
            Ok(()) => {
                self.persistence_healthy = true;
                info!("event=store_mutation module=store op={op} status=ok changed={changed}");
            }
            Err(err) => {
                self.persistence_healthy = false;
                error!(
                    "event=store_mutation module=store op={op} status=degraded changed={changed} error_code={} error={err}",
                    err.code()
                );
            }
        }

        for listener in self.listeners.values_mut() {
            listener(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CaseStore;
    use crate::db::open_db_in_memory;
    use crate::repo::slot_repo::SqliteSlotRepository;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribers_see_each_commit_until_unsubscribed() {
        let conn = open_db_in_memory().unwrap();
        let mut store = CaseStore::open(SqliteSlotRepository::new(&conn));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |state| {
            sink.borrow_mut().push(state.current_investigator.clone());
        });

        store.select_investigator("hiro");
        store.logout();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.select_investigator("lua");

        assert_eq!(*seen.borrow(), vec![Some("hiro".to_string()), None]);
    }
}
