//! Core state store for the casebook record-keeping tool.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod ids;
pub mod logging;
pub mod model;
pub mod persist;
pub mod query;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::case::{Case, CasePatch, CaseStatus, CaseValidationError, NewCase};
pub use model::faction::{Faction, FactionPatch, NewFaction};
pub use model::investigator::{default_roster, Investigator, InvestigatorPatch};
pub use model::person::{NewPerson, Person, PersonPatch, Role};
pub use model::report::{Attachment, AttachmentKind, NewReport, Report, ReportPatch};
pub use model::state::AppState;
pub use model::NO_PHOTO;
pub use persist::{load_state, save_state, PersistError, SCHEMA_VERSION, STORAGE_KEY};
pub use repo::slot_repo::{RepoError, RepoResult, SlotRepository, SqliteSlotRepository};
pub use service::store::{CaseStore, SubscriptionId};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
