//! Durable store adapter: aggregate <-> durable slot.
//!
//! # Responsibility
//! - Decode the persisted blob, migrate older layouts and merge it with the
//!   default roster.
//! - Encode and overwrite the whole aggregate on save.
//!
//! # Invariants
//! - `load_state` never fails: any read, version or parse failure is logged
//!   and yields the seed state.
//! - Roster rows keep their roster position; persisted rows with a roster id
//!   replace them in place, other rows are appended.
//! - Saves are full overwrites; there is no diffing or partial write.
//! - The blob carries `schemaVersion`; untagged blobs are legacy version 0.

use crate::model::case::Case;
use crate::model::faction::Faction;
use crate::model::investigator::{default_roster, Investigator};
use crate::model::person::Person;
use crate::model::report::Report;
use crate::model::state::AppState;
use crate::repo::slot_repo::{RepoError, SlotRepository};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Fixed durable slot key.
pub const STORAGE_KEY: &str = "ninjas-nkt-data";

/// Blob layout version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_FIELD: &str = "schemaVersion";

/// Persistence failure surfaced by the fallible primitives.
#[derive(Debug)]
pub enum PersistError {
    Repo(RepoError),
    Decode(serde_json::Error),
    Encode(serde_json::Error),
    /// `schemaVersion` present but not a non-negative integer.
    InvalidSchemaTag,
    UnsupportedSchemaVersion {
        found: u64,
        latest_supported: u32,
    },
}

impl PersistError {
    /// Stable machine-readable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Repo(_) => "slot_io_failed",
            Self::Decode(_) => "payload_unparsable",
            Self::Encode(_) => "payload_encode_failed",
            Self::InvalidSchemaTag => "schema_tag_invalid",
            Self::UnsupportedSchemaVersion { .. } => "schema_version_unsupported",
        }
    }
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "persisted state is unparsable: {err}"),
            Self::Encode(err) => write!(f, "state could not be encoded: {err}"),
            Self::InvalidSchemaTag => write!(f, "`{SCHEMA_VERSION_FIELD}` is not an integer"),
            Self::UnsupportedSchemaVersion {
                found,
                latest_supported,
            } => write!(
                f,
                "persisted state version {found} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
            Self::InvalidSchemaTag | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<RepoError> for PersistError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Blob layout migration from `from_version` to `from_version + 1`.
struct StateMigration {
    from_version: u64,
    apply: fn(&mut Value),
}

const STATE_MIGRATIONS: &[StateMigration] = &[StateMigration {
    from_version: 0,
    apply: tag_legacy_blob,
}];

/// Untagged blobs already share the version 1 layout.
fn tag_legacy_blob(value: &mut Value) {
    if let Some(object) = value.as_object_mut() {
        object.insert(SCHEMA_VERSION_FIELD.to_string(), Value::from(SCHEMA_VERSION));
    }
}

/// Lenient decoded shape: every collection may be absent or null.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedPayload {
    #[serde(default)]
    investigators: Option<Vec<Investigator>>,
    #[serde(default)]
    people: Option<Vec<Person>>,
    #[serde(default)]
    factions: Option<Vec<Faction>>,
    #[serde(default)]
    cases: Option<Vec<Case>>,
    #[serde(default)]
    reports: Option<Vec<Report>>,
    #[serde(default)]
    current_investigator: Option<String>,
}

impl PersistedPayload {
    fn into_state(self) -> AppState {
        AppState {
            investigators: merge_investigators(self.investigators.unwrap_or_default()),
            people: self.people.unwrap_or_default(),
            factions: self.factions.unwrap_or_default(),
            cases: self.cases.unwrap_or_default(),
            reports: self.reports.unwrap_or_default(),
            current_investigator: self.current_investigator.filter(|id| !id.is_empty()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedEnvelope<'a> {
    schema_version: u32,
    #[serde(flatten)]
    state: &'a AppState,
}

/// Merges persisted investigators into a fresh copy of the default roster.
pub fn merge_investigators(persisted: Vec<Investigator>) -> Vec<Investigator> {
    let mut merged = default_roster();
    for investigator in persisted {
        match merged.iter_mut().find(|inv| inv.id == investigator.id) {
            Some(slot) => *slot = investigator,
            None => merged.push(investigator),
        }
    }
    merged
}

/// Decodes a raw blob into an aggregate, migrating older layouts first.
pub fn decode_state(raw: &str) -> Result<AppState, PersistError> {
    let mut value: Value = serde_json::from_str(raw).map_err(PersistError::Decode)?;

    let version = match value.get(SCHEMA_VERSION_FIELD) {
        None | Some(Value::Null) => 0,
        Some(tag) => tag.as_u64().ok_or(PersistError::InvalidSchemaTag)?,
    };
    if version > u64::from(SCHEMA_VERSION) {
        return Err(PersistError::UnsupportedSchemaVersion {
            found: version,
            latest_supported: SCHEMA_VERSION,
        });
    }
    for migration in STATE_MIGRATIONS
        .iter()
        .filter(|m| m.from_version >= version)
    {
        (migration.apply)(&mut value);
    }

    let payload: PersistedPayload = serde_json::from_value(value).map_err(PersistError::Decode)?;
    Ok(payload.into_state())
}

/// Encodes the whole aggregate with the current version tag.
pub fn encode_state(state: &AppState) -> Result<String, PersistError> {
    serde_json::to_string(&PersistedEnvelope {
        schema_version: SCHEMA_VERSION,
        state,
    })
    .map_err(PersistError::Encode)
}

/// Reads the slot. `Ok(None)` when nothing has been persisted yet.
pub fn try_load_state<R>(repo: &R) -> Result<Option<AppState>, PersistError>
where
    R: SlotRepository + ?Sized,
{
    match repo.read_slot(STORAGE_KEY)? {
        Some(raw) => decode_state(&raw).map(Some),
        None => Ok(None),
    }
}

/// Produces the initial aggregate: persisted data merged with the seed, or
/// the seed alone when the slot is absent or unusable.
pub fn load_state<R>(repo: &R) -> AppState
where
    R: SlotRepository + ?Sized,
{
    let started_at = Instant::now();
    match try_load_state(repo) {
        Ok(Some(state)) => {
            info!(
                "event=state_load module=persist status=ok source=slot duration_ms={} investigators={} people={} factions={} cases={} reports={}",
                started_at.elapsed().as_millis(),
                state.investigators.len(),
                state.people.len(),
                state.factions.len(),
                state.cases.len(),
                state.reports.len()
            );
            state
        }
        Ok(None) => {
            info!(
                "event=state_load module=persist status=ok source=seed reason=slot_empty duration_ms={}",
                started_at.elapsed().as_millis()
            );
            AppState::seeded()
        }
        Err(err) => {
            log_load_failure(&err);
            AppState::seeded()
        }
    }
}

/// Overwrites the slot with the whole aggregate.
pub fn save_state<R>(repo: &R, state: &AppState) -> Result<(), PersistError>
where
    R: SlotRepository + ?Sized,
{
    let started_at = Instant::now();
    let encoded = encode_state(state)?;
    repo.write_slot(STORAGE_KEY, &encoded)?;
    debug!(
        "event=state_save module=persist status=ok bytes={} duration_ms={}",
        encoded.len(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}

fn log_load_failure(err: &PersistError) {
    match err {
        // serde messages can quote stored values; only log the position.
        PersistError::Decode(inner) => error!(
            "event=state_load module=persist status=error source=seed error_code={} category={:?} line={} column={}",
            err.code(),
            inner.classify(),
            inner.line(),
            inner.column()
        ),
        PersistError::UnsupportedSchemaVersion { .. } => warn!(
            "event=state_load module=persist status=error source=seed error_code={} error={err}",
            err.code()
        ),
        _ => error!(
            "event=state_load module=persist status=error source=seed error_code={} error={err}",
            err.code()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_state, encode_state, merge_investigators, PersistError, SCHEMA_VERSION};
    use crate::model::investigator::default_roster;
    use crate::model::state::AppState;

    #[test]
    fn merge_replaces_in_place_and_appends_unknown() {
        let mut edited = default_roster().remove(3);
        edited.name = "Lara M.".to_string();
        let mut guest = default_roster().remove(0);
        guest.id = "guest".to_string();

        let merged = merge_investigators(vec![guest.clone(), edited.clone()]);
        assert_eq!(merged.len(), 11);
        assert_eq!(merged[3], edited);
        assert_eq!(merged[10], guest);
    }

    #[test]
    fn encoded_blob_carries_version_tag() {
        let encoded = encode_state(&AppState::seeded()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["schemaVersion"], SCHEMA_VERSION);
        assert_eq!(value["investigators"].as_array().unwrap().len(), 10);
        assert!(value["currentInvestigator"].is_null());
    }

    #[test]
    fn untagged_legacy_blob_decodes() {
        let state = decode_state(r#"{"people":null,"currentInvestigator":"noah"}"#).unwrap();
        assert_eq!(state.investigators.len(), 10);
        assert!(state.people.is_empty());
        assert_eq!(state.current_investigator.as_deref(), Some("noah"));
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = decode_state(r#"{"schemaVersion":7}"#).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedSchemaVersion { found: 7, .. }
        ));
    }

    #[test]
    fn non_integer_version_tag_is_rejected() {
        let err = decode_state(r#"{"schemaVersion":"one"}"#).unwrap_err();
        assert!(matches!(err, PersistError::InvalidSchemaTag));
    }

    #[test]
    fn empty_current_investigator_normalizes_to_none() {
        let state = decode_state(r#"{"schemaVersion":1,"currentInvestigator":""}"#).unwrap();
        assert_eq!(state.current_investigator, None);
    }
}
