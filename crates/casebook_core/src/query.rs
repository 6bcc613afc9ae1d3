//! Read-only projections over the aggregate.
//!
//! Nothing here mutates state. Dangling soft references resolve to fallbacks
//! instead of errors.

use crate::model::case::Case;
use crate::model::faction::Faction;
use crate::model::investigator::Investigator;
use crate::model::person::Person;
use crate::model::report::Report;
use crate::model::state::AppState;
use chrono::{DateTime, Utc};

/// Display name for an investigator id that no longer resolves.
pub const UNKNOWN_INVESTIGATOR: &str = "Desconhecido";

/// Faction filter value meaning "no filter".
pub const ALL_FACTIONS: &str = "all";

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub open_cases: usize,
    pub closed_cases: usize,
    pub people: usize,
    pub factions: usize,
    pub reports: usize,
}

pub fn current_investigator(state: &AppState) -> Option<&Investigator> {
    state
        .current_investigator
        .as_deref()
        .and_then(|id| state.investigator(id))
}

pub fn investigator_name<'a>(state: &'a AppState, id: &str) -> &'a str {
    state
        .investigator(id)
        .map_or(UNKNOWN_INVESTIGATOR, |inv| inv.name.as_str())
}

/// Person name, or the raw id when the person was deleted.
pub fn person_name<'a>(state: &'a AppState, id: &'a str) -> &'a str {
    state.person(id).map_or(id, |person| person.name.as_str())
}

pub fn open_cases(state: &AppState) -> Vec<&Case> {
    state.cases.iter().filter(|case| case.is_open()).collect()
}

pub fn closed_cases(state: &AppState) -> Vec<&Case> {
    state.cases.iter().filter(|case| !case.is_open()).collect()
}

/// The last `limit` open cases in creation order.
pub fn recent_open_cases(state: &AppState, limit: usize) -> Vec<&Case> {
    let open = open_cases(state);
    let skip = open.len().saturating_sub(limit);
    open.into_iter().skip(skip).collect()
}

pub fn cases_involving<'a>(state: &'a AppState, person_id: &str) -> Vec<&'a Case> {
    state
        .cases
        .iter()
        .filter(|case| case.involves(person_id))
        .collect()
}

/// Members of the faction with `faction_id`, leaders first, then by name.
///
/// Membership is the people whose faction name equals the faction's current
/// name; an unknown faction id yields no members.
pub fn faction_members<'a>(state: &'a AppState, faction_id: &str) -> Vec<&'a Person> {
    let Some(faction) = state.faction(faction_id) else {
        return Vec::new();
    };
    let mut members = state
        .people
        .iter()
        .filter(|person| person.faction == faction.name)
        .collect::<Vec<_>>();
    members.sort_by(|a, b| {
        a.role
            .rank()
            .cmp(&b.role.rank())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    members
}

pub fn independent_people(state: &AppState) -> Vec<&Person> {
    state
        .people
        .iter()
        .filter(|person| person.is_independent())
        .collect()
}

/// Case-insensitive people search over name, plate, model and id; phone is
/// matched verbatim. `faction` of `None`, empty or [`ALL_FACTIONS`] disables
/// the faction filter.
pub fn search_people<'a>(state: &'a AppState, term: &str, faction: Option<&str>) -> Vec<&'a Person> {
    let needle = term.to_lowercase();
    let faction = faction.filter(|name| !name.is_empty() && *name != ALL_FACTIONS);
    state
        .people
        .iter()
        .filter(|person| {
            let text_match = person.name.to_lowercase().contains(&needle)
                || person.phone.contains(term)
                || person.vehicle_plate.to_lowercase().contains(&needle)
                || person.vehicle_model.to_lowercase().contains(&needle)
                || person.id.to_lowercase().contains(&needle);
            let faction_match = faction.map_or(true, |name| person.faction == name);
            text_match && faction_match
        })
        .collect()
}

/// Case-insensitive search over title and id.
pub fn search_cases<'a>(cases: &[&'a Case], term: &str) -> Vec<&'a Case> {
    let needle = term.to_lowercase();
    cases
        .iter()
        .copied()
        .filter(|case| {
            case.title.to_lowercase().contains(&needle) || case.id.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn search_factions<'a>(state: &'a AppState, term: &str) -> Vec<&'a Faction> {
    let needle = term.to_lowercase();
    state
        .factions
        .iter()
        .filter(|faction| {
            faction.name.to_lowercase().contains(&needle)
                || faction.description.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn search_reports<'a>(state: &'a AppState, term: &str) -> Vec<&'a Report> {
    let needle = term.to_lowercase();
    state
        .reports
        .iter()
        .filter(|report| {
            report.title.to_lowercase().contains(&needle)
                || report.content.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn dashboard_stats(state: &AppState) -> DashboardStats {
    let open_cases = state.cases.iter().filter(|case| case.is_open()).count();
    DashboardStats {
        open_cases,
        closed_cases: state.cases.len() - open_cases,
        people: state.people.len(),
        factions: state.factions.len(),
        reports: state.reports.len(),
    }
}

/// Span between two instants, rounded up to whole days, in the same
/// Portuguese register as the persisted labels.
pub fn format_case_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let millis = (end - start).num_milliseconds().abs();
    let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    match days {
        d if d < 30 => unit(d, "dia", "dias"),
        d if d < 365 => unit(d / 30, "mês", "meses"),
        d => unit(d / 365, "ano", "anos"),
    }
}

/// Duration of a closed case; `None` while the case is open.
pub fn case_duration(case: &Case) -> Option<String> {
    case.closed_at
        .map(|closed_at| format_case_duration(case.created_at, closed_at))
}

fn unit(count: i64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {plural}")
    }
}
