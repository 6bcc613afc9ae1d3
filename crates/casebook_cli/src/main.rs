//! CLI probe for the casebook core.
//!
//! # Responsibility
//! - Wire config, logging, the slot database and the store together.
//! - Print a deterministic snapshot summary for local sanity checks.

use casebook_core::db::open_db;
use casebook_core::query::{current_investigator, dashboard_stats};
use casebook_core::{core_version, init_logging, CaseStore, SqliteSlotRepository, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("casebook: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = StoreConfig::from_env().map_err(|err| err.to_string())?;
    init_logging(config.log_level, &config.log_dir)?;

    let conn = open_db(&config.db_path).map_err(|err| format!("slot database: {err}"))?;
    let store = CaseStore::open(SqliteSlotRepository::new(&conn));
    let state = store.state();
    let stats = dashboard_stats(state);

    println!("casebook_core version={}", core_version());
    println!("db_path={}", config.db_path.display());
    println!(
        "session={}",
        current_investigator(state).map_or("none", |inv| inv.id.as_str())
    );
    println!("investigators={}", state.investigators.len());
    println!(
        "people={} factions={} reports={}",
        stats.people, stats.factions, stats.reports
    );
    println!(
        "cases_open={} cases_closed={}",
        stats.open_cases, stats.closed_cases
    );
    log::info!("event=cli_summary module=cli status=ok");
    Ok(())
}
