use casebook_core::db::open_db_in_memory;
use casebook_core::persist::{decode_state, encode_state};
use casebook_core::{
    default_roster, load_state, save_state, Attachment, CaseStatus, NewCase, NewFaction,
    NewPerson, NewReport, Role, SlotRepository, SqliteSlotRepository, AppState, SCHEMA_VERSION,
    STORAGE_KEY,
};
use chrono::Utc;
use serde_json::json;

#[test]
fn empty_slot_loads_seed_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    let state = load_state(&repo);
    assert_eq!(state.investigators, default_roster());
    assert!(state.people.is_empty());
    assert!(state.factions.is_empty());
    assert!(state.cases.is_empty());
    assert!(state.reports.is_empty());
    assert_eq!(state.current_investigator, None);
}

#[test]
fn unparsable_slot_falls_back_to_seed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    repo.write_slot(STORAGE_KEY, "{not json").unwrap();

    assert_eq!(load_state(&repo), AppState::seeded());
}

#[test]
fn invalid_role_makes_whole_payload_absent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    let payload = json!({
        "people": [{
            "id": "P-01", "name": "A", "photo": "", "phone": "", "vehiclePlate": "",
            "vehicleModel": "", "faction": "", "role": "Chefe",
            "createdAt": "2024-05-01T10:00:00.000Z"
        }],
        "currentInvestigator": "hiro"
    });
    repo.write_slot(STORAGE_KEY, &payload.to_string()).unwrap();

    let state = load_state(&repo);
    assert_eq!(state, AppState::seeded());
}

#[test]
fn closed_case_without_reason_is_unparsable() {
    let payload = json!({
        "cases": [{
            "id": "C-01", "title": "t", "description": "", "peopleInvolved": [],
            "status": "Fechado", "investigatorId": "hiro",
            "createdAt": "2024-05-01T10:00:00.000Z", "closedAt": "2024-05-02T10:00:00.000Z"
        }]
    });
    assert!(decode_state(&payload.to_string()).is_err());
}

#[test]
fn newer_schema_version_falls_back_without_touching_slot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    let raw = json!({ "schemaVersion": SCHEMA_VERSION + 1, "people": [] }).to_string();
    repo.write_slot(STORAGE_KEY, &raw).unwrap();

    assert_eq!(load_state(&repo), AppState::seeded());
    assert_eq!(repo.read_slot(STORAGE_KEY).unwrap().as_deref(), Some(raw.as_str()));
}

#[test]
fn merge_keeps_roster_position_and_appends_extras() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    let payload = json!({
        "investigators": [
            { "id": "guest", "name": "Guest", "photo": "/placeholder.svg",
              "createdAt": "2024-02-02T00:00:00.000Z" },
            { "id": "miguel", "name": "Miguel A.", "photo": "https://img/miguel.png",
              "createdAt": "2024-01-01T00:00:00.000Z" }
        ]
    });
    repo.write_slot(STORAGE_KEY, &payload.to_string()).unwrap();

    let state = load_state(&repo);
    assert_eq!(state.investigators.len(), 11);
    assert_eq!(state.investigators[6].id, "miguel");
    assert_eq!(state.investigators[6].name, "Miguel A.");
    assert_eq!(state.investigators[6].photo, "https://img/miguel.png");
    assert_eq!(state.investigators[10].id, "guest");
    for (loaded, seeded) in state.investigators.iter().zip(default_roster()) {
        if loaded.id != "miguel" {
            assert_eq!(*loaded, seeded);
        }
    }
}

#[test]
fn loading_same_payload_twice_is_identical() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    let payload = json!({
        "investigators": [{ "id": "extra", "name": "Extra", "photo": "/placeholder.svg",
                            "createdAt": "2024-02-02T00:00:00.000Z" }],
        "currentInvestigator": "extra"
    });
    repo.write_slot(STORAGE_KEY, &payload.to_string()).unwrap();

    assert_eq!(load_state(&repo), load_state(&repo));
}

#[test]
fn legacy_untagged_blob_from_previous_releases_loads() {
    let payload = json!({
        "investigators": [],
        "people": [{
            "id": "P-01", "name": "Alice", "photo": "/placeholder.svg", "phone": "555-0101",
            "vehiclePlate": "XYZ-9A21", "vehicleModel": "Sultan", "faction": "Serpentes",
            "role": "Líder", "createdAt": "2024-05-01T10:00:00.000Z"
        }],
        "factions": [{ "id": "k3j9x0a1b", "name": "Serpentes", "description": "",
                       "members": [], "createdAt": "2024-05-01T09:00:00.000Z" }],
        "cases": [{
            "id": "C-01", "title": "Caso X", "description": "", "peopleInvolved": ["P-01"],
            "status": "Fechado", "closingReason": "Resolvido", "investigatorId": "hinata",
            "createdAt": "2024-05-01T10:05:00.000Z", "closedAt": "2024-05-03T18:00:00.000Z"
        }],
        "reports": [{
            "id": "a1b2c3d4e", "title": "R1", "content": "...", "peopleInvolved": ["P-01"],
            "attachments": [{ "id": "z9y8x7w6v", "type": "image", "url": "https://x/y.png",
                              "name": "foto" }],
            "investigatorId": "hinata", "createdAt": "2024-05-02T10:00:00.000Z"
        }],
        "currentInvestigator": null
    });

    let state = decode_state(&payload.to_string()).unwrap();
    assert_eq!(state.investigators.len(), 10);
    assert_eq!(state.people[0].role, Role::Leader);
    assert_eq!(state.cases[0].status, CaseStatus::Closed);
    assert_eq!(state.cases[0].closing_reason.as_deref(), Some("Resolvido"));
    assert_eq!(state.reports[0].attachments[0].uri, "https://x/y.png");
    assert_eq!(state.current_investigator, None);
}

#[test]
fn save_then_load_round_trips_reachable_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    let now = Utc::now();
    let mut state = AppState::seeded();
    state.select_investigator("naira");
    let person = state.add_person(NewPerson::new("Alice", Role::Informant), now);
    state.add_faction(NewFaction::new("Serpentes", "Docks"), now);
    let open = state.add_case(
        NewCase {
            title: "Open".to_string(),
            people_involved: vec![person.clone()],
            vehicle_model: Some("Sultan".to_string()),
            investigator_id: "naira".to_string(),
            ..NewCase::default()
        },
        now,
    );
    let closed = state.add_case(NewCase::default(), now);
    state.close_case(&closed, "Arquivado", now);
    state.add_report(
        NewReport {
            title: "R".to_string(),
            attachments: vec![Attachment::new("https://x/doc.pdf", "doc")],
            people_involved: vec![person],
            ..NewReport::default()
        },
        now,
    );

    save_state(&repo, &state).unwrap();
    let loaded = load_state(&repo);
    assert_eq!(loaded, state);
    assert!(loaded.case(&open).unwrap().is_open());
}

#[test]
fn encoded_case_omits_absent_optional_fields() {
    let mut state = AppState::seeded();
    state.add_case(NewCase::default(), Utc::now());
    let value: serde_json::Value = serde_json::from_str(&encode_state(&state).unwrap()).unwrap();

    let case = &value["cases"][0];
    assert_eq!(case["id"], "C-01");
    assert_eq!(case["status"], "Aberto");
    assert!(case.get("closingReason").is_none());
    assert!(case.get("closedAt").is_none());
    assert!(case.get("vehiclePlate").is_none());
}
