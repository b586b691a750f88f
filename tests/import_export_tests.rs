// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde_json::json;

use gastos::ledger::month_totals;
use gastos::models::Config;
use gastos::store::{MemoryStore, Store};
use gastos::{cli, commands};

fn lenient() -> Config {
    Config {
        categories: Vec::new(),
        income_categories: Vec::new(),
        ..Config::default()
    }
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::with_config(lenient());
    let cfg = store.get_config().unwrap();
    let raws = vec![
        json!({ "paidBy": "yo", "amount": "5000", "category": "Comida", "date": "2024-03-10" }),
        json!({
            "profile": "maria_ignacia", "type": "income", "nature": "income",
            "amount": 250000, "category": "Sueldo", "date": "2024-03-01", "scope": "shared",
            "impactKey": "Casa"
        }),
        json!({ "profile": "pablo", "amount": 12000, "category": "Transporte", "date": "2024-02-20" }),
    ];
    for raw in &raws {
        let e = gastos::normalize::normalize(raw, &cfg);
        store.add_entry(&e).unwrap();
    }
    store
}

fn run_import(store: &dyn Store, path: &str) -> anyhow::Result<()> {
    let m = cli::build_cli().get_matches_from(["gastos", "import", "json", "--path", path]);
    let Some(("import", sub)) = m.subcommand() else {
        panic!("import subcommand")
    };
    commands::importer::handle(store, sub)
}

fn run_export(store: &dyn Store, format: &str, path: &str) -> anyhow::Result<()> {
    let m = cli::build_cli().get_matches_from(["gastos", "export", "--format", format, "--out", path]);
    let Some(("export", sub)) = m.subcommand() else {
        panic!("export subcommand")
    };
    commands::exporter::handle(store, sub)
}

#[test]
fn json_export_then_import_preserves_aggregates() {
    let store = seeded_store();
    let before = month_totals(&store.list_entries(None).unwrap(), "pablo", "2024-03");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    run_export(&store, "json", path.to_str().unwrap()).unwrap();

    let restored = MemoryStore::with_config(lenient());
    run_import(&restored, path.to_str().unwrap()).unwrap();

    let entries = restored.list_entries(None).unwrap();
    assert_eq!(entries.len(), 3);
    let after = month_totals(&entries, "pablo", "2024-03");
    assert_eq!(before, after);
    assert_eq!(after.income, 250_000);
    assert_eq!(after.expense, 5_000);
}

#[test]
fn import_accepts_wrapped_object_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.json");
    let payload = json!({
        "movements": [
            { "paidBy": "pareja", "amount": "9000", "category": "Casa", "date": "2024-01-05" }
        ]
    });
    std::fs::write(&path, serde_json::to_string(&payload).unwrap()).unwrap();

    let store = MemoryStore::with_config(lenient());
    run_import(&store, path.to_str().unwrap()).unwrap();

    let entries = store.list_entries(None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].profile, "maria_ignacia");
    assert_eq!(entries[0].amount, 9_000);
}

#[test]
fn import_replaces_rather_than_appends() {
    let store = seeded_store();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.json");
    std::fs::write(
        &path,
        serde_json::to_string(&json!([{ "profile": "pablo", "amount": 1, "category": "Comida" }]))
            .unwrap(),
    )
    .unwrap();

    run_import(&store, path.to_str().unwrap()).unwrap();
    assert_eq!(store.list_entries(None).unwrap().len(), 1);
}

#[test]
fn bad_shape_aborts_without_writing() {
    let store = seeded_store();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"unexpected": true}"#).unwrap();

    assert!(run_import(&store, path.to_str().unwrap()).is_err());
    // The previous ledger survives a failed import.
    assert_eq!(store.list_entries(None).unwrap().len(), 3);
}

#[test]
fn invalid_json_aborts_without_writing() {
    let store = seeded_store();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trunc.json");
    std::fs::write(&path, "[{\"amount\": 5").unwrap();

    assert!(run_import(&store, path.to_str().unwrap()).is_err());
    assert_eq!(store.list_entries(None).unwrap().len(), 3);
}

#[test]
fn csv_export_writes_one_row_per_entry() {
    let store = seeded_store();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");
    run_export(&store, "csv", path.to_str().unwrap()).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "id");
    assert_eq!(&headers[3], "amount");
    let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    // Export is oldest-first.
    assert_eq!(&rows[0][6], "2024-02-20");
}
