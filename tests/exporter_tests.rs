// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use serde_json::json;
use strategix::{cli, commands::exporter};
use tempfile::tempdir;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    strategix::db::init_schema(&mut conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO businesses(id, name, initial_capital) VALUES (1, 'Warung', '0');
        INSERT INTO categories(id, business_id, name, type, subtype)
            VALUES (1, 1, 'Sales', 'income', 'operating_revenue');
        INSERT INTO simulations(business_id, category_id, type, amount, date, year, status, note)
            VALUES (1, 1, 'income', '250000', '2025-06-15', 2025, 'completed', 'opening day');
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn export_sims_streams_pretty_json() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "strategix", "export", "sims", "--business", "Warung", "--format", "json", "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-06-15",
                "category": "Sales",
                "type": "income",
                "amount": "250000",
                "status": "completed",
                "note": "opening day"
            }
        ])
    );
}

#[test]
fn export_sims_writes_csv_header_and_rows() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "strategix", "export", "sims", "--business", "Warung", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,category,type,amount,status,note"
    );
    assert!(lines.next().unwrap().starts_with("2025-06-15,Sales,income,250000,completed"));
}
