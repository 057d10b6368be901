// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use strategix::{cli, commands::simulations};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    strategix::db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO businesses(id, name, initial_capital) VALUES (1, 'Warung', '0')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO categories(id, business_id, name, type, subtype) VALUES
            (1, 1, 'Sales', 'income', 'operating_revenue')",
        [],
    )
    .unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args);
    let Some(("sim", sim_m)) = matches.subcommand() else {
        panic!("no sim subcommand");
    };
    simulations::handle(conn, sim_m)
}

#[test]
fn add_takes_category_type_and_derives_year() {
    let conn = setup();
    run(
        &conn,
        &[
            "strategix", "sim", "add", "--business", "Warung", "--category", "Sales",
            "--amount", "250000", "--date", "2025-06-15",
        ],
    )
    .unwrap();

    let (typ, year, status): (String, i32, String) = conn
        .query_row(
            "SELECT type, year, status FROM simulations WHERE id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(typ, "income");
    assert_eq!(year, 2025);
    assert_eq!(status, "completed");
}

#[test]
fn add_rejects_type_mismatch_and_negative_amount() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "strategix", "sim", "add", "--business", "Warung", "--category", "Sales",
            "--type", "expense", "--amount", "100", "--date", "2025-06-15",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("does not match"));

    let err = run(
        &conn,
        &[
            "strategix", "sim", "add", "--business", "Warung", "--category", "Sales",
            "--amount", "-5", "--date", "2025-06-15",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("non-negative"));

    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM simulations", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn planned_status_is_the_only_mutable_one() {
    let conn = setup();
    run(
        &conn,
        &[
            "strategix", "sim", "add", "--business", "Warung", "--category", "Sales",
            "--amount", "100", "--date", "2025-06-15", "--status", "planned",
        ],
    )
    .unwrap();

    run(
        &conn,
        &["strategix", "sim", "set-status", "--id", "1", "--status", "completed"],
    )
    .unwrap();
    let status: String = conn
        .query_row("SELECT status FROM simulations WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(status, "completed");

    // completed is terminal
    let err = run(
        &conn,
        &["strategix", "sim", "set-status", "--id", "1", "--status", "cancelled"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("terminal"));
}

#[test]
fn unknown_category_is_a_clean_error() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "strategix", "sim", "add", "--business", "Warung", "--category", "Nope",
            "--amount", "100", "--date", "2025-06-15",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("not found"));
}
