// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use strategix::error::StrategixError;
use strategix::models::ScenarioType;
use strategix::projection::{self, ScenarioRates};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    strategix::db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO businesses(id, name, initial_capital) VALUES (1, 'Warung', '0')",
        [],
    )
    .unwrap();
    conn
}

fn insert_sim(conn: &Connection, typ: &str, amount: &str, date: &str, status: &str) {
    let year: i32 = date[0..4].parse().unwrap();
    conn.execute(
        "INSERT INTO simulations(business_id, type, amount, date, year, status)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)",
        params![typ, amount, date, year, status],
    )
    .unwrap();
}

fn rates() -> ScenarioRates {
    ScenarioRates {
        growth_rate: Decimal::from(10),
        inflation_rate: Decimal::from(5),
        discount_rate: Decimal::from(10),
    }
}

#[test]
fn create_batch_persists_three_scenarios_atomically() {
    let mut conn = setup();
    insert_sim(&conn, "income", "1000", "2024-02-01", "completed");
    insert_sim(&conn, "expense", "500", "2024-03-01", "completed");
    insert_sim(&conn, "income", "9999", "2024-04-01", "planned"); // ignored by the baseline

    let created =
        projection::create_batch(&mut conn, 1, "Expansion", 2024, rates(), Decimal::from(1000))
            .unwrap();
    assert_eq!(created.len(), 3);
    assert_eq!(created[0].scenario_type, ScenarioType::Optimistic);
    assert_eq!(created[1].scenario_type, ScenarioType::Realistic);
    assert_eq!(created[2].scenario_type, ScenarioType::Pessimistic);

    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM projections", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 3);
    let years: i64 = conn
        .query_row("SELECT COUNT(*) FROM projection_years", [], |r| r.get(0))
        .unwrap();
    assert_eq!(years, 15);

    // Realistic scenario compounds the baseline, not the original each year.
    let realistic = &created[1];
    assert_eq!(realistic.base_revenue, Decimal::from(1000));
    assert_eq!(realistic.base_cost, Decimal::from(500));
    assert_eq!(realistic.yearly_projections[0].revenue, Decimal::from(1100));
    assert_eq!(realistic.yearly_projections[1].revenue, Decimal::from(1210));
    assert!(realistic.metrics.is_some());

    // Scenario offsets applied to the realistic input.
    assert_eq!(created[0].growth_rate, Decimal::from(15));
    assert_eq!(created[0].inflation_rate, Decimal::from(3));
    assert_eq!(created[2].growth_rate, Decimal::from(3));
    assert_eq!(created[2].inflation_rate, Decimal::from(8));
}

#[test]
fn missing_baseline_creates_nothing() {
    let mut conn = setup();
    // Only a planned row in the base year: baseline requires completed ones.
    insert_sim(&conn, "income", "1000", "2024-02-01", "planned");

    let err = projection::create_batch(&mut conn, 1, "Doomed", 2024, rates(), Decimal::from(1000))
        .unwrap_err();
    match err.downcast_ref::<StrategixError>() {
        Some(StrategixError::MissingBaseline(2024)) => {}
        other => panic!("unexpected error: {:?}", other),
    }

    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM projections", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
    let years: i64 = conn
        .query_row("SELECT COUNT(*) FROM projection_years", [], |r| r.get(0))
        .unwrap();
    assert_eq!(years, 0);
}

#[test]
fn load_round_trips_and_metrics_fill_lazily() {
    let mut conn = setup();
    insert_sim(&conn, "income", "1000", "2024-02-01", "completed");
    insert_sim(&conn, "expense", "400", "2024-03-01", "completed");

    let created =
        projection::create_batch(&mut conn, 1, "Expansion", 2024, rates(), Decimal::from(800))
            .unwrap();
    let id = created[1].id;

    // Simulate an older record written without metrics.
    conn.execute(
        "UPDATE projections SET npv=NULL, roi=NULL, irr=NULL, payback_period=NULL WHERE id=?1",
        params![id],
    )
    .unwrap();

    let mut loaded = projection::load_projection(&conn, id).unwrap();
    assert!(loaded.metrics.is_none());
    assert_eq!(loaded.yearly_projections.len(), 5);

    projection::ensure_metrics(&conn, &mut loaded).unwrap();
    let filled = loaded.metrics.clone().unwrap();
    assert_eq!(filled.npv, created[1].metrics.as_ref().unwrap().npv);

    // Re-reading sees the persisted metrics now.
    let reloaded = projection::load_projection(&conn, id).unwrap();
    assert_eq!(reloaded.metrics.unwrap().npv, filled.npv);
}

#[test]
fn load_projection_not_found() {
    let conn = setup();
    let err = projection::load_projection(&conn, 42).unwrap_err();
    match err.downcast_ref::<StrategixError>() {
        Some(StrategixError::ProjectionNotFound(42)) => {}
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn list_returns_newest_first_with_years() {
    let mut conn = setup();
    insert_sim(&conn, "income", "1000", "2024-02-01", "completed");

    projection::create_batch(&mut conn, 1, "First", 2024, rates(), Decimal::from(100)).unwrap();
    projection::create_batch(&mut conn, 1, "Second", 2024, rates(), Decimal::from(100)).unwrap();

    let all = projection::load_projections(&conn, 1).unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].name, "Second");
    assert!(all.iter().all(|p| p.yearly_projections.len() == 5));
}
