// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use strategix::summary;
use strategix::utils::Period;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    strategix::db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO businesses(id, name, initial_capital) VALUES (1, 'Warung', '1000')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO categories(id, business_id, name, type, subtype) VALUES
            (1, 1, 'Sales', 'income', 'operating_revenue'),
            (2, 1, 'Rent', 'expense', 'operating_expense')",
        [],
    )
    .unwrap();
    conn
}

fn insert_sim(conn: &Connection, cat: i64, typ: &str, amount: &str, date: &str, status: &str) {
    let year: i32 = date[0..4].parse().unwrap();
    conn.execute(
        "INSERT INTO simulations(business_id, category_id, type, amount, date, year, status)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)",
        params![cat, typ, amount, date, year, status],
    )
    .unwrap();
}

#[test]
fn cash_flow_summary_over_period() {
    let conn = setup();
    insert_sim(&conn, 1, "income", "5000000", "2025-01-05", "completed");
    insert_sim(&conn, 2, "expense", "2000000", "2025-01-10", "completed");
    insert_sim(&conn, 1, "income", "1000000", "2025-01-20", "planned");
    // Outside the period but part of all-time history
    insert_sim(&conn, 1, "income", "300", "2024-06-01", "completed");

    let period = Period {
        year: Some(2025),
        month: Some(1),
    };
    let period_sims = summary::load_period_simulations(&conn, 1, period).unwrap();
    let all = summary::load_simulations(&conn, 1).unwrap();
    let capital = summary::resolve_initial_capital(&conn, 1).unwrap();
    let s = summary::compute_summary(&period_sims, &all, capital);

    assert_eq!(s.total_income, Decimal::from(5_000_000));
    assert_eq!(s.total_expense, Decimal::from(2_000_000));
    assert_eq!(s.net_profit, Decimal::from(3_000_000));
    assert_eq!(s.transaction_count, 2);
    // Accumulated totals span all history, not the filtered month.
    assert_eq!(s.accumulated_income, Decimal::from(5_000_300));
    assert_eq!(
        s.current_cash_balance,
        Decimal::from(1000 + 5_000_300 - 2_000_000)
    );
}

#[test]
fn accumulated_totals_do_not_depend_on_period() {
    let conn = setup();
    insert_sim(&conn, 1, "income", "100", "2024-02-01", "completed");
    insert_sim(&conn, 2, "expense", "40", "2025-03-01", "completed");

    let all = summary::load_simulations(&conn, 1).unwrap();
    let capital = Decimal::from(1000);

    let wide = summary::compute_summary(&all, &all, capital);
    let narrow_sims = summary::load_period_simulations(
        &conn,
        1,
        Period {
            year: Some(2025),
            month: Some(3),
        },
    )
    .unwrap();
    let narrow = summary::compute_summary(&narrow_sims, &all, capital);

    assert_eq!(wide.accumulated_income, narrow.accumulated_income);
    assert_eq!(wide.accumulated_expense, narrow.accumulated_expense);
    assert_eq!(wide.current_cash_balance, narrow.current_cash_balance);
    assert_ne!(wide.total_income, narrow.total_income);
}

#[test]
fn initial_capital_prefers_realistic_projection() {
    let conn = setup();
    // Declared on the business: 1000. No projections yet.
    assert_eq!(
        summary::resolve_initial_capital(&conn, 1).unwrap(),
        Decimal::from(1000)
    );

    conn.execute(
        "INSERT INTO projections(business_id, name, scenario_type, base_year, growth_rate,
            inflation_rate, discount_rate, initial_investment, base_revenue, base_cost,
            base_net_profit)
         VALUES (1, 'p', 'pessimistic', 2024, '3', '8', '10', '7000', '100', '50', '50')",
        [],
    )
    .unwrap();
    // Any-scenario fallback
    assert_eq!(
        summary::resolve_initial_capital(&conn, 1).unwrap(),
        Decimal::from(7000)
    );

    conn.execute(
        "INSERT INTO projections(business_id, name, scenario_type, base_year, growth_rate,
            inflation_rate, discount_rate, initial_investment, base_revenue, base_cost,
            base_net_profit)
         VALUES (1, 'p', 'realistic', 2024, '10', '5', '10', '5000', '100', '50', '50')",
        [],
    )
    .unwrap();
    // Latest realistic wins
    assert_eq!(
        summary::resolve_initial_capital(&conn, 1).unwrap(),
        Decimal::from(5000)
    );
}

#[test]
fn monthly_summary_from_db_rows() {
    let conn = setup();
    insert_sim(&conn, 1, "income", "10", "2025-03-01", "completed");
    insert_sim(&conn, 1, "income", "20", "2025-03-30", "completed");
    insert_sim(&conn, 2, "expense", "5", "2025-07-10", "completed");
    insert_sim(&conn, 1, "income", "99", "2025-05-01", "cancelled");

    let sims = summary::load_period_simulations(
        &conn,
        1,
        Period {
            year: Some(2025),
            month: None,
        },
    )
    .unwrap();
    let rows = summary::compute_monthly_summary(&sims, 2025);
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[2].income, Decimal::from(30));
    assert_eq!(rows[6].expense, Decimal::from(5));
    assert_eq!(rows[4].transaction_count, 0);
}

#[test]
fn category_breakdown_from_db_rows() {
    let conn = setup();
    insert_sim(&conn, 1, "income", "900", "2025-01-05", "completed");
    insert_sim(&conn, 1, "income", "100", "2025-01-06", "completed");
    insert_sim(&conn, 2, "expense", "400", "2025-01-07", "completed");

    let sims = summary::load_simulations(&conn, 1).unwrap();
    let categories = summary::load_categories(&conn, 1).unwrap();
    let cs = summary::compute_category_summary(&sims, &categories);

    assert_eq!(cs.all.len(), 2);
    assert_eq!(cs.all[0].name, "Sales");
    assert_eq!(cs.all[0].total, Decimal::from(1000));
    assert_eq!(cs.all[0].average, Decimal::from(500));
    assert_eq!(cs.top_expense.len(), 1);
    assert_eq!(cs.top_expense[0].total, Decimal::from(400));
}
