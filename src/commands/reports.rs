// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Business;
use crate::report::ForecastSection;
use crate::summary;
use crate::utils::{business_arg, fmt_money, maybe_print_json, pretty_table, Period};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cash-flow", sub)) => cash_flow(conn, sub)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("bag", sub)) => bag(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn cash_flow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = business_arg(conn, sub)?;
    let period = Period::from_matches(sub)?;

    let period_sims = summary::load_period_simulations(conn, business_id, period)?;
    let all_sims = summary::load_simulations(conn, business_id)?;
    let initial_capital = summary::resolve_initial_capital(conn, business_id)?;
    let s = summary::compute_summary(&period_sims, &all_sims, initial_capital);

    let categories = summary::load_categories(conn, business_id)?;
    let breakdown = summary::compute_category_summary(&period_sims, &categories);

    if json_flag || jsonl_flag {
        let payload = json!({
            "summary": s,
            "category_breakdown": breakdown,
            "period": period.label(),
        });
        maybe_print_json(json_flag, jsonl_flag, &payload)?;
        return Ok(());
    }

    let rows = vec![
        vec!["Period".into(), period.label()],
        vec!["Total income".into(), fmt_money(&s.total_income)],
        vec!["Total expense".into(), fmt_money(&s.total_expense)],
        vec!["Net profit".into(), fmt_money(&s.net_profit)],
        vec!["Transactions".into(), s.transaction_count.to_string()],
        vec!["Initial capital".into(), fmt_money(&s.initial_capital)],
        vec!["Cash balance".into(), fmt_money(&s.current_cash_balance)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));

    if !breakdown.all.is_empty() {
        let rows = breakdown
            .all
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.r#type.to_string(),
                    fmt_money(&c.total),
                    c.count.to_string(),
                    fmt_money(&c.average),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Type", "Total", "Count", "Average"], rows)
        );
    }
    Ok(())
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = business_arg(conn, sub)?;
    let year = *sub.get_one::<i32>("year").unwrap();

    let sims = summary::load_period_simulations(
        conn,
        business_id,
        Period {
            year: Some(year),
            month: None,
        },
    )?;
    let rows = summary::compute_monthly_summary(&sims, year);

    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.label.to_string(),
                    fmt_money(&r.income),
                    fmt_money(&r.expense),
                    fmt_money(&r.net_profit),
                    r.transaction_count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net", "Count"], data)
        );
    }
    Ok(())
}

fn load_business(conn: &Connection, business_id: i64) -> Result<Business> {
    let (name, capital_s): (String, String) = conn.query_row(
        "SELECT name, initial_capital FROM businesses WHERE id=?1",
        params![business_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    Ok(Business {
        id: business_id,
        name,
        initial_capital: capital_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid stored initial capital '{}'", capital_s))?,
    })
}

fn bag(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let business_id = business_arg(conn, sub)?;
    let period = Period::from_matches(sub)?;
    let out = sub.get_one::<String>("out");

    let business = load_business(conn, business_id)?;
    let period_sims = summary::load_period_simulations(conn, business_id, period)?;
    let all_sims = summary::load_simulations(conn, business_id)?;
    let initial_capital = summary::resolve_initial_capital(conn, business_id)?;
    let s = summary::compute_summary(&period_sims, &all_sims, initial_capital);

    let categories = summary::load_categories(conn, business_id)?;
    let breakdown = summary::compute_category_summary(&period_sims, &categories);

    let year = period.year.unwrap_or_else(|| {
        all_sims
            .last()
            .map(|s| s.year)
            .unwrap_or_else(|| chrono::Datelike::year(&chrono::Utc::now().date_naive()))
    });
    let monthly = summary::compute_monthly_summary(&all_sims, year);

    let mut projections = crate::projection::load_projections(conn, business_id)?;
    for p in &mut projections {
        crate::projection::ensure_metrics(conn, p)?;
    }

    let forecast_rows = crate::forecast::load_results(conn, business_id)?;
    let forecast = if forecast_rows.is_empty() {
        None
    } else {
        let stats = crate::forecast::compute_statistics(&forecast_rows);
        let executive_summary = crate::forecast::executive_summary(&stats, &period.label());
        Some(ForecastSection {
            stats,
            executive_summary,
        })
    };

    let bag = crate::report::assemble_report_data(
        business,
        period.label(),
        s,
        breakdown,
        monthly,
        projections,
        forecast,
    );
    let rendered = serde_json::to_string_pretty(&bag)?;
    match out {
        Some(path) => {
            std::fs::write(path, rendered)?;
            println!("Report bag written to {}", path);
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
