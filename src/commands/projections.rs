// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::projection::{self, ScenarioRates};
use crate::utils::{business_arg, fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn create(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let business_id = business_arg(conn, sub)?;
    let name = sub.get_one::<String>("name").unwrap();
    let base_year = *sub.get_one::<i32>("base-year").unwrap();
    let rates = ScenarioRates {
        growth_rate: parse_decimal(sub.get_one::<String>("growth").unwrap())?,
        inflation_rate: parse_decimal(sub.get_one::<String>("inflation").unwrap())?,
        discount_rate: parse_decimal(sub.get_one::<String>("discount").unwrap())?,
    };
    let investment = parse_decimal(sub.get_one::<String>("investment").unwrap())?;
    if investment.is_sign_negative() {
        anyhow::bail!("Initial investment must be non-negative, got {}", investment);
    }

    let created = projection::create_batch(conn, business_id, name, base_year, rates, investment)?;
    println!(
        "Created projection '{}' from base year {} ({} scenarios)",
        name,
        base_year,
        created.len()
    );
    let rows = created
        .iter()
        .map(|p| {
            let last = p.yearly_projections.last();
            vec![
                p.id.to_string(),
                p.scenario_type.to_string(),
                format!("{:.2}", p.growth_rate),
                format!("{:.2}", p.inflation_rate),
                last.map(|y| fmt_money(&y.net_profit)).unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Scenario", "Growth %", "Inflation %", "Year-5 net"],
            rows
        )
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = business_arg(conn, sub)?;
    let projections = projection::load_projections(conn, business_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &projections)? {
        let rows = projections
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.scenario_type.to_string(),
                    p.base_year.to_string(),
                    fmt_money(&p.base_revenue),
                    fmt_money(&p.base_cost),
                    p.metrics
                        .as_ref()
                        .map(|m| fmt_money(&m.npv))
                        .unwrap_or_else(|| "-".into()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Scenario", "Base year", "Base revenue", "Base cost", "NPV"],
                rows
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = *sub.get_one::<i64>("id").unwrap();

    let mut p = projection::load_projection(conn, id)?;
    // Metrics may be missing on older rows; fill them on read.
    projection::ensure_metrics(conn, &mut p)?;

    if maybe_print_json(json_flag, jsonl_flag, &p)? {
        return Ok(());
    }

    println!(
        "Projection {} '{}' ({}, base year {})",
        p.id, p.name, p.scenario_type, p.base_year
    );
    let rows = p
        .yearly_projections
        .iter()
        .map(|y| {
            vec![
                y.year.to_string(),
                fmt_money(&y.revenue),
                fmt_money(&y.cost),
                fmt_money(&y.net_profit),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Year", "Revenue", "Cost", "Net profit"], rows)
    );

    if let Some(m) = &p.metrics {
        let rows = vec![
            vec!["NPV".into(), fmt_money(&m.npv)],
            vec!["ROI %".into(), fmt_money(&m.roi)],
            vec![
                "IRR %".into(),
                m.irr.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".into()),
            ],
            vec![
                "Payback (years)".into(),
                m.payback_period
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "-".into()),
            ],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}
