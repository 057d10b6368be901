// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::StrategixError;
use crate::models::{CategoryType, SimulationStatus};
use crate::utils::{
    business_arg, id_for_category, maybe_print_json, parse_date, parse_decimal, pretty_table,
    Period,
};
use anyhow::Result;
use chrono::Datelike;
use rusqlite::{params, Connection};
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set-status", sub)) => set_status(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM simulations WHERE id=?1", params![id])?;
            if n == 0 {
                anyhow::bail!("Simulation {} not found", id);
            }
            println!("Deleted simulation {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let business_id = business_arg(conn, sub)?;
    let category = sub.get_one::<String>("category").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let status = SimulationStatus::from_str(sub.get_one::<String>("status").unwrap())?;
    let note = sub.get_one::<String>("note");
    let recur = sub.get_one::<String>("recur");
    let recur_until = sub
        .get_one::<String>("recur-until")
        .map(|s| parse_date(s))
        .transpose()?;

    if amount.is_sign_negative() {
        return Err(StrategixError::NegativeAmount(amount).into());
    }
    if recur_until.is_some() && recur.is_none() {
        anyhow::bail!("--recur-until requires --recur");
    }

    let category_id = id_for_category(conn, business_id, category)?;
    let category_type_s: String = conn.query_row(
        "SELECT type FROM categories WHERE id=?1",
        params![category_id],
        |r| r.get(0),
    )?;
    let category_type = CategoryType::from_str(&category_type_s)?;

    // The entry takes the category's type; an explicit --type must agree.
    if let Some(explicit) = sub.get_one::<String>("type") {
        let explicit = CategoryType::from_str(explicit)?;
        if explicit != category_type {
            return Err(StrategixError::TypeMismatch {
                simulation: explicit.to_string(),
                category: category_type.to_string(),
            }
            .into());
        }
    }

    conn.execute(
        "INSERT INTO simulations(business_id, category_id, type, amount, date, year, status,
            recurrence_frequency, recurrence_end_date, note)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        params![
            business_id,
            category_id,
            category_type.as_str(),
            amount.to_string(),
            date.to_string(),
            date.year(),
            status.as_str(),
            recur,
            recur_until.map(|d| d.to_string()),
            note
        ],
    )?;
    println!(
        "Recorded {} {} on {} in '{}' ({})",
        category_type, amount, date, category, status
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = business_arg(conn, sub)?;
    let period = Period::from_matches(sub)?;
    let status_filter = sub
        .get_one::<String>("status")
        .map(|s| SimulationStatus::from_str(s))
        .transpose()?;

    let mut sims = crate::summary::load_period_simulations(conn, business_id, period)?;
    if let Some(status) = status_filter {
        sims.retain(|s| s.status == status);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &sims)? {
        let categories = crate::summary::load_categories(conn, business_id)?;
        let name_of = |id: Option<i64>| -> String {
            id.and_then(|id| categories.iter().find(|c| c.id == id))
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "(uncategorized)".into())
        };
        let rows = sims
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.date.to_string(),
                    name_of(s.category_id),
                    s.r#type.to_string(),
                    format!("{:.2}", s.amount),
                    s.status.to_string(),
                    s.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Category", "Type", "Amount", "Status", "Note"],
                rows
            )
        );
    }
    Ok(())
}

fn set_status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let status = SimulationStatus::from_str(sub.get_one::<String>("status").unwrap())?;

    // planned -> completed|cancelled; completed and cancelled are terminal.
    let current_s: String = conn.query_row(
        "SELECT status FROM simulations WHERE id=?1",
        params![id],
        |r| r.get(0),
    )?;
    let current = SimulationStatus::from_str(&current_s)?;
    if current != SimulationStatus::Planned {
        anyhow::bail!("Simulation {} is already {} (terminal)", id, current);
    }
    if status == SimulationStatus::Planned {
        anyhow::bail!("Cannot move a simulation back to planned");
    }
    conn.execute(
        "UPDATE simulations SET status=?1 WHERE id=?2",
        params![status.as_str(), id],
    )?;
    println!("Simulation {} is now {}", id, status);
    Ok(())
}
