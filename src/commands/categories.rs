// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CategorySubtype, CategoryType};
use crate::utils::{business_arg, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let business_id = business_arg(conn, sub)?;
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute(
                "DELETE FROM categories WHERE business_id=?1 AND name=?2",
                params![business_id, name],
            )?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let business_id = business_arg(conn, sub)?;
    let name = sub.get_one::<String>("name").unwrap();
    let r#type = CategoryType::from_str(sub.get_one::<String>("type").unwrap())?;
    let subtype = CategorySubtype::from_str(sub.get_one::<String>("subtype").unwrap())?;
    let color = sub.get_one::<String>("color");
    let status = sub.get_one::<String>("status").unwrap();
    if status != "actual" && status != "plan" {
        anyhow::bail!("Invalid status '{}', expected actual|plan", status);
    }

    // Subtype polarity is reported, never rejected.
    if let Some(expected) = subtype.expected_type() {
        if expected != r#type {
            log::warn!(
                "category '{}': subtype {} is usually {} but type is {}",
                name,
                subtype,
                expected,
                r#type
            );
            eprintln!(
                "warning: subtype '{}' is usually attached to {} categories",
                subtype, expected
            );
        }
    }

    conn.execute(
        "INSERT INTO categories(business_id, name, type, subtype, color, status)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![business_id, name, r#type.as_str(), subtype.as_str(), color, status],
    )?;
    println!("Added category '{}' ({}, {})", name, r#type, subtype);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = business_arg(conn, sub)?;
    let categories = crate::summary::load_categories(conn, business_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &categories)? {
        let rows = categories
            .into_iter()
            .map(|c| {
                vec![
                    c.name,
                    c.r#type.to_string(),
                    c.subtype.to_string(),
                    c.color.unwrap_or_default(),
                    c.status,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Type", "Subtype", "Color", "Status"], rows)
        );
    }
    Ok(())
}
