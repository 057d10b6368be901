// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, parse_decimal, pretty_table, set_default_business};
use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let capital = parse_decimal(sub.get_one::<String>("initial-capital").unwrap())?;
            if capital.is_sign_negative() {
                anyhow::bail!("Initial capital must be non-negative, got {}", capital);
            }
            conn.execute(
                "INSERT INTO businesses(name, initial_capital) VALUES (?1, ?2)",
                params![name, capital.to_string()],
            )?;
            println!("Added business '{}' (initial capital {})", name, capital);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("use", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            crate::utils::id_for_business(conn, name)?;
            set_default_business(conn, name)?;
            println!("Default business set to '{}'", name);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute("DELETE FROM businesses WHERE name=?1", params![name])?;
            println!("Removed business '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct BusinessRow {
    name: String,
    initial_capital: String,
    created_at: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt =
        conn.prepare("SELECT name, initial_capital, created_at FROM businesses ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(BusinessRow {
            name: r.get(0)?,
            initial_capital: r.get(1)?,
            created_at: r.get(2)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|b| vec![b.name, b.initial_capital, b.created_at])
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Initial capital", "Created"], rows)
        );
    }
    Ok(())
}
