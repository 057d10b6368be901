// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::business_arg;
use anyhow::Result;
use rusqlite::{params, Connection};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("sims", sub)) => export_sims(conn, sub),
        _ => Ok(()),
    }
}

fn export_sims(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let business_id = business_arg(conn, sub)?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT s.date, c.name as category, s.type, s.amount, s.status, s.note
         FROM simulations s
         LEFT JOIN categories c ON s.category_id=c.id
         WHERE s.business_id=?1
         ORDER BY s.date, s.id",
    )?;
    let rows = stmt.query_map(params![business_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "category", "type", "amount", "status", "note"])?;
            for row in rows {
                let (d, cat, t, amt, st, note) = row?;
                wtr.write_record([
                    d,
                    cat.unwrap_or_default(),
                    t,
                    amt,
                    st,
                    note.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, cat, t, amt, st, note) = row?;
                items.push(json!({
                    "date": d, "category": cat, "type": t, "amount": amt, "status": st, "note": note
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported simulations to {}", out);
    Ok(())
}
