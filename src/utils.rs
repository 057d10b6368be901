// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::StrategixError;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "?",
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_business(conn: &Connection, name: &str) -> Result<i64> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT id FROM businesses WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    id.ok_or_else(|| StrategixError::BusinessNotFound(name.to_string()).into())
}

pub fn id_for_category(conn: &Connection, business_id: i64, name: &str) -> Result<i64> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE business_id=?1 AND name=?2",
            params![business_id, name],
            |r| r.get(0),
        )
        .optional()?;
    id.ok_or_else(|| StrategixError::CategoryNotFound(name.to_string()).into())
}

// Operator default business, so `--business` can be omitted once set.
pub fn get_default_business(conn: &Connection) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='default_business'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_default_business(conn: &Connection, name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('default_business', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![name],
    )?;
    Ok(())
}

/// Resolve `--business NAME` or fall back to the stored default.
pub fn business_arg(conn: &Connection, m: &clap::ArgMatches) -> Result<i64> {
    if let Some(name) = m.get_one::<String>("business") {
        return id_for_business(conn, name);
    }
    let name = get_default_business(conn)?
        .context("No --business given and no default business set (see 'business use')")?;
    id_for_business(conn, &name)
}

/// Period filter parsed from optional --year/--month args.
#[derive(Debug, Clone, Copy)]
pub struct Period {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl Period {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let year = m.get_one::<i32>("year").copied();
        let month = m.get_one::<u32>("month").copied();
        if let Some(mo) = month {
            if !(1..=12).contains(&mo) {
                anyhow::bail!("Invalid month {}, expected 1-12", mo);
            }
            if year.is_none() {
                anyhow::bail!("--month requires --year");
            }
        }
        Ok(Period { year, month })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.year, self.month) {
            (None, _) => true,
            (Some(y), None) => date.year() == y,
            (Some(y), Some(m)) => date.year() == y && date.month() == m,
        }
    }

    pub fn label(&self) -> String {
        match (self.year, self.month) {
            (Some(y), Some(m)) => format!("{} {}", month_name(m), y),
            (Some(y), None) => y.to_string(),
            _ => "all time".to_string(),
        }
    }
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
