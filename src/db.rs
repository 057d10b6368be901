// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.grapadi", "Strategix", "strategix"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("strategix.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS businesses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        initial_capital TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        business_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        subtype TEXT NOT NULL DEFAULT 'other',
        color TEXT,
        status TEXT NOT NULL DEFAULT 'actual' CHECK(status IN ('actual','plan')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(business_id, name),
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS simulations(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        business_id INTEGER NOT NULL,
        category_id INTEGER,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        year INTEGER NOT NULL,
        status TEXT NOT NULL DEFAULT 'completed'
            CHECK(status IN ('planned','completed','cancelled')),
        recurrence_frequency TEXT,
        recurrence_end_date TEXT,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_simulations_date ON simulations(date);
    CREATE INDEX IF NOT EXISTS idx_simulations_business ON simulations(business_id, year);

    CREATE TABLE IF NOT EXISTS projections(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        business_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        scenario_type TEXT NOT NULL
            CHECK(scenario_type IN ('optimistic','realistic','pessimistic')),
        base_year INTEGER NOT NULL,
        growth_rate TEXT NOT NULL,
        inflation_rate TEXT NOT NULL,
        discount_rate TEXT NOT NULL,
        initial_investment TEXT NOT NULL,
        base_revenue TEXT NOT NULL,
        base_cost TEXT NOT NULL,
        base_net_profit TEXT NOT NULL,
        npv TEXT,
        roi TEXT,
        irr TEXT,
        payback_period TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS projection_years(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        projection_id INTEGER NOT NULL,
        year INTEGER NOT NULL,
        revenue TEXT NOT NULL,
        cost TEXT NOT NULL,
        net_profit TEXT NOT NULL,
        UNIQUE(projection_id, year),
        FOREIGN KEY(projection_id) REFERENCES projections(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS forecast_data(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        business_id INTEGER NOT NULL,
        method TEXT NOT NULL,
        generated_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS forecast_results(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        forecast_data_id INTEGER NOT NULL,
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        year INTEGER NOT NULL,
        forecast_income TEXT NOT NULL,
        forecast_expense TEXT NOT NULL,
        forecast_profit TEXT NOT NULL,
        forecast_margin TEXT NOT NULL DEFAULT '0',
        confidence_level TEXT NOT NULL DEFAULT '0',
        FOREIGN KEY(forecast_data_id) REFERENCES forecast_data(id) ON DELETE CASCADE
    );
    "#,
    )?;
    log::debug!("schema initialized");
    Ok(())
}
