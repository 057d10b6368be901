// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Descriptive statistics over externally produced forecast rows.
//!
//! The rows (method, confidence, per-month income/expense/profit) come from
//! an outside forecasting pipeline and are consumed read-only; this module
//! never generates predictions itself.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::ForecastResult;

#[derive(Debug, Clone, Serialize)]
pub struct ForecastStats {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_profit: Decimal,
    pub avg_margin: Decimal,
    pub avg_confidence: Decimal,
    pub growth_rate: Decimal,
    pub highest_income_month: String,
    pub highest_profit_month: String,
}

impl Default for ForecastStats {
    fn default() -> Self {
        ForecastStats {
            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            avg_margin: Decimal::ZERO,
            avg_confidence: Decimal::ZERO,
            growth_rate: Decimal::ZERO,
            highest_income_month: "-".to_string(),
            highest_profit_month: "-".to_string(),
        }
    }
}

fn month_name_id(month: u32) -> &'static str {
    match month {
        1 => "Januari",
        2 => "Februari",
        3 => "Maret",
        4 => "April",
        5 => "Mei",
        6 => "Juni",
        7 => "Juli",
        8 => "Agustus",
        9 => "September",
        10 => "Oktober",
        11 => "November",
        12 => "Desember",
        _ => "?",
    }
}

fn month_label(row: &ForecastResult) -> String {
    format!("{} {}", month_name_id(row.month), row.year)
}

/// Totals, averages, endpoint growth and peak months over forecast rows.
///
/// The growth rate is the plain first-to-last delta, not a fitted trend: it
/// is 0 whenever there are fewer than two rows or the first month's profit is
/// exactly zero. Peak months use strict comparison, so ties keep the earliest
/// occurrence. Empty input yields zeros with "-" month labels.
pub fn compute_statistics(rows: &[ForecastResult]) -> ForecastStats {
    let mut stats = ForecastStats::default();
    if rows.is_empty() {
        return stats;
    }

    for row in rows {
        stats.total_income += row.forecast_income;
        stats.total_expense += row.forecast_expense;
        stats.total_profit += row.forecast_profit;
        stats.avg_margin += row.forecast_margin;
        stats.avg_confidence += row.confidence_level;
    }
    let n = Decimal::from(rows.len() as i64);
    stats.avg_margin /= n;
    stats.avg_confidence /= n;

    let first = &rows[0];
    let last = &rows[rows.len() - 1];
    if rows.len() >= 2 && !first.forecast_profit.is_zero() {
        stats.growth_rate = (last.forecast_profit - first.forecast_profit)
            / first.forecast_profit.abs()
            * Decimal::from(100);
    }

    let mut best_income = first;
    let mut best_profit = first;
    for row in rows {
        if row.forecast_income > best_income.forecast_income {
            best_income = row;
        }
        if row.forecast_profit > best_profit.forecast_profit {
            best_profit = row;
        }
    }
    stats.highest_income_month = month_label(best_income);
    stats.highest_profit_month = month_label(best_profit);
    stats
}

/// Renderer-facing Indonesian prose for the report's executive summary.
/// Pure formatting over already-computed statistics.
pub fn executive_summary(stats: &ForecastStats, period: &str) -> String {
    if stats.highest_profit_month == "-" {
        return format!(
            "Belum ada data prakiraan untuk periode {}. Silakan impor hasil \
             prakiraan terlebih dahulu.",
            period
        );
    }
    let trend = if stats.growth_rate > Decimal::ZERO {
        format!(
            "menunjukkan tren pertumbuhan laba sebesar {:.1}%",
            stats.growth_rate
        )
    } else if stats.growth_rate < Decimal::ZERO {
        format!(
            "menunjukkan tren penurunan laba sebesar {:.1}%",
            stats.growth_rate.abs()
        )
    } else {
        "menunjukkan laba yang relatif stabil".to_string()
    };
    format!(
        "Selama periode {period}, bisnis Anda diprakirakan memperoleh total pendapatan \
         sebesar Rp {income:.0} dengan total pengeluaran Rp {expense:.0}, menghasilkan \
         laba bersih Rp {profit:.0}. Prakiraan ini {trend}. Pendapatan tertinggi \
         diperkirakan terjadi pada {inc_month}, sedangkan laba tertinggi pada \
         {prof_month}. Rata-rata margin laba adalah {margin:.1}% dengan tingkat \
         keyakinan prakiraan {confidence:.0}%.",
        period = period,
        income = stats.total_income,
        expense = stats.total_expense,
        profit = stats.total_profit,
        trend = trend,
        inc_month = stats.highest_income_month,
        prof_month = stats.highest_profit_month,
        margin = stats.avg_margin,
        confidence = stats.avg_confidence,
    )
}

/// Forecast rows for a business, oldest batch first, ordered by calendar
/// position within a batch.
pub fn load_results(conn: &Connection, business_id: i64) -> Result<Vec<ForecastResult>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.forecast_data_id, r.month, r.year, r.forecast_income,
                r.forecast_expense, r.forecast_profit, r.forecast_margin,
                r.confidence_level, d.method
         FROM forecast_results r
         JOIN forecast_data d ON r.forecast_data_id = d.id
         WHERE d.business_id=?1
         ORDER BY r.forecast_data_id, r.year, r.month",
    )?;
    let mut rows = stmt.query(params![business_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let dec = |idx: usize, what: &str| -> Result<Decimal> {
            let raw: String = r.get(idx)?;
            raw.parse::<Decimal>()
                .with_context(|| format!("Invalid stored {} '{}' on forecast row {}", what, raw, id))
        };
        out.push(ForecastResult {
            id,
            forecast_data_id: r.get(1)?,
            month: r.get(2)?,
            year: r.get(3)?,
            forecast_income: dec(4, "income")?,
            forecast_expense: dec(5, "expense")?,
            forecast_profit: dec(6, "profit")?,
            forecast_margin: dec(7, "margin")?,
            confidence_level: dec(8, "confidence")?,
            method: r.get(9)?,
        });
    }
    Ok(out)
}

/// Import one externally produced forecast file as a single batch.
///
/// Expected CSV header: month,year,income,expense,profit,margin,confidence.
/// The whole file lands in one transaction; a bad row aborts the import.
pub fn import_csv(conn: &mut Connection, business_id: i64, method: &str, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO forecast_data(business_id, method) VALUES (?1, ?2)",
        params![business_id, method],
    )?;
    let batch_id = tx.last_insert_rowid();

    let mut imported = 0usize;
    for result in rdr.records() {
        let rec = result?;
        let month: u32 = rec
            .get(0)
            .context("month missing")?
            .trim()
            .parse()
            .context("Invalid month")?;
        if !(1..=12).contains(&month) {
            anyhow::bail!("Invalid month {} (expected 1-12)", month);
        }
        let year: i32 = rec
            .get(1)
            .context("year missing")?
            .trim()
            .parse()
            .context("Invalid year")?;
        let field = |idx: usize, name: &str| -> Result<Decimal> {
            let raw = rec.get(idx).with_context(|| format!("{} missing", name))?.trim();
            raw.parse::<Decimal>()
                .with_context(|| format!("Invalid {} '{}'", name, raw))
        };
        let income = field(2, "income")?;
        let expense = field(3, "expense")?;
        let profit = field(4, "profit")?;
        let margin = field(5, "margin").unwrap_or(Decimal::ZERO);
        let confidence = field(6, "confidence").unwrap_or(Decimal::ZERO);

        tx.execute(
            "INSERT INTO forecast_results(forecast_data_id, month, year, forecast_income,
                forecast_expense, forecast_profit, forecast_margin, confidence_level)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                batch_id,
                month,
                year,
                income.to_string(),
                expense.to_string(),
                profit.to_string(),
                margin.to_string(),
                confidence.to_string(),
            ],
        )?;
        imported += 1;
    }
    tx.commit()?;
    log::debug!("imported {} forecast rows from {}", imported, path);
    Ok(imported)
}
