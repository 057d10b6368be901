// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period and category aggregation over recorded simulations.
//!
//! All computations here are total over well-formed input: empty slices
//! produce all-zero summaries, never errors. Only completed simulations
//! count toward realized totals.

use anyhow::{Context, Result};
use chrono::Datelike;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::models::{Category, CategoryType, Simulation, SimulationStatus};
use crate::utils::{month_name, Period};

#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_profit: Decimal,
    pub transaction_count: usize,
    pub income_count: usize,
    pub expense_count: usize,
    pub accumulated_income: Decimal,
    pub accumulated_expense: Decimal,
    pub initial_capital: Decimal,
    pub current_cash_balance: Decimal,
}

/// Totals over `period` plus the all-time cash position.
///
/// `all_time` must span the business's entire history: the cash balance is
/// `initial_capital + accumulated_income - accumulated_expense` over every
/// completed simulation, independent of the requested period.
pub fn compute_summary(
    period: &[Simulation],
    all_time: &[Simulation],
    initial_capital: Decimal,
) -> Summary {
    let mut s = Summary {
        initial_capital,
        ..Summary::default()
    };

    for sim in period.iter().filter(|s| s.status == SimulationStatus::Completed) {
        s.transaction_count += 1;
        match sim.r#type {
            CategoryType::Income => {
                s.total_income += sim.amount;
                s.income_count += 1;
            }
            CategoryType::Expense => {
                s.total_expense += sim.amount;
                s.expense_count += 1;
            }
        }
    }
    s.net_profit = s.total_income - s.total_expense;

    for sim in all_time.iter().filter(|s| s.status == SimulationStatus::Completed) {
        match sim.r#type {
            CategoryType::Income => s.accumulated_income += sim.amount,
            CategoryType::Expense => s.accumulated_expense += sim.amount,
        }
    }
    s.current_cash_balance = initial_capital + s.accumulated_income - s.accumulated_expense;
    s
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category_id: i64,
    pub name: String,
    pub r#type: CategoryType,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorySummary {
    pub all: Vec<CategoryTotal>,
    pub income: Vec<CategoryTotal>,
    pub expense: Vec<CategoryTotal>,
    pub top_income: Vec<CategoryTotal>,
    pub top_expense: Vec<CategoryTotal>,
}

const TOP_N: usize = 5;

/// Per-category totals over completed simulations. Categories with no
/// matching rows are skipped; entries are sorted descending by total with the
/// original category order as the tie-break (the sort is stable). The top
/// lists are the first five of each type taken from that order, never
/// re-sorted per type.
pub fn compute_category_summary(sims: &[Simulation], categories: &[Category]) -> CategorySummary {
    let mut all = Vec::new();
    for cat in categories {
        let mut total = Decimal::ZERO;
        let mut count = 0usize;
        for sim in sims {
            if sim.status != SimulationStatus::Completed {
                continue;
            }
            if sim.category_id == Some(cat.id) {
                total += sim.amount;
                count += 1;
            }
        }
        if count == 0 {
            continue;
        }
        all.push(CategoryTotal {
            category_id: cat.id,
            name: cat.name.clone(),
            r#type: cat.r#type,
            total,
            count,
            average: total / Decimal::from(count as i64),
        });
    }
    all.sort_by(|a, b| b.total.cmp(&a.total));

    let income: Vec<CategoryTotal> = all
        .iter()
        .filter(|c| c.r#type == CategoryType::Income)
        .cloned()
        .collect();
    let expense: Vec<CategoryTotal> = all
        .iter()
        .filter(|c| c.r#type == CategoryType::Expense)
        .cloned()
        .collect();
    let top_income = income.iter().take(TOP_N).cloned().collect();
    let top_expense = expense.iter().take(TOP_N).cloned().collect();

    CategorySummary {
        all,
        income,
        expense,
        top_income,
        top_expense,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub label: &'static str,
    pub income: Decimal,
    pub expense: Decimal,
    pub net_profit: Decimal,
    pub transaction_count: usize,
}

/// Calendar breakdown for one year: always exactly 12 entries, Jan..Dec,
/// zero-filled for months without activity.
pub fn compute_monthly_summary(sims: &[Simulation], year: i32) -> Vec<MonthlySummary> {
    (1..=12u32)
        .map(|month| {
            let mut income = Decimal::ZERO;
            let mut expense = Decimal::ZERO;
            let mut count = 0usize;
            for sim in sims {
                if sim.status != SimulationStatus::Completed
                    || sim.date.year() != year
                    || sim.date.month() != month
                {
                    continue;
                }
                count += 1;
                match sim.r#type {
                    CategoryType::Income => income += sim.amount,
                    CategoryType::Expense => expense += sim.amount,
                }
            }
            MonthlySummary {
                month,
                label: month_name(month),
                income,
                expense,
                net_profit: income - expense,
                transaction_count: count,
            }
        })
        .collect()
}

const SIM_COLS: &str = "id, business_id, category_id, type, amount, date, year, status, \
                        recurrence_frequency, note, recurrence_end_date";

// Decimal/enum parsing happens outside any rusqlite closure so bad stored
// values surface with context instead of a blanket conversion failure.
fn load_where(conn: &Connection, sql: &str, p: &[&dyn rusqlite::ToSql]) -> Result<Vec<Simulation>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(p.iter()))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let type_s: String = r.get(3)?;
        let amount_s: String = r.get(4)?;
        let date_s: String = r.get(5)?;
        let status_s: String = r.get(7)?;
        let freq: Option<String> = r.get(8)?;
        let end_s: Option<String> = r.get(10)?;
        let recurrence = match freq {
            Some(frequency) => Some(crate::models::Recurrence {
                frequency,
                end_date: end_s
                    .map(|s| crate::utils::parse_date(&s))
                    .transpose()
                    .with_context(|| format!("Simulation {} recurrence end date", id))?,
            }),
            None => None,
        };
        out.push(Simulation {
            id,
            business_id: r.get(1)?,
            category_id: r.get(2)?,
            r#type: CategoryType::from_str(&type_s)
                .with_context(|| format!("Simulation {} stored type", id))?,
            amount: amount_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid stored amount '{}' on simulation {}", amount_s, id))?,
            date: crate::utils::parse_date(&date_s)
                .with_context(|| format!("Simulation {} stored date", id))?,
            year: r.get(6)?,
            status: SimulationStatus::from_str(&status_s)
                .with_context(|| format!("Simulation {} stored status", id))?,
            recurrence,
            note: r.get(9)?,
        });
    }
    Ok(out)
}

/// All simulations for one business, oldest first.
pub fn load_simulations(conn: &Connection, business_id: i64) -> Result<Vec<Simulation>> {
    let sql = format!(
        "SELECT {SIM_COLS} FROM simulations WHERE business_id=?1 ORDER BY date, id"
    );
    load_where(conn, &sql, &[&business_id])
}

/// Simulations for one business narrowed to a year or year+month.
pub fn load_period_simulations(
    conn: &Connection,
    business_id: i64,
    period: Period,
) -> Result<Vec<Simulation>> {
    match (period.year, period.month) {
        (Some(year), Some(month)) => {
            let prefix = format!("{:04}-{:02}", year, month);
            let sql = format!(
                "SELECT {SIM_COLS} FROM simulations
                 WHERE business_id=?1 AND substr(date,1,7)=?2 ORDER BY date, id"
            );
            load_where(conn, &sql, &[&business_id, &prefix])
        }
        (Some(year), None) => {
            let sql = format!(
                "SELECT {SIM_COLS} FROM simulations
                 WHERE business_id=?1 AND year=?2 ORDER BY date, id"
            );
            load_where(conn, &sql, &[&business_id, &year])
        }
        _ => load_simulations(conn, business_id),
    }
}

pub fn load_categories(conn: &Connection, business_id: i64) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, business_id, name, type, subtype, color, status
         FROM categories WHERE business_id=?1 ORDER BY id",
    )?;
    let mut rows = stmt.query(params![business_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let type_s: String = r.get(3)?;
        let subtype_s: String = r.get(4)?;
        out.push(Category {
            id,
            business_id: r.get(1)?,
            name: r.get(2)?,
            r#type: CategoryType::from_str(&type_s)
                .with_context(|| format!("Category {} stored type", id))?,
            subtype: crate::models::CategorySubtype::from_str(&subtype_s)
                .with_context(|| format!("Category {} stored subtype", id))?,
            color: r.get(5)?,
            status: r.get(6)?,
        });
    }
    Ok(out)
}

/// Initial capital feeding the cash balance: the latest realistic
/// projection's initial investment wins, then the latest projection of any
/// scenario, then the business's declared figure.
pub fn resolve_initial_capital(conn: &Connection, business_id: i64) -> Result<Decimal> {
    let from_projection: Option<String> = conn
        .query_row(
            "SELECT initial_investment FROM projections
             WHERE business_id=?1 AND scenario_type='realistic'
             ORDER BY id DESC LIMIT 1",
            params![business_id],
            |r| r.get(0),
        )
        .optional()?;
    let from_projection = match from_projection {
        Some(v) => Some(v),
        None => conn
            .query_row(
                "SELECT initial_investment FROM projections
                 WHERE business_id=?1 ORDER BY id DESC LIMIT 1",
                params![business_id],
                |r| r.get(0),
            )
            .optional()?,
    };
    let raw: String = match from_projection {
        Some(v) => v,
        None => conn.query_row(
            "SELECT initial_capital FROM businesses WHERE id=?1",
            params![business_id],
            |r| r.get(0),
        )?,
    };
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid stored initial capital '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sim(
        id: i64,
        category_id: Option<i64>,
        r#type: CategoryType,
        amount: i64,
        date: &str,
        status: SimulationStatus,
    ) -> Simulation {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Simulation {
            id,
            business_id: 1,
            category_id,
            r#type,
            amount: Decimal::from(amount),
            date,
            year: chrono::Datelike::year(&date),
            status,
            recurrence: None,
            note: None,
        }
    }

    #[test]
    fn summary_excludes_planned_and_cancelled() {
        let period = vec![
            sim(1, None, CategoryType::Income, 5_000_000, "2025-01-05", SimulationStatus::Completed),
            sim(2, None, CategoryType::Expense, 2_000_000, "2025-01-10", SimulationStatus::Completed),
            sim(3, None, CategoryType::Income, 1_000_000, "2025-01-20", SimulationStatus::Planned),
        ];
        let s = compute_summary(&period, &period, Decimal::ZERO);
        assert_eq!(s.total_income, Decimal::from(5_000_000));
        assert_eq!(s.total_expense, Decimal::from(2_000_000));
        assert_eq!(s.net_profit, Decimal::from(3_000_000));
        assert_eq!(s.transaction_count, 2);
        assert_eq!(s.income_count, 1);
        assert_eq!(s.expense_count, 1);
    }

    #[test]
    fn cash_balance_uses_all_time_history() {
        let all = vec![
            sim(1, None, CategoryType::Income, 800, "2024-03-01", SimulationStatus::Completed),
            sim(2, None, CategoryType::Expense, 300, "2024-07-01", SimulationStatus::Completed),
            sim(3, None, CategoryType::Income, 100, "2025-01-15", SimulationStatus::Completed),
        ];
        // Period narrowed to Jan 2025 must not change the accumulated totals.
        let period: Vec<_> = all.iter().filter(|s| s.date.to_string().starts_with("2025-01")).cloned().collect();
        let s = compute_summary(&period, &all, Decimal::from(1000));
        assert_eq!(s.total_income, Decimal::from(100));
        assert_eq!(s.accumulated_income, Decimal::from(900));
        assert_eq!(s.accumulated_expense, Decimal::from(300));
        assert_eq!(s.current_cash_balance, Decimal::from(1600));
    }

    #[test]
    fn empty_input_yields_zero_summary() {
        let s = compute_summary(&[], &[], Decimal::ZERO);
        assert_eq!(s.total_income, Decimal::ZERO);
        assert_eq!(s.net_profit, Decimal::ZERO);
        assert_eq!(s.transaction_count, 0);
        assert_eq!(s.current_cash_balance, Decimal::ZERO);
    }

    fn cat(id: i64, name: &str, r#type: CategoryType) -> Category {
        Category {
            id,
            business_id: 1,
            name: name.into(),
            r#type,
            subtype: crate::models::CategorySubtype::Other,
            color: None,
            status: "actual".into(),
        }
    }

    #[test]
    fn category_summary_sorts_and_caps_top_lists() {
        let categories: Vec<Category> = (1..=7)
            .map(|i| cat(i, &format!("inc{}", i), CategoryType::Income))
            .chain(std::iter::once(cat(8, "rent", CategoryType::Expense)))
            .collect();
        let mut sims = Vec::new();
        for i in 1..=7i64 {
            // category i gets total 100 * i
            sims.push(sim(i, Some(i), CategoryType::Income, 100 * i, "2025-02-01", SimulationStatus::Completed));
        }
        sims.push(sim(20, Some(8), CategoryType::Expense, 50, "2025-02-02", SimulationStatus::Completed));

        let cs = compute_category_summary(&sims, &categories);
        assert_eq!(cs.all.len(), 8);
        assert_eq!(cs.all[0].name, "inc7");
        assert_eq!(cs.income.len(), 7);
        assert_eq!(cs.top_income.len(), 5);
        assert_eq!(cs.top_income[0].total, Decimal::from(700));
        assert_eq!(cs.top_expense.len(), 1);

        let top_sum: Decimal = cs.top_income.iter().map(|c| c.total).sum();
        let income_sum: Decimal = cs.income.iter().map(|c| c.total).sum();
        assert!(top_sum <= income_sum);
    }

    #[test]
    fn category_summary_skips_unmatched_and_computes_average() {
        let categories = vec![cat(1, "sales", CategoryType::Income), cat(2, "idle", CategoryType::Income)];
        let sims = vec![
            sim(1, Some(1), CategoryType::Income, 30, "2025-02-01", SimulationStatus::Completed),
            sim(2, Some(1), CategoryType::Income, 60, "2025-02-05", SimulationStatus::Completed),
            sim(3, None, CategoryType::Income, 999, "2025-02-06", SimulationStatus::Completed),
        ];
        let cs = compute_category_summary(&sims, &categories);
        assert_eq!(cs.all.len(), 1);
        assert_eq!(cs.all[0].count, 2);
        assert_eq!(cs.all[0].average, Decimal::from(45));
    }

    #[test]
    fn empty_category_summary_is_all_empty() {
        let cs = compute_category_summary(&[], &[]);
        assert!(cs.all.is_empty());
        assert!(cs.income.is_empty());
        assert!(cs.expense.is_empty());
        assert!(cs.top_income.is_empty());
        assert!(cs.top_expense.is_empty());
    }

    #[test]
    fn monthly_summary_always_has_twelve_entries() {
        let rows = compute_monthly_summary(&[], 2025);
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.income.is_zero() && r.transaction_count == 0));
        assert_eq!(rows[0].label, "Jan");
        assert_eq!(rows[11].label, "Dec");
    }

    #[test]
    fn monthly_summary_buckets_by_calendar_month() {
        let sims = vec![
            sim(1, None, CategoryType::Income, 10, "2025-03-01", SimulationStatus::Completed),
            sim(2, None, CategoryType::Income, 20, "2025-03-30", SimulationStatus::Completed),
            sim(3, None, CategoryType::Expense, 5, "2025-04-02", SimulationStatus::Completed),
            sim(4, None, CategoryType::Income, 99, "2024-03-15", SimulationStatus::Completed),
            sim(5, None, CategoryType::Income, 99, "2025-03-16", SimulationStatus::Planned),
        ];
        let rows = compute_monthly_summary(&sims, 2025);
        assert_eq!(rows[2].income, Decimal::from(30));
        assert_eq!(rows[2].transaction_count, 2);
        assert_eq!(rows[3].expense, Decimal::from(5));
        assert_eq!(rows[3].net_profit, Decimal::from(-5));
    }
}
