// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Five-year scenario projections from a single baseline year.
//!
//! One `create_batch` call always produces exactly three records (optimistic,
//! realistic, pessimistic) inside a single database transaction; a failure at
//! any point rolls the whole batch back.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::error::StrategixError;
use crate::models::{Projection, ProjectionMetrics, ScenarioType, YearProjection};

pub const PROJECTION_YEARS: u32 = 5;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScenarioRates {
    pub growth_rate: Decimal,
    pub inflation_rate: Decimal,
    pub discount_rate: Decimal,
}

/// Scenario rate sets derived from the realistic input. Offsets are in whole
/// percentage points; the pessimistic growth rate and both adjusted inflation
/// rates are floored at zero, optimistic growth is unbounded.
pub fn scenario_rates(base: &ScenarioRates, scenario: ScenarioType) -> ScenarioRates {
    let (growth, inflation) = match scenario {
        ScenarioType::Optimistic => (
            base.growth_rate + Decimal::from(5),
            (base.inflation_rate - Decimal::from(2)).max(Decimal::ZERO),
        ),
        ScenarioType::Realistic => (base.growth_rate, base.inflation_rate),
        ScenarioType::Pessimistic => (
            (base.growth_rate - Decimal::from(7)).max(Decimal::ZERO),
            base.inflation_rate + Decimal::from(3),
        ),
    };
    ScenarioRates {
        growth_rate: growth,
        inflation_rate: inflation,
        discount_rate: base.discount_rate,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Baseline {
    pub revenue: Decimal,
    pub cost: Decimal,
}

/// Compound the baseline forward. Each year's growth applies to the previous
/// computed year, not the original baseline.
pub fn project_years(baseline: Baseline, rates: &ScenarioRates) -> Vec<YearProjection> {
    let hundred = Decimal::from(100);
    let growth = Decimal::ONE + rates.growth_rate / hundred;
    let inflation = Decimal::ONE + rates.inflation_rate / hundred;

    let mut revenue = baseline.revenue;
    let mut cost = baseline.cost;
    let mut out = Vec::with_capacity(PROJECTION_YEARS as usize);
    for year in 1..=PROJECTION_YEARS {
        revenue *= growth;
        cost *= inflation;
        out.push(YearProjection {
            year,
            revenue,
            cost,
            net_profit: revenue - cost,
        });
    }
    out
}

fn npv_at(rate: f64, investment: f64, profits: &[f64]) -> f64 {
    let mut acc = -investment;
    let mut df = 1.0;
    for p in profits {
        df *= 1.0 + rate;
        acc += p / df;
    }
    acc
}

/// IRR by bisection over the discount rate. `None` when the cash-flow series
/// never brackets a root in [-0.99, 10.0].
fn irr(investment: Decimal, years: &[YearProjection]) -> Option<Decimal> {
    let investment = investment.to_f64()?;
    if investment <= 0.0 {
        return None;
    }
    let profits: Vec<f64> = years.iter().map(|y| y.net_profit.to_f64().unwrap_or(0.0)).collect();
    let mut lo = -0.99f64;
    let mut hi = 10.0f64;
    let f_lo = npv_at(lo, investment, &profits);
    let f_hi = npv_at(hi, investment, &profits);
    if f_lo * f_hi > 0.0 {
        return None;
    }
    for _ in 0..200 {
        let mid = (lo + hi) / 2.0;
        let f_mid = npv_at(mid, investment, &profits);
        if f_mid.abs() < 1e-7 {
            lo = mid;
            break;
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Decimal::from_f64(((lo + hi) / 2.0) * 100.0).map(|d| d.round_dp(4))
}

/// Derived metrics for one projection. Idempotent: recomputing from the same
/// year rows yields the same values.
pub fn calculate_metrics(
    initial_investment: Decimal,
    discount_rate: Decimal,
    years: &[YearProjection],
) -> ProjectionMetrics {
    let hundred = Decimal::from(100);
    let factor = Decimal::ONE + discount_rate / hundred;

    let mut npv = -initial_investment;
    let mut df = Decimal::ONE;
    for y in years {
        df *= factor;
        if !df.is_zero() {
            npv += y.net_profit / df;
        }
    }

    let total_profit: Decimal = years.iter().map(|y| y.net_profit).sum();
    let roi = if initial_investment.is_zero() {
        Decimal::ZERO
    } else {
        (total_profit - initial_investment) / initial_investment * hundred
    };

    let payback_period = if initial_investment.is_zero() {
        Some(Decimal::ZERO)
    } else {
        let mut cumulative = Decimal::ZERO;
        let mut found = None;
        for y in years {
            let before = cumulative;
            cumulative += y.net_profit;
            if cumulative >= initial_investment {
                let remaining = initial_investment - before;
                let fraction = if y.net_profit.is_zero() {
                    Decimal::ZERO
                } else {
                    remaining / y.net_profit
                };
                found = Some(Decimal::from(y.year - 1) + fraction);
                break;
            }
        }
        found
    };

    ProjectionMetrics {
        npv: npv.round_dp(2),
        roi: roi.round_dp(2),
        irr: irr(initial_investment, years),
        payback_period: payback_period.map(|p| p.round_dp(2)),
    }
}

/// Baseline revenue/cost for a year: sums over completed simulations only.
pub fn load_baseline(conn: &Connection, business_id: i64, base_year: i32) -> Result<Baseline> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM simulations
         WHERE business_id=?1 AND year=?2 AND status='completed'",
        params![business_id, base_year],
        |r| r.get(0),
    )?;
    if count == 0 {
        return Err(StrategixError::MissingBaseline(base_year).into());
    }

    let mut stmt = conn.prepare(
        "SELECT type, amount FROM simulations
         WHERE business_id=?1 AND year=?2 AND status='completed'",
    )?;
    let mut rows = stmt.query(params![business_id, base_year])?;
    let mut revenue = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let type_s: String = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let amount = amount_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid stored amount '{}'", amount_s))?;
        match type_s.as_str() {
            "income" => revenue += amount,
            _ => cost += amount,
        }
    }
    Ok(Baseline { revenue, cost })
}

/// Create the full three-scenario batch atomically. Either all three
/// projections land with their year rows and metrics, or none do.
pub fn create_batch(
    conn: &mut Connection,
    business_id: i64,
    name: &str,
    base_year: i32,
    rates: ScenarioRates,
    initial_investment: Decimal,
) -> Result<Vec<Projection>> {
    let baseline = load_baseline(conn, business_id, base_year)?;

    let tx = conn.transaction()?;
    let mut created = Vec::with_capacity(ScenarioType::ALL.len());
    for scenario in ScenarioType::ALL {
        let derived = scenario_rates(&rates, scenario);
        let years = project_years(baseline, &derived);
        let metrics = calculate_metrics(initial_investment, derived.discount_rate, &years);
        let base_net_profit = baseline.revenue - baseline.cost;

        tx.execute(
            "INSERT INTO projections(business_id, name, scenario_type, base_year,
                growth_rate, inflation_rate, discount_rate, initial_investment,
                base_revenue, base_cost, base_net_profit, npv, roi, irr, payback_period)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15)",
            params![
                business_id,
                name,
                scenario.as_str(),
                base_year,
                derived.growth_rate.to_string(),
                derived.inflation_rate.to_string(),
                derived.discount_rate.to_string(),
                initial_investment.to_string(),
                baseline.revenue.to_string(),
                baseline.cost.to_string(),
                base_net_profit.to_string(),
                metrics.npv.to_string(),
                metrics.roi.to_string(),
                metrics.irr.map(|v| v.to_string()),
                metrics.payback_period.map(|v| v.to_string()),
            ],
        )?;
        let projection_id = tx.last_insert_rowid();
        for y in &years {
            tx.execute(
                "INSERT INTO projection_years(projection_id, year, revenue, cost, net_profit)
                 VALUES (?1,?2,?3,?4,?5)",
                params![
                    projection_id,
                    y.year,
                    y.revenue.to_string(),
                    y.cost.to_string(),
                    y.net_profit.to_string(),
                ],
            )?;
        }
        created.push(Projection {
            id: projection_id,
            business_id,
            name: name.to_string(),
            scenario_type: scenario,
            base_year,
            growth_rate: derived.growth_rate,
            inflation_rate: derived.inflation_rate,
            discount_rate: derived.discount_rate,
            initial_investment,
            base_revenue: baseline.revenue,
            base_cost: baseline.cost,
            base_net_profit,
            yearly_projections: years,
            metrics: Some(metrics),
        });
    }
    tx.commit()?;
    log::debug!(
        "created projection batch '{}' for business {} (base year {})",
        name,
        business_id,
        base_year
    );
    Ok(created)
}

fn parse_dec(raw: String, what: &str, id: i64) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid stored {} '{}' on projection {}", what, raw, id))
}

pub fn load_projection(conn: &Connection, id: i64) -> Result<Projection> {
    let row = conn
        .query_row(
            "SELECT business_id, name, scenario_type, base_year, growth_rate,
                    inflation_rate, discount_rate, initial_investment, base_revenue,
                    base_cost, base_net_profit, npv, roi, irr, payback_period
             FROM projections WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, i32>(3)?,
                    r.get::<_, String>(4)?,
                    r.get::<_, String>(5)?,
                    r.get::<_, String>(6)?,
                    r.get::<_, String>(7)?,
                    r.get::<_, String>(8)?,
                    r.get::<_, String>(9)?,
                    r.get::<_, String>(10)?,
                    r.get::<_, Option<String>>(11)?,
                    r.get::<_, Option<String>>(12)?,
                    r.get::<_, Option<String>>(13)?,
                    r.get::<_, Option<String>>(14)?,
                ))
            },
        )
        .optional()?;
    let Some((
        business_id,
        name,
        scenario_s,
        base_year,
        growth_s,
        inflation_s,
        discount_s,
        investment_s,
        base_revenue_s,
        base_cost_s,
        base_profit_s,
        npv_s,
        roi_s,
        irr_s,
        payback_s,
    )) = row
    else {
        return Err(StrategixError::ProjectionNotFound(id).into());
    };

    let mut stmt = conn.prepare(
        "SELECT year, revenue, cost, net_profit FROM projection_years
         WHERE projection_id=?1 ORDER BY year",
    )?;
    let mut rows = stmt.query(params![id])?;
    let mut years = Vec::new();
    while let Some(r) = rows.next()? {
        years.push(YearProjection {
            year: r.get(0)?,
            revenue: parse_dec(r.get::<_, String>(1)?, "revenue", id)?,
            cost: parse_dec(r.get::<_, String>(2)?, "cost", id)?,
            net_profit: parse_dec(r.get::<_, String>(3)?, "net profit", id)?,
        });
    }

    let metrics = match (npv_s, roi_s) {
        (Some(npv), Some(roi)) => Some(ProjectionMetrics {
            npv: parse_dec(npv, "npv", id)?,
            roi: parse_dec(roi, "roi", id)?,
            irr: irr_s.map(|v| parse_dec(v, "irr", id)).transpose()?,
            payback_period: payback_s.map(|v| parse_dec(v, "payback", id)).transpose()?,
        }),
        _ => None,
    };

    Ok(Projection {
        id,
        business_id,
        name,
        scenario_type: ScenarioType::from_str(&scenario_s)
            .with_context(|| format!("Projection {} stored scenario", id))?,
        base_year,
        growth_rate: parse_dec(growth_s, "growth rate", id)?,
        inflation_rate: parse_dec(inflation_s, "inflation rate", id)?,
        discount_rate: parse_dec(discount_s, "discount rate", id)?,
        initial_investment: parse_dec(investment_s, "initial investment", id)?,
        base_revenue: parse_dec(base_revenue_s, "base revenue", id)?,
        base_cost: parse_dec(base_cost_s, "base cost", id)?,
        base_net_profit: parse_dec(base_profit_s, "base net profit", id)?,
        yearly_projections: years,
        metrics,
    })
}

/// Fill metrics lazily when a record was stored without them. Safe to call
/// repeatedly; a projection that already has metrics is returned unchanged.
pub fn ensure_metrics(conn: &Connection, projection: &mut Projection) -> Result<()> {
    if projection.metrics.is_some() {
        return Ok(());
    }
    let metrics = calculate_metrics(
        projection.initial_investment,
        projection.discount_rate,
        &projection.yearly_projections,
    );
    conn.execute(
        "UPDATE projections SET npv=?1, roi=?2, irr=?3, payback_period=?4 WHERE id=?5",
        params![
            metrics.npv.to_string(),
            metrics.roi.to_string(),
            metrics.irr.map(|v| v.to_string()),
            metrics.payback_period.map(|v| v.to_string()),
            projection.id,
        ],
    )?;
    projection.metrics = Some(metrics);
    Ok(())
}

/// All projections for a business, newest batch first.
pub fn load_projections(conn: &Connection, business_id: i64) -> Result<Vec<Projection>> {
    let mut stmt =
        conn.prepare("SELECT id FROM projections WHERE business_id=?1 ORDER BY id DESC")?;
    let ids: Vec<i64> = stmt
        .query_map(params![business_id], |r| r.get(0))?
        .collect::<rusqlite::Result<_>>()?;
    ids.into_iter().map(|id| load_projection(conn, id)).collect()
}
