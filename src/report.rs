// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Assembly of the renderer-facing report bag.
//!
//! Pure composition: every number in the bag was computed upstream. The bag
//! is what an external template/PDF renderer consumes; chart entries carry
//! QuickChart-style configs, not fetched images.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

use crate::forecast::ForecastStats;
use crate::models::{Business, Projection};
use crate::summary::{CategorySummary, MonthlySummary, Summary};

#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub config: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ForecastSection {
    pub stats: ForecastStats,
    pub executive_summary: String,
}

#[derive(Debug, Serialize)]
pub struct ReportBag {
    pub business: Business,
    pub period: String,
    pub summary: Summary,
    pub category_breakdown: CategorySummary,
    pub monthly: Vec<MonthlySummary>,
    pub projections: Vec<Projection>,
    pub forecast: Option<ForecastSection>,
    pub charts: Vec<ChartSpec>,
}

/// Combine the computed pieces into the single data bag the renderer expects.
#[allow(clippy::too_many_arguments)]
pub fn assemble_report_data(
    business: Business,
    period: String,
    summary: Summary,
    category_breakdown: CategorySummary,
    monthly: Vec<MonthlySummary>,
    projections: Vec<Projection>,
    forecast: Option<ForecastSection>,
) -> ReportBag {
    let charts = build_charts(&monthly, &category_breakdown);
    ReportBag {
        business,
        period,
        summary,
        category_breakdown,
        monthly,
        projections,
        forecast,
        charts,
    }
}

fn decimals(values: impl Iterator<Item = Decimal>) -> Vec<String> {
    values.map(|v| format!("{:.2}", v)).collect()
}

fn build_charts(monthly: &[MonthlySummary], categories: &CategorySummary) -> Vec<ChartSpec> {
    let mut charts = Vec::new();

    if monthly.iter().any(|m| m.transaction_count > 0) {
        let labels: Vec<&str> = monthly.iter().map(|m| m.label).collect();
        charts.push(ChartSpec {
            title: "Monthly cash flow".to_string(),
            config: json!({
                "type": "bar",
                "data": {
                    "labels": labels,
                    "datasets": [
                        {"label": "Income", "data": decimals(monthly.iter().map(|m| m.income))},
                        {"label": "Expense", "data": decimals(monthly.iter().map(|m| m.expense))},
                    ]
                }
            }),
        });
    }

    if !categories.top_expense.is_empty() {
        let labels: Vec<&str> = categories.top_expense.iter().map(|c| c.name.as_str()).collect();
        charts.push(ChartSpec {
            title: "Top expense categories".to_string(),
            config: json!({
                "type": "doughnut",
                "data": {
                    "labels": labels,
                    "datasets": [
                        {"data": decimals(categories.top_expense.iter().map(|c| c.total))}
                    ]
                }
            }),
        });
    }

    charts
}
