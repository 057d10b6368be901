// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StrategixError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }
}

impl FromStr for CategoryType {
    type Err = StrategixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            other => Err(StrategixError::InvalidField {
                field: "type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statement-line classification of a category. Polarity vs the parent
/// `CategoryType` is intentionally NOT enforced on write; `doctor` reports
/// mismatches instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySubtype {
    OperatingRevenue,
    NonOperatingRevenue,
    Cogs,
    OperatingExpense,
    InterestExpense,
    TaxExpense,
    Other,
}

impl CategorySubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategorySubtype::OperatingRevenue => "operating_revenue",
            CategorySubtype::NonOperatingRevenue => "non_operating_revenue",
            CategorySubtype::Cogs => "cogs",
            CategorySubtype::OperatingExpense => "operating_expense",
            CategorySubtype::InterestExpense => "interest_expense",
            CategorySubtype::TaxExpense => "tax_expense",
            CategorySubtype::Other => "other",
        }
    }

    /// The type this subtype semantically belongs to. `Other` fits either.
    pub fn expected_type(&self) -> Option<CategoryType> {
        match self {
            CategorySubtype::OperatingRevenue | CategorySubtype::NonOperatingRevenue => {
                Some(CategoryType::Income)
            }
            CategorySubtype::Cogs
            | CategorySubtype::OperatingExpense
            | CategorySubtype::InterestExpense
            | CategorySubtype::TaxExpense => Some(CategoryType::Expense),
            CategorySubtype::Other => None,
        }
    }
}

impl FromStr for CategorySubtype {
    type Err = StrategixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operating_revenue" => Ok(CategorySubtype::OperatingRevenue),
            "non_operating_revenue" => Ok(CategorySubtype::NonOperatingRevenue),
            "cogs" => Ok(CategorySubtype::Cogs),
            "operating_expense" => Ok(CategorySubtype::OperatingExpense),
            "interest_expense" => Ok(CategorySubtype::InterestExpense),
            "tax_expense" => Ok(CategorySubtype::TaxExpense),
            "other" => Ok(CategorySubtype::Other),
            other => Err(StrategixError::InvalidField {
                field: "subtype",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for CategorySubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    Planned,
    Completed,
    Cancelled,
}

impl SimulationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationStatus::Planned => "planned",
            SimulationStatus::Completed => "completed",
            SimulationStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for SimulationStatus {
    type Err = StrategixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(SimulationStatus::Planned),
            "completed" => Ok(SimulationStatus::Completed),
            "cancelled" => Ok(SimulationStatus::Cancelled),
            other => Err(StrategixError::InvalidField {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    Optimistic,
    Realistic,
    Pessimistic,
}

impl ScenarioType {
    pub const ALL: [ScenarioType; 3] = [
        ScenarioType::Optimistic,
        ScenarioType::Realistic,
        ScenarioType::Pessimistic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::Optimistic => "optimistic",
            ScenarioType::Realistic => "realistic",
            ScenarioType::Pessimistic => "pessimistic",
        }
    }
}

impl FromStr for ScenarioType {
    type Err = StrategixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "optimistic" => Ok(ScenarioType::Optimistic),
            "realistic" => Ok(ScenarioType::Realistic),
            "pessimistic" => Ok(ScenarioType::Pessimistic),
            other => Err(StrategixError::InvalidField {
                field: "scenario_type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub initial_capital: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub business_id: i64,
    pub name: String,
    pub r#type: CategoryType,
    pub subtype: CategorySubtype,
    pub color: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: String,
    pub end_date: Option<NaiveDate>,
}

/// A single dated financial entry. Read-only input to every aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub id: i64,
    pub business_id: i64,
    pub category_id: Option<i64>,
    pub r#type: CategoryType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub year: i32,
    pub status: SimulationStatus,
    pub recurrence: Option<Recurrence>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: u32,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub net_profit: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionMetrics {
    pub npv: Decimal,
    pub roi: Decimal,
    pub irr: Option<Decimal>,
    pub payback_period: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub id: i64,
    pub business_id: i64,
    pub name: String,
    pub scenario_type: ScenarioType,
    pub base_year: i32,
    pub growth_rate: Decimal,
    pub inflation_rate: Decimal,
    pub discount_rate: Decimal,
    pub initial_investment: Decimal,
    pub base_revenue: Decimal,
    pub base_cost: Decimal,
    pub base_net_profit: Decimal,
    pub yearly_projections: Vec<YearProjection>,
    pub metrics: Option<ProjectionMetrics>,
}

/// Externally produced per-month prediction row, imported as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub id: i64,
    pub forecast_data_id: i64,
    pub month: u32,
    pub year: i32,
    pub forecast_income: Decimal,
    pub forecast_expense: Decimal,
    pub forecast_profit: Decimal,
    pub forecast_margin: Decimal,
    pub confidence_level: Decimal,
    pub method: String,
}
