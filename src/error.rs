// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Domain errors raised by the core modules. Command handlers map these onto
/// user-facing messages; everything else travels as `anyhow::Error` with
/// context, as in the rest of the CLI.
#[derive(Debug, Error)]
pub enum StrategixError {
    #[error("business '{0}' not found")]
    BusinessNotFound(String),

    #[error("category '{0}' not found for this business")]
    CategoryNotFound(String),

    #[error("no completed simulations recorded for base year {0}")]
    MissingBaseline(i32),

    #[error("projection {0} not found")]
    ProjectionNotFound(i64),

    #[error("invalid {field} '{value}'")]
    InvalidField { field: &'static str, value: String },

    #[error("amount must be non-negative, got {0}")]
    NegativeAmount(rust_decimal::Decimal),

    #[error("simulation type '{simulation}' does not match category type '{category}'")]
    TypeMismatch {
        simulation: String,
        category: String,
    },

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}
