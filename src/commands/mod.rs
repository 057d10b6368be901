// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod businesses;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod forecasts;
pub mod projections;
pub mod reports;
pub mod simulations;
