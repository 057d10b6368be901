// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::forecast;
use crate::utils::{business_arg, fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("import", sub)) => {
            let business_id = business_arg(conn, sub)?;
            let path = sub.get_one::<String>("path").unwrap();
            let method = sub.get_one::<String>("method").unwrap();
            let n = forecast::import_csv(conn, business_id, method, path)?;
            println!("Imported {} forecast rows from {} ({})", n, path, method);
        }
        Some(("stats", sub)) => stats(conn, sub)?,
        Some(("summary", sub)) => {
            let business_id = business_arg(conn, sub)?;
            let period = sub
                .get_one::<String>("period")
                .cloned()
                .unwrap_or_else(|| "mendatang".to_string());
            let rows = forecast::load_results(conn, business_id)?;
            let s = forecast::compute_statistics(&rows);
            println!("{}", forecast::executive_summary(&s, &period));
        }
        _ => {}
    }
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = business_arg(conn, sub)?;
    let rows = forecast::load_results(conn, business_id)?;
    let s = forecast::compute_statistics(&rows);
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let data = vec![
            vec!["Rows".into(), rows.len().to_string()],
            vec!["Total income".into(), fmt_money(&s.total_income)],
            vec!["Total expense".into(), fmt_money(&s.total_expense)],
            vec!["Total profit".into(), fmt_money(&s.total_profit)],
            vec!["Avg margin %".into(), format!("{:.2}", s.avg_margin)],
            vec!["Avg confidence %".into(), format!("{:.2}", s.avg_confidence)],
            vec!["Growth %".into(), format!("{:.2}", s.growth_rate)],
            vec!["Peak income month".into(), s.highest_income_month.clone()],
            vec!["Peak profit month".into(), s.highest_profit_month.clone()],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], data));
    }
    Ok(())
}
