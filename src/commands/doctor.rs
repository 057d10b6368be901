// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Simulations whose category disappeared
    let mut stmt = conn.prepare(
        "SELECT id, date FROM simulations WHERE category_id IS NULL ORDER BY date",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let d: String = r.get(1)?;
        rows.push(vec!["uncategorized_simulation".into(), format!("#{} {}", id, d)]);
    }

    // 2) Simulation type disagreeing with its category's type
    let mut stmt2 = conn.prepare(
        "SELECT s.id, s.type, c.name, c.type
         FROM simulations s JOIN categories c ON s.category_id=c.id
         WHERE s.type != c.type",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let st: String = r.get(1)?;
        let cname: String = r.get(2)?;
        let ct: String = r.get(3)?;
        rows.push(vec![
            "type_mismatch".into(),
            format!("#{} is {} but '{}' is {}", id, st, cname, ct),
        ]);
    }

    // 3) Subtype polarity oddities (permitted on write, surfaced here)
    let mut stmt3 = conn.prepare(
        "SELECT name, type, subtype FROM categories WHERE
            (type='income' AND subtype IN ('cogs','operating_expense','interest_expense','tax_expense'))
         OR (type='expense' AND subtype IN ('operating_revenue','non_operating_revenue'))",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let name: String = r.get(0)?;
        let t: String = r.get(1)?;
        let st: String = r.get(2)?;
        rows.push(vec![
            "subtype_polarity".into(),
            format!("'{}' is {} with subtype {}", name, t, st),
        ]);
    }

    // 4) Projection batches that are not a full scenario set
    let mut stmt4 = conn.prepare(
        "SELECT business_id, name, COUNT(DISTINCT scenario_type) AS n
         FROM projections GROUP BY business_id, name HAVING n != 3",
    )?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let bid: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let n: i64 = r.get(2)?;
        rows.push(vec![
            "partial_projection_batch".into(),
            format!("business {} '{}' has {}/3 scenarios", bid, name, n),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
