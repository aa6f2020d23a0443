//! Summary totals and rollups over the filtered rows
//!
//! Rows with a non-finite amount contribute nothing to any sum.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use spendview_domain::constants::TOP_DEPARTMENTS;
use spendview_domain::{Receipt, UnifiedTransaction};

const MONTH_ABBREVIATIONS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Headline numbers for the current view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub ytd_total: f64,
    pub month_total: f64,
    pub row_count: usize,
    pub reimbursement_count: usize,
    /// Distinct receipts in the whole dataset, independent of filters
    pub receipt_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentTotal {
    pub department: String,
    pub total: f64,
    /// Percentage of the largest department total (0-100)
    pub bar_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTotal {
    /// `YYYY-MM`
    pub month: String,
    pub label: &'static str,
    pub total: f64,
}

fn usable(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

/// Distinct receipts by id; entries without an id each count once.
pub fn distinct_receipt_count(receipts: &[Receipt]) -> usize {
    let mut seen = HashSet::new();
    receipts
        .iter()
        .filter(|receipt| match receipt.id.as_deref() {
            Some(id) => seen.insert(id),
            None => true,
        })
        .count()
}

pub fn summarize(
    rows: &[UnifiedTransaction],
    receipt_count: usize,
    now: DateTime<Utc>,
) -> Summary {
    let (year, month) = (now.year(), now.month());
    let mut summary = Summary { row_count: rows.len(), receipt_count, ..Default::default() };

    for row in rows {
        if row.is_reimbursement() {
            summary.reimbursement_count += 1;
        }
        if row.date.year() == year {
            let amount = usable(row.amount);
            summary.ytd_total += amount;
            if row.date.month() == month {
                summary.month_total += amount;
            }
        }
    }

    summary
}

/// Top departments by total spend, largest first, with bar widths relative
/// to the largest.
pub fn top_departments(rows: &[UnifiedTransaction]) -> Vec<DepartmentTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for row in rows {
        *totals.entry(row.department.as_str()).or_insert(0.0) += usable(row.amount);
    }

    let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(TOP_DEPARTMENTS);

    let max = ranked.first().map(|(_, total)| *total).unwrap_or(0.0);
    ranked
        .into_iter()
        .map(|(department, total)| DepartmentTotal {
            department: department.to_string(),
            total,
            bar_width: if max > 0.0 { (total / max * 100.0).max(0.0) } else { 0.0 },
        })
        .collect()
}

/// Spend per calendar month of `year`; always twelve entries.
pub fn monthly_totals(rows: &[UnifiedTransaction], year: i32) -> Vec<MonthTotal> {
    let mut totals = [0.0_f64; 12];
    for row in rows.iter().filter(|row| row.date.year() == year) {
        totals[row.date.month0() as usize] += usable(row.amount);
    }

    totals
        .into_iter()
        .enumerate()
        .map(|(index, total)| MonthTotal {
            month: format!("{year:04}-{:02}", index + 1),
            label: MONTH_ABBREVIATIONS[index],
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use spendview_domain::TransactionKind;

    use super::*;
    use crate::engine::test_rows::{instant, row};

    #[test]
    fn summary_counts_year_and_month() {
        let mut reimbursement = row("r", "2025-03-20T00:00:00Z", 100.0, "Sales");
        reimbursement.kind = TransactionKind::Reimbursement;
        let rows = vec![
            row("a", "2025-03-01T00:00:00Z", 10.0, "Ops"),
            row("b", "2025-01-15T00:00:00Z", 5.5, "Ops"),
            row("c", "2024-12-31T23:59:59Z", 1000.0, "Ops"),
            row("nan", "2025-03-02T00:00:00Z", f64::NAN, "Ops"),
            reimbursement,
        ];

        let summary = summarize(&rows, 7, instant("2025-03-25T12:00:00Z"));
        assert_eq!(summary.ytd_total, 115.5);
        assert_eq!(summary.month_total, 110.0);
        assert_eq!(summary.row_count, 5);
        assert_eq!(summary.reimbursement_count, 1);
        assert_eq!(summary.receipt_count, 7);
    }

    #[test]
    fn receipts_are_counted_by_distinct_id() {
        let receipts: Vec<Receipt> = serde_json::from_value(serde_json::json!([
            { "id": "a" }, { "id": "a" }, { "id": "b" }, {}
        ]))
        .unwrap();
        assert_eq!(distinct_receipt_count(&receipts), 3);
    }

    #[test]
    fn top_departments_are_ranked_truncated_and_scaled() {
        let mut rows: Vec<UnifiedTransaction> = (0..12)
            .map(|i| row(&format!("d{i}"), "2025-03-01T00:00:00Z", (i + 1) as f64, &format!("Dept {i:02}")))
            .collect();
        rows.push(row("extra", "2025-03-01T00:00:00Z", 12.0, "Dept 11"));

        let top = top_departments(&rows);
        assert_eq!(top.len(), TOP_DEPARTMENTS);
        assert_eq!(top[0].department, "Dept 11");
        assert_eq!(top[0].total, 24.0);
        assert_eq!(top[0].bar_width, 100.0);
        assert_eq!(top[1].department, "Dept 10");
        assert_eq!(top[1].bar_width, 11.0 / 24.0 * 100.0);
        assert!(top.iter().all(|d| d.department != "Dept 00" && d.department != "Dept 01"));
    }

    #[test]
    fn monthly_rollup_always_has_twelve_months() {
        let rows = vec![
            row("a", "2025-03-01T00:00:00Z", 10.0, "Ops"),
            row("b", "2025-03-31T00:00:00Z", 5.0, "Ops"),
            row("c", "2024-03-01T00:00:00Z", 99.0, "Ops"),
        ];
        let months = monthly_totals(&rows, 2025);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, "2025-01");
        assert_eq!(months[0].total, 0.0);
        assert_eq!(months[2].label, "Mar");
        assert_eq!(months[2].total, 15.0);
        assert_eq!(months[11].month, "2025-12");
    }

    #[test]
    fn empty_input_yields_zeroes() {
        assert!(top_departments(&[]).is_empty());
        assert_eq!(summarize(&[], 0, instant("2025-03-01T00:00:00Z")), Summary::default());
        assert!(monthly_totals(&[], 2025).iter().all(|m| m.total == 0.0));
    }
}
