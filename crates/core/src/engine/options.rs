//! Choices offered by the filter controls

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use spendview_domain::constants::UNKNOWN;
use spendview_domain::{TransactionKind, UnifiedTransaction};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    /// `YYYY-MM`
    pub value: String,
    /// e.g. `March 2025`
    pub label: String,
}

/// A transaction type as the filter expects it (`value`) and as the table
/// shows it (`label`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeOption {
    pub value: String,
    pub label: String,
}

/// Distinct, sorted values per filterable field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub departments: Vec<String>,
    pub employees: Vec<String>,
    pub merchants: Vec<String>,
    pub categories: Vec<String>,
    pub spend_programs: Vec<String>,
    pub types: Vec<TypeOption>,
    pub months: Vec<MonthOption>,
}

impl FilterOptions {
    /// Options drawn from the full (unfiltered) row set.
    pub fn collect(rows: &[UnifiedTransaction], year: i32) -> Self {
        Self {
            departments: distinct(rows, |row| &row.department),
            employees: distinct(rows, |row| &row.employee_name),
            merchants: distinct(rows, |row| &row.merchant),
            categories: distinct(rows, |row| &row.accounting_category),
            spend_programs: distinct(rows, |row| &row.spend_program_name),
            types: type_options(rows),
            months: month_options(year),
        }
    }
}

fn distinct<F>(rows: &[UnifiedTransaction], field: F) -> Vec<String>
where
    F: Fn(&UnifiedTransaction) -> &String,
{
    rows.iter()
        .map(field)
        .filter(|value| value.as_str() != UNKNOWN)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn type_options(rows: &[UnifiedTransaction]) -> Vec<TypeOption> {
    rows.iter()
        .map(|row| row.kind)
        .collect::<BTreeSet<TransactionKind>>()
        .into_iter()
        .map(|kind| TypeOption { value: kind.to_string(), label: kind.label().to_string() })
        .collect()
}

pub fn month_options(year: i32) -> Vec<MonthOption> {
    (1..=12u32)
        .filter(|month| NaiveDate::from_ymd_opt(year, *month, 1).is_some())
        .map(|month| MonthOption {
            value: format!("{year:04}-{month:02}"),
            label: format!("{} {year}", MONTH_NAMES[(month - 1) as usize]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_rows::row;

    #[test]
    fn options_are_distinct_sorted_and_skip_unknown() {
        let mut rows = vec![
            row("a", "2025-03-01T00:00:00Z", 1.0, "Sales"),
            row("b", "2025-03-01T00:00:00Z", 1.0, "Engineering"),
            row("c", "2025-03-01T00:00:00Z", 1.0, "Sales"),
            row("d", "2025-03-01T00:00:00Z", 1.0, UNKNOWN),
        ];
        rows[0].merchant = "Zed's".into();
        rows[1].merchant = "Acme".into();

        let options = FilterOptions::collect(&rows, 2025);
        assert_eq!(options.departments, ["Engineering", "Sales"]);
        assert_eq!(options.merchants, ["Acme", "Zed's"]);
        assert_eq!(options.months.len(), 12);
    }

    #[test]
    fn type_options_pair_keywords_with_labels() {
        let mut rows = vec![
            row("a", "2025-03-01T00:00:00Z", 1.0, "Sales"),
            row("b", "2025-03-01T00:00:00Z", 1.0, "Sales"),
        ];
        rows[1].kind = TransactionKind::Reimbursement;

        let options = FilterOptions::collect(&rows, 2025);
        let pairs: Vec<(&str, &str)> =
            options.types.iter().map(|t| (t.value.as_str(), t.label.as_str())).collect();
        assert_eq!(pairs, [("card_transaction", "Transaction"), ("reimbursement", "Reimbursement")]);
    }

    #[test]
    fn month_options_cover_the_year() {
        let months = month_options(2025);
        assert_eq!(months[0], MonthOption { value: "2025-01".into(), label: "January 2025".into() });
        assert_eq!(months[11].value, "2025-12");
        assert_eq!(months[11].label, "December 2025");
    }
}
