//! Filter stages
//!
//! Stages run in a fixed order, each on the output of the previous one:
//! people (department, employee, type), then dates, then merchant /
//! category / spend program, then the memo search.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use spendview_domain::{FilterSpec, MonthSelection, UnifiedTransaction};

/// Apply every filter in `spec`, preserving input order.
pub fn filter_rows(rows: &[UnifiedTransaction], spec: &FilterSpec) -> Vec<UnifiedTransaction> {
    let mut narrowed: Vec<&UnifiedTransaction> = rows.iter().collect();
    narrowed.retain(|row| people_stage(row, spec));
    narrowed.retain(|row| date_stage(row, spec));
    narrowed.retain(|row| classification_stage(row, spec));
    narrowed.retain(|row| memo_stage(row, spec));
    narrowed.into_iter().cloned().collect()
}

fn people_stage(row: &UnifiedTransaction, spec: &FilterSpec) -> bool {
    spec.department.admits(&row.department)
        && spec.employee.admits(&row.employee_name)
        && spec.transaction_type.admits_by(|selected| row.kind.matches(selected))
}

/// A selected month wins over the day range entirely.
fn date_stage(row: &UnifiedTransaction, spec: &FilterSpec) -> bool {
    if spec.month != MonthSelection::All {
        return spec.month.contains(&row.date);
    }
    if let Some(from) = spec.date_from {
        if row.date < start_of_day(from) {
            return false;
        }
    }
    if let Some(to) = spec.date_to {
        if row.date > end_of_day(to) {
            return false;
        }
    }
    true
}

fn classification_stage(row: &UnifiedTransaction, spec: &FilterSpec) -> bool {
    spec.merchant.admits(&row.merchant)
        && spec.category.admits(&row.accounting_category)
        && spec.spend_program.admits(&row.spend_program_name)
}

fn memo_stage(row: &UnifiedTransaction, spec: &FilterSpec) -> bool {
    match spec.memo_query.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => {
            row.memo.to_lowercase().contains(&query.to_lowercase())
        }
        _ => true,
    }
}

pub(crate) fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 on `day`.
pub(crate) fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    day.and_time(last_milli).and_utc()
}

#[cfg(test)]
mod tests {
    use spendview_domain::{Selection, TransactionKind};

    use super::*;
    use crate::engine::test_rows::row;

    #[test]
    fn multi_select_keeps_relative_order() {
        let rows = vec![
            row("a", "2025-03-01T10:00:00Z", 10.0, "Engineering"),
            row("b", "2025-03-02T10:00:00Z", 20.0, "Sales"),
            row("c", "2025-03-03T10:00:00Z", 30.0, "Engineering"),
        ];
        let spec = FilterSpec {
            department: Selection::any_of(["Engineering"]),
            ..Default::default()
        };
        let ids: Vec<String> = filter_rows(&rows, &spec).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn type_filter_matches_kind_keyword() {
        let mut reimbursement = row("r", "2025-03-01T10:00:00Z", 5.0, "Sales");
        reimbursement.kind = TransactionKind::Reimbursement;
        let rows = vec![row("t", "2025-03-01T10:00:00Z", 5.0, "Sales"), reimbursement];

        let spec = FilterSpec { transaction_type: Selection::only("reimbursement"), ..Default::default() };
        let filtered = filter_rows(&rows, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "r");
    }

    #[test]
    fn type_filter_accepts_display_labels() {
        let mut reimbursement = row("r", "2025-03-01T10:00:00Z", 5.0, "Sales");
        reimbursement.kind = TransactionKind::Reimbursement;
        let rows = vec![row("t", "2025-03-01T10:00:00Z", 5.0, "Sales"), reimbursement];

        let single = FilterSpec {
            transaction_type: Selection::only("Transaction"),
            ..Default::default()
        };
        let ids: Vec<String> = filter_rows(&rows, &single).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["t"]);

        let multi = FilterSpec {
            transaction_type: Selection::any_of(["reimbursement", "TRANSACTION"]),
            ..Default::default()
        };
        assert_eq!(filter_rows(&rows, &multi).len(), 2);

        let unknown = FilterSpec {
            transaction_type: Selection::only("Refund"),
            ..Default::default()
        };
        assert!(filter_rows(&rows, &unknown).is_empty());
    }

    #[test]
    fn month_overrides_date_range() {
        let rows = vec![
            row("feb", "2025-02-28T23:00:00Z", 1.0, "Ops"),
            row("mar", "2025-03-15T12:00:00Z", 1.0, "Ops"),
        ];
        let month = FilterSpec { month: "2025-03".parse().unwrap(), ..Default::default() };
        let with_range = FilterSpec {
            date_from: NaiveDate::from_ymd_opt(2025, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2025, 2, 1),
            ..month.clone()
        };

        assert_eq!(filter_rows(&rows, &month), filter_rows(&rows, &with_range));
        assert_eq!(filter_rows(&rows, &with_range)[0].id, "mar");
    }

    #[test]
    fn date_bounds_are_inclusive_whole_days() {
        let rows = vec![
            row("before", "2025-03-09T23:59:59Z", 1.0, "Ops"),
            row("first", "2025-03-10T00:00:00Z", 1.0, "Ops"),
            row("last", "2025-03-12T23:59:59.999Z", 1.0, "Ops"),
            row("after", "2025-03-13T00:00:00Z", 1.0, "Ops"),
        ];
        let spec = FilterSpec {
            date_from: NaiveDate::from_ymd_opt(2025, 3, 10),
            date_to: NaiveDate::from_ymd_opt(2025, 3, 12),
            ..Default::default()
        };
        let ids: Vec<String> = filter_rows(&rows, &spec).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["first", "last"]);
    }

    #[test]
    fn memo_search_is_case_insensitive_substring() {
        let mut lunch = row("l", "2025-03-01T10:00:00Z", 1.0, "Ops");
        lunch.memo = "Team LUNCH with customer".into();
        let rows = vec![lunch, row("x", "2025-03-01T10:00:00Z", 1.0, "Ops")];

        let spec = FilterSpec { memo_query: Some("  lunch ".into()), ..Default::default() };
        assert_eq!(filter_rows(&rows, &spec).len(), 1);

        let blank = FilterSpec { memo_query: Some("   ".into()), ..Default::default() };
        assert_eq!(filter_rows(&rows, &blank).len(), 2);
    }

    #[test]
    fn classification_filters_use_normalized_fields() {
        let mut tagged = row("t", "2025-03-01T10:00:00Z", 1.0, "Ops");
        tagged.accounting_category = "Meals".into();
        tagged.spend_program_name = "Team Meals".into();
        let rows = vec![tagged, row("u", "2025-03-01T10:00:00Z", 1.0, "Ops")];

        let spec = FilterSpec {
            category: Selection::only("Meals"),
            spend_program: Selection::any_of(["Team Meals", "Travel"]),
            ..Default::default()
        };
        assert_eq!(filter_rows(&rows, &spec).len(), 1);
    }
}
