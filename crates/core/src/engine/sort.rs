//! Stable column sort

use std::cmp::Ordering;

use spendview_domain::{SortColumn, SortDirection, SortSpec, UnifiedTransaction};

/// Sort in place. Ties keep their current relative order in both directions.
pub fn sort_rows(rows: &mut [UnifiedTransaction], sort: &SortSpec) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, sort.column);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &UnifiedTransaction, b: &UnifiedTransaction, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Date => a.date.cmp(&b.date),
        SortColumn::Amount => a.amount.total_cmp(&b.amount),
        SortColumn::Employee => compare_text(&a.employee_name, &b.employee_name),
        SortColumn::Department => compare_text(&a.department, &b.department),
        SortColumn::Merchant => compare_text(&a.merchant, &b.merchant),
        SortColumn::Location => compare_text(&a.location, &b.location),
        SortColumn::Type => compare_text(a.kind.label(), b.kind.label()),
        SortColumn::Category => compare_text(&a.accounting_category, &b.accounting_category),
        SortColumn::Memo => compare_text(&a.memo, &b.memo),
        SortColumn::SpendProgram => compare_text(&a.spend_program_name, &b.spend_program_name),
        SortColumn::State => compare_text(&a.state, &b.state),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
