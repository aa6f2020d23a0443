//! Filter, sort and aggregate engine
//!
//! Pure functions over already-normalised rows. Nothing here reads a clock;
//! "current year" and "current month" come from the instant handed to
//! [`FilterEngine::at`].

pub mod aggregates;
pub mod filters;
pub mod options;
pub mod sort;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use spendview_domain::{FilterSpec, Receipt, SortSpec, UnifiedTransaction};

pub use self::aggregates::{
    distinct_receipt_count, monthly_totals, summarize, top_departments, DepartmentTotal,
    MonthTotal, Summary,
};
pub use self::filters::filter_rows;
pub use self::options::{month_options, FilterOptions, MonthOption, TypeOption};
pub use self::sort::sort_rows;

/// Visible rows plus everything computed from them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredView {
    pub rows: Vec<UnifiedTransaction>,
    pub summary: Summary,
    pub departments: Vec<DepartmentTotal>,
    pub monthly: Vec<MonthTotal>,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterEngine {
    receipt_count: usize,
    now: DateTime<Utc>,
}

impl FilterEngine {
    /// `receipts` is the unfiltered reference list; its distinct count is
    /// reported as-is regardless of filters.
    pub fn new(receipts: &[Receipt]) -> Self {
        Self { receipt_count: distinct_receipt_count(receipts), now: Utc::now() }
    }

    /// Pin the reference instant used for year and month totals.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn apply(
        &self,
        rows: &[UnifiedTransaction],
        filters: &FilterSpec,
        sort: &SortSpec,
    ) -> FilteredView {
        let mut visible = filter_rows(rows, filters);
        sort_rows(&mut visible, sort);

        FilteredView {
            summary: summarize(&visible, self.receipt_count, self.now),
            departments: top_departments(&visible),
            monthly: monthly_totals(&visible, self.now.year()),
            rows: visible,
        }
    }

    pub fn options(&self, rows: &[UnifiedTransaction]) -> FilterOptions {
        FilterOptions::collect(rows, self.now.year())
    }
}


#[cfg(test)]
mod tests {
    use spendview_domain::{Selection, SortColumn, SortDirection};

    use super::test_rows::{instant, row};
    use super::*;

    #[test]
    fn apply_filters_sorts_and_aggregates_the_visible_rows() {
        let rows = vec![
            row("t1", "2025-03-01T10:00:00Z", 45.67, "Engineering"),
            row("r1", "2025-03-02T10:00:00Z", 120.0, "Sales"),
            row("t2", "2025-02-01T10:00:00Z", 10.0, "Engineering"),
        ];
        let filters =
            FilterSpec { department: Selection::only("Engineering"), ..Default::default() };
        let sort = SortSpec::new(SortColumn::Amount, SortDirection::Asc);

        let view = FilterEngine::new(&[]).at(instant("2025-03-15T00:00:00Z")).apply(&rows, &filters, &sort);

        let ids: Vec<_> = view.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["t2", "t1"]);
        assert_eq!(view.summary.row_count, 2);
        assert_eq!(view.summary.month_total, 45.67);
        assert_eq!(view.departments.len(), 1);
        assert_eq!(view.monthly[1].total, 10.0);
    }
}
