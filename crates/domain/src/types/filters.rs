//! Filter and sort specifications
//!
//! A field filter is either a single selector (`"all"` or one exact value) or
//! a set of accepted values. Both modes are evaluated uniformly through
//! [`Selection::admits`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::FILTER_ALL;
use crate::impl_domain_keyword_conversions;

/* -------------------------------------------------------------------------- */
/* Field selections */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    /// `"all"` or one exact value.
    Single(String),
    /// Any of the listed values; an empty set admits everything.
    Multi(BTreeSet<String>),
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}

impl Selection {
    pub fn all() -> Self {
        Self::Single(FILTER_ALL.to_string())
    }

    pub fn only(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multi(values.into_iter().map(Into::into).collect())
    }

    /// True when this selection does not narrow anything.
    pub fn is_unrestricted(&self) -> bool {
        match self {
            Self::Single(value) => value == FILTER_ALL,
            Self::Multi(values) => values.is_empty(),
        }
    }

    /// Whether a row whose field equals `value` passes this selection.
    pub fn admits(&self, value: &str) -> bool {
        self.admits_by(|selected| selected == value)
    }

    /// Like [`admits`](Self::admits), with `matches` deciding whether a
    /// selected value names the row's field.
    pub fn admits_by(&self, matches: impl Fn(&str) -> bool) -> bool {
        match self {
            Self::Single(selected) => selected == FILTER_ALL || matches(selected),
            Self::Multi(selected) => selected.is_empty() || selected.iter().any(|s| matches(s)),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Month selection */
/* -------------------------------------------------------------------------- */

/// `"all"` or one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MonthSelection {
    #[default]
    All,
    Month { year: i32, month: u32 },
}

impl MonthSelection {
    /// Whether `instant` falls inside the selected month (UTC).
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Month { year, month } => instant.year() == *year && instant.month() == *month,
        }
    }
}

impl FromStr for MonthSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(FILTER_ALL) {
            return Ok(Self::All);
        }

        let invalid = || format!("Invalid month: {s} (expected YYYY-MM)");
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;

        Ok(Self::Month { year, month })
    }
}

impl fmt::Display for MonthSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{FILTER_ALL}"),
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
        }
    }
}

impl TryFrom<String> for MonthSelection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthSelection> for String {
    fn from(value: MonthSelection) -> Self {
        value.to_string()
    }
}

/* -------------------------------------------------------------------------- */
/* Filter spec */
/* -------------------------------------------------------------------------- */

/// The user's current filter choices.
///
/// `date_from`/`date_to` are inclusive calendar days and are ignored while a
/// specific `month` is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSpec {
    pub department: Selection,
    pub employee: Selection,
    /// Matched against [`TransactionKind`](super::TransactionKind) keywords
    /// or display labels.
    #[serde(rename = "type")]
    pub transaction_type: Selection,
    pub merchant: Selection,
    pub category: Selection,
    pub spend_program: Selection,
    pub month: MonthSelection,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub memo_query: Option<String>,
}

/* -------------------------------------------------------------------------- */
/* Sorting */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Date,
    Amount,
    Employee,
    Department,
    Merchant,
    Location,
    Type,
    Category,
    Memo,
    SpendProgram,
    State,
}

impl_domain_keyword_conversions!(SortColumn {
    Date => "date",
    Amount => "amount",
    Employee => "employee",
    Department => "department",
    Merchant => "merchant",
    Location => "location",
    Type => "type",
    Category => "category",
    Memo => "memo",
    SpendProgram => "spendprogram",
    State => "state",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl_domain_keyword_conversions!(SortDirection {
    Asc => "asc",
    Desc => "desc",
});

/// Column plus direction; defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_multi_selection_admit_uniformly() {
        assert!(Selection::all().admits("Engineering"));
        assert!(Selection::only("Engineering").admits("Engineering"));
        assert!(!Selection::only("Engineering").admits("Sales"));

        assert!(Selection::Multi(BTreeSet::new()).admits("Sales"));
        let multi = Selection::any_of(["Engineering", "Sales"]);
        assert!(multi.admits("Sales"));
        assert!(!multi.admits("Marketing"));
        assert!(!multi.is_unrestricted());
    }

    #[test]
    fn selection_deserializes_from_string_or_array() {
        let single: Selection = serde_json::from_str(r#""all""#).unwrap();
        assert!(single.is_unrestricted());

        let multi: Selection = serde_json::from_str(r#"["Engineering"]"#).unwrap();
        assert_eq!(multi, Selection::any_of(["Engineering"]));
    }

    #[test]
    fn month_selection_parses_and_displays() {
        assert_eq!("all".parse::<MonthSelection>().unwrap(), MonthSelection::All);
        let march: MonthSelection = "2025-03".parse().unwrap();
        assert_eq!(march, MonthSelection::Month { year: 2025, month: 3 });
        assert_eq!(march.to_string(), "2025-03");

        assert!("2025-13".parse::<MonthSelection>().is_err());
        assert!("2025-3".parse::<MonthSelection>().is_err());
        assert!("March".parse::<MonthSelection>().is_err());
    }

    #[test]
    fn month_selection_matches_calendar_month() {
        let march: MonthSelection = "2025-03".parse().unwrap();
        let inside = DateTime::parse_from_rfc3339("2025-03-31T23:59:59Z").unwrap().with_timezone(&Utc);
        let outside = DateTime::parse_from_rfc3339("2025-04-01T00:00:00Z").unwrap().with_timezone(&Utc);
        assert!(march.contains(&inside));
        assert!(!march.contains(&outside));
        assert!(MonthSelection::All.contains(&outside));
    }

    #[test]
    fn filter_spec_defaults_to_everything() {
        let spec: FilterSpec = serde_json::from_str(r#"{"month": "2025-03"}"#).unwrap();
        assert!(spec.department.is_unrestricted());
        assert!(spec.transaction_type.is_unrestricted());
        assert_eq!(spec.month, MonthSelection::Month { year: 2025, month: 3 });
        assert!(spec.date_from.is_none());
    }

    #[test]
    fn sort_spec_defaults_to_date_descending() {
        let sort = SortSpec::default();
        assert_eq!(sort.column, SortColumn::Date);
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!("spendProgram".parse::<SortColumn>().unwrap(), SortColumn::SpendProgram);
    }
}
