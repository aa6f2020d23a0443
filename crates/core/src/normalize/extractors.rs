//! Per-field extraction from raw provider records
//!
//! Each function owns its default so the mapping code stays flat and every
//! rule can be tested on its own.

use once_cell::sync::Lazy;
use regex::Regex;
use spendview_domain::constants::{
    DEPARTMENT_FIELD_NAME, GL_ACCOUNT_REMOTE_TYPE, UNCATEGORIZED, UNKNOWN,
};
use spendview_domain::{RawCardTransaction, RawFieldSelection, RawReimbursement};

/// Leading "Operating expense(s)" plus a separator, e.g. `Operating Expenses: `.
static OPERATING_EXPENSE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*operating\s+expenses?\s*[:\-–—>/|]+\s*")
        .expect("OPERATING_EXPENSE_PREFIX should compile - this is a bug")
});

/// First non-blank value, or `fallback`.
pub fn text_or(candidates: &[Option<&str>], fallback: &str) -> String {
    candidates
        .iter()
        .flatten()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Drop a redundant "Operating expense" prefix; blank results become
/// `Uncategorized`.
pub fn strip_operating_expense_prefix(category: &str) -> String {
    let stripped = OPERATING_EXPENSE_PREFIX.replace(category, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        stripped.to_string()
    }
}

/// `"First Last"` from the card holder, or `Unknown`.
pub fn extract_card_holder_name(raw: &RawCardTransaction) -> String {
    let Some(holder) = raw.card_holder.as_ref() else {
        return UNKNOWN.to_string();
    };
    let parts: Vec<&str> = [holder.first_name.as_deref(), holder.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        UNKNOWN.to_string()
    } else {
        parts.join(" ")
    }
}

/// `"City, State, Country"` from whichever parts are present, or `Unknown`.
pub fn extract_merchant_location(raw: &RawCardTransaction) -> String {
    let Some(location) = raw.merchant_location.as_ref() else {
        return UNKNOWN.to_string();
    };
    let parts: Vec<&str> =
        [location.city.as_deref(), location.state.as_deref(), location.country.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
    if parts.is_empty() {
        UNKNOWN.to_string()
    } else {
        parts.join(", ")
    }
}

/// GL account of a card transaction: the first accounting tag whose remote
/// type marks it as a GL account.
pub fn extract_gl_account(raw: &RawCardTransaction) -> String {
    let gl = raw.accounting_categories.iter().flatten().find_map(|category| {
        let is_gl = category
            .tracking_category_remote_type
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case(GL_ACCOUNT_REMOTE_TYPE));
        if is_gl {
            category.category_name.as_deref()
        } else {
            None
        }
    });

    gl.map(strip_operating_expense_prefix).unwrap_or_else(|| UNCATEGORIZED.to_string())
}

fn selection_field_name(selection: &RawFieldSelection) -> Option<&str> {
    selection.category_info.as_ref().and_then(|info| info.name.as_deref())
}

fn selection_field_type(selection: &RawFieldSelection) -> Option<&str> {
    selection
        .category_info
        .as_ref()
        .and_then(|info| info.kind.as_deref())
        .or(selection.kind.as_deref())
}

/// Department of a reimbursement: the selection whose field is named
/// `Department`.
pub fn extract_department(raw: &RawReimbursement) -> String {
    raw.accounting_field_selections
        .iter()
        .flatten()
        .filter(|selection| {
            selection_field_name(selection)
                .is_some_and(|name| name.trim().eq_ignore_ascii_case(DEPARTMENT_FIELD_NAME))
        })
        .find_map(|selection| selection.name.as_deref().map(str::trim).filter(|n| !n.is_empty()))
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// GL account of a reimbursement, read from its GL-typed field selection.
pub fn extract_reimbursement_gl_account(raw: &RawReimbursement) -> String {
    raw.accounting_field_selections
        .iter()
        .flatten()
        .filter(|selection| {
            selection_field_type(selection)
                .is_some_and(|kind| kind.eq_ignore_ascii_case(GL_ACCOUNT_REMOTE_TYPE))
        })
        .find_map(|selection| selection.name.as_deref())
        .map(strip_operating_expense_prefix)
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

/// Start location, else end location, else `Unknown`.
pub fn extract_trip_location(raw: &RawReimbursement) -> String {
    text_or(&[raw.start_location.as_deref(), raw.end_location.as_deref()], UNKNOWN)
}
