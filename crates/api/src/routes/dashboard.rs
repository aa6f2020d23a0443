//! Filtered dashboard view and CSV export (session required)

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use spendview_core::DashboardView;
use spendview_domain::{FilterSpec, MonthSelection, Selection, SortColumn, SortDirection, SortSpec};

use super::auth::current_session;
use super::AppState;
use crate::error::ApiError;
use crate::utils::logging::execute_logged;

/// Filter and sort parameters shared by the view and the export.
///
/// Singular keys carry `all` or one exact value; plural keys carry a
/// comma-separated set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub department: Option<String>,
    pub departments: Option<String>,
    pub employee: Option<String>,
    pub employees: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub types: Option<String>,
    pub merchant: Option<String>,
    pub merchants: Option<String>,
    pub category: Option<String>,
    pub categories: Option<String>,
    pub spend_program: Option<String>,
    pub spend_programs: Option<String>,
    pub month: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub memo: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    /// Fetch from the provider instead of reusing the cached dataset.
    #[serde(default)]
    pub refresh: bool,
}

fn selection(single: Option<String>, multi: Option<String>) -> Selection {
    match (multi, single) {
        (Some(set), _) => Selection::any_of(
            set.split(',').map(str::trim).filter(|v| !v.is_empty()).map(str::to_string),
        ),
        (None, Some(value)) if !value.trim().is_empty() => Selection::only(value.trim()),
        _ => Selection::all(),
    }
}

fn date(key: &str, value: Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some).map_err(|_| {
            ApiError::BadRequest(format!("Invalid {key}: {raw} (expected YYYY-MM-DD)"))
        }),
    }
}

impl DashboardQuery {
    /// # Errors
    /// `ApiError::BadRequest` for an unparseable month, date, sort column or
    /// direction.
    pub fn into_specs(self) -> Result<(FilterSpec, SortSpec), ApiError> {
        let month = match self.month.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            None => MonthSelection::All,
            Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
        };

        let filters = FilterSpec {
            department: selection(self.department, self.departments),
            employee: selection(self.employee, self.employees),
            transaction_type: selection(self.transaction_type, self.types),
            merchant: selection(self.merchant, self.merchants),
            category: selection(self.category, self.categories),
            spend_program: selection(self.spend_program, self.spend_programs),
            month,
            date_from: date("dateFrom", self.date_from)?,
            date_to: date("dateTo", self.date_to)?,
            memo_query: self.memo.filter(|m| !m.trim().is_empty()),
        };

        let column = match self.sort.as_deref().filter(|v| !v.trim().is_empty()) {
            None => SortColumn::default(),
            Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
        };
        let direction = match self.dir.as_deref().filter(|v| !v.trim().is_empty()) {
            None => SortDirection::default(),
            Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
        };

        Ok((filters, SortSpec::new(column, direction)))
    }
}

/// `GET /api/dashboard`
pub async fn view(
    State(ctx): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    current_session(&ctx, &headers).ok_or(ApiError::Unauthorized)?;
    let refresh = query.refresh;
    let (filters, sort) = query.into_specs()?;

    let view = execute_logged("dashboard::view", || async {
        let service = ctx.dashboard()?;
        if refresh {
            service.refreshed_view(&filters, &sort).await
        } else {
            service.view(&filters, &sort).await
        }
    })
    .await?;
    Ok(Json(view))
}

/// `GET /api/export`
pub async fn export(
    State(ctx): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, ApiError> {
    current_session(&ctx, &headers).ok_or(ApiError::Unauthorized)?;
    let (filters, sort) = query.into_specs()?;

    let csv = execute_logged("dashboard::export", || async {
        ctx.dashboard()?.export_csv(&filters, &sort).await
    })
    .await?;

    let disposition =
        format!("attachment; filename=\"expenses-{}.csv\"", Utc::now().format("%Y-%m-%d"));
    Ok((
        [(CONTENT_TYPE, "text/csv; charset=utf-8".to_string()), (CONTENT_DISPOSITION, disposition)],
        csv,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> DashboardQuery {
        let object = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object)).unwrap()
    }

    #[test]
    fn empty_query_selects_everything_newest_first() {
        let (filters, sort) = DashboardQuery::default().into_specs().unwrap();
        assert_eq!(filters, FilterSpec::default());
        assert_eq!(sort, SortSpec::new(SortColumn::Date, SortDirection::Desc));
    }

    #[test]
    fn singular_and_plural_keys_pick_the_selection_mode() {
        let (filters, _) = query(&[
            ("department", "Engineering"),
            ("employees", "Ada Lovelace, Grace Hopper,"),
            ("type", "all"),
        ])
        .into_specs()
        .unwrap();

        assert_eq!(filters.department, Selection::only("Engineering"));
        assert_eq!(filters.employee, Selection::any_of(["Ada Lovelace", "Grace Hopper"]));
        assert!(filters.transaction_type.is_unrestricted());
    }

    #[test]
    fn month_dates_memo_and_sort_are_parsed() {
        let (filters, sort) = query(&[
            ("month", "2025-03"),
            ("dateFrom", "2025-01-01"),
            ("memo", "team lunch"),
            ("sort", "spendProgram"),
            ("dir", "asc"),
        ])
        .into_specs()
        .unwrap();

        assert_eq!(filters.month, MonthSelection::Month { year: 2025, month: 3 });
        assert_eq!(filters.date_from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(filters.memo_query.as_deref(), Some("team lunch"));
        assert_eq!(sort, SortSpec::new(SortColumn::SpendProgram, SortDirection::Asc));
    }

    #[test]
    fn bad_month_or_date_is_rejected() {
        assert!(matches!(
            query(&[("month", "2025-13")]).into_specs(),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            query(&[("dateTo", "03/01/2025")]).into_specs(),
            Err(ApiError::BadRequest(msg)) if msg.contains("dateTo")
        ));
        assert!(matches!(query(&[("dir", "sideways")]).into_specs(), Err(ApiError::BadRequest(_))));
    }
}
