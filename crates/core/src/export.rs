//! CSV export of the visible rows

use csv::{QuoteStyle, WriterBuilder};
use spendview_domain::{Result, SpendViewError, UnifiedTransaction};

pub const CSV_HEADER: [&str; 9] =
    ["Date", "Employee", "Department", "Merchant", "Amount", "Location", "Type", "Category", "Memo"];

/// Serialize `rows` in the order given.
///
/// Text fields are always quoted (inner quotes doubled); the amount is a
/// bare decimal and the date uses the US short form (`3/1/2025`).
pub fn to_csv(rows: &[UnifiedTransaction]) -> Result<String> {
    let mut writer = WriterBuilder::new().quote_style(QuoteStyle::NonNumeric).from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for row in rows {
        writer
            .write_record([
                row.date.format("%-m/%-d/%Y").to_string(),
                row.employee_name.clone(),
                row.department.clone(),
                row.merchant.clone(),
                format_amount(row.amount),
                row.location.clone(),
                row.kind.label().to_string(),
                row.accounting_category.clone(),
                row.memo.clone(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| SpendViewError::Internal(format!("CSV flush failed: {}", err.error())))?;
    String::from_utf8(bytes).map_err(|err| SpendViewError::Internal(format!("CSV is not UTF-8: {err}")))
}

fn format_amount(amount: f64) -> String {
    if amount.is_finite() {
        amount.to_string()
    } else {
        "0".to_string()
    }
}

fn csv_error(err: csv::Error) -> SpendViewError {
    SpendViewError::Internal(format!("CSV write failed: {err}"))
}
