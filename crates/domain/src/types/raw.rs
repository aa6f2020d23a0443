//! Provider record shapes
//!
//! Every field is optional and deserialized leniently: the provider omits
//! fields freely and occasionally changes their JSON type. Mapping these into
//! the unified view model (and choosing placeholders) is the normalizer's job.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::lenient::{lenient, lenient_number, lenient_string};

/* -------------------------------------------------------------------------- */
/* Card transactions */
/* -------------------------------------------------------------------------- */

/// A purchase on a company card. `amount` is in minor currency units.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCardTransaction {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_transaction_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub currency_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub card_holder: Option<RawCardHolder>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub merchant_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub merchant_descriptor: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub merchant_location: Option<RawMerchantLocation>,
    #[serde(default, deserialize_with = "lenient")]
    pub accounting_categories: Option<Vec<RawAccountingCategory>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sk_category_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub spend_program_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub memo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    /// Receipt ids attached to the transaction.
    #[serde(default, deserialize_with = "lenient")]
    pub receipts: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCardHolder {
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub department_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMerchantLocation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
}

/// Accounting tag on a card transaction (GL account, class, location, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAccountingCategory {
    #[serde(default, deserialize_with = "lenient_string")]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tracking_category_remote_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tracking_category_remote_name: Option<String>,
}

/* -------------------------------------------------------------------------- */
/* Reimbursements */
/* -------------------------------------------------------------------------- */

/// An approved out-of-pocket expense. `amount` is already in major units.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReimbursement {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub merchant: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub accounting_field_selections: Option<Vec<RawFieldSelection>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub spend_program_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub memo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
}

/// One selected value of a typed accounting field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFieldSelection {
    /// The selected option, e.g. `Engineering` for a department field.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub external_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub category_info: Option<RawCategoryInfo>,
}

/// The field a selection belongs to, e.g. `{ name: "Department", type: "OTHER" }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCategoryInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/* -------------------------------------------------------------------------- */
/* Reference tables */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpendProgram {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
}

impl SpendProgram {
    /// Human label: `name`, falling back to `display_name`.
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().or(self.display_name.as_deref())
    }
}

/// Receipt metadata; only used to resolve `hasReceipt` / `receiptUrl`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Receipt {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub expense_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub receipt_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
}

impl Receipt {
    pub fn link(&self) -> Option<&str> {
        self.receipt_url.as_deref().or(self.image_url.as_deref()).or(self.url.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Memo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub memo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub expense_id: Option<String>,
}

/* -------------------------------------------------------------------------- */
/* Fetch result */
/* -------------------------------------------------------------------------- */

/// Best-effort result of one provider fetch.
///
/// Records are kept as raw JSON so a single malformed entry can be skipped
/// during normalisation rather than failing the whole listing. The field
/// names match the `/api/data` envelope and the cached snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDataset {
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(default)]
    pub reimbursements: Vec<Value>,
    #[serde(default)]
    pub spend_categories: Vec<Value>,
    #[serde(default)]
    pub spend_programs: Vec<Value>,
    #[serde(default)]
    pub receipts: Vec<Value>,
    #[serde(default)]
    pub memos: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ProviderDataset {
    /// Spend programs that deserialize; malformed entries are dropped.
    pub fn spend_program_table(&self) -> Vec<SpendProgram> {
        parse_all(&self.spend_programs)
    }

    pub fn receipt_table(&self) -> Vec<Receipt> {
        parse_all(&self.receipts)
    }

    pub fn memo_table(&self) -> Vec<Memo> {
        parse_all(&self.memos)
    }
}

fn parse_all<T: serde::de::DeserializeOwned>(values: &[Value]) -> Vec<T> {
    values
        .iter()
        .filter(|value| value.is_object())
        .filter_map(|value| serde_json::from_value(value.clone()).ok())
        .collect()
}
