//! Unified transaction view model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_keyword_conversions;

/// Which provider listing a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    CardTransaction,
    Reimbursement,
}

impl_domain_keyword_conversions!(TransactionKind {
    CardTransaction => "card_transaction",
    Reimbursement => "reimbursement",
});

impl TransactionKind {
    /// Label shown in tables and CSV exports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CardTransaction => "Transaction",
            Self::Reimbursement => "Reimbursement",
        }
    }

    /// Whether `selected` names this kind, by keyword or by label, ignoring
    /// case.
    pub fn matches(&self, selected: &str) -> bool {
        selected.parse::<Self>().is_ok_and(|kind| kind == *self)
            || selected.trim().eq_ignore_ascii_case(self.label())
    }
}

/// One row of the dashboard, built from either record kind.
///
/// Every text field is populated; absent upstream values are replaced by a
/// placeholder (`Unknown`, `No memo`, `Uncategorized`, `No Program`) during
/// normalisation, so consumers never need to handle missing fields.
/// `amount` is always in major currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedTransaction {
    pub id: String,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub currency: String,
    pub employee_name: String,
    pub department: String,
    pub merchant: String,
    pub merchant_descriptor: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub accounting_category: String,
    pub state: String,
    pub employee_location: String,
    pub memo: String,
    pub spend_category: String,
    pub spend_program_name: String,
    pub has_receipt: bool,
    pub receipt_url: Option<String>,
}

impl UnifiedTransaction {
    pub fn is_reimbursement(&self) -> bool {
        self.kind == TransactionKind::Reimbursement
    }
}
