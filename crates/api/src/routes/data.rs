//! Raw provider data envelope
//!
//! The endpoint never fails at the HTTP level: upstream and configuration
//! problems are reported through `status`, `error` and `message`.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use spendview_domain::{ProviderDataset, SpendViewError};

use super::AppState;
use crate::utils::logging::execute_logged;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEnvelope {
    pub transactions: Vec<Value>,
    /// Reimbursements, under their historical name
    pub expenses: Vec<Value>,
    pub spend_categories: Vec<Value>,
    pub spend_programs: Vec<Value>,
    pub receipts: Vec<Value>,
    pub memos: Vec<Value>,
    pub last_updated: DateTime<Utc>,
    pub environment: String,
    pub total_transactions: usize,
    pub total_reimbursements: usize,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DataEnvelope {
    pub fn success(dataset: ProviderDataset, environment: String, now: DateTime<Utc>) -> Self {
        Self {
            total_transactions: dataset.transactions.len(),
            total_reimbursements: dataset.reimbursements.len(),
            transactions: dataset.transactions,
            expenses: dataset.reimbursements,
            spend_categories: dataset.spend_categories,
            spend_programs: dataset.spend_programs,
            receipts: dataset.receipts,
            memos: dataset.memos,
            last_updated: now,
            environment,
            status: "success",
            warnings: dataset.warnings,
            error: None,
            message: None,
        }
    }

    pub fn failure(err: &SpendViewError, now: DateTime<Utc>) -> Self {
        let error = match err {
            SpendViewError::Config(_) => "Configuration error",
            _ => "Unable to fetch live data",
        };
        Self {
            transactions: Vec::new(),
            expenses: Vec::new(),
            spend_categories: Vec::new(),
            spend_programs: Vec::new(),
            receipts: Vec::new(),
            memos: Vec::new(),
            last_updated: now,
            environment: "error".to_string(),
            total_transactions: 0,
            total_reimbursements: 0,
            status: "error",
            warnings: Vec::new(),
            error: Some(error.to_string()),
            message: Some(err.to_string()),
        }
    }
}

pub async fn data(State(ctx): State<AppState>) -> Json<DataEnvelope> {
    let result = execute_logged("data::fetch", || async {
        let service = ctx.dashboard()?;
        service.fetch_live().await
    })
    .await;

    let now = Utc::now();
    Json(match result {
        Ok(dataset) => DataEnvelope::success(dataset, ctx.environment.to_string(), now),
        Err(err) => DataEnvelope::failure(&err, now),
    })
}
