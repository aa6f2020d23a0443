//! Shared test doubles for the core integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use spendview_core::{CacheStore, ExpenseDataSource};
use spendview_domain::{ProviderDataset, Result as DomainResult, SpendViewError};

/// In-memory mock for `CacheStore`, with a switch to make writes fail.
#[derive(Default, Clone)]
pub struct MockCacheStore {
    slot: Arc<Mutex<Option<String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockCacheStore {
    pub fn with_payload(payload: impl Into<String>) -> Self {
        let store = Self::default();
        *store.slot.lock() = Some(payload.into());
        store
    }

    pub fn failing_writes(self) -> Self {
        *self.fail_writes.lock() = true;
        self
    }

    pub fn payload(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl CacheStore for MockCacheStore {
    fn read(&self) -> DomainResult<Option<String>> {
        Ok(self.slot.lock().clone())
    }

    fn write(&self, payload: &str) -> DomainResult<()> {
        if *self.fail_writes.lock() {
            return Err(SpendViewError::Internal("disk full".into()));
        }
        *self.slot.lock() = Some(payload.to_string());
        Ok(())
    }

    fn clear(&self) -> DomainResult<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// Data source that replays queued responses, one per call.
#[derive(Default, Clone)]
pub struct ScriptedSource {
    responses: Arc<Mutex<VecDeque<DomainResult<ProviderDataset>>>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<DomainResult<ProviderDataset>>) -> Self {
        Self { responses: Arc::new(Mutex::new(responses.into())) }
    }

    pub fn calls_remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl ExpenseDataSource for ScriptedSource {
    async fn fetch_dataset(&self) -> DomainResult<ProviderDataset> {
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(SpendViewError::Network("no scripted response left".into())))
    }
}

/// The two-record dataset used across the dashboard tests.
pub fn coffee_and_hotel() -> ProviderDataset {
    ProviderDataset {
        transactions: vec![json!({
            "id": "t1",
            "amount": 4567,
            "user_transaction_time": "2025-03-01",
            "merchant_name": "Coffee Shop",
            "card_holder": { "first_name": "Ada", "last_name": "Lovelace", "department_name": "Engineering" },
        })],
        reimbursements: vec![json!({
            "id": "r1",
            "amount": 1250.00,
            "transaction_date": "2025-03-02",
            "merchant": "Hotel",
            "user_full_name": "Grace Hopper",
        })],
        receipts: vec![json!({ "id": "rc1", "transaction_id": "t1", "receipt_url": "https://r/1" })],
        ..Default::default()
    }
}
