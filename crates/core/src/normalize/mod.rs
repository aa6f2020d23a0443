//! Record normalizer
//!
//! Maps card transactions and reimbursements into [`UnifiedTransaction`]s.
//! Cross-references (spend programs, receipts, memos) are resolved by id.
//! A record that is not a JSON object or carries no usable date is skipped
//! with a warning; every other missing field degrades to a placeholder.
//!
//! The output keeps input order: card transactions first, then
//! reimbursements. Sorting belongs to the engine.

pub mod extractors;

use std::collections::HashMap;

use serde_json::Value;
use spendview_domain::constants::{
    DEFAULT_CURRENCY, NOT_APPLICABLE, NO_MEMO, NO_PROGRAM, UNCATEGORIZED, UNKNOWN,
};
use spendview_domain::{
    parse_instant, Memo, ProviderDataset, RawCardTransaction, RawReimbursement, Receipt,
    SpendProgram, TransactionKind, UnifiedTransaction,
};
use tracing::{debug, warn};

use self::extractors::{
    extract_card_holder_name, extract_department, extract_gl_account, extract_merchant_location,
    extract_reimbursement_gl_account, extract_trip_location, text_or,
};

/// Result of one normalisation pass
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub rows: Vec<UnifiedTransaction>,
    /// Records dropped as malformed
    pub skipped: usize,
}

/// Id lookups built once per dataset
struct References<'a> {
    programs: HashMap<&'a str, &'a str>,
    receipts: HashMap<&'a str, &'a Receipt>,
    memos: HashMap<&'a str, &'a str>,
}

impl<'a> References<'a> {
    fn build(programs: &'a [SpendProgram], receipts: &'a [Receipt], memos: &'a [Memo]) -> Self {
        let programs = programs
            .iter()
            .filter_map(|program| Some((program.id.as_deref()?, program.label()?)))
            .collect();

        // First match wins: later receipts never displace an earlier one.
        let mut receipt_index: HashMap<&str, &Receipt> = HashMap::new();
        for receipt in receipts {
            for key in [receipt.transaction_id.as_deref(), receipt.expense_id.as_deref()]
                .into_iter()
                .flatten()
            {
                receipt_index.entry(key).or_insert(receipt);
            }
        }

        let mut memo_index: HashMap<&str, &str> = HashMap::new();
        for memo in memos {
            let Some(text) = memo.memo.as_deref() else { continue };
            for key in
                [memo.transaction_id.as_deref(), memo.expense_id.as_deref()].into_iter().flatten()
            {
                memo_index.entry(key).or_insert(text);
            }
        }

        Self { programs, receipts: receipt_index, memos: memo_index }
    }

    fn program_name(&self, program_id: Option<&str>) -> String {
        program_id
            .and_then(|id| self.programs.get(id))
            .map_or_else(|| NO_PROGRAM.to_string(), |name| (*name).to_string())
    }

    fn receipt(&self, record_id: &str) -> Option<&'a Receipt> {
        self.receipts.get(record_id).copied()
    }

    fn memo(&self, record_id: &str, inline: Option<&str>) -> String {
        text_or(&[inline, self.memos.get(record_id).copied()], NO_MEMO)
    }
}

/// Normalise a whole dataset.
pub fn normalize(dataset: &ProviderDataset) -> Vec<UnifiedTransaction> {
    normalize_with_report(dataset).rows
}

/// Normalise a whole dataset, reporting how many records were skipped.
pub fn normalize_with_report(dataset: &ProviderDataset) -> Normalized {
    let programs = dataset.spend_program_table();
    let receipts = dataset.receipt_table();
    let memos = dataset.memo_table();
    let references = References::build(&programs, &receipts, &memos);

    let mut out = Normalized {
        rows: Vec::with_capacity(dataset.transactions.len() + dataset.reimbursements.len()),
        skipped: 0,
    };

    for (index, value) in dataset.transactions.iter().enumerate() {
        match parse_record::<RawCardTransaction>(value)
            .and_then(|raw| map_card_transaction(&raw, index, &references))
        {
            Some(row) => out.rows.push(row),
            None => {
                out.skipped += 1;
                warn!(index, kind = "card_transaction", "skipping malformed record");
            }
        }
    }

    for (index, value) in dataset.reimbursements.iter().enumerate() {
        match parse_record::<RawReimbursement>(value)
            .and_then(|raw| map_reimbursement(&raw, index, &references))
        {
            Some(row) => out.rows.push(row),
            None => {
                out.skipped += 1;
                warn!(index, kind = "reimbursement", "skipping malformed record");
            }
        }
    }

    debug!(rows = out.rows.len(), skipped = out.skipped, "normalized provider dataset");
    out
}

fn parse_record<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

fn record_id(id: Option<&str>, kind: TransactionKind, index: usize) -> String {
    id.map(str::trim)
        .filter(|id| !id.is_empty())
        .map_or_else(|| format!("{kind}-{index}"), str::to_string)
}

/// Map one card transaction; `None` when it has no parseable date.
fn map_card_transaction(
    raw: &RawCardTransaction,
    index: usize,
    references: &References<'_>,
) -> Option<UnifiedTransaction> {
    let date = raw.user_transaction_time.as_deref().and_then(parse_instant)?;
    let id = record_id(raw.id.as_deref(), TransactionKind::CardTransaction, index);

    let receipt = references.receipt(&id);
    let has_attached_receipts = raw.receipts.as_ref().is_some_and(|ids| !ids.is_empty());
    let holder = raw.card_holder.as_ref();

    Some(UnifiedTransaction {
        date,
        amount: raw.amount.unwrap_or(0.0) / 100.0,
        currency: text_or(&[raw.currency_code.as_deref()], DEFAULT_CURRENCY),
        employee_name: extract_card_holder_name(raw),
        department: text_or(&[holder.and_then(|h| h.department_name.as_deref())], UNKNOWN),
        merchant: text_or(&[raw.merchant_name.as_deref()], UNKNOWN),
        merchant_descriptor: text_or(
            &[raw.merchant_descriptor.as_deref(), raw.merchant_name.as_deref()],
            UNKNOWN,
        ),
        location: extract_merchant_location(raw),
        kind: TransactionKind::CardTransaction,
        accounting_category: extract_gl_account(raw),
        state: text_or(&[raw.state.as_deref()], UNKNOWN),
        employee_location: text_or(&[holder.and_then(|h| h.location_name.as_deref())], UNKNOWN),
        memo: references.memo(&id, raw.memo.as_deref()),
        spend_category: text_or(&[raw.sk_category_name.as_deref()], UNCATEGORIZED),
        spend_program_name: references.program_name(raw.spend_program_id.as_deref()),
        has_receipt: receipt.is_some() || has_attached_receipts,
        receipt_url: receipt.and_then(Receipt::link).map(str::to_string),
        id,
    })
}

/// Map one reimbursement; `None` when neither date field parses.
fn map_reimbursement(
    raw: &RawReimbursement,
    index: usize,
    references: &References<'_>,
) -> Option<UnifiedTransaction> {
    let date = raw
        .transaction_date
        .as_deref()
        .and_then(parse_instant)
        .or_else(|| raw.created_at.as_deref().and_then(parse_instant))?;
    let id = record_id(raw.id.as_deref(), TransactionKind::Reimbursement, index);
    let receipt = references.receipt(&id);

    Some(UnifiedTransaction {
        date,
        // Reimbursements are reported in major units already.
        amount: raw.amount.unwrap_or(0.0),
        currency: text_or(&[raw.currency.as_deref()], DEFAULT_CURRENCY),
        employee_name: text_or(&[raw.user_full_name.as_deref()], UNKNOWN),
        department: extract_department(raw),
        merchant: text_or(&[raw.merchant.as_deref()], UNKNOWN),
        merchant_descriptor: text_or(&[raw.merchant.as_deref()], UNKNOWN),
        location: extract_trip_location(raw),
        kind: TransactionKind::Reimbursement,
        accounting_category: extract_reimbursement_gl_account(raw),
        state: text_or(&[raw.state.as_deref()], UNKNOWN),
        employee_location: NOT_APPLICABLE.to_string(),
        memo: references.memo(&id, raw.memo.as_deref()),
        spend_category: UNCATEGORIZED.to_string(),
        spend_program_name: references.program_name(raw.spend_program_id.as_deref()),
        has_receipt: receipt.is_some(),
        receipt_url: receipt.and_then(Receipt::link).map(str::to_string),
        id,
    })
}
