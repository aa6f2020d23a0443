//! Next-page pointer extraction
//!
//! Listing envelopes name their continuation differently depending on the
//! endpoint and API revision. The known locations are tried in a fixed
//! order and the first non-empty one wins.

use serde_json::Value;

/// Where the next page lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// A complete URL to request as-is
    Url(String),
    /// An opaque cursor passed back as the `start` query parameter
    Cursor(String),
}

/// JSON pointers checked in priority order.
const NEXT_POINTERS: [&str; 4] = ["/page/next", "/next_cursor", "/pagination/next_cursor", "/next"];

pub fn next_page(envelope: &Value) -> Option<NextPage> {
    NEXT_POINTERS
        .iter()
        .filter_map(|pointer| envelope.pointer(pointer))
        .find_map(|value| {
            let raw = value.as_str()?.trim();
            if raw.is_empty() {
                None
            } else if raw.starts_with("https://") || raw.starts_with("http://") {
                Some(NextPage::Url(raw.to_string()))
            } else {
                Some(NextPage::Cursor(raw.to_string()))
            }
        })
}

/// Records of one page; a missing or non-array `data` is an empty page.
pub fn page_records(envelope: &mut Value) -> Vec<Value> {
    match envelope.get_mut("data").map(Value::take) {
        Some(Value::Array(records)) => records,
        _ => Vec::new(),
    }
}
