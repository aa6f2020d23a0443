//! Forgiving serde adapters for provider payloads.
//!
//! A field holding the wrong JSON type degrades to `None` instead of failing
//! the whole record, so the normalizer can substitute its placeholder.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize any field, yielding `None` when the value does not fit `T`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Strings, numbers and booleans become trimmed strings; blanks become `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Ok(None),
    };
    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Numbers pass through; numeric strings are parsed; anything else is `None`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient_number")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "lenient")]
        tags: Option<Vec<String>>,
    }

    #[test]
    fn tolerates_wrong_types() {
        let probe: Probe =
            serde_json::from_str(r#"{"name": {"nested": true}, "amount": "abc", "tags": 7}"#)
                .unwrap();
        assert!(probe.name.is_none());
        assert!(probe.amount.is_none());
        assert!(probe.tags.is_none());
    }

    #[test]
    fn coerces_compatible_values() {
        let probe: Probe =
            serde_json::from_str(r#"{"name": 42, "amount": " 12.5 ", "tags": ["a"]}"#).unwrap();
        assert_eq!(probe.name.as_deref(), Some("42"));
        assert_eq!(probe.amount, Some(12.5));
        assert_eq!(probe.tags, Some(vec!["a".to_string()]));
    }

    #[test]
    fn blank_strings_and_nulls_are_absent() {
        let probe: Probe = serde_json::from_str(r#"{"name": "   ", "amount": null}"#).unwrap();
        assert!(probe.name.is_none());
        assert!(probe.amount.is_none());
        assert!(probe.tags.is_none());
    }
}
