//! Forgiving field deserializers.
//!
//! Snapshots arrive from a document store that has accumulated years of
//! loosely-typed writes. Each helper here accepts whatever JSON value is stored
//! and coerces it to a usable default instead of failing the whole snapshot.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Any number-like value; everything else becomes `0.0`.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_number(&value).unwrap_or(0.0))
}

/// Like [`number`] but keeps "absent" distinct from zero.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_number(&value))
}

/// Non-negative whole count. Fractions are truncated, negatives become zero.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_count(coerce_number(&value).unwrap_or(0.0)))
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "1" | "verified" | "approved"
        ),
        _ => false,
    })
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

/// RFC 3339, naive datetime, `YYYY-MM-DD`, or epoch milliseconds.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => parse_timestamp(&s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

/// Elements that fail to deserialize are dropped; a non-array becomes empty.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Non-blank strings only.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Object of name → number; non-numeric entries are dropped.
pub fn score_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(key, value)| coerce_number(&value).map(|n| (key, n)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// Nested block that is `None` unless it is a well-formed object.
pub fn optional_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Nested block that falls back to its `Default`.
pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(optional_object(deserializer)?.unwrap_or_default())
}

/// String enums parsed through `FromStr`; unknown values fall back to `Default`.
pub fn parsed<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s.parse().unwrap_or_default(),
        _ => T::default(),
    })
}

pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub fn to_count(n: f64) -> u32 {
    if n.is_finite() && n > 0.0 {
        n.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Probe {
        #[serde(deserialize_with = "number")]
        amount: f64,
        #[serde(deserialize_with = "count")]
        total: u32,
        #[serde(deserialize_with = "flag")]
        verified: bool,
        #[serde(deserialize_with = "timestamp")]
        at: Option<DateTime<Utc>>,
        #[serde(deserialize_with = "string_list")]
        tags: Vec<String>,
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let probe: Probe = serde_json::from_value(json!({"amount": "4.5", "total": "7"})).unwrap();
        assert_eq!(probe.amount, 4.5);
        assert_eq!(probe.total, 7);
    }

    #[test]
    fn test_garbage_defaults_to_zero() {
        let probe: Probe = serde_json::from_value(json!({
            "amount": {"nested": true},
            "total": -3,
            "verified": null,
            "at": "not a date",
            "tags": "rust"
        }))
        .unwrap();
        assert_eq!(probe.amount, 0.0);
        assert_eq!(probe.total, 0);
        assert!(!probe.verified);
        assert!(probe.at.is_none());
        assert!(probe.tags.is_empty());
    }

    #[test]
    fn test_verification_strings_are_flags() {
        let probe: Probe = serde_json::from_value(json!({"verified": "Verified"})).unwrap();
        assert!(probe.verified);
    }

    #[test]
    fn test_timestamp_formats() {
        let date_only = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(date_only.to_rfc3339(), "2024-03-01T00:00:00+00:00");

        let offset = parse_timestamp("2024-03-01T05:30:00+05:30").unwrap();
        assert_eq!(offset.to_rfc3339(), "2024-03-01T00:00:00+00:00");

        let naive = parse_timestamp("2024-03-01T10:15:00.250").unwrap();
        assert_eq!(naive.timestamp_millis() % 1000, 250);
    }

    #[test]
    fn test_epoch_millis_timestamp() {
        let probe: Probe = serde_json::from_value(json!({"at": 1_700_000_000_000_i64})).unwrap();
        assert_eq!(probe.at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_string_list_drops_non_strings() {
        let probe: Probe =
            serde_json::from_value(json!({"tags": ["rust", 3, "", null, "go"]})).unwrap();
        assert_eq!(probe.tags, vec!["rust".to_string(), "go".to_string()]);
    }
}
