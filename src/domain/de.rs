//! Lenient deserializers applied at the storage boundary.
//!
//! Rows come from a hosted database written by several generations of the
//! admin UI, so numbers show up as strings, strings show up blank and
//! booleans show up null. Everything is normalized here, once.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Renders a scalar JSON value as an identifier/number string.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i.to_string()),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| format!("{}", f as i64))
                .or_else(|| Some(n.to_string())),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

/// Parses an integer out of a number or a string, JavaScript `parseInt` style
/// (leading digits only).
pub(crate) fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            let (sign, digits) = match s.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, s),
            };
            let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}

pub(crate) fn record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid record id: {value}")))
}

pub(crate) fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

pub(crate) fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(lenient_int))
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Blank strings are treated as absent.
pub(crate) fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

/// Prices may be stored as numbers or as strings with a decimal comma.
pub(crate) fn price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    Ok(clamp_price(parsed.unwrap_or(0.0)))
}

/// Accepts RFC 3339, Postgres `timestamptz` text and offset-less `timestamp`
/// text (read as UTC). Anything else is `None`.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub(crate) fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

pub(crate) fn clamp_price(price: f64) -> f64 {
    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}

pub(crate) fn non_blank_str(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
