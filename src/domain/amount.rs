//! Numeric coercion for amounts read from storage.
//!
//! Storage hands amounts back as JSON numbers, decimal strings (`"12.50"`) or
//! `null`. Aggregation only ever sees finite `f64` values: anything that cannot
//! be read as a finite number becomes `0.0`. Movement amounts carry no sign of
//! their own, so a negative movement amount is clamped to `0.0`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Converts a raw storage value into a finite amount, defaulting to zero.
pub fn coerce_amount(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_finite() {
        raw
    } else {
        0.0
    }
}

/// Serde adapter for amount fields; pair with `#[serde(default)]` so a missing
/// field also lands on zero.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

/// Serde adapter for unsigned movement amounts: coerced like
/// [`deserialize_amount`], then negatives are clamped to zero.
pub fn deserialize_movement_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let amount = coerce_amount(&value);
    if amount < 0.0 {
        tracing::warn!(%value, "negative movement amount read as zero");
        return Ok(0.0);
    }
    Ok(amount)
}
