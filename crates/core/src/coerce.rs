//! Lenient numeric coercion for merchant-authored values.
//!
//! Configurations are merchant-authored JSON persisted through several app
//! versions, so any price-relevant field may arrive as a number, a numeric
//! string, or garbage. Every numeric read in this crate goes through this one
//! helper: a finite number is used as-is, a string must parse as a whole
//! float, and anything else becomes the fallback. Nothing here ever yields
//! `NaN` or an error.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a JSON value to a finite `f64`, or the fallback.
#[must_use]
pub fn to_number(value: &Value, fallback: f64) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite()).unwrap_or(fallback)
}

/// Deserialize a numeric field leniently, falling back to `0.0`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_number(&value, 0.0))
}

/// Deserialize an optional numeric field leniently.
///
/// Absent and null stay `None`; any present value coerces like
/// [`lenient_f64`], so a legacy `"added": "5"` still reads as `5.0`.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(to_number(&value, 0.0)))
}
