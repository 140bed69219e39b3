//! Numeric coercion helpers.
//!
//! External providers and the verdict collaborator hand back numbers of
//! dubious quality: nulls, numeric strings, out-of-range values. Every
//! score-adjacent number goes through these helpers so that NaN and
//! infinities can never propagate into a composite score.

use serde::{Deserialize, Deserializer};

/// Clamp a raw score into the `[0, 100]` display range. NaN clamps to 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Return `value` if it is finite, otherwise the fallback.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Coerce a loosely typed JSON value to a finite number.
///
/// Accepts numbers and numeric strings; everything else, including
/// non-finite parses, resolves to the caller-supplied fallback.
pub fn coerce_finite(value: &serde_json::Value, fallback: f64) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|x| finite_or(x, fallback)).unwrap_or(fallback),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .map(|x| finite_or(x, fallback))
            .unwrap_or(fallback),
        _ => fallback,
    }
}

/// Serde helper: deserialize a number-or-numeric-string field to `f64`,
/// falling back to 0.0 for anything unparseable.
pub fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_finite(&value, 0.0))
}
