//! Tolerant field decoding and the display transforms shared by modules.
//!
//! Response schemas use the `deserialize_with` helpers below so that a field
//! with an unexpected JSON type decodes as absent instead of failing the
//! whole response. Absent fields then fall back to each module's
//! placeholder text.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Placeholder for a missing text field.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Deserializers
// ---------------------------------------------------------------------------

/// Text field: strings as-is, numbers and booleans rendered the way the page
/// would print them. Empty strings, `null`, arrays and objects are absent.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(value_text))
}

/// Numeric field: JSON numbers, or strings that parse as a number.
pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Boolean field with JavaScript truthiness.
pub fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    })
}

/// List of text items. Anything other than an array is an empty list;
/// items without a text rendering are skipped.
pub fn text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        _ => Vec::new(),
    })
}

/// List of records. `None` when the field is absent or not an array; items
/// that don't decode become `T::default()`.
pub fn record_list<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

/// Nested record. Anything other than an object, or an object that doesn't
/// decode, is `T::default()`.
pub fn record<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(object @ Value::Object(_)) => serde_json::from_value(object).unwrap_or_default(),
        _ => T::default(),
    })
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(format_number),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Display transforms
// ---------------------------------------------------------------------------

/// Render a number like the page does: `12`, `12.5`, `NaN`, `1e+21`.
///
/// Magnitudes of `1e21` and above, or below `1e-6`, use exponent notation
/// with an explicit sign on positive exponents.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // Covers -0.0 as well.
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        exponent_notation(n)
    } else {
        n.to_string()
    }
}

fn exponent_notation(n: f64) -> String {
    let text = format!("{n:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}

/// Uppercased value, or `fallback` when absent.
pub fn upper_or(value: Option<String>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), |v| v.to_uppercase())
}

/// Value, or `fallback` when absent.
pub fn or_fallback(value: Option<String>, fallback: &str) -> String {
    value.unwrap_or_else(|| fallback.to_string())
}

/// Items joined with `separator`, or `fallback` for an empty list.
pub fn join_or(items: &[String], separator: &str, fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(separator)
    }
}

/// A 0–1 fraction as a percentage with one decimal: `0.87` → `87.0%`.
pub fn fraction_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// An already-scaled 0–100 value with a percent sign: `42` → `42%`.
///
/// Deliberately not unified with [`fraction_percent`]: the sentiment
/// endpoint reports a fraction while pricing and prediction report percent.
pub fn direct_percent(value: Option<String>) -> String {
    format!("{}%", value.as_deref().unwrap_or("0"))
}

/// Colored indicator for a `high` / `medium` / other level, matched on the
/// raw (not uppercased) value.
pub fn level_indicator(level: Option<&str>) -> &'static str {
    match level {
        Some("high") => "🔴",
        Some("medium") => "🟡",
        _ => "🟢",
    }
}

// ---------------------------------------------------------------------------
// Form parsing
// ---------------------------------------------------------------------------

/// Longest leading float literal, after leading whitespace.
static FLOAT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("float prefix regex must compile")
});

/// Parse form text the way a browser's `parseFloat` does.
///
/// Leading whitespace is skipped and the longest numeric prefix wins
/// (`"12.5kg"` → `12.5`). Input with no numeric prefix is `NaN`; it is not
/// rejected here and reaches the backend as JSON `null`.
pub fn parse_float(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let Some(m) = FLOAT_PREFIX_RE.find(trimmed) else {
        return f64::NAN;
    };

    let literal = m.as_str();
    match literal.trim_start_matches(['+', '-']) {
        "Infinity" if literal.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        _ => literal.parse().unwrap_or(f64::NAN),
    }
}
