//! Loosely typed text input.
//!
//! Form payloads arrive as JSON, where a field the UI expects to be a string
//! may be `null`, a number, or missing. [`RawText`] gives sanitizers one view
//! over all of these: `Some(&str)` for real text, `None` for everything else.
//! The [`lenient`] helpers apply the same rule during deserialization.

use serde_json::Value;

/// A value that may or may not carry text.
pub trait RawText {
    /// Returns the text if this value is a string, `None` otherwise.
    fn raw_text(&self) -> Option<&str>;
}

impl RawText for str {
    fn raw_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl RawText for String {
    fn raw_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: RawText + ?Sized> RawText for &T {
    fn raw_text(&self) -> Option<&str> {
        (**self).raw_text()
    }
}

impl<T: RawText> RawText for Option<T> {
    fn raw_text(&self) -> Option<&str> {
        self.as_ref().and_then(RawText::raw_text)
    }
}

impl RawText for Value {
    fn raw_text(&self) -> Option<&str> {
        self.as_str()
    }
}

/// Formats a float without trailing zeros ("9" instead of "9.0").
///
/// # Examples
///
/// ```
/// use hps_model::format_numeric;
///
/// assert_eq!(format_numeric(9.0), "9");
/// assert_eq!(format_numeric(2.5), "2.5");
/// ```
pub fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value}");
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    }
}

/// Serde helpers that never fail on a wrongly typed field.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::format_numeric;

    /// Strings pass through; any other JSON value becomes an empty string.
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => s,
            _ => String::new(),
        })
    }

    /// Like [`text`] but keeps numbers, rendered without trailing zeros.
    ///
    /// Grade levels are commonly typed as numbers (`9`) in form state.
    pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.as_f64().map(format_numeric).unwrap_or_default(),
            _ => String::new(),
        })
    }

    /// Keeps the string entries of an array; anything else yields an empty list.
    pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }
}
