//! # Raw Input Values
//!
//! Form values arrive loosely typed: typed text, an already-numeric value, or
//! nothing at all. [`RawValue`] names those three shapes explicitly, and
//! [`RawValue::coerce`] is the single total conversion into something the
//! validator can check.
//!
//! Coercion never fails. A value that is not a number is forwarded unchanged
//! as [`Coerced::Unparsed`] so the type check downstream can attach the
//! descriptor's message.
//!
//! Only empty text is absent. Whitespace-only text reads as `0`. Parsing is
//! decimal only: hex, octal and binary literals and the spellings `Infinity`
//! and `NaN` are not numbers.
//!
//! ## Example
//!
//! ```rust
//! use cleanroom_core::raw::{Coerced, RawValue};
//!
//! assert_eq!(RawValue::text("5").coerce(), Coerced::Number(5.0));
//! assert_eq!(RawValue::Number(5.0).coerce(), Coerced::Number(5.0));
//! assert_eq!(RawValue::text("").coerce(), Coerced::Absent);
//! assert_eq!(RawValue::text("abc").to_number(), None);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A form value as handed over by the input layer.
///
/// Serializes as a JSON string, number, or `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum RawValue {
    /// Typed text, not yet interpreted
    Text(String),
    /// A value that is already numeric
    Number(f64),
    /// Empty string, null, or a key that was never set
    #[default]
    Empty,
}

/// Result of coercing a [`RawValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// No value was given
    Absent,
    /// A finite number
    Number(f64),
    /// Present but not interpretable as a number; carries the original text
    Unparsed(String),
}

impl RawValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// Normalize into absent / number / unparsed.
    ///
    /// Empty text is absent; other text is trimmed before parsing, and
    /// whitespace-only text is `0`. NaN and infinities are not numbers.
    pub fn coerce(&self) -> Coerced {
        match self {
            RawValue::Empty => Coerced::Absent,
            RawValue::Number(v) if v.is_finite() => Coerced::Number(*v),
            RawValue::Number(v) => Coerced::Unparsed(v.to_string()),
            RawValue::Text(text) => {
                if text.is_empty() {
                    return Coerced::Absent;
                }
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Coerced::Number(0.0);
                }
                match trimmed.parse::<f64>() {
                    Ok(v) if v.is_finite() => Coerced::Number(v),
                    _ => Coerced::Unparsed(text.clone()),
                }
            }
        }
    }

    /// The numeric view of this value, if it has one
    pub fn to_number(&self) -> Option<f64> {
        match self.coerce() {
            Coerced::Number(v) => Some(v),
            Coerced::Absent | Coerced::Unparsed(_) => None,
        }
    }

    /// True for values that coerce to absent
    pub fn is_empty(&self) -> bool {
        matches!(self.coerce(), Coerced::Absent)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(text) => write!(f, "{}", text),
            RawValue::Number(v) => write!(f, "{}", v),
            RawValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(value.to_string())
        }
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(value)
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Empty, Into::into)
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Empty,
            serde_json::Value::String(s) => RawValue::from(s),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => RawValue::Number(v),
                None => RawValue::Text(n.to_string()),
            },
            // Booleans, arrays and objects are never numbers
            other => RawValue::Text(other.to_string()),
        }
    }
}

impl From<RawValue> for serde_json::Value {
    fn from(value: RawValue) -> Self {
        match value {
            RawValue::Text(text) => serde_json::Value::String(text),
            RawValue::Number(v) => serde_json::Value::from(v),
            RawValue::Empty => serde_json::Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_inputs_are_absent() {
        assert_eq!(RawValue::Empty.coerce(), Coerced::Absent);
        assert_eq!(RawValue::from("").coerce(), Coerced::Absent);
        assert_eq!(RawValue::from(json!(null)).coerce(), Coerced::Absent);
        assert_eq!(RawValue::from(None::<f64>), RawValue::Empty);
    }

    #[test]
    fn test_whitespace_only_text_is_zero() {
        assert_eq!(RawValue::text("  ").coerce(), Coerced::Number(0.0));
        assert_eq!(RawValue::text("\t").to_number(), Some(0.0));
        assert!(!RawValue::text(" ").is_empty());
    }

    #[test]
    fn test_numeric_text_parses() {
        assert_eq!(RawValue::text("0.5").coerce(), Coerced::Number(0.5));
        assert_eq!(RawValue::text(" 8760 ").coerce(), Coerced::Number(8760.0));
        assert_eq!(RawValue::text("1e3").coerce(), Coerced::Number(1000.0));
        assert_eq!(RawValue::text("-2").coerce(), Coerced::Number(-2.0));
    }

    #[test]
    fn test_garbage_is_forwarded_unchanged() {
        assert_eq!(
            RawValue::text("abc").coerce(),
            Coerced::Unparsed("abc".to_string())
        );
        assert_eq!(
            RawValue::text("5 units").coerce(),
            Coerced::Unparsed("5 units".to_string())
        );
    }

    #[test]
    fn test_non_finite_is_not_a_number() {
        assert!(matches!(RawValue::text("NaN").coerce(), Coerced::Unparsed(_)));
        assert!(matches!(RawValue::text("inf").coerce(), Coerced::Unparsed(_)));
        assert!(matches!(RawValue::Number(f64::INFINITY).coerce(), Coerced::Unparsed(_)));
        assert!(matches!(RawValue::text("Infinity").coerce(), Coerced::Unparsed(_)));
        assert!(matches!(RawValue::text("0x6").coerce(), Coerced::Unparsed(_)));
        assert_eq!(RawValue::Number(f64::NAN).to_number(), None);
    }

    #[test]
    fn test_json_conversion() {
        assert_eq!(RawValue::from(json!(5)), RawValue::Number(5.0));
        assert_eq!(RawValue::from(json!("5")), RawValue::text("5"));
        assert_eq!(RawValue::from(json!("")), RawValue::Empty);
        assert_eq!(RawValue::from(json!(true)).to_number(), None);

        let parsed: Vec<RawValue> = serde_json::from_str(r#"["1.5", 2, null]"#).unwrap();
        assert_eq!(
            parsed,
            vec![RawValue::text("1.5"), RawValue::Number(2.0), RawValue::Empty]
        );
        assert_eq!(serde_json::to_string(&RawValue::Empty).unwrap(), "null");
    }
}
