//! Single-field rules.
//!
//! One variant per kind of check. Rules are plain values: they hold the
//! bounds and messages they need and nothing else, so one rule can be applied
//! from any number of form instances.

use serde::{Deserialize, Serialize};

use crate::descriptors::Bound;
use crate::errors::{FieldError, DEFAULT_NOT_A_NUMBER_MESSAGE};
use crate::raw::{Coerced, RawValue};

/// A successfully validated field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// Optional field left empty
    Absent,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(_) | FieldValue::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

/// Type check plus optional inclusive bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRange {
    /// Message for present values that are not numbers
    pub not_a_number: String,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl NumericRange {
    fn check(&self, raw: &RawValue) -> Result<FieldValue, FieldError> {
        let value = match raw.coerce() {
            Coerced::Number(v) => v,
            Coerced::Unparsed(_) => return Err(FieldError::not_a_number(&self.not_a_number)),
            // Required and never coerced to a number
            Coerced::Absent => return Err(FieldError::not_a_number(DEFAULT_NOT_A_NUMBER_MESSAGE)),
        };

        if let Some(min) = &self.min {
            if value < min.value {
                return Err(FieldError::below_minimum(&min.message, min.value));
            }
        }
        if let Some(max) = &self.max {
            if value > max.value {
                return Err(FieldError::above_maximum(&max.message, max.value));
            }
        }
        Ok(FieldValue::Number(value))
    }
}

/// Validation-and-coercion rule for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    NumericRange(NumericRange),
    /// Absent input passes; anything else goes to the inner rule
    Optional(Box<FieldRule>),
    /// Accepts any text unchanged. Empty input is `Absent` whether or not the
    /// field is optional; there is no required-text check.
    TextPassthrough,
}

impl FieldRule {
    /// Wrap this rule so that an absent value is accepted
    pub fn optional(self) -> Self {
        match self {
            FieldRule::Optional(_) => self,
            other => FieldRule::Optional(Box::new(other)),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldRule::Optional(_))
    }

    /// Coerce and check one raw value.
    pub fn validate(&self, raw: &RawValue) -> Result<FieldValue, FieldError> {
        match self {
            FieldRule::NumericRange(range) => range.check(raw),
            FieldRule::Optional(inner) => {
                if raw.is_empty() {
                    Ok(FieldValue::Absent)
                } else {
                    inner.validate(raw)
                }
            }
            FieldRule::TextPassthrough => {
                if raw.is_empty() {
                    Ok(FieldValue::Absent)
                } else {
                    Ok(FieldValue::Text(raw.to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fan_efficiency() -> FieldRule {
        let message = "Fan Efficiency must be between 0 and 1";
        FieldRule::NumericRange(NumericRange {
            not_a_number: message.to_string(),
            min: Some(Bound::new(0.0, message)),
            max: Some(Bound::new(1.0, message)),
        })
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let rule = fan_efficiency();
        assert_eq!(rule.validate(&RawValue::text("0")), Ok(FieldValue::Number(0.0)));
        assert_eq!(rule.validate(&RawValue::text("1")), Ok(FieldValue::Number(1.0)));
        assert!(matches!(
            rule.validate(&RawValue::text("1.01")),
            Err(FieldError::AboveMaximum { .. })
        ));
        assert!(matches!(
            rule.validate(&RawValue::Number(-0.01)),
            Err(FieldError::BelowMinimum { .. })
        ));
    }

    #[test]
    fn test_not_a_number_uses_configured_message() {
        let err = fan_efficiency().validate(&RawValue::text("abc")).unwrap_err();
        assert_eq!(err, FieldError::not_a_number("Fan Efficiency must be between 0 and 1"));
    }

    #[test]
    fn test_required_empty_uses_generic_message() {
        let err = fan_efficiency().validate(&RawValue::Empty).unwrap_err();
        assert_eq!(err, FieldError::not_a_number("Please enter a valid number"));
    }

    #[test]
    fn test_optional_short_circuits_absent_only() {
        let rule = fan_efficiency().optional();
        assert_eq!(rule.validate(&RawValue::Empty), Ok(FieldValue::Absent));
        assert_eq!(rule.validate(&RawValue::text("")), Ok(FieldValue::Absent));
        assert!(rule.validate(&RawValue::text("2")).is_err());
        assert!(rule.validate(&RawValue::text("abc")).is_err());
    }

    #[test]
    fn test_optional_is_not_nested_twice() {
        let rule = fan_efficiency().optional().optional();
        match rule {
            FieldRule::Optional(inner) => assert!(!inner.is_optional()),
            other => panic!("expected optional rule, got {:?}", other),
        }
    }

    #[test]
    fn test_text_passthrough() {
        let rule = FieldRule::TextPassthrough;
        assert_eq!(
            rule.validate(&RawValue::text("anything")),
            Ok(FieldValue::Text("anything".to_string()))
        );
        assert_eq!(rule.validate(&RawValue::Number(3.0)), Ok(FieldValue::Text("3".to_string())));
        assert_eq!(rule.validate(&RawValue::Empty), Ok(FieldValue::Absent));
        assert_eq!(rule.validate(&RawValue::text("")), Ok(FieldValue::Absent));
    }
}
