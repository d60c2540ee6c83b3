//! Whole-form validation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult, FieldError};
use crate::raw::RawValue;

use super::rule::{FieldRule, FieldValue};

// ============================================================================
// Input / Output Mappings
// ============================================================================

/// Raw form snapshot: field name to raw value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput(BTreeMap<String, RawValue>);

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<RawValue>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse a `name=value` assignment (value may be empty).
    pub fn parse_assignment(assignment: &str) -> CalcResult<(String, RawValue)> {
        match assignment.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), RawValue::from(value)))
            }
            _ => Err(CalcError::SerializationError {
                reason: format!("Expected name=value, got '{}'", assignment),
            }),
        }
    }

    /// Build from a JSON object of name to string/number/null.
    pub fn from_json(value: serde_json::Value) -> CalcResult<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(Self(
                map.into_iter().map(|(k, v)| (k, RawValue::from(v))).collect(),
            )),
            other => Err(CalcError::SerializationError {
                reason: format!("Expected a JSON object of field values, got {}", other),
            }),
        }
    }
}

impl From<BTreeMap<String, RawValue>> for RawInput {
    fn from(map: BTreeMap<String, RawValue>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Fully validated values, one per configured field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<String, FieldValue>);

impl FieldValues {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Numeric value of a field; `None` if absent, text, or unknown
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Failing fields and their messages. Fields that passed are not present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, FieldError>);

impl ValidationErrors {
    pub fn get(&self, name: &str) -> Option<&FieldError> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field name to message text
    pub fn messages(&self) -> BTreeMap<&str, &str> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.message())).collect()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, error: FieldError) {
        self.0.insert(name.into(), error);
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.0.remove(name);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(name, error)| format!("{}: {}", name, error))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

// ============================================================================
// Aggregate Rule
// ============================================================================

/// Per-field rules for a named set of fields, in descriptor order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRule {
    rules: Vec<(String, FieldRule)>,
}

impl AggregateRule {
    pub(crate) fn new(rules: Vec<(String, FieldRule)>) -> Self {
        Self { rules }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, rule)| rule)
    }

    /// Re-validate one field, as on a change event. `None` for unknown names.
    pub fn validate_field(
        &self,
        name: &str,
        raw: &RawValue,
    ) -> Option<Result<FieldValue, FieldError>> {
        self.rule(name).map(|rule| rule.validate(raw))
    }

    /// Validate every configured field independently.
    ///
    /// A field missing from `input` counts as empty. Keys outside the
    /// configured set are ignored.
    pub fn validate(&self, input: &RawInput) -> Result<FieldValues, ValidationErrors> {
        for (name, _) in input.iter() {
            if self.rule(name).is_none() {
                debug!(field = name, "ignoring value for unconfigured field");
            }
        }

        let mut values = BTreeMap::new();
        let mut errors = ValidationErrors::default();
        let empty = RawValue::Empty;

        for (name, rule) in &self.rules {
            let raw = input.get(name).unwrap_or(&empty);
            match rule.validate(raw) {
                Ok(value) => {
                    values.insert(name.clone(), value);
                }
                Err(error) => {
                    debug!(
                        field = name.as_str(),
                        code = error.error_code(),
                        %error,
                        "field failed validation"
                    );
                    errors.insert(name.clone(), error);
                }
            }
        }

        if errors.is_empty() {
            Ok(FieldValues(values))
        } else {
            Err(errors)
        }
    }
}
