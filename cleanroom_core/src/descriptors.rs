//! # Field Descriptors
//!
//! Declarative contracts for every input on the calculator form. A
//! [`FieldDescriptor`] is pure data; [`DescriptorSet`] is the ordered,
//! checked collection the validator builder consumes.
//!
//! Order matters for presentation only. Validation treats every field
//! independently.
//!
//! ## Example
//!
//! ```rust
//! use cleanroom_core::descriptors::{Bound, DescriptorSet, FieldDescriptor};
//!
//! let iso_class = FieldDescriptor::numeric("iso_class", "ISO Class")
//!     .with_default(5.0)
//!     .with_min(Bound::new(5.0, "ISO Class must be between 5 and 9"))
//!     .with_max(Bound::new(9.0, "ISO Class must be between 5 and 9"))
//!     .with_step(1.0);
//!
//! let set = DescriptorSet::new(vec![iso_class])?;
//! assert_eq!(set.len(), 1);
//! # Ok::<(), cleanroom_core::errors::CalcError>(())
//! ```

use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::raw::RawValue;

/// Name of the class index input read by the formula
pub const ISO_CLASS: &str = "iso_class";
/// Name of the particle size input read by the formula
pub const PARTICLE_SIZE: &str = "particle_size";
/// Name of the computed field the formula writes into
pub const ISO_CLEANROOM_PARTICLE: &str = "iso_cleanroom_particle";

// ============================================================================
// Descriptor Types
// ============================================================================

/// How a field's raw value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Coerced to a number and range-checked
    #[default]
    Numeric,
    /// Accepted as-is, no coercion or bounds
    Text,
}

/// An inclusive limit paired with the message shown when it is violated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub value: f64,
    pub message: String,
}

impl Bound {
    pub fn new(value: f64, message: impl Into<String>) -> Self {
        Self {
            value,
            message: message.into(),
        }
    }
}

/// Contract for one form input.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "particle_size",
///   "label": "Particle Size (µm)",
///   "kind": "numeric",
///   "default_value": 0.5,
///   "min": { "value": 0.5, "message": "Particle Size must be between 0.5 and 5" },
///   "max": { "value": 5.0, "message": "Particle Size must be between 0.5 and 5" },
///   "step": 0.1,
///   "message": "Particle Size must be between 0.5 and 5"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Key in the aggregate result; unique within a set
    pub name: String,

    /// Label rendered beside the input
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub kind: FieldKind,

    /// Seed value for a fresh form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Bound>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Bound>,

    /// Input granularity hint. Never validated against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// Computed/read-only field
    #[serde(default)]
    pub disabled: bool,

    /// Empty input is valid and yields no value
    #[serde(default)]
    pub optional: bool,

    /// Text for values that are not numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldDescriptor {
    /// Create a numeric field with no bounds or flags
    pub fn numeric(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Numeric,
            default_value: None,
            min: None,
            max: None,
            step: None,
            disabled: false,
            optional: false,
            message: None,
        }
    }

    /// Create a pass-through text field
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Text,
            ..Self::numeric(name, label)
        }
    }

    pub fn with_default(mut self, value: f64) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_min(mut self, bound: Bound) -> Self {
        self.min = Some(bound);
        self
    }

    pub fn with_max(mut self, bound: Bound) -> Self {
        self.max = Some(bound);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Raw value a fresh form starts with
    pub fn initial_value(&self) -> RawValue {
        self.default_value.map_or(RawValue::Empty, RawValue::Number)
    }

    /// Check the descriptor's own consistency.
    pub fn check(&self) -> CalcResult<()> {
        if self.name.trim().is_empty() {
            return Err(CalcError::invalid_descriptor(&self.name, "Name must not be empty"));
        }
        for (which, bound) in [("min", &self.min), ("max", &self.max)] {
            if let Some(bound) = bound {
                if !bound.value.is_finite() {
                    return Err(CalcError::invalid_descriptor(
                        &self.name,
                        format!("{} bound must be a finite number", which),
                    ));
                }
            }
        }
        if let (Some(min), Some(max)) = (&self.min, &self.max) {
            if min.value > max.value {
                return Err(CalcError::invalid_descriptor(
                    &self.name,
                    format!("min {} is greater than max {}", min.value, max.value),
                ));
            }
        }
        if let Some(step) = self.step {
            if !step.is_finite() || step <= 0.0 {
                return Err(CalcError::invalid_descriptor(
                    &self.name,
                    format!("step {} must be a positive number", step),
                ));
            }
        }
        if let Some(default) = self.default_value {
            if !default.is_finite() {
                return Err(CalcError::invalid_descriptor(
                    &self.name,
                    "default must be a finite number",
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Descriptor Set
// ============================================================================

/// Ordered, immutable collection of descriptors with unique names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DescriptorSet {
    fields: Vec<FieldDescriptor>,
}

impl DescriptorSet {
    /// Build a set, rejecting duplicate names and malformed descriptors.
    pub fn new(fields: Vec<FieldDescriptor>) -> CalcResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            field.check()?;
            if !seen.insert(field.name.as_str()) {
                return Err(CalcError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Descriptors in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Initial raw value for every field (default, or empty)
    pub fn defaults(&self) -> BTreeMap<String, RawValue> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.initial_value()))
            .collect()
    }
}

impl<'de> Deserialize<'de> for DescriptorSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fields = Vec::<FieldDescriptor>::deserialize(deserializer)?;
        DescriptorSet::new(fields).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a DescriptorSet {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

// ============================================================================
// Built-in Cleanroom Form
// ============================================================================

/// A numeric field whose not-a-number, min and max messages share one text.
fn ranged(
    name: &str,
    label: &str,
    default: f64,
    min: f64,
    max: f64,
    step: f64,
    message: &str,
) -> FieldDescriptor {
    FieldDescriptor::numeric(name, label)
        .with_message(message)
        .with_default(default)
        .with_min(Bound::new(min, message))
        .with_max(Bound::new(max, message))
        .with_step(step)
}

static CLEANROOM_FIELDS: Lazy<DescriptorSet> = Lazy::new(|| DescriptorSet {
    fields: vec![
        ranged(ISO_CLASS, "ISO Class", 5.0, 5.0, 9.0, 1.0, "ISO Class must be between 5 and 9"),
        ranged(
            PARTICLE_SIZE,
            "Particle Size (µm)",
            0.5,
            0.5,
            5.0,
            0.1,
            "Particle Size must be between 0.5 and 5",
        ),
        FieldDescriptor::numeric("airflow", "Airflow (m³/h)")
            .with_message("Airflow must be 0 or greater")
            .with_default(0.0)
            .with_min(Bound::new(0.0, "Airflow must be 0 or greater"))
            .with_max(Bound::new(8760.0, "Airflow cannot exceed 8760 hours per year"))
            .with_step(1.0),
        FieldDescriptor::numeric("operating_hours_per_year", "Operating Hours per Year (h/yr)")
            .with_message("Operating Hours must be 0 or greater")
            .with_default(0.0)
            .with_min(Bound::new(0.0, "Operating Hours must be 0 or greater"))
            .with_max(Bound::new(8760.0, "Operating Hours cannot exceed 8760 hours per year"))
            .with_step(1.0),
        ranged(
            "fan_efficiency",
            "Fan Efficiency (0-1)",
            0.0,
            0.0,
            1.0,
            0.01,
            "Fan Efficiency must be between 0 and 1",
        ),
        ranged(
            "electricity_rate",
            "Electricity Rate ($/kWh)",
            0.0,
            0.0,
            1.0,
            0.01,
            "Electricity Rate must be between 0 and 1",
        ),
        ranged(
            "upstream_dust_concentration",
            "Upstream Dust Concentration (mg/m³)",
            0.0,
            0.0,
            1.0,
            0.01,
            "Upstream Dust Concentration must be between 0 and 1",
        ),
        ranged(
            "terminal_pressure_drop",
            "Terminal Pressure Drop (Pa)",
            0.0,
            0.0,
            1.0,
            0.01,
            "Terminal Pressure Drop must be between 0 and 1",
        ),
        FieldDescriptor::numeric(ISO_CLEANROOM_PARTICLE, "ISO Cleanroom Particle (1/m³)")
            .with_message("ISO Cleanroom Particle must be between 0 and 1")
            .disabled()
            .optional(),
        ranged(
            "upstream_particle_count",
            "Upstream Particle Count",
            0.0,
            0.0,
            1.0,
            1.0,
            "Upstream Particle Count must be between 0 and 1",
        ),
    ],
});

/// The built-in cleanroom calculator form, in presentation order.
pub fn cleanroom_fields() -> &'static DescriptorSet {
    &CLEANROOM_FIELDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set_is_well_formed() {
        let set = cleanroom_fields();
        assert_eq!(set.len(), 10);
        // Rebuilding through the checked constructor must succeed
        assert!(DescriptorSet::new(set.iter().cloned().collect()).is_ok());
    }

    #[test]
    fn test_builtin_order_and_flags() {
        let names: Vec<&str> = cleanroom_fields().names().collect();
        assert_eq!(names[0], ISO_CLASS);
        assert_eq!(names[1], PARTICLE_SIZE);
        assert_eq!(names[9], "upstream_particle_count");

        let computed = cleanroom_fields().get(ISO_CLEANROOM_PARTICLE).unwrap();
        assert!(computed.disabled);
        assert!(computed.optional);
        assert!(computed.min.is_none() && computed.max.is_none());
        assert_eq!(computed.initial_value(), RawValue::Empty);
    }

    #[test]
    fn test_particle_size_min_is_never_zero() {
        let size = cleanroom_fields().get(PARTICLE_SIZE).unwrap();
        assert_eq!(size.min.as_ref().unwrap().value, 0.5);
    }

    #[test]
    fn test_defaults() {
        let defaults = cleanroom_fields().defaults();
        assert_eq!(defaults[ISO_CLASS], RawValue::Number(5.0));
        assert_eq!(defaults[PARTICLE_SIZE], RawValue::Number(0.5));
        assert_eq!(defaults["airflow"], RawValue::Number(0.0));
        assert_eq!(defaults[ISO_CLEANROOM_PARTICLE], RawValue::Empty);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = DescriptorSet::new(vec![
            FieldDescriptor::numeric("a", "A"),
            FieldDescriptor::numeric("a", "A again"),
        ]);
        assert!(matches!(result, Err(CalcError::DuplicateField { field }) if field == "a"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let field = FieldDescriptor::numeric("x", "X")
            .with_min(Bound::new(10.0, "too low"))
            .with_max(Bound::new(1.0, "too high"));
        let err = DescriptorSet::new(vec![field]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DESCRIPTOR");
    }

    #[test]
    fn test_equal_bounds_allowed() {
        let field = FieldDescriptor::numeric("x", "X")
            .with_min(Bound::new(1.0, "low"))
            .with_max(Bound::new(1.0, "high"));
        assert!(field.check().is_ok());
    }

    #[test]
    fn test_bad_step_and_empty_name_rejected() {
        assert!(FieldDescriptor::numeric("x", "X").with_step(0.0).check().is_err());
        assert!(FieldDescriptor::numeric("", "Blank").check().is_err());
        assert!(FieldDescriptor::numeric("x", "X")
            .with_min(Bound::new(f64::NAN, "nan"))
            .check()
            .is_err());
    }

    #[test]
    fn test_json_defaults_for_missing_keys() {
        let field: FieldDescriptor = serde_json::from_str(r#"{"name": "airflow"}"#).unwrap();
        assert_eq!(field.kind, FieldKind::Numeric);
        assert!(!field.optional);
        assert!(!field.disabled);
        assert!(field.message.is_none());
    }

    #[test]
    fn test_set_deserialization_runs_checks() {
        let json = r#"[{"name": "a"}, {"name": "a"}]"#;
        assert!(serde_json::from_str::<DescriptorSet>(json).is_err());

        let json = serde_json::to_string(cleanroom_fields()).unwrap();
        let parsed: DescriptorSet = serde_json::from_str(&json).unwrap();
        assert_eq!(&parsed, cleanroom_fields());
    }
}
