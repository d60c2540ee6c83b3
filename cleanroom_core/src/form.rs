//! # Form State
//!
//! The binding between a descriptor set and one live form: it owns the
//! current raw snapshot, re-validates a field whenever it changes, and on
//! submit runs the particle count formula and writes the result into the
//! computed field.
//!
//! Each `FormState` owns its snapshot; several forms can share one
//! descriptor set without seeing each other's values.
//!
//! ## Example
//!
//! ```rust
//! use cleanroom_core::descriptors::{cleanroom_fields, ISO_CLEANROOM_PARTICLE};
//! use cleanroom_core::form::FormState;
//! use cleanroom_core::raw::RawValue;
//!
//! let mut form = FormState::new(cleanroom_fields());
//! assert!(form.set_value("iso_class", RawValue::text("6"))?.is_none());
//!
//! let submission = form.submit()?;
//! assert!(submission.result.particles_per_m3 > 0.0);
//! assert!(form.value(ISO_CLEANROOM_PARTICLE).unwrap().to_number().is_some());
//! # Ok::<(), cleanroom_core::errors::CalcError>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculations::particle_count::{self, ParticleCountInput, ParticleCountResult};
use crate::descriptors::{DescriptorSet, FieldDescriptor, ISO_CLEANROOM_PARTICLE};
use crate::errors::{CalcError, CalcResult, FieldError};
use crate::raw::RawValue;
use crate::validation::{build_aggregate, AggregateRule, FieldValues, RawInput, ValidationErrors};

static EMPTY: RawValue = RawValue::Empty;

/// Outcome of a successful submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Validated values the formula ran on (before the computed field was written)
    pub values: FieldValues,
    pub result: ParticleCountResult,
}

/// One form instance over a descriptor set.
#[derive(Debug, Clone)]
pub struct FormState<'a> {
    descriptors: &'a DescriptorSet,
    rule: AggregateRule,
    values: BTreeMap<String, RawValue>,
    errors: ValidationErrors,
}

impl<'a> FormState<'a> {
    /// Fresh form seeded with each field's default (or empty).
    pub fn new(descriptors: &'a DescriptorSet) -> Self {
        Self {
            descriptors,
            rule: build_aggregate(descriptors),
            values: descriptors.defaults(),
            errors: ValidationErrors::default(),
        }
    }

    pub fn descriptors(&self) -> &'a DescriptorSet {
        self.descriptors
    }

    /// The aggregate validator this form checks against
    pub fn rule(&self) -> &AggregateRule {
        &self.rule
    }

    /// Current raw value of a field
    pub fn value(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    /// Descriptors paired with their current values, in presentation order
    pub fn fields(&self) -> impl Iterator<Item = (&'a FieldDescriptor, &RawValue)> + '_ {
        self.descriptors
            .iter()
            .map(move |d| (d, self.values.get(&d.name).unwrap_or(&EMPTY)))
    }

    /// Current raw snapshot
    pub fn raw_input(&self) -> RawInput {
        RawInput::from(self.values.clone())
    }

    /// Errors reported by change events and the last submit
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    /// Store a user-entered value and re-validate that field alone.
    ///
    /// Returns the field's error, if it now has one.
    pub fn set_value(&mut self, name: &str, raw: RawValue) -> CalcResult<Option<FieldError>> {
        let descriptor = self
            .descriptors
            .get(name)
            .ok_or_else(|| CalcError::unknown_field(name))?;
        if descriptor.disabled {
            return Err(CalcError::FieldDisabled {
                field: name.to_string(),
            });
        }

        let outcome = self
            .rule
            .validate_field(name, &raw)
            .ok_or_else(|| CalcError::unknown_field(name))?;
        self.values.insert(name.to_string(), raw);

        match outcome {
            Ok(_) => {
                self.errors.remove(name);
                Ok(None)
            }
            Err(error) => {
                debug!(field = name, %error, "field changed to invalid value");
                self.errors.insert(name, error.clone());
                Ok(Some(error))
            }
        }
    }

    /// Restore every field to its default and clear errors.
    pub fn reset(&mut self) {
        self.values = self.descriptors.defaults();
        self.errors = ValidationErrors::default();
    }

    /// Validate the whole form and, if valid, compute the particle count.
    ///
    /// On validation failure nothing is computed and the computed field keeps
    /// its previous value. On success the result is written into the computed
    /// field without being re-validated.
    pub fn submit(&mut self) -> CalcResult<Submission> {
        let values = match self.rule.validate(&self.raw_input()) {
            Ok(values) => values,
            Err(errors) => {
                debug!(failed = errors.len(), "submit blocked by invalid fields");
                self.errors = errors.clone();
                return Err(CalcError::ValidationFailed { errors });
            }
        };
        self.errors = ValidationErrors::default();

        let input = ParticleCountInput::from_values(&values)?;
        let result = particle_count::calculate(&input)?;
        info!(
            iso_class = input.iso_class,
            particle_size_um = input.particle_size_um,
            particles_per_m3 = result.particles_per_m3,
            "computed cleanroom particle count"
        );

        if self.descriptors.contains(ISO_CLEANROOM_PARTICLE) {
            self.values.insert(
                ISO_CLEANROOM_PARTICLE.to_string(),
                RawValue::Number(result.particles_per_m3),
            );
        }

        Ok(Submission { values, result })
    }
}
