//! # cleanroom_core - Cleanroom Particle Calculator Engine
//!
//! `cleanroom_core` turns a declarative list of form fields into a runtime
//! validator, and computes the ISO 14644-1 particle concentration from a
//! validated form. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Builders and validators are pure; only [`form::FormState`] holds a snapshot
//! - **Declarative**: Every field's contract lives in one [`descriptors::FieldDescriptor`]
//! - **Field-scoped errors**: A bad field yields a message, never a failure of the whole pass
//!
//! ## Quick Start
//!
//! ```rust
//! use cleanroom_core::descriptors::cleanroom_fields;
//! use cleanroom_core::validation::{build_aggregate, RawInput};
//!
//! let aggregate = build_aggregate(cleanroom_fields());
//! let input = RawInput::from(cleanroom_fields().defaults()).with("iso_class", "7");
//!
//! let values = aggregate.validate(&input).unwrap();
//! assert_eq!(values.number("iso_class"), Some(7.0));
//! ```
//!
//! ## Modules
//!
//! - [`descriptors`] - Field descriptors and the built-in cleanroom form
//! - [`raw`] - Loosely typed form values and coercion
//! - [`validation`] - Validator builder and aggregate validation
//! - [`calculations`] - The particle count formula
//! - [`form`] - Live form state: change events and submit
//! - [`errors`] - Field-level and crate-level error types
//! - [`file_io`] - Loading and saving descriptor sets

pub mod calculations;
pub mod descriptors;
pub mod errors;
pub mod file_io;
pub mod form;
pub mod raw;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use descriptors::{cleanroom_fields, Bound, DescriptorSet, FieldDescriptor, FieldKind};
pub use errors::{CalcError, CalcResult, FieldError};
pub use form::{FormState, Submission};
pub use raw::RawValue;
pub use validation::{build, build_aggregate, AggregateRule, FieldRule, FieldValue, RawInput};
