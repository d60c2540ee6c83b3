//! # Validator Builder
//!
//! Maps field descriptors to runtime validators.
//!
//! - [`build`] turns one [`FieldDescriptor`](crate::descriptors::FieldDescriptor)
//!   into a [`FieldRule`]
//! - [`build_aggregate`] turns a whole
//!   [`DescriptorSet`](crate::descriptors::DescriptorSet) into an
//!   [`AggregateRule`]
//! - [`AggregateRule::validate`] is the runtime entry point: raw snapshot in,
//!   typed values or per-field errors out
//!
//! Per field, validation runs in a fixed order: coerce, optional
//! short-circuit, type check, min, max. The first failing check decides the
//! message. Fields never affect each other.
//!
//! ## Example
//!
//! ```rust
//! use cleanroom_core::descriptors::cleanroom_fields;
//! use cleanroom_core::validation::{build_aggregate, RawInput};
//!
//! let aggregate = build_aggregate(cleanroom_fields());
//! let input = RawInput::from(cleanroom_fields().defaults())
//!     .with("iso_class", "4")
//!     .with("fan_efficiency", "abc");
//!
//! let errors = aggregate.validate(&input).unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(
//!     errors.get("iso_class").unwrap().message(),
//!     "ISO Class must be between 5 and 9"
//! );
//! ```

mod aggregate;
mod builder;
mod rule;

pub use aggregate::{AggregateRule, FieldValues, RawInput, ValidationErrors};
pub use builder::{build, build_aggregate};
pub use rule::{FieldRule, FieldValue, NumericRange};
