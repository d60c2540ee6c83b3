//! Turning descriptors into rules.

use crate::descriptors::{DescriptorSet, FieldDescriptor, FieldKind};
use crate::errors::DEFAULT_NOT_A_NUMBER_MESSAGE;

use super::aggregate::AggregateRule;
use super::rule::{FieldRule, NumericRange};

/// Build the rule for one descriptor.
///
/// Never fails: malformed descriptors are rejected earlier, by
/// [`DescriptorSet::new`].
pub fn build(descriptor: &FieldDescriptor) -> FieldRule {
    let rule = match descriptor.kind {
        FieldKind::Text => return FieldRule::TextPassthrough,
        FieldKind::Numeric => FieldRule::NumericRange(NumericRange {
            not_a_number: descriptor
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_NOT_A_NUMBER_MESSAGE.to_string()),
            min: descriptor.min.clone(),
            max: descriptor.max.clone(),
        }),
    };

    if descriptor.optional {
        rule.optional()
    } else {
        rule
    }
}

/// Build the aggregate rule for a whole set, keyed by descriptor name.
pub fn build_aggregate(descriptors: &DescriptorSet) -> AggregateRule {
    AggregateRule::new(
        descriptors
            .iter()
            .map(|descriptor| (descriptor.name.clone(), build(descriptor)))
            .collect(),
    )
}
