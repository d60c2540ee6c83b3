use cleanroom_core::descriptors::{cleanroom_fields, Bound, FieldDescriptor};
use cleanroom_core::validation::{build, build_aggregate, FieldValue, RawInput};
use cleanroom_core::{FieldError, RawValue};
use proptest::prelude::*;

fn bounded(optional: bool) -> FieldDescriptor {
    let field = FieldDescriptor::numeric("x", "X")
        .with_message("x is not a number")
        .with_min(Bound::new(-10.0, "x too small"))
        .with_max(Bound::new(10.0, "x too large"));
    if optional {
        field.optional()
    } else {
        field
    }
}

fn empty_inputs() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        Just(RawValue::Empty),
        Just(RawValue::text("")),
    ]
}

proptest! {
    #[test]
    fn required_empty_is_not_a_number(raw in empty_inputs()) {
        for descriptor in cleanroom_fields().iter().filter(|d| !d.optional) {
            let err = build(descriptor).validate(&raw).unwrap_err();
            prop_assert!(
                matches!(err, FieldError::NotANumber { .. }),
                "expected NotANumber for {}, got {:?}",
                descriptor.name,
                err
            );
        }
    }

    #[test]
    fn optional_empty_is_absent(raw in empty_inputs()) {
        prop_assert_eq!(build(&bounded(true)).validate(&raw), Ok(FieldValue::Absent));
    }

    #[test]
    fn bounds_are_inclusive(v in -20.0f64..20.0) {
        let outcome = build(&bounded(false)).validate(&RawValue::Number(v));
        if v < -10.0 {
            prop_assert_eq!(outcome, Err(FieldError::below_minimum("x too small", -10.0)));
        } else if v > 10.0 {
            prop_assert_eq!(outcome, Err(FieldError::above_maximum("x too large", 10.0)));
        } else {
            prop_assert_eq!(outcome, Ok(FieldValue::Number(v)));
        }
    }

    #[test]
    fn text_and_number_coerce_alike(v in -1e6f64..1e6) {
        let rule = build(&bounded(false));
        prop_assert_eq!(
            rule.validate(&RawValue::Number(v)),
            rule.validate(&RawValue::text(v.to_string()))
        );
    }

    #[test]
    fn whitespace_reads_as_zero(blank in "[ \t]{1,4}") {
        let raw = RawValue::Text(blank);
        prop_assert_eq!(build(&bounded(false)).validate(&raw), Ok(FieldValue::Number(0.0)));
        prop_assert_eq!(build(&bounded(true)).validate(&raw), Ok(FieldValue::Number(0.0)));
    }

    #[test]
    fn letters_are_never_numbers(word in "[g-zG-Z]{1,8}") {
        let err = build(&bounded(true)).validate(&RawValue::text(word)).unwrap_err();
        prop_assert_eq!(err.message(), "x is not a number");
    }

    #[test]
    fn fields_fail_independently(iso in "[a-z]{0,3}|[0-9]{1,2}", size in -5.0f64..10.0) {
        let aggregate = build_aggregate(cleanroom_fields());
        let defaults = RawInput::from(cleanroom_fields().defaults());

        let with_size = defaults.clone().with("particle_size", size);
        let both = with_size.clone().with("iso_class", iso.as_str());

        let size_error = |input: &RawInput| {
            aggregate
                .validate(input)
                .err()
                .and_then(|e| e.get("particle_size").cloned())
        };
        let size_alone = size_error(&with_size);
        let size_with_iso = size_error(&both);
        prop_assert_eq!(size_alone, size_with_iso);
    }
}
