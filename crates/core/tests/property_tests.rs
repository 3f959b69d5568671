//! Property-based tests for status aggregation and the built-in rules.

use flowforms_core::prelude::*;
use futures::executor::block_on;
use proptest::prelude::*;

fn any_code() -> impl Strategy<Value = StatusCode> {
    prop_oneof![
        Just(StatusCode::Unmodified),
        Just(StatusCode::InProgress),
        Just(StatusCode::Correct),
        Just(StatusCode::RequiredUnsatisfied),
        Just(StatusCode::RequiredTrueUnsatisfied),
        Just(StatusCode::MinLengthUnsatisfied),
        Just(StatusCode::BasicEmailFormatUnsatisfied),
        Just(StatusCode::MatchRegexUnsatisfied),
        Just(StatusCode::MatchUnsatisfied),
        Just(StatusCode::CatastrophicError),
        Just(StatusCode::Custom("CUSTOM_UNSATISFIED")),
    ]
}

fn named(codes: &[StatusCode]) -> Vec<(String, StatusCode)> {
    codes
        .iter()
        .enumerate()
        .map(|(i, code)| (format!("field_{i}"), *code))
        .collect()
}

fn aggregate(fields: &[(String, StatusCode)]) -> FormStatus {
    FormStatus::aggregate(fields.iter().map(|(name, code)| (name.as_str(), *code)))
}

// ============================================================================
// AGGREGATION
// ============================================================================

proptest! {
    #[test]
    fn aggregate_is_pure(codes in prop::collection::vec(any_code(), 0..12)) {
        let fields = named(&codes);
        prop_assert_eq!(aggregate(&fields), aggregate(&fields));
    }

    #[test]
    fn aggregate_names_the_deciding_field(codes in prop::collection::vec(any_code(), 0..12)) {
        let fields = named(&codes);
        let status = aggregate(&fields);

        let deciding = fields
            .iter()
            .find(|(_, code)| code.is_in_progress())
            .or_else(|| fields.iter().find(|(_, code)| code.blocks_form()));

        match deciding {
            Some((name, code)) => {
                prop_assert_eq!(status.code(), *code);
                prop_assert_eq!(status.field(), Some(name.as_str()));
            }
            None => {
                prop_assert!(status.is_correct());
                prop_assert_eq!(status.field(), None);
            }
        }
    }

    #[test]
    fn non_blocking_fields_do_not_matter(
        codes in prop::collection::vec(any_code(), 0..12),
        filler in prop::collection::vec(
            prop_oneof![Just(StatusCode::Unmodified), Just(StatusCode::Correct)],
            0..6,
        ),
    ) {
        let fields = named(&codes);
        let mut padded = fields.clone();
        padded.extend(
            filler
                .iter()
                .enumerate()
                .map(|(i, code)| (format!("filler_{i}"), *code)),
        );
        prop_assert_eq!(aggregate(&fields), aggregate(&padded));
    }
}

// ============================================================================
// RULES
// ============================================================================

proptest! {
    #[test]
    fn min_length_counts_chars(s in "\\PC{0,20}", min in 0usize..20) {
        let result = block_on(MinLength::new(min).validate(&ValidationContext::for_value(s.as_str())))
            .unwrap();
        prop_assert_eq!(result.is_correct(), s.chars().count() >= min);
    }

    #[test]
    fn required_rejects_blank_text(s in "[ \t\n]{0,10}") {
        let result = block_on(Required::new().validate(&ValidationContext::for_value(s.as_str())))
            .unwrap();
        prop_assert_eq!(result.code(), StatusCode::RequiredUnsatisfied);
    }

    #[test]
    fn regex_is_anchored(s in "[a-z]{1,8}[0-9]{1,3}") {
        let rule = MatchRegex::new("[a-z]+").unwrap();
        let result = block_on(rule.validate(&ValidationContext::for_value(s.as_str()))).unwrap();
        prop_assert_eq!(result.code(), StatusCode::MatchRegexUnsatisfied);
    }

    #[test]
    fn match_field_agrees_with_equality(a in "[a-z0-9]{0,6}", b in "[a-z0-9]{0,6}") {
        let ctx = ValidationContext::with_siblings(a.as_str(), [("target", b.as_str())]);
        let result = block_on(MatchField::new("target").validate(&ctx)).unwrap();
        prop_assert_eq!(result.is_correct(), a == b);
    }
}
