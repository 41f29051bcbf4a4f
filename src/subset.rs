use crate::error::{SubsetError, SubsetErrorKind};
use crate::json_selector::Selector;
use crate::kind::{scalars_equal, Shape, ValueKind};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Checks that `expected` is a structural subset of `actual`.
///
/// Objects may carry extra keys in `actual`. Arrays are matched without regard
/// to order: each element of `expected`, taken in order, consumes the first
/// still-unused element of `actual` it is a subset of. This first-fit pass is
/// not a full bipartite matching, so an early element can claim the only
/// element a later one would have matched. Scalars must be equal, with no
/// coercion between kinds.
///
/// Returns the first mismatch found.
pub fn is_subset(expected: &Value, actual: &Value) -> Result<(), SubsetError> {
    compare_values(expected, actual).map_err(|error| {
        debug!(path = %error.path(), "subset check failed: {}", error);
        error
    })
}

fn compare_values(expected: &Value, actual: &Value) -> Result<(), SubsetError> {
    match (expected, actual) {
        (Value::Object(v1), Value::Object(v2)) => compare_maps(v1, v2),
        (Value::Array(v1), Value::Array(v2)) => compare_arrays_of_values(v1, v2),
        (_, _) => compare_scalars(expected, actual),
    }
}

fn compare_scalars(expected: &Value, actual: &Value) -> Result<(), SubsetError> {
    let expected_kind = ValueKind::of(expected);
    let actual_kind = ValueKind::of(actual);

    if expected_kind.shape() != Shape::Scalar || actual_kind.shape() != Shape::Scalar {
        return Err(SubsetError::new(SubsetErrorKind::TypeMismatch {
            expected: expected_kind,
            actual: actual_kind,
        }));
    }

    if scalars_equal(expected, actual) {
        Ok(())
    } else {
        Err(SubsetError::new(SubsetErrorKind::ValueMismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        }))
    }
}

fn compare_maps(
    expected: &Map<String, Value>,
    actual: &Map<String, Value>,
) -> Result<(), SubsetError> {
    for (key, expected_value) in expected {
        match actual.get(key) {
            None => {
                return Err(SubsetError::new(SubsetErrorKind::MissingKey(
                    key.to_string(),
                )))
            }
            Some(actual_value) => compare_values(expected_value, actual_value)
                .map_err(|error| error.within(Selector::Key(key.to_string())))?,
        }
    }

    Ok(())
}

fn compare_arrays_of_values(expected: &[Value], actual: &[Value]) -> Result<(), SubsetError> {
    if expected.len() > actual.len() {
        return Err(SubsetError::new(SubsetErrorKind::LengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        }));
    }

    let mut consumed = vec![false; actual.len()];

    for (index, expected_item) in expected.iter().enumerate() {
        let mut first_failure = None;
        let mut matched = None;

        for (candidate, actual_item) in actual.iter().enumerate() {
            if consumed[candidate] {
                continue;
            }

            match compare_values(expected_item, actual_item) {
                Ok(()) => {
                    trace!(index, candidate, "matched array element");
                    matched = Some(candidate);
                    break;
                }
                Err(error) => {
                    trace!(index, candidate, "array element candidate rejected: {}", error);
                    first_failure.get_or_insert(error);
                }
            }
        }

        match (matched, first_failure) {
            (Some(candidate), _) => consumed[candidate] = true,
            (None, cause) => {
                let error = SubsetError::new(SubsetErrorKind::ElementNotFound { index });
                return Err(match cause {
                    Some(cause) => error.caused_by(cause.within(Selector::ArrayIndex(index))),
                    None => error,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_selector::JsonSelector;
    use serde_json::Value;

    #[test]
    fn accepts_extra_keys() {
        assert_eq!(
            is_subset(
                &json("{\"hello\": \"world\"}"),
                &json("{\"hello\": \"world\", \"bye\": \"moon\"}")
            ),
            Ok(())
        );
        assert_eq!(is_subset(&json("{}"), &json("{}")), Ok(()));
        assert_eq!(is_subset(&json("{}"), &json("{\"a\": [1]}")), Ok(()));
    }

    #[test]
    fn rejects_mismatched_values() {
        let error = is_subset(
            &json("{\"hello\": \"moon\"}"),
            &json("{\"hello\": \"world\", \"bye\": \"moon\"}"),
        )
        .unwrap_err();

        assert_eq!(
            error.kind(),
            &SubsetErrorKind::ValueMismatch {
                expected: json("\"moon\""),
                actual: json("\"world\"")
            }
        );
        assert_eq!(
            error.to_string(),
            "/hello: value mismatch, expected: \"moon\" != actual: \"world\""
        );
    }

    #[test]
    fn rejects_missing_keys() {
        let error = is_subset(&json("{\"hello\": \"world\"}"), &json("{}")).unwrap_err();

        assert_eq!(
            error.kind(),
            &SubsetErrorKind::MissingKey("hello".to_string())
        );
        assert_eq!(error.path(), JsonSelector::FullDocument);
        assert_eq!(error.to_string(), "key is missing from map: hello");

        let error = is_subset(
            &json("{\"spec\": {\"replicas\": 1}}"),
            &json("{\"spec\": {}}"),
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "/spec: key is missing from map: replicas");
    }

    #[test]
    fn compares_nested_objects() {
        assert_eq!(
            is_subset(
                &json("{\"a\": {\"b\": \"c\"}}"),
                &json("{\"a\": {\"b\": \"c\", \"d\": \"e\"}}")
            ),
            Ok(())
        );

        let error = is_subset(
            &json("{\"a\": {\"b\": \"x\"}}"),
            &json("{\"a\": {\"b\": \"y\"}}"),
        )
        .unwrap_err();
        assert_eq!(
            error.path(),
            JsonSelector::JsonSelector(vec![
                Selector::Key("a".to_string()),
                Selector::Key("b".to_string())
            ])
        );
    }

    #[test]
    fn rejects_mismatched_types() {
        assert_eq!(
            is_subset(
                &json("{\"hello\": {\"hello\": \"moon\"}}"),
                &json("{\"hello\": \"world\"}")
            )
            .unwrap_err()
            .kind(),
            &SubsetErrorKind::TypeMismatch {
                expected: ValueKind::Object,
                actual: ValueKind::String
            }
        );

        assert_eq!(
            is_subset(&json("{}"), &json("3")).unwrap_err().kind(),
            &SubsetErrorKind::TypeMismatch {
                expected: ValueKind::Object,
                actual: ValueKind::Number
            }
        );

        assert_eq!(
            is_subset(&json("[]"), &json("{}")).unwrap_err().kind(),
            &SubsetErrorKind::TypeMismatch {
                expected: ValueKind::Array,
                actual: ValueKind::Object
            }
        );

        assert_eq!(
            is_subset(&json("\"a\""), &json("[\"a\"]")).unwrap_err().kind(),
            &SubsetErrorKind::TypeMismatch {
                expected: ValueKind::String,
                actual: ValueKind::Array
            }
        );
    }

    #[test]
    fn scalars_of_different_kinds_are_value_mismatches() {
        assert_eq!(
            is_subset(&json("1"), &json("\"1\"")).unwrap_err().kind(),
            &SubsetErrorKind::ValueMismatch {
                expected: json("1"),
                actual: json("\"1\"")
            }
        );
        assert!(is_subset(&json("null"), &json("false")).is_err());
        assert_eq!(is_subset(&json("null"), &json("null")), Ok(()));
    }

    #[test]
    fn compares_identical_arrays() {
        assert_eq!(
            is_subset(
                &json("{\"hello\": [1, 2, 3]}"),
                &json("{\"hello\": [1, 2, 3]}")
            ),
            Ok(())
        );
    }

    #[test]
    fn matches_array_elements_by_subset() {
        assert_eq!(
            is_subset(
                &json("{\"hello\": {\"hello\": [{\"image\": \"hello\"}]}}"),
                &json("{\"hello\": {\"hello\": [{\"image\": \"hello\", \"bye\": \"moon\"}]}}")
            ),
            Ok(())
        );

        assert_eq!(
            is_subset(
                &json("{\"hello\": {\"hello\": [{\"image\": \"hello\"}]}}"),
                &json(
                    "{\"hello\": {\"hello\": [{\"image\": \"hello\", \"bye\": \"moon\"}, {\"bye\": \"moon\"}]}}"
                )
            ),
            Ok(())
        );
    }

    #[test]
    fn reports_unmatched_array_elements() {
        let error = is_subset(
            &json("{\"hello\": {\"hello\": [{\"image\": \"hello\"}]}}"),
            &json("{\"hello\": {\"hello\": [{\"image\": \"world\"}]}}"),
        )
        .unwrap_err();

        assert_eq!(
            error.kind(),
            &SubsetErrorKind::ElementNotFound { index: 0 }
        );
        assert_eq!(error.path().to_string(), "/hello/hello");

        let cause = error.cause().unwrap();
        assert_eq!(cause.path().to_string(), "/hello/hello/0/image");
        assert_eq!(
            format!("{:#}", error),
            "/hello/hello: no unmatched element in actual satisfies expected element 0; \
             caused by: /hello/hello/0/image: value mismatch, expected: \"hello\" != actual: \"world\""
        );
        assert_eq!(
            cause.kind(),
            &SubsetErrorKind::ValueMismatch {
                expected: json("\"hello\""),
                actual: json("\"world\"")
            }
        );
    }

    #[test]
    fn ignores_array_order() {
        assert_eq!(
            is_subset(
                &json("[{\"n\": \"a\"}, {\"n\": \"b\"}]"),
                &json("[{\"n\": \"b\"}, {\"n\": \"a\"}]")
            ),
            Ok(())
        );
        assert_eq!(is_subset(&json("[3, 1]"), &json("[1, 2, 3]")), Ok(()));
    }

    #[test]
    fn rejects_longer_expected_arrays_before_looking_at_elements() {
        let error = is_subset(&json("[1, 2, 3]"), &json("[\"x\", \"y\"]")).unwrap_err();

        assert_eq!(
            error.kind(),
            &SubsetErrorKind::LengthMismatch {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(error.message(), "expected length longer than actual: 3 > 2");
    }

    #[test]
    fn consumes_matched_elements() {
        let error = is_subset(&json("[1, 1]"), &json("[1, 2]")).unwrap_err();

        assert_eq!(
            error.kind(),
            &SubsetErrorKind::ElementNotFound { index: 1 }
        );
        assert_eq!(
            error.cause().map(|cause| cause.kind()),
            Some(&SubsetErrorKind::ValueMismatch {
                expected: json("1"),
                actual: json("2")
            })
        );

        assert_eq!(is_subset(&json("[1, 1]"), &json("[2, 1, 1]")), Ok(()));
    }

    #[test]
    fn first_fit_can_miss_a_valid_pairing() {
        // {"a": 1} claims the first element, leaving nothing for {"b": 2}
        // even though swapping the pairing would satisfy both.
        let error = is_subset(
            &json("[{\"a\": 1}, {\"b\": 2}]"),
            &json("[{\"a\": 1, \"b\": 2}, {\"a\": 1}]"),
        )
        .unwrap_err();

        assert_eq!(
            error.kind(),
            &SubsetErrorKind::ElementNotFound { index: 1 }
        );
    }

    #[test]
    fn reports_first_failure_in_document_order() {
        let error = is_subset(
            &json("{\"a\": 1, \"b\": {\"c\": 2}, \"d\": 3}"),
            &json("{\"a\": 1, \"b\": {\"c\": 4}}"),
        )
        .unwrap_err();

        assert_eq!(error.path().to_string(), "/b/c");
    }

    #[test]
    fn visits_keys_in_the_order_they_are_written() {
        let error = is_subset(
            &json("{\"zeta\": 1, \"alpha\": 2}"),
            &json("{\"zeta\": 9, \"alpha\": 9}"),
        )
        .unwrap_err();

        assert_eq!(error.path().to_string(), "/zeta");
    }

    #[test]
    fn nested_length_mismatch_is_the_cause_of_an_unmatched_element() {
        let error = is_subset(
            &json("{\"containers\": [{\"env\": [1, 2, 3]}]}"),
            &json("{\"containers\": [{\"env\": [1, 2]}]}"),
        )
        .unwrap_err();

        assert_eq!(
            error.kind(),
            &SubsetErrorKind::ElementNotFound { index: 0 }
        );
        assert_eq!(error.path().to_string(), "/containers");

        let cause = error.cause().unwrap();
        assert_eq!(
            cause.kind(),
            &SubsetErrorKind::LengthMismatch {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(
            cause.to_string(),
            "/containers/0/env: expected length longer than actual: 3 > 2"
        );
    }

    #[test]
    fn every_value_is_a_subset_of_itself() {
        for value in &[
            json("null"),
            json("\"text\""),
            json("[1, [2, 3], {\"a\": [true, null]}]"),
            json("{\"spec\": {\"containers\": [{\"env\": [{\"name\": \"a\"}, {\"name\": \"a\"}]}]}}"),
        ] {
            assert_eq!(is_subset(value, value), Ok(()));
        }
    }

    fn json(input: &str) -> Value {
        serde_json::from_str(input).unwrap()
    }
}
