//! Shape comparison between a live response and a curated one

use serde_json::Value;

/// Identity fields that must be present when the curated response has them
pub const ID_FIELDS: [&str; 3] = ["id", "object", "created"];

/// Output fields whose value type must match the curated response
pub const TYPED_FIELDS: [&str; 13] = [
    // AI detection
    "isAI",
    "confidence",
    "predictions",
    "similarity",
    "fqdn",
    // Text analysis
    "answer",
    "error",
    "segmentation_tokens",
    "deep_scan",
    // Chat and completion
    "content",
    "choices",
    "usage",
    "finish_reason",
];

/// Problems found in a response; empty means it passed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compare `actual` with the curated `expected` response
///
/// Values are never compared, only presence of [`ID_FIELDS`] and the JSON
/// type of [`TYPED_FIELDS`] found in both. Without a curated response any
/// non-null reply passes. Two arrays always pass.
pub fn validate_response(actual: &Value, expected: Option<&Value>) -> ValidationResult {
    let mut result = ValidationResult::default();

    let expected = match expected {
        Some(Value::Null) | None => {
            if actual.is_null() {
                result.errors.push("Response is empty".to_string());
            }
            return result;
        }
        Some(expected) => expected,
    };

    if expected.is_array() && actual.is_array() {
        return result;
    }

    for field in ID_FIELDS {
        if expected.get(field).is_some() && actual.get(field).is_none() {
            result.errors.push(format!("Missing field: {}", field));
        }
    }

    for field in TYPED_FIELDS {
        let (Some(want), Some(got)) = (expected.get(field), actual.get(field)) else {
            continue;
        };
        let mismatch = match want {
            Value::Array(_) if !got.is_array() => Some("an array"),
            Value::Bool(_) if !got.is_boolean() => Some("a boolean"),
            Value::Number(_) if !got.is_number() => Some("a number"),
            Value::String(_) if !got.is_string() => Some("a string"),
            _ => None,
        };
        if let Some(kind) = mismatch {
            result
                .errors
                .push(format!("Field {} should be {}", field, kind));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_without_expected_only_needs_a_value() {
        assert!(validate_response(&json!({"anything": 1}), None).is_valid());
        assert!(validate_response(&json!(""), Some(&Value::Null)).is_valid());
        assert_eq!(
            validate_response(&Value::Null, None).errors,
            vec!["Response is empty"]
        );
    }

    #[test]
    fn test_arrays_pass() {
        assert!(validate_response(&json!([]), Some(&json!([{"id": 1}]))).is_valid());
    }

    #[test]
    fn test_missing_id_fields() {
        let result = validate_response(
            &json!({"id": "x"}),
            Some(&json!({"id": "y", "object": "chat.completion", "created": 1})),
        );
        assert_eq!(
            result.errors,
            vec!["Missing field: object", "Missing field: created"]
        );
    }

    #[test]
    fn test_typed_fields_compare_types_not_values() {
        let expected = json!({
            "isAI": true,
            "confidence": 0.93,
            "predictions": [0.1],
            "answer": "yes",
            "usage": {"tokens": 3}
        });

        let same_types = json!({
            "isAI": false,
            "confidence": 1,
            "predictions": [],
            "answer": "no",
            "usage": "n/a"
        });
        assert!(validate_response(&same_types, Some(&expected)).is_valid());

        let wrong_types = json!({
            "isAI": "false",
            "confidence": "high",
            "predictions": {},
            "answer": 42
        });
        assert_eq!(
            validate_response(&wrong_types, Some(&expected)).errors,
            vec![
                "Field isAI should be a boolean",
                "Field confidence should be a number",
                "Field predictions should be an array",
                "Field answer should be a string",
            ]
        );
    }

    #[test]
    fn test_unlisted_and_absent_fields_ignored() {
        let result = validate_response(
            &json!({"result": 1}),
            Some(&json!({"result": "x", "answer": "y"})),
        );
        assert!(result.is_valid());
    }
}
