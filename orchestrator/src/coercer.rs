// orchestrator/src/coercer.rs

//! Fits parsed model output onto a declared [`OutputShape`].
//!
//! Near misses are repaired instead of rejected: an object where a string
//! belongs is pretty-printed, list items that are not strings are
//! stringified. Lenient fields that are missing or unusable take their empty
//! value. Keys the shape does not declare are dropped.

use advisory_core::{json_type_name, OutputField, OutputKind, OutputShape, ShapeError};
use serde_json::{Map, Value};

pub fn coerce(content: Value, shape: &OutputShape) -> Result<Value, ShapeError> {
    match content {
        Value::Object(object) => coerce_record(object, shape.fields(), "$").map(Value::Object),
        _ => Err(ShapeError::NotAnObject { path: "$".to_string() }),
    }
}

fn coerce_record(
    mut object: Map<String, Value>,
    fields: &[OutputField],
    path: &str,
) -> Result<Map<String, Value>, ShapeError> {
    let mut coerced = Map::new();

    for field in fields {
        let field_path = format!("{path}.{}", field.name);
        let value = match object.remove(field.name).filter(|value| !value.is_null()) {
            Some(value) => match coerce_value(value, field.kind, &field_path) {
                Ok(value) => value,
                Err(_) if field.lenient => field.kind.empty(),
                Err(err) => return Err(err),
            },
            None if field.lenient => field.kind.empty(),
            None => return Err(ShapeError::MissingField { path: field_path }),
        };
        coerced.insert(field.name.to_string(), value);
    }

    Ok(coerced)
}

fn coerce_value(value: Value, kind: OutputKind, path: &str) -> Result<Value, ShapeError> {
    match (kind, value) {
        (OutputKind::Text, value) => Ok(Value::String(stringify(value))),
        (OutputKind::TextList, Value::Array(items)) => Ok(Value::Array(
            items.into_iter().map(|item| Value::String(stringify(item))).collect(),
        )),
        (OutputKind::Records(fields), Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let item_path = format!("{path}[{index}]");
                match item {
                    Value::Object(object) => coerce_record(object, fields, &item_path).map(Value::Object),
                    other => Err(ShapeError::Mismatch {
                        path: item_path,
                        expected: "an object",
                        found: json_type_name(&other),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (kind, other) => Err(ShapeError::Mismatch {
            path: path.to_string(),
            expected: kind.describe(),
            found: json_type_name(&other),
        }),
    }
}

/// Strings pass through; objects and arrays are pretty-printed; other scalars
/// use their JSON text.
pub fn stringify(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const THREATS: OutputShape = OutputShape::new(&[
        OutputField::text_list("pestThreats"),
        OutputField::text_list("chemicalTreatments").lenient(),
    ]);

    const SUGGESTION: &[OutputField] = &[OutputField::text("suggestion")];
    const SOIL: OutputShape = OutputShape::new(&[
        OutputField::records("fertilizerSuggestions", SUGGESTION),
        OutputField::text("note").lenient(),
    ]);

    const DIAGNOSIS: OutputShape = OutputShape::new(&[
        OutputField::text("disease"),
        OutputField::text("solution"),
    ]);

    #[test]
    fn mixed_lists_become_all_strings() {
        let content = json!({
            "pestThreats": ["Aphids", {"name": "Stem borer", "risk": "high"}, 3],
            "chemicalTreatments": []
        });

        let coerced = coerce(content, &THREATS).unwrap();
        let threats = coerced["pestThreats"].as_array().unwrap();

        assert!(threats.iter().all(Value::is_string));
        assert_eq!(threats[0], "Aphids");
        assert_eq!(threats[1], "{\n  \"name\": \"Stem borer\",\n  \"risk\": \"high\"\n}");
        assert_eq!(threats[2], "3");
        assert_eq!(THREATS.validate(&coerced), Ok(()));
    }

    #[test]
    fn objects_in_text_fields_are_pretty_printed() {
        let content = json!({
            "disease": "Leaf blight",
            "solution": {"organic": "Neem oil spray", "chemical": "Mancozeb"}
        });

        let coerced = coerce(content, &DIAGNOSIS).unwrap();
        let solution = coerced["solution"].as_str().unwrap();
        assert!(solution.starts_with("{\n  \""));
        assert!(solution.contains("\"organic\": \"Neem oil spray\""));
        assert!(solution.contains("\"chemical\": \"Mancozeb\""));
        assert_eq!(DIAGNOSIS.validate(&coerced), Ok(()));
    }

    #[test]
    fn strict_fields_must_be_present() {
        let err = coerce(json!({"disease": "Rust"}), &DIAGNOSIS).unwrap_err();
        assert_eq!(err, ShapeError::MissingField { path: "$.solution".into() });

        let err = coerce(json!({"disease": "Rust", "solution": null}), &DIAGNOSIS).unwrap_err();
        assert_eq!(err, ShapeError::MissingField { path: "$.solution".into() });
    }

    #[test]
    fn lenient_fields_fall_back_to_empty_values() {
        let coerced = coerce(json!({"pestThreats": [], "chemicalTreatments": "none"}), &THREATS).unwrap();
        assert_eq!(coerced["chemicalTreatments"], json!([]));

        let coerced = coerce(json!({"fertilizerSuggestions": []}), &SOIL).unwrap();
        assert_eq!(coerced["note"], "");
    }

    #[test]
    fn strict_list_rejects_a_bare_string() {
        let err = coerce(json!({"pestThreats": "Aphids"}), &THREATS).unwrap_err();
        assert_eq!(
            err,
            ShapeError::Mismatch {
                path: "$.pestThreats".into(),
                expected: "a list of strings",
                found: "string",
            }
        );
    }

    #[test]
    fn records_are_coerced_field_by_field() {
        let content = json!({
            "fertilizerSuggestions": [
                {"suggestion": "Apply compost", "extra": 1},
                {"suggestion": {"what": "Urea", "dose": "50 kg"}}
            ]
        });

        let coerced = coerce(content, &SOIL).unwrap();
        assert_eq!(coerced["fertilizerSuggestions"][0], json!({"suggestion": "Apply compost"}));
        assert!(coerced["fertilizerSuggestions"][1]["suggestion"]
            .as_str()
            .unwrap()
            .contains("\"what\": \"Urea\""));
        assert_eq!(SOIL.validate(&coerced), Ok(()));
    }

    #[test]
    fn records_reject_non_object_items() {
        let err = coerce(json!({"fertilizerSuggestions": ["Apply compost"]}), &SOIL).unwrap_err();
        assert_eq!(
            err,
            ShapeError::Mismatch {
                path: "$.fertilizerSuggestions[0]".into(),
                expected: "an object",
                found: "string",
            }
        );
    }

    #[test]
    fn unknown_keys_are_dropped_and_non_objects_rejected() {
        let coerced = coerce(json!({"disease": "None", "solution": "Rest", "chatter": "hi"}), &DIAGNOSIS).unwrap();
        assert_eq!(coerced, json!({"disease": "None", "solution": "Rest"}));

        assert_eq!(
            coerce(json!(["disease"]), &DIAGNOSIS),
            Err(ShapeError::NotAnObject { path: "$".into() })
        );
    }
}
