//! Query-string codec.
//!
//! The client encodes a structured query object into a query string; the
//! server decodes a query string back into a structured object and runs it
//! through the endpoint's query schema for coercion and validation. Array
//! shape is the asymmetry the codec exists for: arrays travel as repeated
//! keys, and only the schema can say whether `tags=x` should decode to
//! `"x"` or `["x"]`.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::ValidationError;
use crate::schema::Schema;

/// Encodes a structured query object into a query string (no leading `?`).
///
/// Per present field: arrays emit one repeated key per element in order,
/// scalars emit a single key. `null` fields and nested objects are rejected
/// naming the offending field; only primitives and arrays of primitives are
/// legal query material. An empty object encodes to an empty string.
pub fn encode(query: &Value) -> Result<String, ValidationError> {
    let Value::Object(fields) = query else {
        return Err(ValidationError::NonPrimitiveQueryValue {
            field: "$".to_string(),
        });
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (field, value) in fields {
        match value {
            Value::Null => {
                return Err(ValidationError::NullQueryValue {
                    field: field.clone(),
                });
            }
            Value::Array(items) => {
                for item in items {
                    serializer.append_pair(field, &scalar_text(field, item)?);
                }
            }
            other => {
                serializer.append_pair(field, &scalar_text(field, other)?);
            }
        }
    }
    Ok(serializer.finish())
}

/// Decodes a raw query string against the endpoint's query schema.
///
/// Same-named keys are grouped: a field the schema declares array-typed
/// always decodes to an array (single occurrence included), preserving
/// occurrence order; for scalar fields the first occurrence is
/// authoritative and later ones are dropped. The grouped object is then
/// parsed by the schema, which performs coercion (for example string to
/// number) and validation.
pub fn decode(raw: &str, schema: &dyn Schema) -> Result<Value, ValidationError> {
    let mut grouped = Map::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        let key = key.into_owned();
        let value = Value::String(value.into_owned());
        if schema.is_array_field(&key) {
            match grouped
                .entry(key)
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                Value::Array(items) => items.push(value),
                // Unreachable: array fields are only ever inserted as arrays.
                other => *other = Value::Array(vec![value]),
            }
        } else {
            grouped.entry(key).or_insert(value);
        }
    }

    schema
        .parse(Value::Object(grouped))
        .map_err(|violation| ValidationError::Query {
            violation,
            raw: raw.to_string(),
        })
}

fn scalar_text(field: &str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            Err(ValidationError::NonPrimitiveQueryValue {
                field: field.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObjectSchema, ValueSchema};
    use serde_json::json;

    fn tasks_query_schema() -> ObjectSchema {
        ObjectSchema::new()
            .optional_field("tags", ValueSchema::array(ValueSchema::String))
            .optional_field("completed", ValueSchema::enumeration(["true", "false"]))
            .optional_field("limit", ValueSchema::Number)
    }

    #[test]
    fn test_encode_repeats_array_keys_in_order() {
        let encoded = encode(&json!({
            "tags": ["home", "urgent"],
            "completed": "false",
            "limit": 25,
        }))
        .unwrap();
        assert_eq!(encoded, "tags=home&tags=urgent&completed=false&limit=25");
    }

    #[test]
    fn test_encode_rejects_null() {
        let err = encode(&json!({"completed": null})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NullQueryValue { field } if field == "completed"
        ));
        let message = encode(&json!({"completed": null})).unwrap_err().to_string();
        assert!(message.contains("cannot be null"));
    }

    #[test]
    fn test_encode_rejects_nested_object() {
        let err = encode(&json!({"filters": {"status": "open"}})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPrimitiveQueryValue { field } if field == "filters"
        ));
        let message = encode(&json!({"filters": {"status": "open"}}))
            .unwrap_err()
            .to_string();
        assert!(message.contains("primitive value or array of primitives"));
    }

    #[test]
    fn test_encode_rejects_non_primitive_array_element() {
        let err = encode(&json!({"tags": [["nested"]]})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPrimitiveQueryValue { field } if field == "tags"
        ));
    }

    #[test]
    fn test_encode_percent_escapes() {
        let encoded = encode(&json!({"q": "a b&c"})).unwrap();
        assert_eq!(encoded, "q=a+b%26c");
    }

    #[test]
    fn test_decode_groups_repeated_keys() {
        let schema = tasks_query_schema();
        let decoded = decode("tags=one&tags=two&completed=true&limit=3", &schema).unwrap();
        assert_eq!(
            decoded,
            json!({"tags": ["one", "two"], "completed": "true", "limit": 3})
        );
    }

    #[test]
    fn test_decode_single_occurrence_of_array_field_stays_array() {
        let schema = tasks_query_schema();
        let decoded = decode("tags=only-one", &schema).unwrap();
        assert_eq!(decoded, json!({"tags": ["only-one"]}));
    }

    #[test]
    fn test_decode_scalar_field_first_occurrence_wins() {
        let schema = tasks_query_schema();
        let decoded = decode("limit=3&limit=9", &schema).unwrap();
        assert_eq!(decoded, json!({"limit": 3}));
    }

    #[test]
    fn test_decode_coerces_through_schema() {
        let schema = tasks_query_schema();
        let decoded = decode("limit=25", &schema).unwrap();
        assert_eq!(decoded, json!({"limit": 25}));
    }

    #[test]
    fn test_decode_surfaces_schema_failures() {
        let schema = tasks_query_schema();
        let err = decode("completed=maybe", &schema).unwrap_err();
        match err {
            ValidationError::Query { violation, raw } => {
                assert_eq!(violation.path, "$.completed");
                assert_eq!(raw, "completed=maybe");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_round_trip() {
        let schema = tasks_query_schema();
        let original = json!({"tags": ["x", "y"], "completed": "true", "limit": 7});
        let decoded = decode(&encode(&original).unwrap(), &schema).unwrap();
        assert_eq!(decoded, original);
    }
}
