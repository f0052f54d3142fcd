//! Request-body codec.
//!
//! An endpoint accepts exactly one body encoding, chosen by [`BodyKind`].
//! Keeping this a two-variant enum (rather than a string compared at each
//! call site) makes the unknown-encoding failure mode unrepresentable.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::schema::Schema;

/// The body encoding an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    /// `application/json` bodies.
    #[default]
    Json,
    /// `multipart/form-data` bodies, one text field per input property.
    MultipartForm,
}

/// A client-side body ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Serialized JSON text.
    Json(String),
    /// Ordered form fields; the transport builds the multipart payload (and
    /// its boundary) from these.
    Form(Vec<(String, String)>),
}

/// Encodes a client-side input body per the endpoint's accepted kind.
///
/// The input is first encoded through the input schema; JSON bodies then
/// serialize the whole value, multipart bodies emit one text field per
/// top-level property. `null` properties are skipped in multipart form
/// (mirroring "absent" semantics), and non-object inputs cannot become
/// forms.
pub fn encode(
    kind: BodyKind,
    schema: &dyn Schema,
    input: Value,
) -> Result<RequestBody, ValidationError> {
    let encoded = schema
        .encode(input.clone())
        .map_err(|violation| ValidationError::Body {
            violation,
            raw: input,
        })?;

    match kind {
        BodyKind::Json => Ok(RequestBody::Json(encoded.to_string())),
        BodyKind::MultipartForm => {
            let Value::Object(properties) = encoded else {
                return Err(ValidationError::Body {
                    violation: crate::schema::SchemaViolation::root(
                        "multipart bodies must be objects",
                    ),
                    raw: encoded,
                });
            };
            let fields = properties
                .into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(name, value)| (name, field_text(value)))
                .collect();
            Ok(RequestBody::Form(fields))
        }
    }
}

/// Decodes and validates a server-side JSON body.
pub fn decode_json(schema: &dyn Schema, bytes: &[u8]) -> Result<Value, ValidationError> {
    let parsed: Value =
        serde_json::from_slice(bytes).map_err(|source| ValidationError::BodyParse { source })?;
    schema
        .parse(parsed.clone())
        .map_err(|violation| ValidationError::Body {
            violation,
            raw: parsed,
        })
}

/// Decodes and validates a server-side form body.
///
/// The route primitive supplies one value per field name (repeated keys are
/// not specially handled); the resulting string object is run through the
/// input schema, whose coercion turns numeric text back into numbers.
pub fn decode_form(
    schema: &dyn Schema,
    fields: BTreeMap<String, String>,
) -> Result<Value, ValidationError> {
    let object: Map<String, Value> = fields
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();
    let raw = Value::Object(object);
    schema
        .parse(raw.clone())
        .map_err(|violation| ValidationError::Body { violation, raw })
}

fn field_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObjectSchema, ValueSchema};
    use serde_json::json;

    fn create_task_schema() -> ObjectSchema {
        ObjectSchema::new()
            .field("title", ValueSchema::String)
            .optional_field("priority", ValueSchema::Number)
    }

    #[test]
    fn test_encode_json() {
        let schema = create_task_schema();
        let body = encode(BodyKind::Json, &schema, json!({"title": "Buy groceries"})).unwrap();
        assert_eq!(
            body,
            RequestBody::Json("{\"title\":\"Buy groceries\"}".to_string())
        );
    }

    #[test]
    fn test_encode_json_validates() {
        let schema = create_task_schema();
        let err = encode(BodyKind::Json, &schema, json!({"priority": 2})).unwrap_err();
        assert!(matches!(err, ValidationError::Body { .. }));
    }

    #[test]
    fn test_encode_multipart_skips_null_and_stringifies() {
        let schema = ObjectSchema::new()
            .field("title", ValueSchema::String)
            .optional_field("priority", ValueSchema::Number)
            .optional_field("note", ValueSchema::String.nullable());
        let body = encode(
            BodyKind::MultipartForm,
            &schema,
            json!({"title": "t", "priority": 2, "note": null}),
        )
        .unwrap();
        assert_eq!(
            body,
            RequestBody::Form(vec![
                ("priority".to_string(), "2".to_string()),
                ("title".to_string(), "t".to_string()),
            ])
        );
    }

    #[test]
    fn test_decode_json_round_trip() {
        let schema = create_task_schema();
        let input = json!({"title": "t", "priority": 1});
        let encoded = encode(BodyKind::Json, &schema, input.clone()).unwrap();
        let RequestBody::Json(text) = encoded else {
            panic!("expected JSON body");
        };
        assert_eq!(decode_json(&schema, text.as_bytes()).unwrap(), input);
    }

    #[test]
    fn test_decode_json_rejects_malformed() {
        let schema = create_task_schema();
        let err = decode_json(&schema, b"not json").unwrap_err();
        assert!(matches!(err, ValidationError::BodyParse { .. }));
    }

    #[test]
    fn test_decode_json_rejects_schema_failure() {
        let schema = create_task_schema();
        let err = decode_json(&schema, b"{\"title\":7}").unwrap_err();
        match err {
            ValidationError::Body { violation, raw } => {
                assert_eq!(violation.path, "$.title");
                assert_eq!(raw, json!({"title": 7}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_form_coerces() {
        let schema = create_task_schema();
        let fields = BTreeMap::from([
            ("title".to_string(), "t".to_string()),
            ("priority".to_string(), "3".to_string()),
        ]);
        assert_eq!(
            decode_form(&schema, fields).unwrap(),
            json!({"title": "t", "priority": 3})
        );
    }
}
