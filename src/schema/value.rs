//! A small value-level [`Schema`] implementation.
//!
//! Covers the shapes the tasks-style APIs in this crate's tests need:
//! primitives with string coercion (query strings arrive as text), closed
//! enumerations, nullable wrappers, arrays, and objects with
//! required/optional fields. Unknown object keys are stripped rather than
//! rejected.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{Schema, SchemaRef, SchemaViolation};

/// A declarative schema over `serde_json::Value`.
///
/// ## Examples
///
/// ```rust
/// use signpost::schema::{ObjectSchema, Schema, ValueSchema};
/// use serde_json::json;
///
/// let task = ObjectSchema::new()
///     .field("id", ValueSchema::String)
///     .field("completed_on", ValueSchema::String.nullable());
///
/// let parsed = task.parse(json!({"id": "1", "completed_on": null})).unwrap();
/// assert_eq!(parsed, json!({"id": "1", "completed_on": null}));
/// ```
#[derive(Debug, Clone)]
pub enum ValueSchema {
    /// Accepts any value unchanged.
    Any,
    /// A JSON string.
    String,
    /// A JSON number; numeric strings are coerced (query-string values
    /// always arrive as text).
    Number,
    /// A JSON boolean; the strings `"true"`/`"false"` are coerced.
    Boolean,
    /// A string drawn from a closed set.
    Enumeration(Vec<String>),
    /// The inner schema, or `null`.
    Nullable(Box<ValueSchema>),
    /// An array with homogeneous element schema.
    Array(Box<ValueSchema>),
    /// A nested object.
    Object(ObjectSchema),
}

impl ValueSchema {
    /// An array of `element`.
    pub fn array(element: ValueSchema) -> Self {
        Self::Array(Box::new(element))
    }

    /// A string restricted to the given variants.
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enumeration(variants.into_iter().map(Into::into).collect())
    }

    /// Wraps this schema so `null` is also accepted.
    pub fn nullable(self) -> Self {
        Self::Nullable(Box::new(self))
    }

    /// Converts into a shared [`SchemaRef`].
    pub fn into_ref(self) -> SchemaRef {
        std::sync::Arc::new(self)
    }

    fn parse_at(&self, value: Value, path: &str) -> Result<Value, SchemaViolation> {
        match self {
            Self::Any => Ok(value),
            Self::String => match value {
                Value::String(s) => Ok(Value::String(s)),
                other => Err(SchemaViolation::at(
                    path,
                    format!("expected string, got {}", kind_of(&other)),
                )),
            },
            Self::Number => match value {
                Value::Number(n) => Ok(Value::Number(n)),
                Value::String(s) => coerce_number(&s).ok_or_else(|| {
                    SchemaViolation::at(path, format!("expected number, got string \"{s}\""))
                }),
                other => Err(SchemaViolation::at(
                    path,
                    format!("expected number, got {}", kind_of(&other)),
                )),
            },
            Self::Boolean => match value {
                Value::Bool(b) => Ok(Value::Bool(b)),
                Value::String(s) if s == "true" => Ok(Value::Bool(true)),
                Value::String(s) if s == "false" => Ok(Value::Bool(false)),
                other => Err(SchemaViolation::at(
                    path,
                    format!("expected boolean, got {}", kind_of(&other)),
                )),
            },
            Self::Enumeration(variants) => match value {
                Value::String(s) if variants.contains(&s) => Ok(Value::String(s)),
                Value::String(s) => Err(SchemaViolation::at(
                    path,
                    format!("\"{s}\" is not one of {variants:?}"),
                )),
                other => Err(SchemaViolation::at(
                    path,
                    format!("expected one of {variants:?}, got {}", kind_of(&other)),
                )),
            },
            Self::Nullable(inner) => match value {
                Value::Null => Ok(Value::Null),
                other => inner.parse_at(other, path),
            },
            Self::Array(element) => match value {
                Value::Array(items) => items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| element.parse_at(item, &format!("{path}[{index}]")))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                other => Err(SchemaViolation::at(
                    path,
                    format!("expected array, got {}", kind_of(&other)),
                )),
            },
            Self::Object(object) => object.parse_at(value, path),
        }
    }
}

impl Schema for ValueSchema {
    fn parse(&self, value: Value) -> Result<Value, SchemaViolation> {
        self.parse_at(value, "$")
    }

    fn is_array_field(&self, field: &str) -> bool {
        match self {
            Self::Object(object) => object.is_array_field(field),
            _ => false,
        }
    }
}

/// One declared field of an [`ObjectSchema`].
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Schema for the field's value.
    pub schema: ValueSchema,
    /// Whether absence is a violation.
    pub required: bool,
}

/// An object schema with required and optional fields.
///
/// Unknown keys are stripped from the parsed result. Fields iterate in name
/// order; declaration order carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: BTreeMap<String, FieldSchema>,
}

impl ObjectSchema {
    /// An object schema with no declared fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required field.
    pub fn field(mut self, name: impl Into<String>, schema: ValueSchema) -> Self {
        self.fields.insert(
            name.into(),
            FieldSchema {
                schema,
                required: true,
            },
        );
        self
    }

    /// Adds an optional field (absence is fine, `null` still is not unless
    /// the field schema is nullable).
    pub fn optional_field(mut self, name: impl Into<String>, schema: ValueSchema) -> Self {
        self.fields.insert(
            name.into(),
            FieldSchema {
                schema,
                required: false,
            },
        );
        self
    }

    /// Converts into a shared [`SchemaRef`].
    pub fn into_ref(self) -> SchemaRef {
        std::sync::Arc::new(self)
    }

    fn parse_at(&self, value: Value, path: &str) -> Result<Value, SchemaViolation> {
        let Value::Object(mut incoming) = value else {
            return Err(SchemaViolation::at(
                path,
                format!("expected object, got {}", kind_of(&value)),
            ));
        };

        let mut parsed = Map::new();
        for (name, field) in &self.fields {
            match incoming.remove(name) {
                Some(value) => {
                    let field_path = format!("{path}.{name}");
                    parsed.insert(name.clone(), field.schema.parse_at(value, &field_path)?);
                }
                None if field.required => {
                    return Err(SchemaViolation::at(
                        format!("{path}.{name}"),
                        "missing required field",
                    ));
                }
                None => {}
            }
        }
        // Remaining keys are undeclared and dropped.
        Ok(Value::Object(parsed))
    }
}

impl Schema for ObjectSchema {
    fn parse(&self, value: Value) -> Result<Value, SchemaViolation> {
        self.parse_at(value, "$")
    }

    fn is_array_field(&self, field: &str) -> bool {
        fn is_array(schema: &ValueSchema) -> bool {
            match schema {
                ValueSchema::Array(_) => true,
                ValueSchema::Nullable(inner) => is_array(inner),
                _ => false,
            }
        }
        self.fields
            .get(field)
            .is_some_and(|field| is_array(&field.schema))
    }
}

impl From<ObjectSchema> for ValueSchema {
    fn from(object: ObjectSchema) -> Self {
        Self::Object(object)
    }
}

impl From<ValueSchema> for SchemaRef {
    fn from(schema: ValueSchema) -> Self {
        std::sync::Arc::new(schema)
    }
}

impl From<ObjectSchema> for SchemaRef {
    fn from(object: ObjectSchema) -> Self {
        std::sync::Arc::new(object)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn coerce_number(text: &str) -> Option<Value> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::from(int));
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}
