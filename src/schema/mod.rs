//! The schema/validation capability consumed by both traversals.
//!
//! The engine never validates anything itself; it hands values to a
//! [`Schema`] and acts on the outcome. Anything that can parse-and-validate
//! a `serde_json::Value` can drive the engine; the bundled [`ValueSchema`]
//! implementation exists so the crate is usable out of the box.

mod value;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use value::{FieldSchema, ObjectSchema, ValueSchema};

/// A structured validation failure, pointing at the offending location.
///
/// `path` is a JSONPath-flavoured locator (`$`, `$.tags[1]`, ...) so the
/// failure names the exact field rather than the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("schema violation at `{path}`: {message}")]
pub struct SchemaViolation {
    /// Locator of the offending value.
    pub path: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl SchemaViolation {
    /// A violation at the document root.
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            path: "$".to_string(),
            message: message.into(),
        }
    }

    /// A violation at a named location.
    pub fn at(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Re-roots this violation under `prefix` (used when recursing into
    /// object fields and array elements).
    pub fn nested_under(mut self, prefix: &str) -> Self {
        self.path = if let Some(rest) = self.path.strip_prefix('$') {
            format!("{prefix}{rest}")
        } else {
            format!("{prefix}.{}", self.path)
        };
        self
    }
}

/// The validate/parse/encode contract.
///
/// `parse` takes untrusted input and returns the validated (possibly
/// coerced) value; `encode` prepares a trusted value for transmission.
/// `is_array_field` is the single piece of shape introspection the query
/// codec needs: whether a top-level field of an object schema is
/// array-typed, which decides repeated-key grouping on both sides.
pub trait Schema: fmt::Debug + Send + Sync {
    /// Validates `value`, returning the parsed (coerced) form.
    fn parse(&self, value: Value) -> Result<Value, SchemaViolation>;

    /// Encodes `value` for transmission.
    ///
    /// The default runs the value back through [`parse`](Self::parse), which
    /// both validates and normalises it.
    fn encode(&self, value: Value) -> Result<Value, SchemaViolation> {
        self.parse(value)
    }

    /// Reports whether the top-level field `field` is array-typed.
    ///
    /// Non-object schemas have no fields and return `false`.
    fn is_array_field(&self, _field: &str) -> bool {
        false
    }
}

/// Shared handle to a schema; endpoints hold these so a partially
/// configured endpoint can be cloned cheaply.
pub type SchemaRef = Arc<dyn Schema>;
