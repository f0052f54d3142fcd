use serde_json::Value;

use crate::schema::SchemaViolation;

/// Schema failures on either side of the wire.
///
/// Variants carry the offending raw value alongside the underlying
/// [`SchemaViolation`] so a failure can be diagnosed without re-capturing
/// traffic.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A query field was `null`; only primitives, arrays of primitives, or
    /// absence are legal.
    #[error("query parameter `{field}` cannot be null")]
    NullQueryValue {
        /// The offending field name.
        field: String,
    },

    /// A query field was a nested object (or an array containing one).
    #[error("query parameter `{field}` must be a primitive value or array of primitives")]
    NonPrimitiveQueryValue {
        /// The offending field name.
        field: String,
    },

    /// The decoded query object failed the configured query schema.
    #[error("query string failed validation: {violation}")]
    Query {
        /// The underlying schema failure.
        violation: SchemaViolation,
        /// The raw query string as received.
        raw: String,
    },

    /// The request body was not syntactically valid JSON.
    #[error("request body is not valid JSON: {source}")]
    BodyParse {
        /// The JSON parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The request body failed the endpoint's input schema.
    #[error("request body failed validation: {violation}")]
    Body {
        /// The underlying schema failure.
        violation: SchemaViolation,
        /// The offending body value.
        raw: Value,
    },

    /// The response body was not syntactically valid JSON.
    #[error("response body is not valid JSON: {source}")]
    ResponseParse {
        /// The JSON parse failure.
        #[source]
        source: serde_json::Error,
        /// The raw response text as received.
        raw: String,
    },

    /// The response body failed the declared output schema.
    #[error("response body failed validation: {violation}")]
    Response {
        /// The underlying schema failure.
        violation: SchemaViolation,
        /// The offending response value.
        raw: Value,
    },
}
