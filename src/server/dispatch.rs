//! Server-side response dispatch: from a handler's `(status, body)` pair to
//! the reply the route primitive must produce.

use serde_json::Value;

use crate::endpoint::{Endpoint, OutputBody};
use crate::error::{ApiError, ConfigError, ProtocolError, ValidationError};
use crate::status::ResponseCode;

/// The response shapes the route primitive is required to support.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A JSON payload with the given status.
    Json {
        /// Response status.
        status: ResponseCode,
        /// Encoded response body.
        body: Value,
    },
    /// A bodyless response.
    NoContent {
        /// Response status.
        status: ResponseCode,
    },
    /// A redirect to `location`.
    Redirect {
        /// Redirect status (300-399).
        status: ResponseCode,
        /// Target location.
        location: String,
    },
}

/// Selects the output declaration for `status` and turns the handler result
/// into a [`Reply`].
///
/// Failure modes, in the order they are checked:
/// - `status` absent from the output mapping: the handler attempted to
///   return an undeclared status ([`ProtocolError::UndeclaredStatus`]).
/// - non-contentful `status` with a present body
///   ([`ProtocolError::NonContentfulBody`]); same for a status declared
///   with an empty output.
/// - redirect `status` whose body is not a location string
///   ([`ConfigError::RedirectLocation`]).
/// - body fails the declared output schema ([`ValidationError::Response`]).
pub fn respond(
    endpoint: &Endpoint,
    path: &str,
    status: ResponseCode,
    body: Option<Value>,
) -> Result<Reply, ApiError> {
    let method = endpoint.allowed_method();
    let output = endpoint
        .output_for(status)
        .ok_or_else(|| ProtocolError::UndeclaredStatus {
            status: status.as_u16(),
            path: path.to_string(),
            method,
        })?;

    if status.is_non_contentful() || matches!(output, OutputBody::Empty) {
        if body.is_some() {
            return Err(ProtocolError::NonContentfulBody {
                status,
                path: path.to_string(),
                method,
            }
            .into());
        }
        return Ok(Reply::NoContent { status });
    }

    if status.is_redirect() {
        return match body {
            Some(Value::String(location)) => Ok(Reply::Redirect { status, location }),
            other => Err(ConfigError::RedirectLocation {
                status,
                path: path.to_string(),
                method,
                got: match other {
                    None => "no body",
                    Some(Value::Null) => "null",
                    Some(Value::Bool(_)) => "boolean",
                    Some(Value::Number(_)) => "number",
                    Some(Value::Array(_)) => "array",
                    Some(Value::Object(_)) => "object",
                    Some(Value::String(_)) => unreachable!("string handled above"),
                },
            }
            .into()),
        };
    }

    let OutputBody::Schema(schema) = output else {
        unreachable!("empty outputs handled above");
    };
    let raw = body.unwrap_or(Value::Null);
    let encoded = schema
        .encode(raw.clone())
        .map_err(|violation| ValidationError::Response { violation, raw })?;
    Ok(Reply::Json {
        status,
        body: encoded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;
    use crate::method::Method;
    use crate::schema::{ObjectSchema, ValueSchema};
    use serde_json::json;

    fn endpoint() -> Endpoint {
        Endpoint::post()
            .output(
                ResponseCode::Ok,
                ObjectSchema::new().field("id", ValueSchema::String),
            )
            .output_empty(ResponseCode::NoContent)
            .output(ResponseCode::Found, ValueSchema::String)
    }

    #[test]
    fn test_contentful_response_is_encoded() {
        let reply = respond(&endpoint(), "/tasks", ResponseCode::Ok, Some(json!({"id": "1"})))
            .unwrap();
        assert_eq!(
            reply,
            Reply::Json {
                status: ResponseCode::Ok,
                body: json!({"id": "1"}),
            }
        );
    }

    #[test]
    fn test_undeclared_status_is_fatal() {
        let err = respond(&endpoint(), "/tasks", ResponseCode::NotFound, None).unwrap_err();
        match err {
            ApiError::Protocol(ProtocolError::UndeclaredStatus {
                status,
                path,
                method,
            }) => {
                assert_eq!(status, 404);
                assert_eq!(path, "/tasks");
                assert_eq!(method, Method::Post);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_contentful_with_body_is_fatal() {
        let err = respond(
            &endpoint(),
            "/tasks",
            ResponseCode::NoContent,
            Some(json!({"sneaky": true})),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Protocol(ProtocolError::NonContentfulBody {
                status: ResponseCode::NoContent,
                ..
            })
        ));
    }

    #[test]
    fn test_non_contentful_without_body_replies_no_content() {
        let reply = respond(&endpoint(), "/tasks", ResponseCode::NoContent, None).unwrap();
        assert_eq!(
            reply,
            Reply::NoContent {
                status: ResponseCode::NoContent
            }
        );
    }

    #[test]
    fn test_redirect_uses_body_as_location() {
        let reply = respond(
            &endpoint(),
            "/tasks",
            ResponseCode::Found,
            Some(json!("/tasks/1")),
        )
        .unwrap();
        assert_eq!(
            reply,
            Reply::Redirect {
                status: ResponseCode::Found,
                location: "/tasks/1".to_string(),
            }
        );
    }

    #[test]
    fn test_redirect_with_non_string_body_is_config_error() {
        let err = respond(&endpoint(), "/tasks", ResponseCode::Found, Some(json!(42)))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Config(ConfigError::RedirectLocation { got: "number", .. })
        ));
    }

    #[test]
    fn test_response_body_failing_schema_is_fatal() {
        let err = respond(
            &endpoint(),
            "/tasks",
            ResponseCode::Ok,
            Some(json!({"id": 7})),
        )
        .unwrap_err();
        match err {
            ApiError::Validation(ValidationError::Response { violation, raw }) => {
                assert_eq!(violation.path, "$.id");
                assert_eq!(raw, json!({"id": 7}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
