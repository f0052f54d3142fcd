use crate::method::Method;
use crate::status::ResponseCode;

/// Violations of an endpoint's declared response contract.
///
/// Both directions raise these: a handler returning a status the endpoint
/// never declared, and a client receiving one. Status, path, and method are
/// always carried for observability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The status is absent from the endpoint's output mapping.
    #[error("undeclared response status {status} for {method} {path}")]
    UndeclaredStatus {
        /// Raw numeric status (kept as `u16` so codes outside the declarable
        /// set are still reportable).
        status: u16,
        /// Literal route path of the endpoint.
        path: String,
        /// Method of the endpoint.
        method: Method,
    },

    /// A non-contentful status was paired with a present body.
    #[error("non-contentful status {status} for {method} {path} must not carry a body")]
    NonContentfulBody {
        /// The non-contentful status.
        status: ResponseCode,
        /// Literal route path of the endpoint.
        path: String,
        /// Method of the endpoint.
        method: Method,
    },
}
