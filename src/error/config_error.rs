use crate::method::Method;
use crate::status::ResponseCode;

/// Programming errors in the schema tree, surfaced when exercised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A handler produced a redirect status whose body was not the location
    /// string the dispatcher needs.
    #[error("redirect status {status} for {method} {path} requires a string location, got {got}")]
    RedirectLocation {
        /// The redirect status the handler returned.
        status: ResponseCode,
        /// Literal route path of the endpoint.
        path: String,
        /// Method of the endpoint.
        method: Method,
        /// What the handler actually returned in place of a location.
        got: &'static str,
    },
}
