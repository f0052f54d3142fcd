use super::{ClientError, ConfigError, PathError, ProtocolError, ValidationError};

/// Top-level error for every fallible engine operation.
///
/// Each variant wraps one layer of the taxonomy so callers can match on the
/// class of failure without losing the structured cause underneath.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP transport or URL construction failure.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The schema tree itself is misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A required path parameter was absent at resolution time.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A response did not honour the endpoint's declared contract.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A body or query value failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
