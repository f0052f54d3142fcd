//! Layered error types for the dual-dispatch engine.
//!
//! The error hierarchy is structured for actionable diagnostics:
//! - [`ApiError`] - Top-level error type for all engine operations
//! - [`ClientError`] - HTTP transport and URL errors
//! - [`ConfigError`] - Schema-tree configuration errors
//! - [`PathError`] - Path-parameter resolution errors
//! - [`ProtocolError`] - Declared-contract violations (undeclared statuses,
//!   bodies on non-contentful codes)
//! - [`ValidationError`] - Body/query/response schema failures
//!
//! Every variant is fatal for the request it occurred on; retry and backoff
//! belong to the embedding application.

mod api_error;
mod client_error;
mod config_error;
mod path_error;
mod protocol_error;
mod validation_error;

pub use api_error::ApiError;
pub use client_error::ClientError;
pub use config_error::ConfigError;
pub use path_error::PathError;
pub use protocol_error::ProtocolError;
pub use validation_error::ValidationError;
