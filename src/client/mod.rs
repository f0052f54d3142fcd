//! Client-side traversal and request execution.
//!
//! [`ClientTree`] mirrors the API tree as a nested structure of callables;
//! [`ApiClient`] is the reqwest-backed executor every callable shares.

mod executor;
mod tree;

pub use executor::{ApiClient, ApiClientBuilder, ClientResponse};
pub use tree::{CallInput, ClientNode, ClientTree, EndpointCall};
