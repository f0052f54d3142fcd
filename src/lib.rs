//! One declarative API tree, two dispatchers.
//!
//! A [`Api`] tree describes a JSON HTTP surface once: nested path
//! segments ending in [`Endpoint`]s (or [`MultiEndpoint`]s when several
//! methods share a path), each declaring its input schema, query schema,
//! and a status-indexed output mapping. The same tree then drives both
//! sides of the wire:
//!
//! - the **server** traversal zips the tree with a congruent tree of
//!   handler functions and installs validated routes into any router
//!   implementing [`server::Router`];
//! - the **client** traversal mirrors the tree as [`client::ClientTree`],
//!   a nested structure of typed callables sharing one
//!   [`client::ApiClient`] executor.
//!
//! Because both traversals walk the same structure with the same path
//! arithmetic, a request built by the client always lands on the route
//! installed by the server, encoded and validated by the same schemas.
//!
//! ## Core Types
//!
//! - [`Api`] / [`ApiNode`] - The declarative route tree
//! - [`Endpoint`] / [`MultiEndpoint`] - Per-path method declarations
//! - [`OutputBody`] - A status's declared body: a schema, or empty
//! - [`Method`] / [`ResponseCode`] - The closed method and status sets
//! - [`BodyKind`] - Request encoding: JSON or multipart form
//! - [`Schema`] / [`SchemaRef`] - The validation seam
//! - [`ValueSchema`] / [`ObjectSchema`] - The bundled schema implementation
//!
//! ## Example
//!
//! ```rust,no_run
//! use signpost::{Api, Endpoint, MultiEndpoint, ResponseCode};
//! use signpost::schema::{ObjectSchema, ValueSchema};
//!
//! let task = ObjectSchema::new()
//!     .field("id", ValueSchema::String)
//!     .field("title", ValueSchema::String);
//!
//! let api = Api::new().route(
//!     "tasks",
//!     MultiEndpoint::new()
//!         .get(Endpoint::get().output(ResponseCode::Ok, ValueSchema::array(task.clone().into())))
//!         .post(
//!             Endpoint::post()
//!                 .input(ObjectSchema::new().field("title", ValueSchema::String))
//!                 .output(ResponseCode::Created, task),
//!         ),
//! );
//! ```

mod body;
pub mod client;
mod endpoint;
pub mod error;
mod method;
mod path;
mod query;
pub mod schema;
pub mod server;
mod status;

pub use body::{BodyKind, RequestBody};
pub use endpoint::{Api, ApiNode, Endpoint, MultiEndpoint, OutputBody};
pub use error::ApiError;
pub use method::Method;
pub use path::{PathPart, PathParts};
pub use schema::{Schema, SchemaRef, SchemaViolation};
pub use status::{ResponseCode, UnknownResponseCode};
