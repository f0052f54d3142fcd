//! The declarative schema model: endpoints, per-method bundles, and the
//! API tree both traversals walk.
//!
//! Everything here is an immutable value. Builder calls consume `self` and
//! return a new value with one field overridden; `Clone` a partially
//! configured endpoint to share it as a base for several variants. Nothing
//! is validated at build time; malformed configuration surfaces when the
//! tree is exercised.

use std::collections::BTreeMap;

use crate::body::BodyKind;
use crate::method::Method;
use crate::schema::SchemaRef;
use crate::status::ResponseCode;

/// The declared body for one response status.
#[derive(Debug, Clone)]
pub enum OutputBody {
    /// A contentful response validated/encoded by this schema.
    Schema(SchemaRef),
    /// A declared no-body response (for non-contentful codes such as 204).
    Empty,
}

/// One routable operation: method, body contract, query contract, required
/// headers, and a status-code-indexed output mapping.
///
/// ## Examples
///
/// ```rust
/// use signpost::schema::{ObjectSchema, ValueSchema};
/// use signpost::{Endpoint, ResponseCode};
///
/// let task = ObjectSchema::new()
///     .field("id", ValueSchema::String)
///     .field("title", ValueSchema::String);
///
/// let get_task = Endpoint::get()
///     .output(ResponseCode::Ok, task.clone())
///     .output(ResponseCode::NotFound, ObjectSchema::new().field("message", ValueSchema::String));
/// ```
#[derive(Debug, Clone)]
pub struct Endpoint {
    method: Method,
    input: Option<SchemaRef>,
    outputs: BTreeMap<ResponseCode, OutputBody>,
    required_headers: Vec<String>,
    accepts: BodyKind,
    query: Option<SchemaRef>,
}

impl Endpoint {
    /// A bare endpoint for the given method: no input, no outputs, JSON
    /// bodies.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            input: None,
            outputs: BTreeMap::new(),
            required_headers: Vec::new(),
            accepts: BodyKind::Json,
            query: None,
        }
    }

    /// A bare GET endpoint.
    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    /// A bare POST endpoint.
    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    /// A bare PUT endpoint.
    pub fn put() -> Self {
        Self::new(Method::Put)
    }

    /// A bare PATCH endpoint.
    pub fn patch() -> Self {
        Self::new(Method::Patch)
    }

    /// A bare DELETE endpoint.
    pub fn delete() -> Self {
        Self::new(Method::Delete)
    }

    /// Returns a copy with the method replaced.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Returns a copy with the input (request body) schema set.
    pub fn input(mut self, schema: impl Into<SchemaRef>) -> Self {
        self.input = Some(schema.into());
        self
    }

    /// Returns a copy with one output added to the mapping.
    ///
    /// Accumulates: other declared codes are kept; declaring a code twice
    /// silently overwrites its schema.
    pub fn output(mut self, code: ResponseCode, schema: impl Into<SchemaRef>) -> Self {
        self.outputs.insert(code, OutputBody::Schema(schema.into()));
        self
    }

    /// Returns a copy declaring a no-body output for `code`.
    pub fn output_empty(mut self, code: ResponseCode) -> Self {
        self.outputs.insert(code, OutputBody::Empty);
        self
    }

    /// Returns a copy with a required header appended.
    ///
    /// The set is ordered; re-adding a name already present is a no-op.
    pub fn header(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.required_headers.contains(&name) {
            self.required_headers.push(name);
        }
        self
    }

    /// Returns a copy with the query-string schema set.
    pub fn query(mut self, schema: impl Into<SchemaRef>) -> Self {
        self.query = Some(schema.into());
        self
    }

    /// Returns a copy accepting JSON bodies (the default).
    pub fn json(mut self) -> Self {
        self.accepts = BodyKind::Json;
        self
    }

    /// Returns a copy accepting multipart-form bodies.
    pub fn multipart(mut self) -> Self {
        self.accepts = BodyKind::MultipartForm;
        self
    }

    /// The method this endpoint is routed for.
    pub fn allowed_method(&self) -> Method {
        self.method
    }

    /// The input (request body) schema, if any.
    pub fn input_schema(&self) -> Option<&SchemaRef> {
        self.input.as_ref()
    }

    /// The declared output for a status code.
    pub fn output_for(&self, code: ResponseCode) -> Option<&OutputBody> {
        self.outputs.get(&code)
    }

    /// The full status-code-indexed output mapping.
    pub fn outputs(&self) -> &BTreeMap<ResponseCode, OutputBody> {
        &self.outputs
    }

    /// Header names that must accompany every request.
    pub fn required_headers(&self) -> &[String] {
        &self.required_headers
    }

    /// The body encoding this endpoint accepts.
    pub fn accepts(&self) -> BodyKind {
        self.accepts
    }

    /// The query-string schema, if any.
    pub fn query_schema(&self) -> Option<&SchemaRef> {
        self.query.as_ref()
    }
}

/// A path segment exposing several methods, plus optional nested children.
///
/// Children share the parent's literal path: they add segments only through
/// their own keys.
#[derive(Debug, Clone, Default)]
pub struct MultiEndpoint {
    methods: BTreeMap<Method, Endpoint>,
    children: Option<Api>,
}

impl MultiEndpoint {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `endpoint` installed for `method`.
    ///
    /// The endpoint's own method is overridden to match the slot so the two
    /// can never disagree.
    pub fn method(mut self, method: Method, endpoint: Endpoint) -> Self {
        self.methods.insert(method, endpoint.method(method));
        self
    }

    /// Returns a copy with `endpoint` in the GET slot.
    pub fn get(self, endpoint: Endpoint) -> Self {
        self.method(Method::Get, endpoint)
    }

    /// Returns a copy with `endpoint` in the POST slot.
    pub fn post(self, endpoint: Endpoint) -> Self {
        self.method(Method::Post, endpoint)
    }

    /// Returns a copy with `endpoint` in the PUT slot.
    pub fn put(self, endpoint: Endpoint) -> Self {
        self.method(Method::Put, endpoint)
    }

    /// Returns a copy with `endpoint` in the PATCH slot.
    pub fn patch(self, endpoint: Endpoint) -> Self {
        self.method(Method::Patch, endpoint)
    }

    /// Returns a copy with `endpoint` in the DELETE slot.
    pub fn delete(self, endpoint: Endpoint) -> Self {
        self.method(Method::Delete, endpoint)
    }

    /// Returns a copy with a nested children sub-tree.
    pub fn children(mut self, children: Api) -> Self {
        self.children = Some(children);
        self
    }

    /// The endpoint registered for `method`, if any.
    pub fn endpoint(&self, method: Method) -> Option<&Endpoint> {
        self.methods.get(&method)
    }

    /// Iterates the per-method endpoints.
    pub fn endpoints(&self) -> impl Iterator<Item = (Method, &Endpoint)> {
        self.methods.iter().map(|(method, endpoint)| (*method, endpoint))
    }

    /// The nested children sub-tree, if any.
    pub fn child_tree(&self) -> Option<&Api> {
        self.children.as_ref()
    }
}

/// One node of the API tree.
///
/// Both traversals switch on this tag explicitly; there is no runtime
/// downcasting anywhere in the engine.
#[derive(Debug, Clone)]
pub enum ApiNode {
    /// A plain nested sub-tree.
    Tree(Api),
    /// A single endpoint terminating this path.
    Endpoint(Endpoint),
    /// A per-method bundle, possibly with descendants at the same path.
    Multi(MultiEndpoint),
}

impl From<Api> for ApiNode {
    fn from(api: Api) -> Self {
        Self::Tree(api)
    }
}

impl From<Endpoint> for ApiNode {
    fn from(endpoint: Endpoint) -> Self {
        Self::Endpoint(endpoint)
    }
}

impl From<MultiEndpoint> for ApiNode {
    fn from(multi: MultiEndpoint) -> Self {
        Self::Multi(multi)
    }
}

/// The full API tree: a mapping from path-segment key to node.
///
/// Keys beginning with `:` denote path parameters. Sibling order carries no
/// meaning (storage is a `BTreeMap`, so iteration is deterministic); depth
/// is unbounded.
#[derive(Debug, Clone, Default)]
pub struct Api {
    routes: BTreeMap<String, ApiNode>,
}

impl Api {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `node` mounted at `key`.
    pub fn route(mut self, key: impl Into<String>, node: impl Into<ApiNode>) -> Self {
        self.routes.insert(key.into(), node.into());
        self
    }

    /// The node mounted at `key`, if any.
    pub fn node(&self, key: &str) -> Option<&ApiNode> {
        self.routes.get(key)
    }

    /// Iterates the tree's immediate children.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiNode)> {
        self.routes.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Returns `true` if the tree has no children.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObjectSchema, ValueSchema};

    #[test]
    fn test_builder_calls_leave_base_untouched() {
        let base = Endpoint::get().header("X-Request-Id");
        let variant = base.clone().method(Method::Post).header("X-Trace");

        assert_eq!(base.allowed_method(), Method::Get);
        assert_eq!(base.required_headers(), ["X-Request-Id"]);
        assert_eq!(variant.allowed_method(), Method::Post);
        assert_eq!(variant.required_headers(), ["X-Request-Id", "X-Trace"]);
    }

    #[test]
    fn test_output_accumulates_and_overwrites() {
        let ok = ObjectSchema::new().field("id", ValueSchema::String);
        let missing = ObjectSchema::new().field("message", ValueSchema::String);

        let endpoint = Endpoint::get()
            .output(ResponseCode::Ok, ok.clone())
            .output(ResponseCode::NotFound, missing)
            .output(ResponseCode::Ok, ok);

        assert_eq!(endpoint.outputs().len(), 2);
        assert!(endpoint.output_for(ResponseCode::Ok).is_some());
        assert!(endpoint.output_for(ResponseCode::NotFound).is_some());
        assert!(endpoint.output_for(ResponseCode::BadRequest).is_none());
    }

    #[test]
    fn test_output_empty() {
        let endpoint = Endpoint::delete().output_empty(ResponseCode::NoContent);
        assert!(matches!(
            endpoint.output_for(ResponseCode::NoContent),
            Some(OutputBody::Empty)
        ));
    }

    #[test]
    fn test_header_set_is_ordered_and_deduplicated() {
        let endpoint = Endpoint::get()
            .header("X-B")
            .header("X-A")
            .header("X-B");
        assert_eq!(endpoint.required_headers(), ["X-B", "X-A"]);
    }

    #[test]
    fn test_accepts_defaults_to_json() {
        assert_eq!(Endpoint::post().accepts(), BodyKind::Json);
        assert_eq!(
            Endpoint::post().multipart().accepts(),
            BodyKind::MultipartForm
        );
        assert_eq!(
            Endpoint::post().multipart().json().accepts(),
            BodyKind::Json
        );
    }

    #[test]
    fn test_multi_slot_overrides_endpoint_method() {
        let multi = MultiEndpoint::new().post(Endpoint::get());
        let endpoint = multi.endpoint(Method::Post).unwrap();
        assert_eq!(endpoint.allowed_method(), Method::Post);
        assert!(multi.endpoint(Method::Get).is_none());
    }

    #[test]
    fn test_tree_construction() {
        let api = Api::new().route(
            "tasks",
            MultiEndpoint::new()
                .get(Endpoint::get())
                .children(Api::new().route(":taskId", Endpoint::get())),
        );

        let Some(ApiNode::Multi(tasks)) = api.node("tasks") else {
            panic!("expected multi node");
        };
        assert!(tasks.endpoint(Method::Get).is_some());
        assert!(tasks.child_tree().unwrap().node(":taskId").is_some());
    }
}
