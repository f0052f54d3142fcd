//! Server-side traversal: walking the API tree alongside a handler tree and
//! installing one route per method into the underlying route primitive.
//!
//! The HTTP layer itself is an external collaborator. This module only
//! requires the two capabilities that layer must provide:
//! registering a callback for a method + literal path ([`Router`]) and
//! exposing per-request data ([`RawRequest`]). Everything in between (body
//! decoding, query decoding, handler invocation, response dispatch) lives
//! here.

mod dispatch;

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

use crate::body::{self, BodyKind};
use crate::endpoint::{Api, ApiNode, Endpoint};
use crate::error::ApiError;
use crate::method::Method;
use crate::path::{self, PathPart, PathParts};
use crate::query;
use crate::status::ResponseCode;

pub use dispatch::{respond, Reply};

/// Per-request data supplied by the route primitive.
///
/// One value of this type is handed to the installed callback per inbound
/// request; the engine reads from it exactly once per concern (body before
/// handler, never after).
#[async_trait]
pub trait RawRequest: Send {
    /// The live value bound to path parameter `name`, if the route matched
    /// one.
    fn path_param(&self, name: &str) -> Option<String>;

    /// The raw query string (without the leading `?`), if present.
    fn query_string(&self) -> Option<String>;

    /// A request header value.
    fn header(&self, name: &str) -> Option<String>;

    /// Reads the request body bytes (JSON endpoints).
    async fn body_bytes(&mut self) -> Result<Bytes, ApiError>;

    /// Decodes the request as form data, one value per field name
    /// (multipart endpoints). Repeated keys are not specially handled.
    async fn form_fields(&mut self) -> Result<BTreeMap<String, String>, ApiError>;
}

/// The "register a handler for method M at literal path P" capability.
///
/// Paths are handed over in `:name` parameter syntax, which the primitive
/// is expected to support.
pub trait Router {
    /// The per-request value the primitive supplies to callbacks.
    type Request: RawRequest + 'static;

    /// Registers `handler` for `method` at the literal `path`.
    fn register(&mut self, method: Method, path: &str, handler: RouteHandler<Self::Request>);
}

/// Future returned by an installed route callback.
pub type RouteFuture = Pin<Box<dyn Future<Output = Result<Reply, ApiError>> + Send>>;

/// An installed route callback: request in, [`Reply`] out.
///
/// Errors escape to the route primitive, which is expected to translate
/// them into a 500-class response unless the embedding application
/// intercepts them.
pub type RouteHandler<R> = Box<dyn Fn(R) -> RouteFuture + Send + Sync>;

/// What an application handler returns: a status and an optional body.
pub type HandlerResponse = (ResponseCode, Option<Value>);

/// Future returned by an application handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<HandlerResponse, ApiError>> + Send>>;

/// An application handler: validated request context in,
/// `(status, body)` out.
pub type Handler<R, S> = Arc<dyn Fn(Context<R, S>) -> HandlerFuture + Send + Sync>;

/// Wraps an async closure into a [`Handler`].
///
/// ## Examples
///
/// ```rust,ignore
/// let list_tasks = handler(|ctx: Context<R, Services>| async move {
///     Ok((ResponseCode::Ok, Some(json!([]))))
/// });
/// ```
pub fn handler<R, S, F, Fut>(f: F) -> Handler<R, S>
where
    F: Fn(Context<R, S>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HandlerResponse, ApiError>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// The request context a handler receives.
///
/// Body and query are already decoded and validated by the time a handler
/// runs; `raw` exposes the underlying request for anything beyond the
/// declared contract (live path parameters, extra headers), and `services`
/// is the externally injected shared state, passed by reference to every
/// invocation and never mutated by the engine.
pub struct Context<R, S> {
    /// Validated request body, if the endpoint declares an input schema.
    pub body: Option<Value>,
    /// Decoded and validated query object, if the endpoint declares a
    /// query schema.
    pub query: Option<Value>,
    /// The route primitive's own request value.
    pub raw: R,
    /// Shared application services.
    pub services: Arc<S>,
}

/// One node of the handler tree, congruent to [`ApiNode`].
pub enum HandlerNode<R, S> {
    /// Handlers for a nested sub-tree.
    Tree(Handlers<R, S>),
    /// The handler for a single endpoint.
    Leaf(Handler<R, S>),
    /// Per-method handlers plus handlers for nested children.
    Multi(MethodHandlers<R, S>),
}

impl<R, S> From<Handlers<R, S>> for HandlerNode<R, S> {
    fn from(handlers: Handlers<R, S>) -> Self {
        Self::Tree(handlers)
    }
}

impl<R, S> From<Handler<R, S>> for HandlerNode<R, S> {
    fn from(handler: Handler<R, S>) -> Self {
        Self::Leaf(handler)
    }
}

impl<R, S> From<MethodHandlers<R, S>> for HandlerNode<R, S> {
    fn from(methods: MethodHandlers<R, S>) -> Self {
        Self::Multi(methods)
    }
}

/// A handler tree, built with the same keys as the API tree it serves.
///
/// Congruence is a convention, not a checked invariant: a method or segment
/// with a schema entry but no handler (or the reverse) is skipped with a
/// warning rather than rejected.
pub struct Handlers<R, S> {
    routes: BTreeMap<String, HandlerNode<R, S>>,
}

impl<R, S> Default for Handlers<R, S> {
    fn default() -> Self {
        Self {
            routes: BTreeMap::new(),
        }
    }
}

impl<R, S> Handlers<R, S> {
    /// An empty handler tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `node` mounted at `key`.
    pub fn route(mut self, key: impl Into<String>, node: impl Into<HandlerNode<R, S>>) -> Self {
        self.routes.insert(key.into(), node.into());
        self
    }

    fn node(&self, key: &str) -> Option<&HandlerNode<R, S>> {
        self.routes.get(key)
    }
}

/// Per-method handlers for a [`MultiEndpoint`](crate::MultiEndpoint).
pub struct MethodHandlers<R, S> {
    methods: BTreeMap<Method, Handler<R, S>>,
    children: Option<Handlers<R, S>>,
}

impl<R, S> Default for MethodHandlers<R, S> {
    fn default() -> Self {
        Self {
            methods: BTreeMap::new(),
            children: None,
        }
    }
}

impl<R, S> MethodHandlers<R, S> {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `handler` in the slot for `method`.
    pub fn method(mut self, method: Method, handler: Handler<R, S>) -> Self {
        self.methods.insert(method, handler);
        self
    }

    /// Returns a copy with `handler` in the GET slot.
    pub fn get(self, handler: Handler<R, S>) -> Self {
        self.method(Method::Get, handler)
    }

    /// Returns a copy with `handler` in the POST slot.
    pub fn post(self, handler: Handler<R, S>) -> Self {
        self.method(Method::Post, handler)
    }

    /// Returns a copy with `handler` in the PUT slot.
    pub fn put(self, handler: Handler<R, S>) -> Self {
        self.method(Method::Put, handler)
    }

    /// Returns a copy with `handler` in the PATCH slot.
    pub fn patch(self, handler: Handler<R, S>) -> Self {
        self.method(Method::Patch, handler)
    }

    /// Returns a copy with `handler` in the DELETE slot.
    pub fn delete(self, handler: Handler<R, S>) -> Self {
        self.method(Method::Delete, handler)
    }

    /// Returns a copy with handlers for the nested children.
    pub fn children(mut self, children: Handlers<R, S>) -> Self {
        self.children = Some(children);
        self
    }

    fn handler(&self, method: Method) -> Option<&Handler<R, S>> {
        self.methods.get(&method)
    }

    fn child_handlers(&self) -> Option<&Handlers<R, S>> {
        self.children.as_ref()
    }
}

/// Walks the API tree alongside the handler tree and registers every
/// endpoint with the route primitive, starting from the root path.
pub fn install<Rt, S>(
    api: &Api,
    handlers: &Handlers<Rt::Request, S>,
    router: &mut Rt,
    services: Arc<S>,
) where
    Rt: Router,
    S: Send + Sync + 'static,
{
    install_at(api, handlers, router, services, Vec::new());
}

/// Like [`install`], but mounts the whole tree under a literal prefix
/// (for example `["api"]`).
pub fn install_at<Rt, S>(
    api: &Api,
    handlers: &Handlers<Rt::Request, S>,
    router: &mut Rt,
    services: Arc<S>,
    mount: PathParts,
) where
    Rt: Router,
    S: Send + Sync + 'static,
{
    traverse(api, handlers, router, mount, &services);
}

fn traverse<Rt, S>(
    api: &Api,
    handlers: &Handlers<Rt::Request, S>,
    router: &mut Rt,
    prefix: PathParts,
    services: &Arc<S>,
) where
    Rt: Router,
    S: Send + Sync + 'static,
{
    for (key, node) in api.iter() {
        let mut parts = prefix.clone();
        parts.push(PathPart::parse(key));

        match node {
            ApiNode::Endpoint(endpoint) => match handlers.node(key) {
                Some(HandlerNode::Leaf(handler)) => {
                    register_route(router, endpoint, &parts, handler.clone(), services.clone());
                }
                _ => skip(key, &parts, "no matching endpoint handler"),
            },
            ApiNode::Multi(multi) => match handlers.node(key) {
                Some(HandlerNode::Multi(method_handlers)) => {
                    for (method, endpoint) in multi.endpoints() {
                        match method_handlers.handler(method) {
                            Some(handler) => register_route(
                                router,
                                endpoint,
                                &parts,
                                handler.clone(),
                                services.clone(),
                            ),
                            None => warn!(
                                %method,
                                path = %path::route_path(&parts),
                                "schema declares method with no handler, skipping"
                            ),
                        }
                    }
                    if let Some(children) = multi.child_tree() {
                        match method_handlers.child_handlers() {
                            // Children share the parent's path; only their own
                            // keys add segments.
                            Some(child_handlers) => {
                                traverse(children, child_handlers, router, parts, services);
                            }
                            None => skip(key, &parts, "no handlers for children sub-tree"),
                        }
                    }
                }
                _ => skip(key, &parts, "no matching per-method handlers"),
            },
            ApiNode::Tree(subtree) => match handlers.node(key) {
                Some(HandlerNode::Tree(sub_handlers)) => {
                    traverse(subtree, sub_handlers, router, parts, services);
                }
                _ => skip(key, &parts, "no matching handler sub-tree"),
            },
        }
    }
}

fn skip(key: &str, parts: &[PathPart], reason: &str) {
    warn!(key, path = %path::route_path(parts), reason, "skipping registration");
}

fn register_route<Rt, S>(
    router: &mut Rt,
    endpoint: &Endpoint,
    parts: &PathParts,
    handler: Handler<Rt::Request, S>,
    services: Arc<S>,
) where
    Rt: Router,
    S: Send + Sync + 'static,
{
    let route = path::route_path(parts);
    let method = endpoint.allowed_method();
    debug!(%method, path = %route, "registering route");

    let endpoint = endpoint.clone();
    let route_in_callback = route.clone();
    let callback: RouteHandler<Rt::Request> = Box::new(move |mut raw: Rt::Request| {
        let endpoint = endpoint.clone();
        let handler = handler.clone();
        let services = services.clone();
        let route = route_in_callback.clone();
        Box::pin(async move {
            // Body decode completes before the handler runs.
            let request_body = match endpoint.input_schema() {
                Some(schema) => Some(match endpoint.accepts() {
                    BodyKind::Json => {
                        let bytes = raw.body_bytes().await?;
                        body::decode_json(schema.as_ref(), &bytes)?
                    }
                    BodyKind::MultipartForm => {
                        let fields = raw.form_fields().await?;
                        body::decode_form(schema.as_ref(), fields)?
                    }
                }),
                None => None,
            };

            let query_object = match endpoint.query_schema() {
                Some(schema) => {
                    let raw_query = raw.query_string().unwrap_or_default();
                    Some(query::decode(&raw_query, schema.as_ref())?)
                }
                None => None,
            };

            let context = Context {
                body: request_body,
                query: query_object,
                raw,
                services,
            };
            let (status, response_body) = handler(context).await?;
            respond(&endpoint, &route, status, response_body)
        })
    });

    router.register(method, &route, callback);
}
