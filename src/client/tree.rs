//! Client-side traversal: mirroring the API tree as nested callables.
//!
//! The walk carries the same accumulated path parts as the server install,
//! so both sides compute identical paths from identical trees.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::body;
use crate::endpoint::{Api, ApiNode, Endpoint};
use crate::error::ApiError;
use crate::method::Method;
use crate::path::{self, PathPart, PathParts};
use crate::query;
use crate::schema::SchemaRef;

use super::executor::{ApiClient, ClientResponse};

/// The structured input an [`EndpointCall`] accepts.
///
/// Only the members the endpoint actually declares matter: `body` for an
/// input schema, `path_params` for `:name` segments, `query` for a query
/// schema, `headers` for required headers. The rest stay at their
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct CallInput {
    /// Request body, for endpoints with an input schema.
    pub body: Option<Value>,
    /// Values for the path's `:name` segments.
    pub path_params: BTreeMap<String, String>,
    /// Structured query object, for endpoints with a query schema.
    pub query: Option<Value>,
    /// Extra request headers (required headers go here).
    pub headers: Vec<(String, String)>,
}

impl CallInput {
    /// An empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Binds one path parameter.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Sets the structured query object.
    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Appends one request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// One callable endpoint of a client tree.
pub struct EndpointCall {
    client: Arc<ApiClient>,
    endpoint: Endpoint,
    parts: PathParts,
}

impl EndpointCall {
    /// Whether this call needs any input at all.
    ///
    /// True iff the endpoint declares an input schema, the path contains
    /// parameters, required headers are non-empty, or a query schema is
    /// configured. When false, [`call_empty`](Self::call_empty) suffices.
    pub fn requires_input(&self) -> bool {
        self.endpoint.input_schema().is_some()
            || path::has_params(&self.parts)
            || !self.endpoint.required_headers().is_empty()
            || self.endpoint.query_schema().is_some()
    }

    /// The endpoint's input schema, exposed so callers can pre-validate a
    /// body before sending it.
    pub fn input_schema(&self) -> Option<&SchemaRef> {
        self.endpoint.input_schema()
    }

    /// The literal route path this call targets (`:name` syntax).
    pub fn route_path(&self) -> String {
        path::route_path(&self.parts)
    }

    /// Issues the request.
    ///
    /// Path resolution, query encoding, and body encoding all happen (and
    /// can all fail) before anything touches the network; the response is
    /// dispatched against the endpoint's output mapping.
    pub async fn call(&self, input: CallInput) -> Result<ClientResponse, ApiError> {
        let resolved = path::resolve(&self.parts, &input.path_params)?;
        let query_string = input.query.as_ref().map(query::encode).transpose()?;
        let request_body = match (self.endpoint.input_schema(), input.body) {
            (Some(schema), Some(value)) => Some(body::encode(
                self.endpoint.accepts(),
                schema.as_ref(),
                value,
            )?),
            _ => None,
        };
        self.client
            .execute(
                &self.endpoint,
                &resolved,
                query_string,
                request_body,
                &input.headers,
            )
            .await
    }

    /// Issues the request with no input (endpoints where
    /// [`requires_input`](Self::requires_input) is false).
    pub async fn call_empty(&self) -> Result<ClientResponse, ApiError> {
        self.call(CallInput::default()).await
    }
}

/// One node of the client tree: callables per method, plus children.
///
/// A multi endpoint's method callables and its children sit merged at the
/// same node, exactly as the schema declares them at the same path.
#[derive(Default)]
pub struct ClientNode {
    calls: BTreeMap<Method, EndpointCall>,
    children: ClientTree,
}

impl ClientNode {
    /// The callable for `method` at this node, if declared.
    pub fn call(&self, method: Method) -> Option<&EndpointCall> {
        self.calls.get(&method)
    }

    /// Iterates this node's callables.
    pub fn calls(&self) -> impl Iterator<Item = (Method, &EndpointCall)> {
        self.calls.iter().map(|(method, call)| (*method, call))
    }

    /// This node's children.
    pub fn children(&self) -> &ClientTree {
        &self.children
    }
}

/// The mirror-shaped tree of callables produced by the client traversal.
#[derive(Default)]
pub struct ClientTree {
    nodes: BTreeMap<String, ClientNode>,
}

impl ClientTree {
    /// Builds the full client tree for `api`, sharing one executor across
    /// every callable.
    pub fn for_api(api: &Api, client: Arc<ApiClient>) -> Self {
        build(api, &client, &Vec::new())
    }

    /// The node at `key`, if any.
    pub fn node(&self, key: &str) -> Option<&ClientNode> {
        self.nodes.get(key)
    }

    /// Descends a key sequence from this tree's root.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// let complete = clients.at(&["tasks", ":taskId", "complete"]).unwrap();
    /// ```
    pub fn at(&self, keys: &[&str]) -> Option<&ClientNode> {
        let (first, rest) = keys.split_first()?;
        let mut node = self.node(first)?;
        for key in rest {
            node = node.children.node(key)?;
        }
        Some(node)
    }

    /// Iterates the tree's immediate children.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClientNode)> {
        self.nodes.iter().map(|(key, node)| (key.as_str(), node))
    }
}

fn build(api: &Api, client: &Arc<ApiClient>, prefix: &PathParts) -> ClientTree {
    let mut nodes = BTreeMap::new();
    for (key, api_node) in api.iter() {
        let mut parts = prefix.clone();
        parts.push(PathPart::parse(key));

        let node = match api_node {
            ApiNode::Endpoint(endpoint) => ClientNode {
                calls: BTreeMap::from([(
                    endpoint.allowed_method(),
                    call_for(client, endpoint, &parts),
                )]),
                children: ClientTree::default(),
            },
            ApiNode::Multi(multi) => ClientNode {
                calls: multi
                    .endpoints()
                    .map(|(method, endpoint)| (method, call_for(client, endpoint, &parts)))
                    .collect(),
                // Children mirror at the same path depth.
                children: multi
                    .child_tree()
                    .map(|children| build(children, client, &parts))
                    .unwrap_or_default(),
            },
            ApiNode::Tree(subtree) => ClientNode {
                calls: BTreeMap::new(),
                children: build(subtree, client, &parts),
            },
        };
        nodes.insert(key.to_string(), node);
    }
    ClientTree { nodes }
}

fn call_for(client: &Arc<ApiClient>, endpoint: &Endpoint, parts: &PathParts) -> EndpointCall {
    EndpointCall {
        client: client.clone(),
        endpoint: endpoint.clone(),
        parts: parts.clone(),
    }
}
