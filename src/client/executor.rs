//! Request execution with tracing instrumentation.
//!
//! This module provides the [`ApiClient`] struct for executing calls built
//! by the client traversal, plus the status-code dispatch that turns a raw
//! response into a typed `(status, body)` pair.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{instrument, Span};
use url::Url;

use crate::body::RequestBody;
use crate::endpoint::{Endpoint, OutputBody};
use crate::error::{ApiError, ClientError, ProtocolError, ValidationError};
use crate::status::ResponseCode;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring an [`ApiClient`].
#[derive(Debug)]
pub struct ApiClientBuilder {
    base_url: Url,
    timeout: Duration,
    default_headers: HeaderMap,
}

impl ApiClientBuilder {
    /// Creates a new builder with the specified base URL.
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
        }
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a default header to all requests.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ApiError> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ClientError::Connection(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ClientError::Connection(format!("invalid header value: {e}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Builds the [`ApiClient`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(ClientError::Request)?;

        Ok(ApiClient {
            client,
            base_url: self.base_url,
        })
    }
}

/// A response that matched the endpoint's declared output mapping.
///
/// `status` discriminates which declared body shape `body` holds, so a
/// caller matches on `status` to recover the exact type a status maps to.
/// Non-contentful and declared-empty statuses carry `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientResponse {
    /// The declared status the server responded with.
    pub status: ResponseCode,
    /// The validated response body, if the output is contentful.
    pub body: Option<Value>,
}

/// Async HTTP executor shared by every callable of a client tree.
///
/// Wraps `reqwest::Client` with connection pooling, a base URL, and the
/// response dispatch that enforces each endpoint's output mapping.
#[derive(Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a new builder for configuring an API client.
    pub fn builder(base_url: Url) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    /// Creates a new API client with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        Self::builder(base_url).build()
    }

    /// Returns the base URL for this client.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Executes one prepared endpoint call and dispatches the response.
    ///
    /// `path` is already parameter-resolved; `query` is an encoded query
    /// string. JSON bodies set `Content-Type: application/json`; multipart
    /// bodies leave it to the transport so the boundary gets calculated.
    ///
    /// ## Errors
    ///
    /// - [`ClientError`] if a header is invalid or the transport fails.
    /// - [`ProtocolError::UndeclaredStatus`] if the response status is not
    ///   in the endpoint's output mapping.
    /// - [`ValidationError`] if a contentful body is not JSON or fails the
    ///   declared schema.
    #[instrument(
        name = "api_request",
        skip(self, endpoint, body),
        fields(
            http.method = tracing::field::Empty,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub(crate) async fn execute(
        &self,
        endpoint: &Endpoint,
        path: &str,
        query: Option<String>,
        body: Option<RequestBody>,
        headers: &[(String, String)],
    ) -> Result<ClientResponse, ApiError> {
        let method = endpoint.allowed_method();
        Span::current().record("http.method", method.to_string().as_str());

        // The base URL may carry a path prefix (a server mounted under
        // `/api`, say); the resolved endpoint path appends to it rather
        // than replacing it.
        let mut full_url = self.base_url.clone();
        let merged = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        full_url.set_path(&merged);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            full_url.set_query(Some(&query));
        }
        Span::current().record("http.url", full_url.as_str());

        let mut request = self
            .client
            .request(method.to_reqwest(), full_url)
            .header(ACCEPT, "application/json");

        request = match body {
            Some(RequestBody::Json(text)) => request
                .header(CONTENT_TYPE, "application/json")
                .body(text),
            Some(RequestBody::Form(fields)) => {
                let mut form = reqwest::multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                request.multipart(form)
            }
            None => request,
        };

        for (name, value) in headers {
            request = request.header(
                HeaderName::try_from(name.as_str())
                    .map_err(|e| ClientError::Connection(format!("invalid header name: {e}")))?,
                HeaderValue::try_from(value.as_str())
                    .map_err(|e| ClientError::Connection(format!("invalid header value: {e}")))?,
            );
        }

        let response = request.send().await.map_err(ClientError::Request)?;

        let raw_status = response.status().as_u16();
        Span::current().record("http.status_code", raw_status);

        let undeclared = |status: u16| ProtocolError::UndeclaredStatus {
            status,
            path: path.to_string(),
            method,
        };

        let Ok(status) = ResponseCode::try_from(raw_status) else {
            Span::current().record("otel.status_code", "ERROR");
            return Err(undeclared(raw_status).into());
        };
        let Some(output) = endpoint.output_for(status) else {
            Span::current().record("otel.status_code", "ERROR");
            return Err(undeclared(raw_status).into());
        };

        Span::current().record("otel.status_code", "OK");

        if status.is_non_contentful() || matches!(output, OutputBody::Empty) {
            return Ok(ClientResponse { status, body: None });
        }

        let OutputBody::Schema(schema) = output else {
            unreachable!("empty outputs handled above");
        };
        let text = response.text().await.map_err(ClientError::Request)?;
        let parsed: Value = serde_json::from_str(&text)
            .map_err(|source| ValidationError::ResponseParse { source, raw: text })?;
        let validated =
            schema
                .parse(parsed.clone())
                .map_err(|violation| ValidationError::Response {
                    violation,
                    raw: parsed,
                })?;

        Ok(ClientResponse {
            status,
            body: Some(validated),
        })
    }
}
