/// HTTP transport errors surfaced by the client side.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying request failed (network, TLS, timeout).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Client construction or URL assembly failed.
    #[error("connection error: {0}")]
    Connection(String),
}
