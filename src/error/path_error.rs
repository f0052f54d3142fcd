/// Path-parameter resolution failures.
///
/// Raised on the client side before any request is built, so a missing
/// parameter never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A `:name` segment had no value bound to `name`.
    #[error("missing value for path parameter `:{name}`")]
    MissingParameter {
        /// Name of the unresolved parameter (without the leading `:`).
        name: String,
    },
}
