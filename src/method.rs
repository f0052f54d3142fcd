//! HTTP methods routable through an API tree.

use strum::{Display, EnumIter, EnumString};

/// The HTTP methods an [`Endpoint`](crate::Endpoint) may declare.
///
/// This is a closed set: an API tree can only describe operations for these
/// five methods, and a [`MultiEndpoint`](crate::MultiEndpoint) holds at most
/// one endpoint per variant.
///
/// ## Examples
///
/// ```rust
/// use signpost::Method;
///
/// let method = Method::Get;
/// assert!(!method.has_body());
///
/// // Parse from string
/// let parsed: Method = "POST".parse().unwrap();
/// assert_eq!(parsed, Method::Post);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET - Retrieve a resource.
    Get,
    /// HTTP POST - Create a resource or trigger an action.
    Post,
    /// HTTP PUT - Replace a resource entirely.
    Put,
    /// HTTP PATCH - Partially update a resource.
    Patch,
    /// HTTP DELETE - Remove a resource.
    Delete,
}

impl Method {
    /// Returns `true` if this method typically carries a request body.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        method.to_reqwest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_parse() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("PUT".parse::<Method>().unwrap(), Method::Put);
        assert!("TRACE".parse::<Method>().is_err());
    }

    #[test]
    fn test_has_body() {
        assert!(!Method::Get.has_body());
        assert!(Method::Post.has_body());
        assert!(Method::Put.has_body());
        assert!(Method::Patch.has_body());
        assert!(!Method::Delete.has_body());
    }

    #[test]
    fn test_enum_iteration() {
        let methods: Vec<_> = Method::iter().collect();
        assert_eq!(methods.len(), 5);
    }

    #[test]
    fn test_to_reqwest() {
        assert_eq!(Method::Get.to_reqwest(), reqwest::Method::GET);
        assert_eq!(Method::Delete.to_reqwest(), reqwest::Method::DELETE);
    }
}
