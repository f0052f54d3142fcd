//! The closed set of response status codes an endpoint may declare.

use strum::EnumIter;

/// Response status codes that can appear in an endpoint's output mapping.
///
/// Keeping this a closed enum (rather than a bare `u16`) means the
/// non-contentful invariant can be checked exhaustively: a code is either
/// contentful, a redirect, or one of the fixed non-contentful codes.
///
/// ## Examples
///
/// ```rust
/// use signpost::ResponseCode;
///
/// assert_eq!(ResponseCode::Ok.as_u16(), 200);
/// assert!(ResponseCode::Found.is_redirect());
/// assert!(ResponseCode::NoContent.is_non_contentful());
///
/// let code = ResponseCode::try_from(404).unwrap();
/// assert_eq!(code, ResponseCode::NotFound);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum ResponseCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 202 Accepted
    Accepted,
    /// 204 No Content
    NoContent,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 302 Found
    Found,
    /// 307 Temporary Redirect
    TemporaryRedirect,
    /// 308 Permanent Redirect
    PermanentRedirect,
    /// 400 Bad Request
    BadRequest,
    /// 401 Unauthorized
    Unauthorized,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 429 Too Many Requests
    TooManyRequests,
    /// 500 Internal Server Error
    InternalServerError,
}

impl ResponseCode {
    /// Returns the numeric status code.
    pub fn as_u16(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::Accepted => 202,
            Self::NoContent => 204,
            Self::MovedPermanently => 301,
            Self::Found => 302,
            Self::TemporaryRedirect => 307,
            Self::PermanentRedirect => 308,
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::TooManyRequests => 429,
            Self::InternalServerError => 500,
        }
    }

    /// Returns `true` for codes in the redirect range (300-399).
    ///
    /// Redirect responses carry a location string instead of a JSON body and
    /// are dispatched through the route primitive's redirect capability.
    pub fn is_redirect(&self) -> bool {
        (300..=399).contains(&self.as_u16())
    }

    /// Returns `true` for codes that must never carry a response body.
    ///
    /// Currently only 204. A handler pairing one of these with a body is a
    /// protocol violation and fails at dispatch time.
    pub fn is_non_contentful(&self) -> bool {
        matches!(self, Self::NoContent)
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Error produced when a numeric status has no [`ResponseCode`] counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownResponseCode(pub u16);

impl std::fmt::Display for UnknownResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "status code {} is not part of the declarable set", self.0)
    }
}

impl std::error::Error for UnknownResponseCode {}

impl TryFrom<u16> for ResponseCode {
    type Error = UnknownResponseCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use strum::IntoEnumIterator;
        ResponseCode::iter()
            .find(|code| code.as_u16() == value)
            .ok_or(UnknownResponseCode(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_round_trip_all_codes() {
        for code in ResponseCode::iter() {
            assert_eq!(ResponseCode::try_from(code.as_u16()), Ok(code));
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(ResponseCode::try_from(418), Err(UnknownResponseCode(418)));
        assert_eq!(ResponseCode::try_from(204).unwrap(), ResponseCode::NoContent);
    }

    #[test]
    fn test_redirect_classification() {
        assert!(ResponseCode::MovedPermanently.is_redirect());
        assert!(ResponseCode::Found.is_redirect());
        assert!(ResponseCode::TemporaryRedirect.is_redirect());
        assert!(ResponseCode::PermanentRedirect.is_redirect());
        assert!(!ResponseCode::Ok.is_redirect());
        assert!(!ResponseCode::NotFound.is_redirect());
    }

    #[test]
    fn test_non_contentful_is_exactly_204() {
        let non_contentful: Vec<_> = ResponseCode::iter()
            .filter(ResponseCode::is_non_contentful)
            .collect();
        assert_eq!(non_contentful, vec![ResponseCode::NoContent]);
    }

    #[test]
    fn test_display() {
        assert_eq!(ResponseCode::Ok.to_string(), "200");
        assert_eq!(ResponseCode::TooManyRequests.to_string(), "429");
    }
}
