//! Path segments and parameter resolution.
//!
//! Both traversals accumulate the same ordered segment sequence while
//! descending the tree, and both derive their path math from it: the server
//! renders the literal registration path (keeping `:name` syntax for the
//! route primitive), the client substitutes bound parameter values before a
//! request is built.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::PathError;

/// One segment of a route path.
///
/// Segments whose key begins with `:` are parameters; everything else is
/// literal path text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathPart {
    /// Literal path text, emitted as-is.
    Literal(String),
    /// A named parameter (stored without the leading `:`).
    Param(String),
}

impl PathPart {
    /// Parses a tree key into a segment, honouring the `:name` convention.
    pub fn parse(segment: &str) -> Self {
        match segment.strip_prefix(':') {
            Some(name) => Self::Param(name.to_string()),
            None => Self::Literal(segment.to_string()),
        }
    }

    /// Returns `true` for parameter segments.
    pub fn is_param(&self) -> bool {
        matches!(self, Self::Param(_))
    }
}

impl fmt::Display for PathPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{text}"),
            Self::Param(name) => write!(f, ":{name}"),
        }
    }
}

/// The ordered segment sequence from the tree root to a node.
pub type PathParts = Vec<PathPart>;

/// Renders the literal registration path, `:name` syntax included.
///
/// The route primitive is expected to understand colon-prefixed parameter
/// segments, so this is a pass-through of the tree keys.
pub fn route_path(parts: &[PathPart]) -> String {
    let joined = parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

/// Substitutes parameter values into the path.
///
/// Fails with [`PathError::MissingParameter`] if any `:name` segment has no
/// binding, before anything touches the network.
pub fn resolve(
    parts: &[PathPart],
    params: &BTreeMap<String, String>,
) -> Result<String, PathError> {
    let resolved = parts
        .iter()
        .map(|part| match part {
            PathPart::Literal(text) => Ok(text.clone()),
            PathPart::Param(name) => {
                params
                    .get(name)
                    .cloned()
                    .ok_or_else(|| PathError::MissingParameter { name: name.clone() })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("/{}", resolved.join("/")))
}

/// The distinct parameter names in scope for this path.
///
/// Duplicate `:name` segments collapse to one entry.
pub fn param_names(parts: &[PathPart]) -> BTreeSet<&str> {
    parts
        .iter()
        .filter_map(|part| match part {
            PathPart::Param(name) => Some(name.as_str()),
            PathPart::Literal(_) => None,
        })
        .collect()
}

/// Returns `true` if any segment is a parameter.
pub fn has_params(parts: &[PathPart]) -> bool {
    parts.iter().any(PathPart::is_param)
}
