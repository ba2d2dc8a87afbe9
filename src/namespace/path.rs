//! # Dotted namespace paths.
//!
//! A [`NamespacePath`] is a validated, non-empty dotted path such as
//! `"users.admin"`. Each segment is non-empty and contains no whitespace.

use std::fmt;

use crate::error::RegistryError;

/// Validated dotted path identifying a module's location.
///
/// # Example
/// ```
/// use modrain::NamespacePath;
///
/// let path = NamespacePath::parse("users.admin").unwrap();
/// assert_eq!(path.segments().collect::<Vec<_>>(), ["users", "admin"]);
/// assert_eq!(path.parent().unwrap().as_str(), "users");
/// assert!(NamespacePath::parse("users..admin").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespacePath(String);

impl NamespacePath {
    /// Parses and validates a dotted path.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let invalid = |reason| RegistryError::InvalidNamespace {
            namespace: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("empty namespace"));
        }
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(invalid("empty path segment"));
            }
            if segment.chars().any(char::is_whitespace) {
                return Err(invalid("whitespace in path segment"));
            }
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the path segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Returns the enclosing path, or `None` for a top-level namespace.
    pub fn parent(&self) -> Option<NamespacePath> {
        self.0
            .rsplit_once('.')
            .map(|(parent, _)| NamespacePath(parent.to_string()))
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NamespacePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for NamespacePath {
    type Error = RegistryError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_malformed_paths() {
        for raw in ["", ".", "a.", ".a", "a..b", "a. b", "a b"] {
            let err = NamespacePath::parse(raw).unwrap_err();
            assert_eq!(err.as_label(), "registry_invalid_namespace", "input {raw:?}");
        }
    }

    #[test]
    fn top_level_has_no_parent() {
        let path = NamespacePath::parse("math").unwrap();
        assert_eq!(path.depth(), 1);
        assert!(path.parent().is_none());
    }

    proptest! {
        #[test]
        fn well_formed_paths_round_trip(segments in prop::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,8}", 1..5)) {
            let raw = segments.join(".");
            let path = NamespacePath::parse(&raw).unwrap();
            prop_assert_eq!(path.as_str(), raw.as_str());
            prop_assert_eq!(path.depth(), segments.len());
            prop_assert_eq!(path.segments().map(str::to_string).collect::<Vec<_>>(), segments);
        }
    }
}
