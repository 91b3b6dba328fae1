//! Canonical field paths.
//!
//! Field positions are identified by slash-joined segments (e.g.
//! `response/200/body/items/[]/id`) so identity is stable regardless of
//! source ordering. Array elements use the `[]` segment.

use serde::{Deserialize, Serialize};

/// Segment used for array element positions
pub const ARRAY_SEGMENT: &str = "[]";

/// Which side of the wire a field position belongs to.
///
/// Derived from the root segment of the canonical path; classification
/// rules differ between request and response positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Parameters and request body (`request/...`)
    Request,
    /// Response bodies (`response/...`)
    Response,
    /// Document-level metadata (`meta/...`)
    Meta,
}

/// A canonical slash-joined field path within one operation.
///
/// Ordered lexicographically by its canonical string, which makes
/// `BTreeMap<FieldPath, _>` iteration deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The empty path (operation root)
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Build a path from segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            segments
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }

    /// Append one segment, returning the child path
    pub fn child(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            Self(segment.to_string())
        } else {
            Self(format!("{}/{}", self.0, segment))
        }
    }

    /// The canonical slash-joined string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the operation-root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Parent path, or None at the root or for single-segment paths
    pub fn parent(&self) -> Option<FieldPath> {
        let idx = self.0.rfind('/')?;
        Some(Self(self.0[..idx].to_string()))
    }

    /// Direction implied by the root segment
    pub fn direction(&self) -> Option<Direction> {
        let first = self.0.split('/').next()?;
        match first {
            "request" => Some(Direction::Request),
            "response" => Some(Direction::Response),
            "meta" => Some(Direction::Meta),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_appends_segments() {
        let path = FieldPath::root()
            .child("response")
            .child("200")
            .child("body")
            .child("items")
            .child(ARRAY_SEGMENT)
            .child("id");
        assert_eq!(path.as_str(), "response/200/body/items/[]/id");
    }

    #[test]
    fn test_root_is_empty() {
        assert!(FieldPath::root().is_root());
        assert!(!FieldPath::root().child("request").is_root());
    }

    #[test]
    fn test_parent() {
        let path = FieldPath::from_segments(["request", "body", "count"]);
        assert_eq!(path.parent().unwrap().as_str(), "request/body");
        assert_eq!(FieldPath::from_segments(["request"]).parent(), None);
        assert_eq!(FieldPath::root().parent(), None);
    }

    #[test]
    fn test_direction_from_root_segment() {
        assert_eq!(
            FieldPath::from_segments(["request", "body"]).direction(),
            Some(Direction::Request)
        );
        assert_eq!(
            FieldPath::from_segments(["response", "200", "body"]).direction(),
            Some(Direction::Response)
        );
        assert_eq!(
            FieldPath::from_segments(["meta", "title"]).direction(),
            Some(Direction::Meta)
        );
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = FieldPath::from_segments(["request", "body", "a"]);
        let b = FieldPath::from_segments(["request", "body", "b"]);
        assert!(a < b);
    }
}
