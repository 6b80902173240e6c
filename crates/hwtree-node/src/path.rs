//! Node paths
//!
//! Provides [`NodePath`], the `/`-separated name path used by
//! [`Tree::find_by_path`](crate::Tree::find_by_path).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between path segments
pub const SEPARATOR: char = '/';

/// Name path from a node down to one of its descendants
///
/// # Examples
/// - `["Controller Port 1", "Gamepad"]` → `Controller Port 1/Gamepad`
/// - `[]` → `` (the empty path, which never resolves)
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// Create path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parse `a/b/c`; the empty string gives the empty path
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self(text.split(SEPARATOR).map(str::to_string).collect())
    }

    /// Path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path has no segments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment (the target's name)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Path without its last segment
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.0.push(segment.into());
        path
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for NodePath {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<Vec<String>> for NodePath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let path = NodePath::parse("Controller Port 1/Gamepad/Up");
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some("Up"));
        assert_eq!(path.to_string(), "Controller Port 1/Gamepad/Up");
    }

    #[test]
    fn empty_path() {
        let path = NodePath::parse("");
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
        assert!(path.parent().is_none());
    }

    #[test]
    fn empty_segments_are_kept() {
        let path: NodePath = "a//b".into();
        assert_eq!(path.segments(), &["a", "", "b"]);
    }

    #[test]
    fn parent_child_prefix() {
        let path = NodePath::parse("Cartridge/ROM");
        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "Cartridge");
        assert_eq!(parent.child("RAM").to_string(), "Cartridge/RAM");
        assert!(parent.is_prefix_of(&path));
        assert!(!path.is_prefix_of(&parent));
    }
}
