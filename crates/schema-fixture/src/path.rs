//! Traversal location tracking.
//!
//! A [`Path`] records the field names and array indices leading from the
//! schema root to the node currently being generated. Generators use it to
//! narrow where they apply, for example by matching on the trailing field
//! name regardless of depth.

use std::fmt;

/// One step from a parent node to a child node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named object field.
    Field(String),
    /// A zero-based array position.
    Index(usize),
}

impl PathSegment {
    /// Returns the field name, or `None` for an index segment.
    #[must_use]
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Self::Field(name) => Some(name),
            Self::Index(_) => None,
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::Field(name.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Ordered sequence of segments from the root to the current node.
///
/// # Example
///
/// ```
/// use schema_fixture::{Path, PathSegment};
///
/// let mut path = Path::root();
/// path.push(PathSegment::from("pets"));
/// path.push(PathSegment::from(1_usize));
/// path.push(PathSegment::from("name"));
///
/// assert_eq!(path.to_string(), "pets[1].name");
/// assert!(path.ends_with_field("name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Creates an empty path pointing at the schema root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Appends a segment when descending into a child.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Removes the trailing segment when leaving a child.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Returns the segments from root to the current node.
    #[must_use]
    pub fn current(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the trailing segment, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Returns `true` when the trailing segment is the named field.
    #[must_use]
    pub fn ends_with_field(&self, name: &str) -> bool {
        self.last()
            .and_then(PathSegment::as_field)
            .is_some_and(|field| field == name)
    }

    /// Returns the nesting depth.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` at the schema root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if position == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn path_of(segments: &[PathSegment]) -> Path {
        let mut path = Path::root();
        for segment in segments {
            path.push(segment.clone());
        }
        path
    }

    #[test]
    fn push_and_pop_follow_stack_order() {
        let mut path = Path::root();
        path.push("nested".into());
        path.push("totalVisits".into());

        assert_eq!(path.pop(), Some(PathSegment::from("totalVisits")));
        assert_eq!(path.current(), &[PathSegment::from("nested")]);
        assert_eq!(path.pop(), Some(PathSegment::from("nested")));
        assert!(path.is_empty());
        assert_eq!(path.pop(), None);
    }

    #[rstest]
    #[case::shallow(vec![PathSegment::from("totalVisits")])]
    #[case::nested(vec![PathSegment::from("nested"), PathSegment::from("totalVisits")])]
    #[case::inside_array(vec![
        PathSegment::from("visits"),
        PathSegment::from(3_usize),
        PathSegment::from("totalVisits"),
    ])]
    fn trailing_field_matches_at_any_depth(#[case] segments: Vec<PathSegment>) {
        assert!(path_of(&segments).ends_with_field("totalVisits"));
    }

    #[test]
    fn trailing_index_is_not_a_field() {
        let path = path_of(&[PathSegment::from("pets"), PathSegment::from(0_usize)]);

        assert!(!path.ends_with_field("pets"));
        assert_eq!(path.last().and_then(PathSegment::as_field), None);
    }

    #[rstest]
    #[case(vec![], "<root>")]
    #[case(vec![PathSegment::from("name")], "name")]
    #[case(vec![PathSegment::from("address"), PathSegment::from("city")], "address.city")]
    #[case(vec![PathSegment::from(2_usize), PathSegment::from("id")], "[2].id")]
    fn displays_dotted_notation(#[case] segments: Vec<PathSegment>, #[case] expected: &str) {
        assert_eq!(path_of(&segments).to_string(), expected);
    }
}
