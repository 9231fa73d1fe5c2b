//! Path expressions and concrete node paths
//!
//! A concrete path is the address of one node: member names for object members, entry keys
//! and values, bracketed ordinals for elements. An expression is a concrete path that may
//! also contain wildcards. Matching compares position by position; a wildcard matches exactly
//! one segment, never several.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::parser;
use crate::constants::{ROOT_MARKER, WILDCARD};
use crate::error::{Error, Result};

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Member, entry key or entry value by name
    Name(String),
    /// Any name at this position
    AnyName,
    /// Element by ordinal
    Index(usize),
    /// Any ordinal at this position
    AnyIndex,
}

impl Segment {
    /// Whether this (possibly wildcard) segment accepts a concrete segment
    pub fn matches(&self, concrete: &Self) -> bool {
        match (self, concrete) {
            (Self::Name(expected), Self::Name(actual)) => expected == actual,
            (Self::AnyName, Self::Name(_)) | (Self::AnyIndex, Self::Index(_)) => true,
            (Self::Index(expected), Self::Index(actual)) => expected == actual,
            _ => false,
        }
    }

    /// Whether the segment is a wildcard
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::AnyName | Self::AnyIndex)
    }

    fn write(&self, f: &mut std::fmt::Formatter<'_>, first: bool) -> std::fmt::Result {
        match self {
            Self::Name(name) if first => write!(f, "{name}"),
            Self::Name(name) => write!(f, ".{name}"),
            Self::AnyName if first => write!(f, "{WILDCARD}"),
            Self::AnyName => write!(f, ".{WILDCARD}"),
            Self::Index(index) => write!(f, "[{index}]"),
            Self::AnyIndex => write!(f, "[{WILDCARD}]"),
        }
    }
}

fn write_segments(f: &mut std::fmt::Formatter<'_>, segments: &[Segment]) -> std::fmt::Result {
    if segments.is_empty() {
        return write!(f, "{ROOT_MARKER}");
    }
    for (position, segment) in segments.iter().enumerate() {
        segment.write(f, position == 0)?;
    }
    Ok(())
}

/// Address of one node, from the root down
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<Segment>);

impl NodePath {
    /// The root's path
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend with a member name
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        self.join(Segment::Name(name.to_string()))
    }

    /// Extend with an element ordinal
    #[must_use]
    pub fn element(&self, index: usize) -> Self {
        self.join(Segment::Index(index))
    }

    /// Extend with an arbitrary concrete segment
    #[must_use]
    pub fn join(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// Segments from the root down
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Whether this is the root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_segments(f, &self.0)
    }
}

/// A parsed, normalized path expression
///
/// Equality is structural: `items[0].name` and `$. items [ 0 ] . name` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathExpression {
    segments: Vec<Segment>,
}

impl PathExpression {
    /// Parse an expression such as `$`, `items[*].name` or `*.value`
    pub fn parse(expression: &str) -> Result<Self> {
        parser::parse_segments(expression)
            .map(Self::from_segments)
            .map_err(|reason| {
                Error::InvalidExpression {
                    expression: expression.to_string(),
                    reason,
                }
                .into()
            })
    }

    /// Build from segments; the root is the empty sequence
    pub const fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The expression addressing the root node
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Normalized segments; empty for the root
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the expression addresses the root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether any position is a wildcard
    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(Segment::is_wildcard)
    }

    /// Whether the expression selects the node at `path`
    pub fn matches(&self, path: &NodePath) -> bool {
        self.segments.len() == path.depth()
            && self
                .segments
                .iter()
                .zip(path.segments())
                .all(|(expected, actual)| expected.matches(actual))
    }

    /// Whether the expression could select `path` or one of its descendants
    ///
    /// Used to prune traversal: a node whose path is not a prefix match cannot contain a match.
    pub fn may_match_below(&self, path: &NodePath) -> bool {
        path.depth() <= self.segments.len()
            && self
                .segments
                .iter()
                .zip(path.segments())
                .all(|(expected, actual)| expected.matches(actual))
    }
}

impl FromStr for PathExpression {
    type Err = error_stack::Report<Error>;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for PathExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_segments(f, &self.segments)
    }
}
