//! Property nodes and the directives manipulations attach to them

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::path::{NodePath, Segment};
use crate::type_system::{TypeKind, TypeName, TypeShape};

/// Produces a fresh value every time a sample is drawn
pub type SupplierFn = dyn Fn() -> Value + Send + Sync;

/// Accepts or rejects a generated value
pub type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// Where a node sits relative to its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRole {
    /// The requested type itself
    Root,
    /// A member of an object
    Member {
        /// Member name
        name:     String,
        /// Whether the member may be null by default
        nullable: bool,
    },
    /// An element of a list or set, or an entry of a map
    Element(usize),
    /// The key of a map entry
    EntryKey,
    /// The value of a map entry
    EntryValue,
    /// The payload of an optional
    Payload,
}

impl NodeRole {
    /// The segment this role contributes to a concrete path, `None` for the root
    pub fn segment(&self) -> Option<Segment> {
        match self {
            Self::Root => None,
            Self::Member { name, .. } => Some(Segment::Name(name.clone())),
            Self::Element(index) => Some(Segment::Index(*index)),
            Self::EntryKey => Some(Segment::Name(crate::constants::ENTRY_KEY.to_string())),
            Self::EntryValue => Some(Segment::Name(crate::constants::ENTRY_VALUE.to_string())),
            Self::Payload => Some(Segment::Index(0)),
        }
    }
}

/// Disposition towards null
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NullPolicy {
    /// Null with the given probability
    Default(f64),
    /// Always null
    AlwaysNull,
    /// Never null
    NeverNull,
}

/// A null policy with the manipulation sequence number that set it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NullDirective {
    /// Current policy
    pub policy: NullPolicy,
    /// Sequence number of the manipulation that set it, 0 for build defaults
    pub stamp:  u64,
}

/// Source of a node's value when it is not generated
#[derive(Clone)]
pub enum ValueSource {
    /// A fixed value
    Fixed(Value),
    /// A generator evaluated at every sample
    Supplier(Arc<SupplierFn>),
}

impl Debug for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Supplier(_) => f.write_str("Supplier(..)"),
        }
    }
}

/// A value source with the manipulation sequence number that set it
#[derive(Debug, Clone)]
pub struct ValueDirective {
    /// Where the value comes from
    pub source: ValueSource,
    /// Sequence number of the manipulation that set it
    pub stamp:  u64,
}

/// A post-generation filter
#[derive(Clone)]
pub struct PostCondition {
    /// Type the filter was declared for
    pub expected_type: TypeName,
    /// Accepts or rejects a candidate
    pub predicate:     Arc<PredicateFn>,
}

impl Debug for PostCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostCondition")
            .field("expected_type", &self.expected_type)
            .finish_non_exhaustive()
    }
}

/// Size bounds of a container node
///
/// `default_min`/`default_max` come from the build-time sizing rules. `min`/`max` are bounds a
/// manipulation set explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSize {
    /// Lower bound when no explicit bound applies
    pub default_min: usize,
    /// Upper bound when no explicit bound applies
    pub default_max: usize,
    /// Explicit lower bound
    pub min:         Option<usize>,
    /// Explicit upper bound
    pub max:         Option<usize>,
}

impl ContainerSize {
    /// Bounds from sizing rules only
    pub const fn with_defaults(default_min: usize, default_max: usize) -> Self {
        Self {
            default_min,
            default_max,
            min: None,
            max: None,
        }
    }

    /// The inclusive range a container count is drawn from
    pub fn range(&self) -> Result<(usize, usize)> {
        let (min, max) = match (self.min, self.max) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, min.saturating_add(self.default_max)),
            (None, Some(max)) => (self.default_min.min(max), max),
            (None, None) => (self.default_min, self.default_max),
        };
        if min > max {
            return Err(Error::size_bounds(min, max).into());
        }
        Ok((min, max))
    }
}

/// Everything manipulations have attached to one node
#[derive(Debug, Clone)]
pub struct NodeDirectives {
    /// Null disposition
    pub null:    NullDirective,
    /// Fixed value or generator
    pub value:   Option<ValueDirective>,
    /// Filters every accepted value must pass
    pub filters: Vec<PostCondition>,
}

impl NodeDirectives {
    /// Directives of a freshly built node
    pub const fn with_null_probability(probability: f64) -> Self {
        Self {
            null:    NullDirective {
                policy: NullPolicy::Default(probability),
                stamp:  0,
            },
            value:   None,
            filters: Vec::new(),
        }
    }
}

/// One position in the generation tree
#[derive(Debug, Clone)]
pub struct PropertyNode {
    pub(crate) role:       NodeRole,
    pub(crate) path:       NodePath,
    pub(crate) shape:      Arc<TypeShape>,
    pub(crate) depth:      usize,
    pub(crate) truncated:  bool,
    pub(crate) size:       Option<ContainerSize>,
    pub(crate) children:   Vec<Self>,
    pub(crate) directives: NodeDirectives,
}

impl PropertyNode {
    /// Role relative to the parent
    pub const fn role(&self) -> &NodeRole {
        &self.role
    }

    /// Concrete path from the root
    pub const fn path(&self) -> &NodePath {
        &self.path
    }

    /// Resolved type
    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Resolved type name
    pub fn type_name(&self) -> &TypeName {
        &self.shape.type_name
    }

    /// Type category
    pub fn kind(&self) -> TypeKind {
        self.shape.kind
    }

    /// Member name when the node is an object member
    pub fn member_name(&self) -> Option<&str> {
        match &self.role {
            NodeRole::Member { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Object/container nesting of this node
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Whether the recursion limit cut this subtree off
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Size bounds for container nodes
    pub const fn size(&self) -> Option<&ContainerSize> {
        self.size.as_ref()
    }

    /// Child nodes in declaration or ordinal order
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Attached directives
    pub const fn directives(&self) -> &NodeDirectives {
        &self.directives
    }

    /// Child by member name (or `key`/`value` for entries)
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children
            .iter()
            .find(|child| child.role.segment() == Some(Segment::Name(name.to_string())))
    }

    /// Find a descendant (or self) by concrete path
    pub fn find(&self, path: &NodePath) -> Option<&Self> {
        if &self.path == path {
            return Some(self);
        }
        let next = path.segments().get(self.path.depth())?;
        self.children
            .iter()
            .find(|child| child.role.segment().as_ref() == Some(next))
            .and_then(|child| child.find(path))
    }

    pub(crate) fn find_mut(&mut self, path: &NodePath) -> Option<&mut Self> {
        if &self.path == path {
            return Some(self);
        }
        let next = path.segments().get(self.path.depth())?;
        self.children
            .iter_mut()
            .find(|child| child.role.segment().as_ref() == Some(next))
            .and_then(|child| child.find_mut(path))
    }

    /// Pre-order walk of this subtree
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}
