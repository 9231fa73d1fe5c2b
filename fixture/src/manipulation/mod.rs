//! Declarative edits to a property tree
//!
//! A [`Manipulation`] pairs a selector (path expression or node predicate) with an [`Effect`].
//! Callers assemble them through the [`Manipulate`] DSL; the [`Pipeline`] applies them in
//! order, each one observing the tree left behind by the previous ones.

pub(crate) mod decompose;
mod dsl;
mod pipeline;

use std::fmt::Debug;
use std::sync::Arc;

pub use dsl::{Manipulate, Manipulations};
pub use pipeline::Pipeline;
use serde_json::Value;

use crate::path::PathExpression;
use crate::tree::{PostCondition, PropertyNode, SupplierFn};

/// Selects nodes by inspecting them directly
pub type NodePredicate = dyn Fn(&PropertyNode) -> bool + Send + Sync;

/// Receives a sample and the (empty) list to append manipulations to
pub type ConsumerFn = dyn Fn(&Value, Manipulations) -> Manipulations + Send + Sync;

/// Which nodes a manipulation targets
#[derive(Clone)]
pub enum Selector {
    /// Nodes whose concrete path matches
    Path(PathExpression),
    /// Nodes the predicate accepts
    Where(Arc<NodePredicate>),
    /// An expression that failed to parse; reported when the pipeline reaches it
    Invalid {
        /// The text as written
        expression: String,
        /// Parser diagnostics
        reason:     String,
    },
}

impl Selector {
    /// Parse a path expression, deferring failures to apply time
    pub fn path(expression: &str) -> Self {
        match PathExpression::parse(expression) {
            Ok(parsed) => Self::Path(parsed),
            Err(report) => Self::Invalid {
                expression: expression.to_string(),
                reason:     report.current_context().to_string(),
            },
        }
    }
}

impl Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(expression) => write!(f, "Path({expression})"),
            Self::Where(_) => f.write_str("Where(..)"),
            Self::Invalid { expression, .. } => write!(f, "Invalid({expression:?})"),
        }
    }
}

/// What a manipulation does to each selected node
#[derive(Clone)]
pub enum Effect {
    /// Fix the value, decomposed over the subtree
    SetValue(Value),
    /// Draw the value from a generator at every sample
    SetSupplier(Arc<SupplierFn>),
    /// Always null
    SetNull,
    /// Never null
    SetNotNull,
    /// Replace both container bounds
    Size {
        /// Lower bound
        min: usize,
        /// Upper bound
        max: usize,
    },
    /// Replace the lower container bound
    MinSize(usize),
    /// Replace the upper container bound
    MaxSize(usize),
    /// Add a post-generation filter
    PostCondition(PostCondition),
    /// Append one synthesized element or entry
    AddEntry,
}

impl Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetValue(value) => f.debug_tuple("SetValue").field(value).finish(),
            Self::SetSupplier(_) => f.write_str("SetSupplier(..)"),
            Self::SetNull => f.write_str("SetNull"),
            Self::SetNotNull => f.write_str("SetNotNull"),
            Self::Size { min, max } => f
                .debug_struct("Size")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::MinSize(min) => f.debug_tuple("MinSize").field(min).finish(),
            Self::MaxSize(max) => f.debug_tuple("MaxSize").field(max).finish(),
            Self::PostCondition(filter) => f.debug_tuple("PostCondition").field(filter).finish(),
            Self::AddEntry => f.write_str("AddEntry"),
        }
    }
}

/// A selector, an effect and an optional cap on the number of affected nodes
#[derive(Debug, Clone)]
pub struct Manipulation {
    /// Target nodes
    pub selector: Selector,
    /// Edit applied to each target
    pub effect:   Effect,
    /// Apply to at most this many matches, in pre-order
    pub limit:    Option<usize>,
}

/// One entry of a manipulation list
#[derive(Clone)]
pub enum Step {
    /// Edit the selected nodes
    Targeted(Manipulation),
    /// Sample the tree, then append whatever the consumer returns
    Conditional(Arc<ConsumerFn>),
}

impl Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Targeted(manipulation) => f.debug_tuple("Targeted").field(manipulation).finish(),
            Self::Conditional(_) => f.write_str("Conditional(..)"),
        }
    }
}
