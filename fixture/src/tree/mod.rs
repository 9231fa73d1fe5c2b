//! The property tree: one node per value to be produced
//!
//! A tree is owned by exactly one request. It is built once, reshaped in place by the
//! manipulation pipeline, then consumed by the generation backend.

mod builder;
mod node;

pub use builder::{SizeRule, TreeBuilder, draw_count};
pub use node::{
    ContainerSize, NodeDirectives, NodeRole, NullDirective, NullPolicy, PostCondition,
    PredicateFn, PropertyNode, SupplierFn, ValueDirective, ValueSource,
};
