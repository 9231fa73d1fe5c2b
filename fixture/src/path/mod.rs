//! Textual addressing of tree nodes
//!
//! Grammar, normalization and matching of path expressions such as `$`, `items[2].sku`,
//! `items[*].*` or `tags[0]`.

mod expression;
mod parser;

pub use expression::{NodePath, PathExpression, Segment};
