//! Expands a root type into a tree of property nodes
//!
//! Container counts are drawn from the request's RNG when a node is built, so the tree
//! already has its final shape before any manipulation runs. Manipulations that change a
//! container's bounds call back into [`TreeBuilder::resize`] to re-synthesize ordinals.

use rand::Rng;
use tracing::{debug, warn};

use super::node::{ContainerSize, NodeDirectives, NodeRole, PropertyNode};
use crate::error::{Error, Result};
use crate::metadata_cache::MetadataCache;
use crate::options::GenerateOptions;
use crate::path::{NodePath, PathExpression};
use crate::type_system::{TypeKind, TypeName, TypeShape};

/// Build-time default size for containers matching an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeRule {
    /// Containers this rule applies to
    pub expression: PathExpression,
    /// Lower bound
    pub min:        usize,
    /// Upper bound
    pub max:        usize,
}

impl SizeRule {
    /// Create a rule, rejecting inverted bounds
    pub fn new(expression: PathExpression, min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(Error::size_bounds(min, max).into());
        }
        Ok(Self {
            expression,
            min,
            max,
        })
    }
}

/// Expands types into property trees
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'a> {
    cache:      &'a MetadataCache,
    options:    &'a GenerateOptions,
    size_rules: &'a [SizeRule],
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder; later size rules take precedence over earlier ones
    pub const fn new(
        cache: &'a MetadataCache,
        options: &'a GenerateOptions,
        size_rules: &'a [SizeRule],
    ) -> Self {
        Self {
            cache,
            options,
            size_rules,
        }
    }

    /// Metadata the builder resolves types through
    pub const fn cache(&self) -> &'a MetadataCache {
        self.cache
    }

    /// Options in effect
    pub const fn options(&self) -> &'a GenerateOptions {
        self.options
    }

    /// Build the tree for a root type
    pub fn build<R: Rng + ?Sized>(&self, type_name: &TypeName, rng: &mut R) -> Result<PropertyNode> {
        debug!(type_name = %type_name, "building property tree");
        let root = self.node(NodeRole::Root, &NodePath::root(), type_name, 0, rng)?;
        debug!(
            type_name = %type_name,
            nodes = root.node_count(),
            "property tree built"
        );
        Ok(root)
    }

    /// Build one node (and its subtree) below `parent_path`
    pub fn node<R: Rng + ?Sized>(
        &self,
        role: NodeRole,
        parent_path: &NodePath,
        type_name: &TypeName,
        parent_depth: usize,
        rng: &mut R,
    ) -> Result<PropertyNode> {
        let shape = self.cache.shape(type_name)?;
        let path = role
            .segment()
            .map_or_else(|| parent_path.clone(), |segment| parent_path.join(segment));

        let depth = if shape.kind.increments_depth() {
            parent_depth + 1
        } else {
            parent_depth
        };
        let truncated = depth > self.options.max_recursion_depth;
        if truncated && matches!(shape.kind, TypeKind::Struct) {
            warn!(
                path = %path,
                type_name = %shape.type_name,
                max_depth = self.options.max_recursion_depth,
                "recursion limit reached, subtree truncated"
            );
        }

        let null_probability = match (&role, shape.kind) {
            (NodeRole::Root, _) => 0.0,
            (NodeRole::Member { nullable: true, .. }, _) | (_, TypeKind::Optional) => {
                self.options.null_inject
            }
            _ => 0.0,
        };

        let size = shape.kind.is_container().then(|| {
            if truncated {
                ContainerSize::with_defaults(0, 0)
            } else {
                self.default_size(&path)
            }
        });

        let mut node = PropertyNode {
            role,
            path,
            shape,
            depth,
            truncated,
            size,
            children: Vec::new(),
            directives: NodeDirectives::with_null_probability(null_probability),
        };

        node.children = match node.shape.kind {
            TypeKind::Struct if !truncated => self.members(&node, rng)?,
            TypeKind::List | TypeKind::Set | TypeKind::Map => {
                let count = match &node.size {
                    Some(size) => draw_count(size, rng)?,
                    None => 0,
                };
                (0..count)
                    .map(|index| self.element(&node, index, rng))
                    .collect::<Result<_>>()?
            }
            TypeKind::MapEntry => self.entry_parts(&node, rng)?,
            TypeKind::Optional => vec![self.payload(&node, rng)?],
            TypeKind::Struct | TypeKind::Value | TypeKind::Interface => Vec::new(),
        };

        Ok(node)
    }

    /// Bounds from the last matching sizing rule, or the configured default
    fn default_size(&self, path: &NodePath) -> ContainerSize {
        self.size_rules
            .iter()
            .rev()
            .find(|rule| rule.expression.matches(path))
            .map_or_else(
                || {
                    ContainerSize::with_defaults(
                        self.options.default_min_size,
                        self.options.default_max_size,
                    )
                },
                |rule| ContainerSize::with_defaults(rule.min, rule.max),
            )
    }

    fn members<R: Rng + ?Sized>(
        &self,
        parent: &PropertyNode,
        rng: &mut R,
    ) -> Result<Vec<PropertyNode>> {
        let members = self.cache.members(parent.type_name())?;
        members
            .iter()
            .map(|member| {
                self.node(
                    NodeRole::Member {
                        name:     member.name.clone(),
                        nullable: member.nullable,
                    },
                    &parent.path,
                    &member.type_name,
                    parent.depth,
                    rng,
                )
            })
            .collect()
    }

    fn entry_parts<R: Rng + ?Sized>(
        &self,
        entry: &PropertyNode,
        rng: &mut R,
    ) -> Result<Vec<PropertyNode>> {
        let (key, value) = entry
            .shape
            .key_type()
            .zip(entry.shape.value_type())
            .ok_or_else(|| missing_argument(&entry.shape))?;
        Ok(vec![
            self.node(NodeRole::EntryKey, &entry.path, key, entry.depth, rng)?,
            self.node(NodeRole::EntryValue, &entry.path, value, entry.depth, rng)?,
        ])
    }

    fn payload<R: Rng + ?Sized>(&self, optional: &PropertyNode, rng: &mut R) -> Result<PropertyNode> {
        let payload = optional
            .shape
            .element_type()
            .ok_or_else(|| missing_argument(&optional.shape))?;
        self.node(NodeRole::Payload, &optional.path, payload, optional.depth, rng)
    }

    /// Synthesize the element (or map entry) at `index` of a container
    pub fn element<R: Rng + ?Sized>(
        &self,
        container: &PropertyNode,
        index: usize,
        rng: &mut R,
    ) -> Result<PropertyNode> {
        let element_type = match container.shape.kind {
            TypeKind::Map => container.shape.entry_type(),
            TypeKind::List | TypeKind::Set => container.shape.element_type().cloned(),
            _ => None,
        }
        .ok_or_else(|| missing_argument(&container.shape))?;

        self.node(
            NodeRole::Element(index),
            &container.path,
            &element_type,
            container.depth,
            rng,
        )
    }

    /// Rebuild a container's children to `count`
    ///
    /// Ordinals below `count` keep their nodes (and every directive on them); the rest are
    /// dropped or freshly synthesized.
    pub fn resize<R: Rng + ?Sized>(
        &self,
        container: &mut PropertyNode,
        count: usize,
        rng: &mut R,
    ) -> Result<()> {
        container.children.truncate(count);
        while container.children.len() < count {
            let element = self.element(container, container.children.len(), rng)?;
            container.children.push(element);
        }
        Ok(())
    }

    /// Draw a new count from the container's bounds and rebuild its children
    pub fn redraw<R: Rng + ?Sized>(&self, container: &mut PropertyNode, rng: &mut R) -> Result<()> {
        let Some(size) = container.size else {
            return Err(Error::InvalidState(format!(
                "{} at {} has no size bounds",
                container.shape.type_name, container.path
            ))
            .into());
        };
        let count = draw_count(&size, rng)?;
        debug!(path = %container.path, count, "resizing container");
        self.resize(container, count, rng)
    }
}

/// Draw a count uniformly from the container's bounds
pub fn draw_count<R: Rng + ?Sized>(size: &ContainerSize, rng: &mut R) -> Result<usize> {
    let (min, max) = size.range()?;
    Ok(rng.gen_range(min..=max))
}

fn missing_argument(shape: &TypeShape) -> error_stack::Report<Error> {
    Error::InvalidState(format!("{} is missing a generic argument", shape.type_name)).into()
}
