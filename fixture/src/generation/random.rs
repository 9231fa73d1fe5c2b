//! Default backend: random leaves, bottom-up assembly

use rand::Rng;
use serde_json::{Map, Value, json};
use tracing::{trace, warn};

use super::scalar::{generate_scalar, render_key};
use super::{GenerationBackend, SampleContext};
use crate::constants::{ENTRY_KEY, ENTRY_VALUE};
use crate::error::{Error, Result};
use crate::manipulation::decompose::decompose;
use crate::tree::{NullPolicy, PropertyNode, SupplierFn, TreeBuilder, ValueDirective, ValueSource};
use crate::type_system::TypeKind;

/// Random generation honoring every directive on the tree
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBackend;

impl GenerationBackend for RandomBackend {
    fn sample(&self, tree: &PropertyNode, context: &mut SampleContext<'_>) -> Result<Value> {
        trace!(type_name = %tree.type_name(), "sampling tree");
        self.node_value(tree, context)
    }
}

impl RandomBackend {
    fn node_value(&self, node: &PropertyNode, cx: &mut SampleContext<'_>) -> Result<Value> {
        match node.directives.null.policy {
            NullPolicy::AlwaysNull => return Ok(Value::Null),
            NullPolicy::Default(probability) if probability > 0.0 && cx.rng.gen_bool(probability) => {
                return Ok(Value::Null);
            }
            NullPolicy::Default(_) | NullPolicy::NeverNull => {}
        }

        match node.directives.value.as_ref() {
            Some(ValueDirective {
                source: ValueSource::Fixed(value),
                ..
            }) => {
                if accepts(node, value) {
                    return Ok(value.clone());
                }
                warn!(path = %node.path(), "fixed value rejected by post-condition");
                Err(exhausted(node, 1))
            }
            Some(ValueDirective {
                source: ValueSource::Supplier(supplier),
                stamp,
            }) => self.filtered(node, cx, |cx| {
                self.supplied(node, supplier.as_ref(), *stamp, cx)
            }),
            None => self.filtered(node, cx, |cx| self.generate(node, cx)),
        }
    }

    /// Decompose one supplied value over a copy of `node` and sample that copy
    fn supplied(
        &self,
        node: &PropertyNode,
        supplier: &SupplierFn,
        stamp: u64,
        cx: &mut SampleContext<'_>,
    ) -> Result<Value> {
        let supplied = supplier();
        trace!(path = %node.path(), "decomposing supplied value");
        let mut resolved = node.clone();
        resolved.directives.value = None;
        resolved.directives.filters.clear();
        let builder = TreeBuilder::new(cx.cache, cx.options, &[]);
        decompose(&mut resolved, &supplied, stamp, &builder, cx.rng)?;
        self.node_value(&resolved, cx)
    }

    /// Draw until every post-condition on `node` accepts, up to `max_filter_attempts`
    fn filtered(
        &self,
        node: &PropertyNode,
        cx: &mut SampleContext<'_>,
        mut draw: impl FnMut(&mut SampleContext<'_>) -> Result<Value>,
    ) -> Result<Value> {
        if node.directives.filters.is_empty() {
            return draw(cx);
        }

        let attempts = cx.options.max_filter_attempts;
        for attempt in 1..=attempts {
            let candidate = draw(cx)?;
            if accepts(node, &candidate) {
                trace!(path = %node.path(), attempt, "post-condition satisfied");
                return Ok(candidate);
            }
        }

        warn!(path = %node.path(), attempts, "post-condition never satisfied");
        Err(exhausted(node, attempts))
    }

    fn generate(&self, node: &PropertyNode, cx: &mut SampleContext<'_>) -> Result<Value> {
        match node.kind() {
            TypeKind::Value => node.shape().scalar.map_or_else(
                || {
                    Err(Error::InvalidState(format!(
                        "{} is a value type without a scalar kind",
                        node.type_name()
                    ))
                    .into())
                },
                |kind| Ok(generate_scalar(kind, cx.rng)),
            ),
            TypeKind::Interface => Ok(Value::Null),
            TypeKind::Struct if node.is_truncated() => Ok(Value::Null),
            TypeKind::Struct => self.object(node, cx),
            TypeKind::List => node
                .children()
                .iter()
                .map(|child| self.node_value(child, cx))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            TypeKind::Set => self.unique_elements(node, cx),
            TypeKind::Map => self.map(node, cx),
            TypeKind::MapEntry => {
                let key = match node.child(ENTRY_KEY) {
                    Some(key) => self.node_value(key, cx)?,
                    None => Value::Null,
                };
                let value = match node.child(ENTRY_VALUE) {
                    Some(value) => self.node_value(value, cx)?,
                    None => Value::Null,
                };
                Ok(json!({ ENTRY_KEY: key, ENTRY_VALUE: value }))
            }
            TypeKind::Optional => match node.children().first() {
                Some(payload) => self.node_value(payload, cx),
                None => Ok(Value::Null),
            },
        }
    }

    fn object(&self, node: &PropertyNode, cx: &mut SampleContext<'_>) -> Result<Value> {
        let mut children = Vec::with_capacity(node.children().len());
        for child in node.children() {
            if let Some(name) = child.member_name() {
                children.push((name.to_string(), self.node_value(child, cx)?));
            }
        }

        let strategy = cx.cache.strategy(node.type_name())?;
        let members = cx.cache.members(node.type_name())?;
        trace!(
            path = %node.path(),
            strategy = %strategy.kind(),
            "assembling object"
        );
        strategy.assemble(node.type_name(), &members, children)
    }

    fn unique_elements(&self, node: &PropertyNode, cx: &mut SampleContext<'_>) -> Result<Value> {
        let mut elements: Vec<Value> = Vec::with_capacity(node.children().len());
        for child in node.children() {
            let retry = !is_fixed(child);
            let mut candidate = self.node_value(child, cx)?;
            let mut attempts = 1;
            while retry
                && elements.contains(&candidate)
                && attempts < cx.options.max_unique_attempts
            {
                candidate = self.node_value(child, cx)?;
                attempts += 1;
            }
            if elements.contains(&candidate) {
                warn!(path = %child.path(), attempts, "duplicate set element dropped");
                continue;
            }
            elements.push(candidate);
        }
        Ok(Value::Array(elements))
    }

    fn map(&self, node: &PropertyNode, cx: &mut SampleContext<'_>) -> Result<Value> {
        let mut entries = Map::new();
        for entry in node.children() {
            let retry = !entry.child(ENTRY_KEY).is_some_and(is_fixed);
            let mut attempts = 0;
            loop {
                attempts += 1;
                let pair = self.node_value(entry, cx)?;
                match pair.get(ENTRY_KEY).and_then(render_key) {
                    Some(key) if !entries.contains_key(&key) => {
                        let value = pair.get(ENTRY_VALUE).cloned().unwrap_or(Value::Null);
                        entries.insert(key, value);
                        break;
                    }
                    _ if retry && attempts < cx.options.max_unique_attempts => {}
                    _ => {
                        warn!(path = %entry.path(), attempts, "duplicate or null map key dropped");
                        break;
                    }
                }
            }
        }
        Ok(Value::Object(entries))
    }
}

/// Nulls bypass post-conditions
fn accepts(node: &PropertyNode, candidate: &Value) -> bool {
    candidate.is_null()
        || node
            .directives
            .filters
            .iter()
            .all(|filter| (filter.predicate)(candidate))
}

fn exhausted(node: &PropertyNode, attempts: usize) -> error_stack::Report<Error> {
    Error::FilterExhausted {
        path: node.path().to_string(),
        attempts,
    }
    .into()
}

/// Whether the node's value is fixed, so drawing it again cannot change it
fn is_fixed(node: &PropertyNode) -> bool {
    matches!(
        node.directives.value,
        Some(ValueDirective {
            source: ValueSource::Fixed(_),
            ..
        })
    )
}
