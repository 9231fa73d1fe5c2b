//! Spreading a structured value over a subtree
//!
//! Setting `{"sku": "A", "quantity": 2}` on an item node does not pin the item node itself;
//! it pins `sku` and `quantity` so later manipulations on either still apply. Every directive
//! written here carries the stamp of the manipulation that caused it, and is only written over
//! directives with an older stamp. A generator's value is decomposed the same way at sample
//! time, with the generator's stamp, so manipulations declared after the generator win. That
//! includes a generated `null`: it is dropped when anything below the node was set later.

use rand::Rng;
use serde_json::Value;
use tracing::trace;

use crate::constants::{ENTRY_KEY, ENTRY_VALUE};
use crate::error::Result;
use crate::generation::scalar::parse_key;
use crate::tree::{
    NodeRole, NullDirective, NullPolicy, PropertyNode, TreeBuilder, ValueDirective, ValueSource,
};
use crate::type_system::TypeKind;

fn set_null_policy(node: &mut PropertyNode, policy: NullPolicy, stamp: u64) {
    if node.directives.null.stamp <= stamp {
        node.directives.null = NullDirective { policy, stamp };
    }
}

/// Whether any descendant carries a value or null directive set after `stamp`
fn has_newer_descendant(node: &PropertyNode, stamp: u64) -> bool {
    node.children.iter().any(|child| {
        child.directives.null.stamp > stamp
            || child
                .directives
                .value
                .as_ref()
                .is_some_and(|directive| directive.stamp > stamp)
            || has_newer_descendant(child, stamp)
    })
}

fn pin(node: &mut PropertyNode, value: &Value, stamp: u64) {
    node.directives.value = Some(ValueDirective {
        source: ValueSource::Fixed(value.clone()),
        stamp,
    });
}

fn pin_size(node: &mut PropertyNode, count: usize) {
    if let Some(size) = node.size.as_mut() {
        size.min = Some(count);
        size.max = Some(count);
    }
}

/// Spread `value` over `node`'s subtree
pub fn decompose<R: Rng + ?Sized>(
    node: &mut PropertyNode,
    value: &Value,
    stamp: u64,
    builder: &TreeBuilder<'_>,
    rng: &mut R,
) -> Result<()> {
    if node
        .directives
        .value
        .as_ref()
        .is_some_and(|directive| directive.stamp > stamp)
    {
        return Ok(());
    }
    node.directives.value = None;

    if value.is_null() {
        if has_newer_descendant(node, stamp) {
            trace!(path = %node.path, stamp, "null kept off, descendants were set later");
            return Ok(());
        }
        set_null_policy(node, NullPolicy::AlwaysNull, stamp);
        return Ok(());
    }
    set_null_policy(node, NullPolicy::NeverNull, stamp);

    match (node.shape.kind, value) {
        (TypeKind::Struct, Value::Object(fields)) if !node.truncated => {
            for child in &mut node.children {
                let Some(name) = child.member_name() else {
                    continue;
                };
                if let Some(field) = fields.get(name) {
                    let field = field.clone();
                    decompose(child, &field, stamp, builder, rng)?;
                }
            }
        }
        (TypeKind::List | TypeKind::Set, Value::Array(elements)) => {
            pin_size(node, elements.len());
            builder.resize(node, elements.len(), rng)?;
            for (child, element) in node.children.iter_mut().zip(elements) {
                decompose(child, element, stamp, builder, rng)?;
            }
        }
        (TypeKind::Map, Value::Object(entries)) => {
            pin_size(node, entries.len());
            builder.resize(node, entries.len(), rng)?;
            for (entry, (key, value)) in node.children.iter_mut().zip(entries) {
                let key_kind = entry
                    .child(ENTRY_KEY)
                    .and_then(|key_node| key_node.shape.scalar);
                let pair = serde_json::json!({
                    ENTRY_KEY: parse_key(key, key_kind),
                    ENTRY_VALUE: value,
                });
                decompose(entry, &pair, stamp, builder, rng)?;
            }
        }
        (TypeKind::Map, Value::Array(entries)) => {
            pin_size(node, entries.len());
            builder.resize(node, entries.len(), rng)?;
            for (entry, pair) in node.children.iter_mut().zip(entries) {
                decompose(entry, pair, stamp, builder, rng)?;
            }
        }
        (TypeKind::MapEntry, Value::Object(pair)) => {
            for child in &mut node.children {
                let field = match child.role {
                    NodeRole::EntryKey => pair.get(ENTRY_KEY),
                    NodeRole::EntryValue => pair.get(ENTRY_VALUE),
                    _ => None,
                };
                if let Some(field) = field {
                    let field = field.clone();
                    decompose(child, &field, stamp, builder, rng)?;
                }
            }
        }
        (TypeKind::Optional, present) => {
            if let Some(payload) = node.children.first_mut() {
                decompose(payload, present, stamp, builder, rng)?;
            }
        }
        _ => pin(node, value, stamp),
    }
    Ok(())
}

/// Lift default nullability on every node from the root down to (excluding) `target`
///
/// Explicitly nulled ancestors stay null.
pub fn ensure_reachable(root: &mut PropertyNode, target: &crate::path::NodePath, stamp: u64) {
    let mut current = root;
    loop {
        if current.path == *target {
            return;
        }
        if matches!(current.directives.null.policy, NullPolicy::Default(_)) {
            set_null_policy(current, NullPolicy::NeverNull, stamp);
        }
        let depth = current.path.depth();
        let Some(next) = target.segments().get(depth) else {
            return;
        };
        let Some(child) = current
            .children
            .iter_mut()
            .find(|child| child.role.segment().as_ref() == Some(next))
        else {
            return;
        };
        current = child;
    }
}
