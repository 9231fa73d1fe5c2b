//! Ordered application of manipulations to one tree
//!
//! Every targeted manipulation gets a sequence stamp. Directives written later carry larger
//! stamps, which is how a generator's sample-time decomposition knows to leave alone whatever
//! later manipulations pinned below it.
//!
//! Conditional steps sample the tree as it stands when they are reached. The manipulations
//! they return are queued behind the rest of the list, so the outcome matches writing them at
//! the end of the list by hand.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use tracing::{debug, warn};

use super::decompose::{decompose, ensure_reachable};
use super::{Effect, Manipulation, Manipulations, Selector, Step};
use crate::error::{Error, Result};
use crate::generation::{GenerationBackend, SampleContext};
use crate::path::{NodePath, PathExpression};
use crate::tree::{
    ContainerSize, NullDirective, NullPolicy, PropertyNode, TreeBuilder, ValueDirective,
    ValueSource,
};
use crate::type_system::TypeKind;

/// Applies manipulation lists to trees
pub struct Pipeline<'a> {
    builder: TreeBuilder<'a>,
    backend: &'a dyn GenerationBackend,
    clock:   u64,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline resolving new nodes through `builder`
    pub fn new(builder: TreeBuilder<'a>, backend: &'a dyn GenerationBackend) -> Self {
        Self {
            builder,
            backend,
            clock: 0,
        }
    }

    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Apply every step in order, then every step appended by conditional steps
    pub fn apply(
        &mut self,
        tree: &mut PropertyNode,
        manipulations: &Manipulations,
        rng: &mut StdRng,
    ) -> Result<()> {
        let mut queue: VecDeque<Step> = manipulations.steps().iter().cloned().collect();

        while let Some(step) = queue.pop_front() {
            match step {
                Step::Targeted(manipulation) => self.apply_targeted(tree, &manipulation, rng)?,
                Step::Conditional(consumer) => {
                    let mut context = SampleContext {
                        cache: self.builder.cache(),
                        options: self.builder.options(),
                        rng: &mut *rng,
                    };
                    let sample = self.backend.sample(tree, &mut context)?;
                    let appended = consumer(&sample, Manipulations::new());
                    debug!(appended = appended.len(), "conditional step evaluated");
                    queue.extend(appended);
                }
            }
        }
        Ok(())
    }

    fn apply_targeted(
        &mut self,
        tree: &mut PropertyNode,
        manipulation: &Manipulation,
        rng: &mut StdRng,
    ) -> Result<()> {
        let mut targets = resolve(tree, &manipulation.selector)?;
        if let Some(limit) = manipulation.limit {
            targets.truncate(limit);
        }

        if targets.is_empty() {
            warn!(
                selector = ?manipulation.selector,
                effect = ?manipulation.effect,
                "manipulation matched no node"
            );
            return Ok(());
        }

        let stamp = self.next_stamp();
        debug!(
            selector = ?manipulation.selector,
            effect = ?manipulation.effect,
            matches = targets.len(),
            stamp,
            "applying manipulation"
        );

        for path in &targets {
            let Some(node) = tree.find_mut(path) else {
                debug!(path = %path, "target removed by an earlier match, skipping");
                continue;
            };
            let lifts_ancestors = self.apply_effect(node, &manipulation.effect, stamp, rng)?;
            if lifts_ancestors {
                ensure_reachable(tree, path, stamp);
            }
        }
        Ok(())
    }

    /// Apply one effect; returns whether the node's ancestors must be made non-null
    fn apply_effect(
        &self,
        node: &mut PropertyNode,
        effect: &Effect,
        stamp: u64,
        rng: &mut StdRng,
    ) -> Result<bool> {
        match effect {
            Effect::SetValue(value) => {
                decompose(node, value, stamp, &self.builder, rng)?;
                Ok(!value.is_null())
            }
            Effect::SetSupplier(supplier) => {
                node.directives.value = Some(ValueDirective {
                    source: ValueSource::Supplier(supplier.clone()),
                    stamp,
                });
                node.directives.null = NullDirective {
                    policy: NullPolicy::NeverNull,
                    stamp,
                };
                Ok(true)
            }
            Effect::SetNull => {
                node.directives.null = NullDirective {
                    policy: NullPolicy::AlwaysNull,
                    stamp,
                };
                Ok(false)
            }
            Effect::SetNotNull => {
                node.directives.null = NullDirective {
                    policy: NullPolicy::NeverNull,
                    stamp,
                };
                Ok(true)
            }
            Effect::Size { min, max } => {
                if min > max {
                    return Err(Error::size_bounds(*min, *max).into());
                }
                self.resize(
                    node,
                    |size| {
                        size.min = Some(*min);
                        size.max = Some(*max);
                    },
                    rng,
                )?;
                Ok(false)
            }
            Effect::MinSize(min) => {
                self.resize(node, |size| size.min = Some(*min), rng)?;
                Ok(false)
            }
            Effect::MaxSize(max) => {
                self.resize(node, |size| size.max = Some(*max), rng)?;
                Ok(false)
            }
            Effect::PostCondition(filter) => {
                if !filter.expected_type.same_type(node.type_name()) {
                    return Err(Error::InvalidArgument(format!(
                        "Wrong type filter is applied. Expected: {}, Actual: {}",
                        filter.expected_type,
                        node.type_name()
                    ))
                    .into());
                }
                node.directives.filters.push(filter.clone());
                Ok(false)
            }
            Effect::AddEntry => {
                if !matches!(node.kind(), TypeKind::Map | TypeKind::List | TypeKind::Set) {
                    return Err(Error::cannot(
                        "add entry",
                        format!(
                            "{} at {} is not a map or collection",
                            node.type_name(),
                            node.path()
                        ),
                    )
                    .into());
                }
                let element = self.builder.element(node, node.children.len(), rng)?;
                node.children.push(element);
                Ok(false)
            }
        }
    }

    /// Update a container's bounds and redraw its children from them
    fn resize(
        &self,
        node: &mut PropertyNode,
        update: impl FnOnce(&mut ContainerSize),
        rng: &mut StdRng,
    ) -> Result<()> {
        let Some(mut size) = node.size else {
            return Err(Error::cannot(
                "set size",
                format!("{} at {} is not a container", node.type_name(), node.path()),
            )
            .into());
        };
        update(&mut size);
        size.range()?;
        node.size = Some(size);
        self.builder.redraw(node, rng)
    }
}

/// Paths of every node the selector picks, in pre-order
fn resolve(tree: &PropertyNode, selector: &Selector) -> Result<Vec<NodePath>> {
    let mut matches = Vec::new();
    match selector {
        Selector::Path(expression) => collect_by_path(tree, expression, &mut matches),
        Selector::Where(predicate) => tree.walk(&mut |node| {
            if predicate(node) {
                matches.push(node.path().clone());
            }
        }),
        Selector::Invalid { expression, reason } => {
            return Err(Error::InvalidExpression {
                expression: expression.clone(),
                reason:     reason.clone(),
            }
            .into());
        }
    }
    Ok(matches)
}

fn collect_by_path(node: &PropertyNode, expression: &PathExpression, matches: &mut Vec<NodePath>) {
    if !expression.may_match_below(node.path()) {
        return;
    }
    if expression.matches(node.path()) {
        matches.push(node.path().clone());
        return;
    }
    for child in node.children() {
        collect_by_path(child, expression, matches);
    }
}
