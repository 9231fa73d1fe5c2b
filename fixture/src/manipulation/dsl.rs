//! Chainable construction of manipulation lists

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Effect, Manipulation, NodePredicate, Selector, Step};
use crate::tree::{PostCondition, PropertyNode};
use crate::type_system::TypeName;

/// The chainable manipulation surface
///
/// Implementors only provide [`Manipulate::push_step`]; every other method records one step
/// and returns `self`. Nothing is validated here: malformed paths, inverted bounds and filter
/// type mismatches are reported when the pipeline applies the step.
pub trait Manipulate: Sized {
    /// Append a step
    #[must_use]
    fn push_step(self, step: Step) -> Self;

    /// Append a targeted manipulation
    #[must_use]
    fn push(self, selector: Selector, effect: Effect, limit: Option<usize>) -> Self {
        self.push_step(Step::Targeted(Manipulation {
            selector,
            effect,
            limit,
        }))
    }

    /// Fix the value at `path`
    #[must_use]
    fn set(self, path: &str, value: impl Into<Value>) -> Self {
        self.push(Selector::path(path), Effect::SetValue(value.into()), None)
    }

    /// Fix the value on at most `limit` matches
    #[must_use]
    fn set_limited(self, path: &str, value: impl Into<Value>, limit: usize) -> Self {
        self.push(Selector::path(path), Effect::SetValue(value.into()), Some(limit))
    }

    /// Draw the value at `path` from `supplier` on every sample
    #[must_use]
    fn set_with(self, path: &str, supplier: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.push(Selector::path(path), Effect::SetSupplier(Arc::new(supplier)), None)
    }

    /// [`Manipulate::set_with`] on at most `limit` matches
    #[must_use]
    fn set_with_limited(
        self,
        path: &str,
        supplier: impl Fn() -> Value + Send + Sync + 'static,
        limit: usize,
    ) -> Self {
        self.push(
            Selector::path(path),
            Effect::SetSupplier(Arc::new(supplier)),
            Some(limit),
        )
    }

    /// Always generate null at `path`
    #[must_use]
    fn set_null(self, path: &str) -> Self {
        self.push(Selector::path(path), Effect::SetNull, None)
    }

    /// Never generate null at `path`
    #[must_use]
    fn set_not_null(self, path: &str) -> Self {
        self.push(Selector::path(path), Effect::SetNotNull, None)
    }

    /// Bound the element count of the container at `path`
    #[must_use]
    fn size(self, path: &str, min: usize, max: usize) -> Self {
        self.push(Selector::path(path), Effect::Size { min, max }, None)
    }

    /// Fix the element count of the container at `path`
    #[must_use]
    fn exact_size(self, path: &str, size: usize) -> Self {
        self.size(path, size, size)
    }

    /// Set the lower bound of the container at `path`
    #[must_use]
    fn min_size(self, path: &str, min: usize) -> Self {
        self.push(Selector::path(path), Effect::MinSize(min), None)
    }

    /// Set the upper bound of the container at `path`
    #[must_use]
    fn max_size(self, path: &str, max: usize) -> Self {
        self.push(Selector::path(path), Effect::MaxSize(max), None)
    }

    /// Only accept values at `path` for which `predicate` holds
    ///
    /// `expected_type` must be the type of the selected nodes.
    #[must_use]
    fn set_post_condition(
        self,
        path: &str,
        expected_type: impl Into<TypeName>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.set_post_condition_inner(path, expected_type.into(), Arc::new(predicate), None)
    }

    /// [`Manipulate::set_post_condition`] on at most `limit` matches
    #[must_use]
    fn set_post_condition_limited(
        self,
        path: &str,
        expected_type: impl Into<TypeName>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        limit: usize,
    ) -> Self {
        self.set_post_condition_inner(path, expected_type.into(), Arc::new(predicate), Some(limit))
    }

    /// Typed post-condition; values that do not deserialize into `T` are rejected
    #[must_use]
    fn set_post_condition_as<T: DeserializeOwned + 'static>(
        self,
        path: &str,
        expected_type: impl Into<TypeName>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        let typed = move |value: &Value| {
            serde_json::from_value::<T>(value.clone()).is_ok_and(|typed| predicate(&typed))
        };
        self.set_post_condition_inner(path, expected_type.into(), Arc::new(typed), None)
    }

    #[doc(hidden)]
    #[must_use]
    fn set_post_condition_inner(
        self,
        path: &str,
        expected_type: TypeName,
        predicate: Arc<crate::tree::PredicateFn>,
        limit: Option<usize>,
    ) -> Self {
        self.push(
            Selector::path(path),
            Effect::PostCondition(PostCondition {
                expected_type,
                predicate,
            }),
            limit,
        )
    }

    /// Sample the tree as it stands, then append the manipulations `consumer` returns
    #[must_use]
    fn apply(
        self,
        consumer: impl Fn(&Value, Manipulations) -> Manipulations + Send + Sync + 'static,
    ) -> Self {
        self.push_step(Step::Conditional(Arc::new(consumer)))
    }

    /// Append `consumer`'s manipulations only when the sampled value satisfies `predicate`
    #[must_use]
    fn accept_if(
        self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        consumer: impl Fn(Manipulations) -> Manipulations + Send + Sync + 'static,
    ) -> Self {
        self.apply(move |sample, manipulations| {
            if predicate(sample) {
                consumer(manipulations)
            } else {
                manipulations
            }
        })
    }

    /// Grow the map, list or set at `path` by one synthesized entry
    #[must_use]
    fn add_entry(self, path: &str) -> Self {
        self.push(Selector::path(path), Effect::AddEntry, None)
    }

    /// Apply `effect` to every node `predicate` accepts
    #[must_use]
    fn manipulate_where(
        self,
        predicate: impl Fn(&PropertyNode) -> bool + Send + Sync + 'static,
        effect: Effect,
    ) -> Self {
        let predicate: Arc<NodePredicate> = Arc::new(predicate);
        self.push(Selector::Where(predicate), effect, None)
    }
}

/// An ordered list of manipulation steps
#[derive(Debug, Clone, Default)]
pub struct Manipulations {
    steps: Vec<Step>,
}

impl Manipulations {
    /// An empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps in application order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no step was recorded
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append every step of `other`
    #[must_use]
    pub fn extend(mut self, other: Self) -> Self {
        self.steps.extend(other.steps);
        self
    }
}

impl Manipulate for Manipulations {
    fn push_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

impl IntoIterator for Manipulations {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

#[cfg(test)]
#[allow(clippy::unreachable, reason = "tests")]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn records_steps_in_order() {
        let manipulations = Manipulations::new()
            .set("items[0].sku", "A")
            .size("items", 1, 2)
            .set_null("note")
            .accept_if(|_| true, |m| m.set("id", 1));

        let kinds: Vec<_> = manipulations
            .steps()
            .iter()
            .map(|step| match step {
                Step::Targeted(Manipulation { effect, .. }) => format!("{effect:?}"),
                Step::Conditional(_) => "Conditional".to_string(),
            })
            .collect();
        assert_eq!(
            kinds,
            [
                format!("{:?}", Effect::SetValue(json!("A"))),
                "Size { min: 1, max: 2 }".to_string(),
                "SetNull".to_string(),
                "Conditional".to_string(),
            ]
        );
    }

    #[test]
    fn malformed_paths_are_deferred() {
        let manipulations = Manipulations::new().set("items[", 1);
        let Some(Step::Targeted(manipulation)) = manipulations.steps().first() else {
            unreachable!("one targeted step was recorded")
        };
        assert!(matches!(
            &manipulation.selector,
            Selector::Invalid { expression, .. } if expression == "items["
        ));
    }

    #[test]
    fn accept_if_only_runs_consumer_when_predicate_holds() {
        let manipulations = Manipulations::new().accept_if(|v| v["ok"] == json!(true), |m| m.set("x", 1));
        let Some(Step::Conditional(consumer)) = manipulations.steps().first() else {
            unreachable!("one conditional step was recorded")
        };
        assert_eq!(consumer(&json!({"ok": true}), Manipulations::new()).len(), 1);
        assert!(consumer(&json!({"ok": false}), Manipulations::new()).is_empty());
    }
}
