//! Builder-style partial construction with per-step value injection
//!
//! The combinator threads a builder instance through a sequence of steps. A failed step
//! short-circuits every later one; `build` surfaces the first failure.

use serde_json::Value;

/// A builder instance being assembled step by step
#[derive(Debug, Clone)]
pub struct BuilderCombinator<E> {
    state: Result<Value, E>,
}

impl<E> BuilderCombinator<E> {
    /// Start from the instance `init` produces
    pub fn with_builder(init: impl FnOnce() -> Result<Value, E>) -> Self {
        Self { state: init() }
    }

    /// Feed `value` through `step`; a null value leaves the builder unchanged
    #[must_use]
    pub fn inject(self, value: Value, step: impl FnOnce(&Value, Value) -> Result<Value, E>) -> Self {
        let state = match self.state {
            Ok(builder) if value.is_null() => Ok(builder),
            Ok(builder) => step(&builder, value),
            Err(error) => Err(error),
        };
        Self { state }
    }

    /// Finish with `finish`, or return the first failure
    pub fn build(self, finish: impl FnOnce(Value) -> Result<Value, E>) -> Result<Value, E> {
        self.state.and_then(finish)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn set(field: &'static str) -> impl FnOnce(&Value, Value) -> Result<Value, String> {
        move |builder, value| {
            let mut next = builder.clone();
            next[field] = value;
            Ok(next)
        }
    }

    #[test]
    fn injects_values_in_order() {
        let built = BuilderCombinator::with_builder(|| Ok::<_, String>(json!({"a": 0, "b": 0})))
            .inject(json!(1), set("a"))
            .inject(json!(2), set("b"))
            .build(|builder| Ok(json!({"built": builder})));
        assert_eq!(built, Ok(json!({"built": {"a": 1, "b": 2}})));
    }

    #[test]
    fn null_leaves_builder_unchanged() {
        let built = BuilderCombinator::with_builder(|| Ok::<_, String>(json!({"a": "default"})))
            .inject(Value::Null, set("a"))
            .build(Ok);
        assert_eq!(built, Ok(json!({"a": "default"})));
    }

    #[test]
    fn first_failure_short_circuits() {
        let mut later_ran = false;
        let built = BuilderCombinator::with_builder(|| Ok::<_, String>(json!({})))
            .inject(json!(1), |_, _| Err("rejected".to_string()))
            .inject(json!(2), |builder, _| {
                later_ran = true;
                Ok(builder.clone())
            })
            .build(Ok);
        assert_eq!(built, Err("rejected".to_string()));
        assert!(!later_ran);
    }
}
