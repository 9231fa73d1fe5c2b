//! Running a selected strategy over already generated member values

use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use super::{BuilderPlan, ConstructionStrategy, FactoryPlan, invocation_error};
use crate::error::Result;
use crate::generation::BuilderCombinator;
use crate::introspection::{InvocationError, Member};
use crate::type_system::TypeName;

impl ConstructionStrategy {
    /// Create an instance of `type_name` from `(member name, value)` pairs
    ///
    /// Children arrive in member declaration order.
    pub fn assemble(
        &self,
        type_name: &TypeName,
        members: &[Member],
        children: Vec<(String, Value)>,
    ) -> Result<Value> {
        match self {
            Self::DefaultAssign {
                constructor,
                initial,
            } => {
                let mut instance = match constructor {
                    Some(constructor) => constructor
                        .call(None, Vec::new())
                        .map_err(|e| invocation_error(type_name, e))?,
                    None => initial.clone(),
                };
                for (name, value) in children {
                    let Some(member) = members.iter().find(|member| member.name == name) else {
                        continue;
                    };
                    instance = member
                        .assign(instance, value)
                        .map_err(|e| invocation_error(type_name, e))?;
                }
                Ok(instance)
            }
            Self::ConstructorInjection(plan) | Self::FactoryMethod(plan) => {
                inject(plan, type_name, children)
            }
            Self::Builder(plan) => build(plan, type_name, children),
            Self::Unconstructible => Ok(Value::Null),
        }
    }
}

fn inject(plan: &FactoryPlan, type_name: &TypeName, children: Vec<(String, Value)>) -> Result<Value> {
    let mut values: HashMap<String, Value> = children.into_iter().collect();
    let arguments = plan
        .parameters
        .iter()
        .map(|parameter| values.remove(parameter).unwrap_or(Value::Null))
        .collect();

    trace!(type_name = %type_name, factory = %plan.identifier, "invoking factory");
    plan.invoker
        .call(None, arguments)
        .map_err(|e| invocation_error(type_name, e))
}

fn build(plan: &BuilderPlan, type_name: &TypeName, children: Vec<(String, Value)>) -> Result<Value> {
    let mut combinator =
        BuilderCombinator::<InvocationError>::with_builder(|| plan.create.call(None, Vec::new()));

    for (name, value) in children {
        let Some(step) = plan.step(&name) else {
            trace!(
                type_name = %type_name,
                member = %name,
                "no builder method for member, left at builder default"
            );
            continue;
        };
        combinator = combinator.inject(value, |builder, value| step.call(Some(builder), vec![value]));
    }

    combinator
        .build(|builder| plan.build.call(Some(&builder), Vec::new()))
        .map_err(|e| invocation_error(type_name, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::unreachable, reason = "tests")]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::error::Error;
    use crate::test_support;

    fn assemble(type_name: &str, children: Vec<(&str, Value)>) -> Result<Value> {
        let cache = test_support::cache();
        let type_name = TypeName::from(type_name);
        let strategy = cache.strategy(&type_name).unwrap();
        let members = cache.members(&type_name).unwrap();
        strategy.assemble(
            &type_name,
            &members,
            children
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }

    #[test]
    fn builder_sets_matching_members_and_keeps_defaults() {
        let account = assemble(
            "demo::Account",
            vec![
                ("owner", json!("ada")),
                ("balance", json!(42)),
                ("status", json!("ignored")),
            ],
        )
        .unwrap();
        assert_eq!(account, json!({"owner": "ada", "balance": 42, "status": "new"}));
    }

    #[test]
    fn builder_skips_null_values() {
        let account = assemble("demo::Account", vec![("owner", Value::Null), ("balance", json!(5))])
            .unwrap();
        assert_eq!(account["owner"], Value::Null);
        assert_eq!(account["balance"], json!(5));
    }

    #[test]
    fn builder_failures_become_construction_errors() {
        let Err(report) = assemble("demo::Account", vec![("balance", json!(i64::MIN))]) else {
            unreachable!("underflow must fail")
        };
        assert_eq!(
            report.current_context(),
            &Error::Construction {
                type_name: "demo::Account".to_string(),
                message:   "balance underflow".to_string(),
            }
        );
    }

    #[test]
    fn constructor_receives_positional_arguments() {
        let money = assemble(
            "demo::Money",
            vec![("amount", json!(10)), ("currency", json!("EUR"))],
        )
        .unwrap();
        assert_eq!(money, json!({"amount": 10, "currency": "EUR", "validated": true}));
    }

    #[test]
    fn invalid_argument_propagates_unchanged() {
        let Err(report) = assemble("demo::Money", vec![("amount", json!(1)), ("currency", json!(""))])
        else {
            unreachable!("empty currency must fail")
        };
        assert!(matches!(report.current_context(), Error::InvalidArgument(_)));
    }

    #[test]
    fn default_assign_writes_members() {
        let item = assemble("demo::Item", vec![("sku", json!("A-1")), ("quantity", json!(3))])
            .unwrap();
        assert_eq!(item, json!({"sku": "A-1", "quantity": 3}));
    }

    #[test]
    fn interfaces_assemble_to_null() {
        assert_eq!(assemble("demo::Shape", Vec::new()).unwrap(), Value::Null);
    }
}
