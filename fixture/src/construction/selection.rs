//! Choosing a construction strategy from the type's introspection signals

use std::collections::HashSet;

use itertools::Itertools;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::{BuilderPlan, ConstructionStrategy, FactoryPlan};
use crate::constants::{BUILD_METHOD, BUILDER_METHOD};
use crate::error::{Error, Result};
use crate::introspection::{FactoryCandidate, FactoryKind, MethodDescriptor, Receiver};
use crate::metadata_cache::MetadataCache;
use crate::type_system::{TypeKind, TypeName};

/// Select how instances of `type_name` are created
///
/// Order of preference: builder pattern, constructor injection, static factory, default
/// construction followed by member assignment. Interfaces are unconstructible.
pub fn select_strategy(cache: &MetadataCache, type_name: &TypeName) -> Result<ConstructionStrategy> {
    let shape = cache.shape(type_name)?;
    let strategy = match shape.kind {
        TypeKind::Interface => ConstructionStrategy::Unconstructible,
        TypeKind::Struct => {
            if let Some(plan) = builder_plan(cache, type_name)? {
                ConstructionStrategy::Builder(plan)
            } else if let Some(strategy) = injection(cache, type_name)? {
                strategy
            } else {
                default_assign(cache, type_name)?
            }
        }
        kind => {
            return Err(Error::InvalidState(format!(
                "{type_name} is a {kind}, construction strategies apply to objects only"
            ))
            .into());
        }
    };

    debug!(type_name = %type_name, strategy = %strategy.kind(), "selected construction strategy");
    Ok(strategy)
}

fn is_builder_factory(method: &MethodDescriptor) -> bool {
    method.receiver == Receiver::Static && method.name == BUILDER_METHOD && method.arity() == 0
}

fn is_build_method(method: &MethodDescriptor) -> bool {
    method.receiver == Receiver::Instance && method.name == BUILD_METHOD && method.arity() == 0
}

fn builder_plan(cache: &MetadataCache, type_name: &TypeName) -> Result<Option<BuilderPlan>> {
    let methods = cache.methods(type_name)?;
    let Some(create) = methods.iter().find(|method| is_builder_factory(method)) else {
        return Ok(None);
    };

    let builder_type = create.return_type.clone();
    let builder_methods = match cache.methods(&builder_type) {
        Ok(methods) => methods,
        Err(report) if matches!(report.current_context(), Error::TypeNotRegistered { .. }) => {
            debug!(
                type_name = %type_name,
                builder_type = %builder_type,
                "builder type is not registered, builder pattern unavailable"
            );
            return Ok(None);
        }
        Err(report) => return Err(report),
    };

    let Some(build) = builder_methods.iter().find(|method| is_build_method(method)) else {
        debug!(
            type_name = %type_name,
            builder_type = %builder_type,
            "builder type has no zero-argument build method"
        );
        return Ok(None);
    };

    let steps = builder_methods
        .iter()
        .filter(|method| method.receiver == Receiver::Instance && method.name != BUILD_METHOD)
        .filter(|method| {
            let single = method.arity() == 1;
            if !single {
                trace!(
                    builder_type = %builder_type,
                    method = %method.name,
                    arity = method.arity(),
                    "builder method does not take exactly one argument, skipping"
                );
            }
            single
        })
        .unique_by(|method| method.name.clone())
        .map(|method| (method.name.clone(), method.invoker.clone()))
        .collect();

    Ok(Some(BuilderPlan {
        builder_type,
        create: create.invoker.clone(),
        steps,
        build: build.invoker.clone(),
    }))
}

fn factory_plan(candidate: &FactoryCandidate) -> FactoryPlan {
    FactoryPlan {
        identifier: candidate.identifier.clone(),
        parameters: candidate
            .parameters
            .iter()
            .filter_map(|parameter| parameter.name.clone())
            .collect(),
        invoker:    candidate.invoker.clone(),
    }
}

fn injection(cache: &MetadataCache, type_name: &TypeName) -> Result<Option<ConstructionStrategy>> {
    let members = cache.members(type_name)?;
    let member_names: HashSet<&str> = members.iter().map(|member| member.name.as_str()).collect();
    let candidates = cache.factory_candidates(type_name)?;

    let matching = |kind: FactoryKind| {
        let member_names = &member_names;
        candidates.iter().filter(move |candidate| {
            candidate.kind == kind
                && !candidate.parameters.is_empty()
                && candidate
                    .parameter_names()
                    .is_some_and(|names| names.iter().all(|name| member_names.contains(name)))
        })
    };

    if let Ok(constructor) = matching(FactoryKind::Constructor).exactly_one() {
        return Ok(Some(ConstructionStrategy::ConstructorInjection(factory_plan(
            constructor,
        ))));
    }
    if let Ok(factory) = matching(FactoryKind::StaticFactory).exactly_one() {
        return Ok(Some(ConstructionStrategy::FactoryMethod(factory_plan(factory))));
    }
    Ok(None)
}

fn default_assign(cache: &MetadataCache, type_name: &TypeName) -> Result<ConstructionStrategy> {
    let candidates = cache.factory_candidates(type_name)?;
    let constructor = candidates
        .iter()
        .find(|candidate| candidate.kind == FactoryKind::Constructor && candidate.parameters.is_empty())
        .map(|candidate| candidate.invoker.clone());
    let initial = cache
        .default_instance(type_name)?
        .unwrap_or_else(|| Value::Object(Map::new()));

    Ok(ConstructionStrategy::DefaultAssign {
        constructor,
        initial,
    })
}
