//! Turning generated member values into an instance
//!
//! A strategy is selected once per type (see [`select_strategy`]) and cached next to the
//! type's shape. Assembly then runs once per generated object.

mod assembly;
mod selection;

pub use selection::select_strategy;
use serde_json::Value;
use strum::{AsRefStr, Display};

use crate::error::Error;
use crate::introspection::{InvocationError, Invoker};
use crate::type_system::TypeName;

/// Positional construction through a constructor or static factory
#[derive(Debug, Clone)]
pub struct FactoryPlan {
    /// Constructor or factory method name
    pub identifier: String,
    /// Member names passed positionally, in parameter order
    pub parameters: Vec<String>,
    /// Implementation
    pub invoker:    Invoker,
}

/// Everything the builder protocol needs for one type
#[derive(Debug, Clone)]
pub struct BuilderPlan {
    /// Type the `builder` method returns
    pub builder_type: TypeName,
    /// Zero-argument static `builder` method
    pub create:       Invoker,
    /// Single-parameter builder methods by name
    pub steps:        Vec<(String, Invoker)>,
    /// Zero-argument `build` method
    pub build:        Invoker,
}

impl BuilderPlan {
    /// The builder method fed with the member called `name`
    pub fn step(&self, name: &str) -> Option<&Invoker> {
        self.steps
            .iter()
            .find_map(|(step, invoker)| (step == name).then_some(invoker))
    }
}

/// How instances of one type are created
#[derive(Debug, Clone)]
pub enum ConstructionStrategy {
    /// Start from a default instance and assign each member
    DefaultAssign {
        /// Zero-argument constructor, when the type has one
        constructor: Option<Invoker>,
        /// Starting instance otherwise
        initial:     Value,
    },
    /// Pass member values to the type's single matching constructor
    ConstructorInjection(FactoryPlan),
    /// Pass member values to the type's single matching static factory
    FactoryMethod(FactoryPlan),
    /// Feed member values through a builder
    Builder(BuilderPlan),
    /// Interfaces and other types that cannot be created; always null
    Unconstructible,
}

/// Discriminant of [`ConstructionStrategy`], for logging and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    /// See [`ConstructionStrategy::DefaultAssign`]
    DefaultAssign,
    /// See [`ConstructionStrategy::ConstructorInjection`]
    ConstructorInjection,
    /// See [`ConstructionStrategy::FactoryMethod`]
    FactoryMethod,
    /// See [`ConstructionStrategy::Builder`]
    Builder,
    /// See [`ConstructionStrategy::Unconstructible`]
    Unconstructible,
}

impl ConstructionStrategy {
    /// The variant without its payload
    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::DefaultAssign { .. } => StrategyKind::DefaultAssign,
            Self::ConstructorInjection(_) => StrategyKind::ConstructorInjection,
            Self::FactoryMethod(_) => StrategyKind::FactoryMethod,
            Self::Builder(_) => StrategyKind::Builder,
            Self::Unconstructible => StrategyKind::Unconstructible,
        }
    }
}

/// Map a user-code failure onto the crate error taxonomy
///
/// Invalid-argument failures keep their category; everything else becomes a construction
/// error naming the type being assembled.
pub(crate) fn invocation_error(
    type_name: &TypeName,
    error: InvocationError,
) -> error_stack::Report<Error> {
    match error {
        InvocationError::InvalidArgument(message) => Error::InvalidArgument(message).into(),
        InvocationError::Failed(message) => Error::construction(type_name, message).into(),
    }
}
