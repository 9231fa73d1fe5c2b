//! Invocable members: constructors, factories, builder methods and accessors

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::type_system::TypeName;

/// Failure raised by user code behind an [`Invoker`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// The callee rejected its arguments; propagated unchanged
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Any other failure; wrapped as a construction error
    #[error("{0}")]
    Failed(String),
}

/// Signature shared by every invocable member
///
/// The first argument is the receiver (`None` for constructors and static methods), the
/// second the positional arguments. Instance methods return the updated receiver (or, for
/// `build`, the finished instance).
pub type InvokeFn =
    dyn Fn(Option<&Value>, Vec<Value>) -> Result<Value, InvocationError> + Send + Sync;

/// Shared handle to an invocable member
#[derive(Clone)]
pub struct Invoker(Arc<InvokeFn>);

impl Invoker {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, Vec<Value>) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke with an optional receiver and positional arguments
    pub fn call(&self, receiver: Option<&Value>, args: Vec<Value>) -> Result<Value, InvocationError> {
        (self.0)(receiver, args)
    }
}

impl Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Invoker(..)")
    }
}

/// A formal parameter of a constructor or method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Discoverable name, when the provider knows it
    pub name:      Option<String>,
    /// Declared type, generic parameters resolved
    pub type_name: TypeName,
}

impl Parameter {
    /// A parameter whose name is known
    pub fn named(name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        Self {
            name:      Some(name.into()),
            type_name: type_name.into(),
        }
    }

    /// A parameter whose name was erased
    pub fn unnamed(type_name: impl Into<TypeName>) -> Self {
        Self {
            name:      None,
            type_name: type_name.into(),
        }
    }
}

/// How a method is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// Creates a new instance of the declaring type
    Constructor,
    /// Called without a receiver
    Static,
    /// Called on an instance of the declaring type
    Instance,
}

/// One method declared on a type
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    /// Method name
    pub name:        String,
    /// Dispatch style
    pub receiver:    Receiver,
    /// Formal parameters in order
    pub parameters:  Vec<Parameter>,
    /// Declared return type, generic parameters resolved
    pub return_type: TypeName,
    /// Implementation
    pub invoker:     Invoker,
}

impl MethodDescriptor {
    /// Number of formal parameters
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// Whether a construction candidate is a constructor or a static factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryKind {
    /// A constructor of the type
    Constructor,
    /// A static method returning the type
    StaticFactory,
}

/// A way to create an instance from an ordered parameter list
#[derive(Debug, Clone)]
pub struct FactoryCandidate {
    /// Constructor or factory
    pub kind:       FactoryKind,
    /// Method name (constructors use the type's short name)
    pub identifier: String,
    /// Ordered parameters with resolved names and types
    pub parameters: Vec<Parameter>,
    /// Implementation
    pub invoker:    Invoker,
}

impl FactoryCandidate {
    /// Every parameter exposes a name
    pub fn has_named_parameters(&self) -> bool {
        self.parameters.iter().all(|parameter| parameter.name.is_some())
    }

    /// Parameter names in order, `None` if any name was erased
    pub fn parameter_names(&self) -> Option<Vec<&str>> {
        self.parameters
            .iter()
            .map(|parameter| parameter.name.as_deref())
            .collect()
    }
}
