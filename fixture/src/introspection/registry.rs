//! In-memory introspection provider
//!
//! Types are described once with [`TypeDescriptor`] and registered under their base name.
//! Generic descriptors (`demo::Page<T>`) are resolved per concrete argument list: every
//! member, parameter and return type has its generic parameters substituted before it is
//! handed out.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::TypeIntrospector;
use super::member::{AccessorPair, Member, MemberKind};
use super::method::{
    FactoryCandidate, FactoryKind, InvocationError, Invoker, MethodDescriptor, Parameter, Receiver,
};
use crate::error::{Error, Result};
use crate::type_system::{ParsedTypeName, TypeKind, TypeName, TypeShape, parse_type_name};

#[derive(Debug, Clone)]
struct DeclaredMember {
    name:      String,
    type_name: String,
    nullable:  bool,
    accessor:  Option<AccessorPair>,
}

/// Description of one registered type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name:             String,
    type_parameters:  Vec<String>,
    interface:        bool,
    members:          Vec<DeclaredMember>,
    methods:          Vec<MethodDescriptor>,
    default_instance: Option<Value>,
}

impl TypeDescriptor {
    /// A concrete type with members
    pub fn structure(name: impl Into<String>) -> Self {
        Self {
            name:             name.into(),
            type_parameters:  Vec::new(),
            interface:        false,
            members:          Vec::new(),
            methods:          Vec::new(),
            default_instance: None,
        }
    }

    /// A generic type; members may refer to the parameters by name
    pub fn generic<I, S>(name: impl Into<String>, type_parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_parameters: type_parameters.into_iter().map(Into::into).collect(),
            ..Self::structure(name)
        }
    }

    /// A type that cannot be constructed directly
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            interface: true,
            ..Self::structure(name)
        }
    }

    /// Base name the descriptor is registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a field-backed member
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.members.push(DeclaredMember {
            name:      name.into(),
            type_name: type_name.into(),
            nullable:  false,
            accessor:  None,
        });
        self
    }

    /// Add a field-backed member that may be generated as null
    #[must_use]
    pub fn nullable_field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.members.push(DeclaredMember {
            name:      name.into(),
            type_name: type_name.into(),
            nullable:  true,
            accessor:  None,
        });
        self
    }

    /// Add an accessor-backed member
    #[must_use]
    pub fn accessor(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        accessor: AccessorPair,
    ) -> Self {
        self.members.push(DeclaredMember {
            name:      name.into(),
            type_name: type_name.into(),
            nullable:  false,
            accessor:  Some(accessor),
        });
        self
    }

    /// Add a constructor taking `parameters` in order
    #[must_use]
    pub fn constructor<F>(mut self, parameters: Vec<Parameter>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> std::result::Result<Value, InvocationError> + Send + Sync + 'static,
    {
        let short_name = TypeName::from(self.name.as_str()).short_name();
        self.methods.push(MethodDescriptor {
            name:        short_name,
            receiver:    Receiver::Constructor,
            parameters,
            return_type: TypeName::from(self.self_type()),
            invoker:     Invoker::new(move |_, args| f(args)),
        });
        self
    }

    /// Add a static factory method returning this type
    #[must_use]
    pub fn factory<F>(self, name: impl Into<String>, parameters: Vec<Parameter>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> std::result::Result<Value, InvocationError> + Send + Sync + 'static,
    {
        let return_type = self.self_type();
        self.static_method(name, parameters, return_type, f)
    }

    /// Add a static method with an arbitrary return type
    #[must_use]
    pub fn static_method<F>(
        mut self,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: impl Into<TypeName>,
        f: F,
    ) -> Self
    where
        F: Fn(Vec<Value>) -> std::result::Result<Value, InvocationError> + Send + Sync + 'static,
    {
        self.methods.push(MethodDescriptor {
            name: name.into(),
            receiver: Receiver::Static,
            parameters,
            return_type: return_type.into(),
            invoker: Invoker::new(move |_, args| f(args)),
        });
        self
    }

    /// Add an instance method; the closure receives the receiver and the arguments
    #[must_use]
    pub fn method<F>(
        mut self,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: impl Into<TypeName>,
        f: F,
    ) -> Self
    where
        F: Fn(&Value, Vec<Value>) -> std::result::Result<Value, InvocationError>
            + Send
            + Sync
            + 'static,
    {
        self.methods.push(MethodDescriptor {
            name: name.into(),
            receiver: Receiver::Instance,
            parameters,
            return_type: return_type.into(),
            invoker: Invoker::new(move |receiver, args| {
                let receiver = receiver.ok_or_else(|| {
                    InvocationError::Failed("instance method invoked without receiver".to_string())
                })?;
                f(receiver, args)
            }),
        });
        self
    }

    /// Starting instance for default-construct-and-assign (an empty object otherwise)
    #[must_use]
    pub fn default_instance(mut self, value: Value) -> Self {
        self.default_instance = Some(value);
        self
    }

    /// The descriptor's own type spelled with its generic parameters
    fn self_type(&self) -> String {
        if self.type_parameters.is_empty() {
            self.name.clone()
        } else {
            format!("{}<{}>", self.name, self.type_parameters.join(", "))
        }
    }
}

/// Generic bindings for one concrete use of a descriptor
struct Resolved<'a> {
    descriptor: &'a TypeDescriptor,
    bindings:   HashMap<String, ParsedTypeName>,
}

impl Resolved<'_> {
    fn resolve(&self, declared: &str) -> Result<TypeName> {
        let parsed = parse_type_name(declared)?;
        Ok(TypeName::from(parsed.substitute(&self.bindings)))
    }

    fn resolve_parameters(&self, parameters: &[Parameter]) -> Result<Vec<Parameter>> {
        parameters
            .iter()
            .map(|parameter| {
                Ok(Parameter {
                    name:      parameter.name.clone(),
                    type_name: self.resolve(parameter.type_name.as_str())?,
                })
            })
            .collect()
    }
}

/// Registry of type descriptors keyed by base name
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    descriptors: HashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a descriptor
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        debug!(type_name = %descriptor.name, "registering type descriptor");
        self.descriptors
            .insert(descriptor.name.clone(), Arc::new(descriptor));
        self
    }

    /// Builder-style registration
    #[must_use]
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Whether a base name is registered
    pub fn contains(&self, base: &str) -> bool {
        self.descriptors.contains_key(base)
    }

    fn lookup(&self, type_name: &TypeName) -> Result<(ParsedTypeName, Resolved<'_>)> {
        let parsed = type_name.parse()?;
        let descriptor = self.descriptors.get(&parsed.base).ok_or_else(|| Error::TypeNotRegistered {
            type_name: type_name.to_string(),
        })?;

        if descriptor.type_parameters.len() != parsed.arguments.len() {
            return Err(Error::invalid(
                "type arguments",
                format!(
                    "{} declares {} generic parameter(s), {type_name} supplies {}",
                    descriptor.name,
                    descriptor.type_parameters.len(),
                    parsed.arguments.len()
                ),
            )
            .into());
        }

        let bindings = descriptor
            .type_parameters
            .iter()
            .cloned()
            .zip(parsed.arguments.iter().cloned())
            .collect();

        Ok((
            parsed,
            Resolved {
                descriptor: descriptor.as_ref(),
                bindings,
            },
        ))
    }
}

impl TypeIntrospector for TypeRegistry {
    fn shape_of(&self, type_name: &TypeName) -> Result<TypeShape> {
        let parsed = type_name.parse()?;
        if let Some(shape) = TypeShape::builtin(&parsed)? {
            return Ok(shape);
        }

        let (parsed, resolved) = self.lookup(type_name)?;
        Ok(TypeShape {
            type_name:      TypeName::from(&parsed),
            kind:           if resolved.descriptor.interface {
                TypeKind::Interface
            } else {
                TypeKind::Struct
            },
            scalar:         None,
            type_arguments: parsed.arguments.iter().map(TypeName::from).collect(),
        })
    }

    fn members_of(&self, type_name: &TypeName) -> Result<Vec<Member>> {
        let parsed = type_name.parse()?;
        if TypeShape::builtin(&parsed)?.is_some() {
            return Ok(Vec::new());
        }

        let (_, resolved) = self.lookup(type_name)?;
        resolved
            .descriptor
            .members
            .iter()
            .map(|declared| {
                Ok(Member {
                    name:      declared.name.clone(),
                    type_name: resolved.resolve(&declared.type_name)?,
                    nullable:  declared.nullable,
                    kind:      declared
                        .accessor
                        .clone()
                        .map_or(MemberKind::Field, MemberKind::Accessor),
                })
            })
            .collect()
    }

    fn factory_candidates_of(&self, type_name: &TypeName) -> Result<Vec<FactoryCandidate>> {
        let shape = self.shape_of(type_name)?;
        if shape.kind != TypeKind::Struct {
            return Ok(Vec::new());
        }

        Ok(self
            .methods_of(type_name)?
            .into_iter()
            .filter_map(|method| {
                let kind = match method.receiver {
                    Receiver::Constructor => FactoryKind::Constructor,
                    Receiver::Static if method.return_type.same_type(&shape.type_name) => {
                        FactoryKind::StaticFactory
                    }
                    Receiver::Static | Receiver::Instance => return None,
                };
                Some(FactoryCandidate {
                    kind,
                    identifier: method.name,
                    parameters: method.parameters,
                    invoker: method.invoker,
                })
            })
            .collect())
    }

    fn methods_of(&self, type_name: &TypeName) -> Result<Vec<MethodDescriptor>> {
        let parsed = type_name.parse()?;
        if TypeShape::builtin(&parsed)?.is_some() {
            return Ok(Vec::new());
        }

        let (_, resolved) = self.lookup(type_name)?;
        resolved
            .descriptor
            .methods
            .iter()
            .map(|method| {
                Ok(MethodDescriptor {
                    name:        method.name.clone(),
                    receiver:    method.receiver,
                    parameters:  resolved.resolve_parameters(&method.parameters)?,
                    return_type: resolved.resolve(method.return_type.as_str())?,
                    invoker:     method.invoker.clone(),
                })
            })
            .collect()
    }

    fn default_instance_of(&self, type_name: &TypeName) -> Result<Option<Value>> {
        let (_, resolved) = self.lookup(type_name)?;
        Ok(resolved.descriptor.default_instance.clone())
    }
}
