//! Type introspection: what a type is made of and how it can be created
//!
//! The engine never inspects values to learn about types. Everything it needs (shape, members,
//! constructors, factories, builder methods) comes from a [`TypeIntrospector`]. The crate ships
//! one implementation, the in-memory [`TypeRegistry`].

mod member;
mod method;
mod registry;

pub use member::{AccessorPair, Member, MemberKind, unify_members};
pub use method::{
    FactoryCandidate, FactoryKind, InvocationError, InvokeFn, Invoker, MethodDescriptor, Parameter,
    Receiver,
};
pub use registry::{TypeDescriptor, TypeRegistry};
use serde_json::Value;

use crate::error::Result;
use crate::type_system::{TypeName, TypeShape};

/// Source of type metadata
///
/// Implementations must be pure: the same type name always yields the same answer. The metadata
/// cache relies on this to recompute evicted entries.
pub trait TypeIntrospector: Send + Sync {
    /// Resolve the shape of a type occurrence, generic arguments bound
    fn shape_of(&self, type_name: &TypeName) -> Result<TypeShape>;

    /// Declared members in declaration order; may contain a field and an accessor of one name
    fn members_of(&self, type_name: &TypeName) -> Result<Vec<Member>>;

    /// Constructors and static factories returning the type
    fn factory_candidates_of(&self, type_name: &TypeName) -> Result<Vec<FactoryCandidate>>;

    /// Every method declared on the type
    fn methods_of(&self, type_name: &TypeName) -> Result<Vec<MethodDescriptor>>;

    /// Starting instance for default-construct-and-assign
    fn default_instance_of(&self, _type_name: &TypeName) -> Result<Option<Value>> {
        Ok(None)
    }
}
