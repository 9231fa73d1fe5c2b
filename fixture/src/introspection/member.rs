//! Named slots on a type and the merge of field and accessor views
//!
//! A provider may report the same logical property twice: once as a field and once as an
//! accessor pair. [`unify_members`] collapses such pairs into one
//! [`MemberKind::Composite`] so each name maps to exactly one member.

use serde_json::Value;

use super::method::{InvocationError, Invoker};
use crate::type_system::TypeName;

/// Getter/setter pair backing an accessor member
#[derive(Debug, Clone, Default)]
pub struct AccessorPair {
    /// Reads the property from an instance
    pub getter: Option<Invoker>,
    /// Returns the instance with the property replaced
    pub setter: Option<Invoker>,
}

/// How a member is read and written
#[derive(Debug, Clone)]
pub enum MemberKind {
    /// Direct object field
    Field,
    /// Accessor pair only
    Accessor(AccessorPair),
    /// Field and accessor for the same name; the accessor is tried first
    Composite(AccessorPair),
}

/// A named, typed slot on a type
#[derive(Debug, Clone)]
pub struct Member {
    /// Property name, unique within the unified view
    pub name:      String,
    /// Declared type with generic parameters resolved
    pub type_name: TypeName,
    /// Whether generation may leave the member null by default
    pub nullable:  bool,
    /// Read/write backing
    pub kind:      MemberKind,
}

impl Member {
    /// A field-backed member
    pub fn field(name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        Self {
            name:      name.into(),
            type_name: type_name.into(),
            nullable:  false,
            kind:      MemberKind::Field,
        }
    }

    /// Write `value` into `instance`, returning the updated instance
    pub fn assign(&self, instance: Value, value: Value) -> Result<Value, InvocationError> {
        match &self.kind {
            MemberKind::Field => self.assign_field(instance, value),
            MemberKind::Accessor(accessor) => match &accessor.setter {
                Some(setter) => setter.call(Some(&instance), vec![value]),
                None => {
                    tracing::trace!(member = %self.name, "accessor has no setter, leaving unset");
                    Ok(instance)
                }
            },
            MemberKind::Composite(accessor) => match &accessor.setter {
                Some(setter) => setter.call(Some(&instance), vec![value]),
                None => self.assign_field(instance, value),
            },
        }
    }

    /// Read this member from an instance, accessor first
    pub fn read(&self, instance: &Value) -> Option<Value> {
        let getter = match &self.kind {
            MemberKind::Field => None,
            MemberKind::Accessor(accessor) | MemberKind::Composite(accessor) => {
                accessor.getter.as_ref()
            }
        };

        if let Some(getter) = getter
            && let Ok(value) = getter.call(Some(instance), Vec::new())
        {
            return Some(value);
        }

        match self.kind {
            MemberKind::Accessor(_) => None,
            MemberKind::Field | MemberKind::Composite(_) => instance.get(&self.name).cloned(),
        }
    }

    fn assign_field(&self, mut instance: Value, value: Value) -> Result<Value, InvocationError> {
        let Some(object) = instance.as_object_mut() else {
            return Err(InvocationError::Failed(format!(
                "cannot assign field '{}' on a non-object instance",
                self.name
            )));
        };
        object.insert(self.name.clone(), value);
        Ok(instance)
    }
}

/// Merge field and accessor views that share a name
///
/// Output order follows first appearance. When a name appears as both a field and an
/// accessor the result is one `Composite` member carrying the accessor pair; nullability is
/// the union of both declarations.
pub fn unify_members(members: Vec<Member>) -> Vec<Member> {
    let mut unified: Vec<Member> = Vec::with_capacity(members.len());

    for member in members {
        let Some(existing) = unified.iter_mut().find(|m| m.name == member.name) else {
            unified.push(member);
            continue;
        };

        let merged_kind = match (&existing.kind, member.kind) {
            (MemberKind::Field, MemberKind::Accessor(accessor) | MemberKind::Composite(accessor)) => {
                Some(MemberKind::Composite(accessor))
            }
            (MemberKind::Accessor(accessor), MemberKind::Field) => {
                Some(MemberKind::Composite(accessor.clone()))
            }
            _ => None,
        };

        match merged_kind {
            Some(kind) => {
                existing.kind = kind;
                existing.nullable |= member.nullable;
            }
            None => tracing::warn!(
                member = %member.name,
                "duplicate member declaration ignored"
            ),
        }
    }

    unified
}
