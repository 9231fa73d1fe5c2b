//! Resolved description of one type occurrence

use serde::{Deserialize, Serialize};

use super::type_kind::{ScalarKind, TypeKind};
use super::type_name::TypeName;
use super::type_parser::ParsedTypeName;
use crate::constants::TYPE_MAP_ENTRY;
use crate::error::{Error, Result};

/// A fully resolved type: its kind plus generic arguments bound to concrete types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeShape {
    /// Canonical type name, generic arguments included
    pub type_name:      TypeName,
    /// How nodes of this type expand and assemble
    pub kind:           TypeKind,
    /// Leaf refinement for `TypeKind::Value`
    pub scalar:         Option<ScalarKind>,
    /// Generic arguments in declaration order
    pub type_arguments: Vec<TypeName>,
}

impl TypeShape {
    /// Shape for a built-in scalar or container, `None` for anything the registry must answer
    pub fn builtin(parsed: &ParsedTypeName) -> Result<Option<Self>> {
        let type_name = TypeName::from(parsed);

        if parsed.arguments.is_empty()
            && let Some(scalar) = ScalarKind::from_type_name(&parsed.base)
        {
            return Ok(Some(Self {
                type_name,
                kind: TypeKind::Value,
                scalar: Some(scalar),
                type_arguments: Vec::new(),
            }));
        }

        let Some(kind) = TypeKind::from_container_base(&parsed.base) else {
            return Ok(None);
        };

        if parsed.arguments.len() != kind.container_arity() {
            return Err(Error::invalid(
                "type arguments",
                format!(
                    "{type_name} takes {} generic argument(s), found {}",
                    kind.container_arity(),
                    parsed.arguments.len()
                ),
            )
            .into());
        }

        Ok(Some(Self {
            type_name,
            kind,
            scalar: None,
            type_arguments: parsed.arguments.iter().map(TypeName::from).collect(),
        }))
    }

    /// Element type of a list or set, payload of an optional
    pub fn element_type(&self) -> Option<&TypeName> {
        match self.kind {
            TypeKind::List | TypeKind::Set | TypeKind::Optional => self.type_arguments.first(),
            _ => None,
        }
    }

    /// Key type of a map or map entry
    pub fn key_type(&self) -> Option<&TypeName> {
        match self.kind {
            TypeKind::Map | TypeKind::MapEntry => self.type_arguments.first(),
            _ => None,
        }
    }

    /// Value type of a map or map entry
    pub fn value_type(&self) -> Option<&TypeName> {
        match self.kind {
            TypeKind::Map | TypeKind::MapEntry => self.type_arguments.get(1),
            _ => None,
        }
    }

    /// The `MapEntry<K, V>` type that each entry of a map has
    pub fn entry_type(&self) -> Option<TypeName> {
        let (key, value) = (self.key_type()?, self.value_type()?);
        Some(TypeName::from(format!("{TYPE_MAP_ENTRY}<{key}, {value}>")))
    }
}
