//! Category of type for quick identification and processing
//!
//! `TypeKind` decides how the tree builder expands a node and how the generation backend
//! assembles its value. `ScalarKind` refines `TypeKind::Value` leaves.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::constants::{
    TYPE_ALLOC_STRING, TYPE_BOOL, TYPE_BTREE_MAP, TYPE_BTREE_SET, TYPE_CHAR, TYPE_F32, TYPE_F64,
    TYPE_HASH_MAP, TYPE_HASH_SET, TYPE_I8, TYPE_I16, TYPE_I32, TYPE_I64, TYPE_ISIZE,
    TYPE_LINKED_LIST, TYPE_MAP_ENTRY, TYPE_OPTION, TYPE_STD_STRING, TYPE_STR_REF, TYPE_STRING,
    TYPE_U8, TYPE_U16, TYPE_U32, TYPE_U64, TYPE_USIZE, TYPE_VEC, TYPE_VEC_DEQUE,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
/// How a type expands into tree nodes
pub enum TypeKind {
    /// Interface or otherwise non-constructible type
    Interface,
    /// Ordered sequence (`Vec`, `VecDeque`, ...)
    List,
    /// Map type (`HashMap`, `BTreeMap`)
    Map,
    /// A single key/value pair of a map
    MapEntry,
    /// `Option<T>`: one payload that may be absent
    Optional,
    /// Set type (`HashSet`, `BTreeSet`)
    Set,
    /// Registered type with members
    Struct,
    /// Primitive leaf (integers, floats, bool, char, String)
    Value,
}

impl TypeKind {
    /// Kinds whose node gets a container-size directive
    pub const fn is_container(self) -> bool {
        matches!(self, Self::List | Self::Set | Self::Map)
    }

    /// Kinds that nest further and count against the recursion limit
    pub const fn increments_depth(self) -> bool {
        matches!(
            self,
            Self::List | Self::Set | Self::Map | Self::MapEntry | Self::Struct
        )
    }

    /// Classify a built-in container base name
    pub fn from_container_base(base: &str) -> Option<Self> {
        match base.rsplit("::").next().unwrap_or(base) {
            TYPE_VEC | TYPE_VEC_DEQUE | TYPE_LINKED_LIST => Some(Self::List),
            TYPE_HASH_SET | TYPE_BTREE_SET => Some(Self::Set),
            TYPE_HASH_MAP | TYPE_BTREE_MAP => Some(Self::Map),
            TYPE_MAP_ENTRY => Some(Self::MapEntry),
            TYPE_OPTION => Some(Self::Optional),
            _ => None,
        }
    }

    /// Number of generic arguments a built-in container requires
    pub const fn container_arity(self) -> usize {
        match self {
            Self::List | Self::Set | Self::Optional => 1,
            Self::Map | Self::MapEntry => 2,
            Self::Interface | Self::Struct | Self::Value => 0,
        }
    }
}

/// Primitive leaf types the generation backend knows how to produce
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs, reason = "variants are named after the primitive they produce")]
pub enum ScalarKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
}

impl ScalarKind {
    /// Classify a primitive or string type name
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            TYPE_BOOL => Some(Self::Bool),
            TYPE_CHAR => Some(Self::Char),
            TYPE_I8 => Some(Self::I8),
            TYPE_I16 => Some(Self::I16),
            TYPE_I32 => Some(Self::I32),
            TYPE_I64 => Some(Self::I64),
            TYPE_ISIZE => Some(Self::Isize),
            TYPE_U8 => Some(Self::U8),
            TYPE_U16 => Some(Self::U16),
            TYPE_U32 => Some(Self::U32),
            TYPE_U64 => Some(Self::U64),
            TYPE_USIZE => Some(Self::Usize),
            TYPE_F32 => Some(Self::F32),
            TYPE_F64 => Some(Self::F64),
            TYPE_STRING | TYPE_STD_STRING | TYPE_ALLOC_STRING | TYPE_STR_REF => Some(Self::String),
            _ => None,
        }
    }

    /// Whether generated values of this kind are JSON numbers
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::Char | Self::String)
    }
}
