//! Type names, kinds and resolved shapes
//!
//! Everything the engine knows about a type before asking the introspection provider lives
//! here: parsing of generic type names, built-in scalar and container knowledge, and the
//! `TypeShape` that tree nodes carry.

mod shape;
mod type_kind;
mod type_name;
mod type_parser;

pub use shape::TypeShape;
pub use type_kind::{ScalarKind, TypeKind};
pub use type_name::TypeName;
pub use type_parser::{ParsedTypeName, parse_type_name};
