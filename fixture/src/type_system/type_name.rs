//! A newtype wrapper for type names used throughout the engine
//!
//! Type names are written the way Rust spells them (`demo::Order`, `Vec<String>`,
//! `HashMap<String, demo::Item>`). Parsing normalizes spacing so two spellings of the same
//! type resolve to one canonical name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::type_parser::{self, ParsedTypeName};
use crate::error::Result;

/// A newtype wrapper for type names used as `HashMap` keys
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Get the underlying string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into base name and generic arguments
    pub fn parse(&self) -> Result<ParsedTypeName> {
        type_parser::parse_type_name(&self.0)
    }

    /// The canonical spelling, falling back to the raw name when it does not parse
    pub fn canonical(&self) -> Self {
        self.parse()
            .map_or_else(|_| self.clone(), |parsed| Self(parsed.to_string()))
    }

    /// Extract the base type name by stripping generic parameters
    /// For example: `Vec<String>` returns `Vec`
    pub fn base_type(&self) -> &str {
        self.0.split('<').next().unwrap_or(&self.0).trim()
    }

    /// Get the short name (last segment after ::)
    /// For example: `demo::orders::Order` returns `Order`
    /// For generic types: `std::collections::HashMap<String, i32>` returns `HashMap`
    pub fn short_name(&self) -> String {
        let base = self.base_type();
        base.rsplit("::").next().unwrap_or(base).to_string()
    }

    /// Whether two names denote the same type once spacing is normalized
    pub fn same_type(&self, other: &Self) -> bool {
        self == other || self.canonical() == other.canonical()
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self(s.trim().to_string())
    }
}

impl From<&String> for TypeName {
    fn from(s: &String) -> Self {
        Self(s.trim().to_string())
    }
}

impl From<&ParsedTypeName> for TypeName {
    fn from(parsed: &ParsedTypeName) -> Self {
        Self(parsed.to_string())
    }
}

impl From<ParsedTypeName> for TypeName {
    fn from(parsed: ParsedTypeName) -> Self {
        Self(parsed.to_string())
    }
}

impl From<TypeName> for String {
    fn from(type_name: TypeName) -> Self {
        type_name.0
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&TypeName> for Value {
    fn from(type_name: &TypeName) -> Self {
        Self::String(type_name.0.clone())
    }
}
