//! # Fixture Forge
//!
//! Generates randomized test fixtures for registered types and lets callers pin down the parts
//! a test cares about.
//!
//! A type is expanded into a property tree (one node per value to produce), declarative
//! manipulations reshape that tree, and a generation backend materializes it bottom-up,
//! assembling objects through whichever construction strategy the type supports.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fixture_forge::{FixtureSession, GenerateOptions, Manipulate, TypeDescriptor, TypeRegistry};
//!
//! let registry = TypeRegistry::new().with(
//!     TypeDescriptor::structure("shop::Item")
//!         .field("sku", "String")
//!         .field("quantity", "u32"),
//! );
//! let session = FixtureSession::new(Arc::new(registry), GenerateOptions::default())?;
//!
//! let item = session
//!     .builder("shop::Item")
//!     .set("quantity", 2)
//!     .set_post_condition_as::<String>("sku", "String", |sku| sku.len() > 3)
//!     .sample()?;
//! assert_eq!(item["quantity"], 2);
//! # Ok::<(), error_stack::Report<fixture_forge::Error>>(())
//! ```
//!
//! # Paths
//!
//! - `$` is the root
//! - `.name` selects a member, `[i]` a list/set element or map entry
//! - `.key` / `.value` select the parts of a map entry, `[0]` the payload of an `Option`
//! - `*` and `[*]` match any single name or index

mod constants;
pub mod construction;
mod error;
pub mod generation;
pub mod introspection;
pub mod manipulation;
pub mod metadata_cache;
pub mod options;
pub mod path;
mod session;
pub mod tree;
pub mod type_system;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use generation::{GenerationBackend, RandomBackend};
pub use introspection::{
    AccessorPair, InvocationError, Parameter, TypeDescriptor, TypeIntrospector, TypeRegistry,
};
pub use manipulation::{Effect, Manipulate, Manipulations};
pub use options::GenerateOptions;
pub use path::PathExpression;
pub use session::{FixtureBuilder, FixtureSession};
pub use type_system::TypeName;
