//! Memoized type metadata shared by every request of a session
//!
//! Each lookup goes to a bounded LRU keyed by canonical type name. Misses fall through to the
//! [`TypeIntrospector`]; because introspection is pure, an evicted entry is simply recomputed.
//! Values are handed out as `Arc`s so trees keep their resolved copies when entries are evicted
//! or the cache is cleared.

mod lru;

use std::sync::Arc;

pub use lru::LruCache;
use serde_json::Value;
use tracing::debug;

use crate::construction::{ConstructionStrategy, select_strategy};
use crate::error::Result;
use crate::introspection::{
    FactoryCandidate, Member, MethodDescriptor, TypeIntrospector, unify_members,
};
use crate::type_system::{TypeName, TypeShape};

/// Entry counts per cache, for diagnostics and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Cached shapes
    pub shapes:     usize,
    /// Cached unified member lists
    pub members:    usize,
    /// Cached factory candidate lists
    pub factories:  usize,
    /// Cached construction strategies
    pub strategies: usize,
}

/// Thread-safe memoizing front of a [`TypeIntrospector`]
pub struct MetadataCache {
    introspector: Arc<dyn TypeIntrospector>,
    shapes:       LruCache<TypeName, Arc<TypeShape>>,
    members:      LruCache<TypeName, Arc<Vec<Member>>>,
    factories:    LruCache<TypeName, Arc<Vec<FactoryCandidate>>>,
    strategies:   LruCache<TypeName, Arc<ConstructionStrategy>>,
}

impl MetadataCache {
    /// Create a cache with `capacity` entries per table
    pub fn new(introspector: Arc<dyn TypeIntrospector>, capacity: usize) -> Self {
        Self {
            introspector,
            shapes: LruCache::new(capacity),
            members: LruCache::new(capacity),
            factories: LruCache::new(capacity),
            strategies: LruCache::new(capacity),
        }
    }

    /// The underlying provider
    pub fn introspector(&self) -> &dyn TypeIntrospector {
        self.introspector.as_ref()
    }

    /// Resolved shape of a type
    pub fn shape(&self, type_name: &TypeName) -> Result<Arc<TypeShape>> {
        let key = type_name.canonical();
        self.shapes.get_or_try_insert_with(&key, || {
            debug!(type_name = %key, "resolving type shape");
            self.introspector.shape_of(&key).map(Arc::new)
        })
    }

    /// Members with field and accessor views unified, in declaration order
    pub fn members(&self, type_name: &TypeName) -> Result<Arc<Vec<Member>>> {
        let key = type_name.canonical();
        self.members.get_or_try_insert_with(&key, || {
            debug!(type_name = %key, "discovering members");
            let declared = self.introspector.members_of(&key)?;
            Ok(Arc::new(unify_members(declared)))
        })
    }

    /// A single unified member by name
    pub fn member(&self, type_name: &TypeName, name: &str) -> Result<Option<Member>> {
        Ok(self
            .members(type_name)?
            .iter()
            .find(|member| member.name == name)
            .cloned())
    }

    /// Constructors and static factories of a type
    pub fn factory_candidates(&self, type_name: &TypeName) -> Result<Arc<Vec<FactoryCandidate>>> {
        let key = type_name.canonical();
        self.factories.get_or_try_insert_with(&key, || {
            debug!(type_name = %key, "discovering factory candidates");
            self.introspector.factory_candidates_of(&key).map(Arc::new)
        })
    }

    /// Construction strategy, selected once per type
    pub fn strategy(&self, type_name: &TypeName) -> Result<Arc<ConstructionStrategy>> {
        let key = type_name.canonical();
        self.strategies
            .get_or_try_insert_with(&key, || select_strategy(self, &key).map(Arc::new))
    }

    /// Methods of a type; not cached, only strategy selection reads them
    pub fn methods(&self, type_name: &TypeName) -> Result<Vec<MethodDescriptor>> {
        self.introspector.methods_of(&type_name.canonical())
    }

    /// Starting instance for default-construct-and-assign
    pub fn default_instance(&self, type_name: &TypeName) -> Result<Option<Value>> {
        self.introspector.default_instance_of(&type_name.canonical())
    }

    /// Drop every cached entry; trees already built keep their copies
    pub fn clear(&self) {
        debug!("clearing metadata cache");
        self.shapes.clear();
        self.members.clear();
        self.factories.clear();
        self.strategies.clear();
    }

    /// Current entry counts
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            shapes:     self.shapes.len(),
            members:    self.members.len(),
            factories:  self.factories.len(),
            strategies: self.strategies.len(),
        }
    }
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
