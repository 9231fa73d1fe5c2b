//! Entry point: sessions and per-type fixture builders
//!
//! A [`FixtureSession`] owns everything that outlives a single request: options, the metadata
//! cache and the generation backend. It is cheap to clone and safe to share across threads.
//! [`FixtureBuilder`] accumulates manipulations for one root type; every call to
//! [`FixtureBuilder::sample`] rebuilds the tree from scratch, applies the manipulations and
//! generates a value, so samples never leak state into each other.

use std::fmt::Debug;
use std::sync::Arc;

use error_stack::ResultExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::generation::{GenerationBackend, RandomBackend, SampleContext};
use crate::introspection::TypeIntrospector;
use crate::manipulation::{Manipulate, Manipulations, Pipeline, Step};
use crate::metadata_cache::{CacheStats, MetadataCache};
use crate::options::GenerateOptions;
use crate::path::PathExpression;
use crate::tree::{PropertyNode, SizeRule, TreeBuilder};
use crate::type_system::TypeName;

struct SessionInner {
    options: GenerateOptions,
    cache:   MetadataCache,
    backend: Arc<dyn GenerationBackend>,
}

/// Shared generation state for any number of builders
#[derive(Clone)]
pub struct FixtureSession {
    inner: Arc<SessionInner>,
}

impl Debug for FixtureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureSession")
            .field("options", &self.inner.options)
            .field("cache", &self.inner.cache)
            .finish_non_exhaustive()
    }
}

impl FixtureSession {
    /// Session generating random values
    pub fn new(
        introspector: Arc<dyn TypeIntrospector>,
        options: GenerateOptions,
    ) -> Result<Self> {
        Self::with_backend(introspector, options, Arc::new(RandomBackend))
    }

    /// Session generating through a custom backend
    pub fn with_backend(
        introspector: Arc<dyn TypeIntrospector>,
        options: GenerateOptions,
        backend: Arc<dyn GenerationBackend>,
    ) -> Result<Self> {
        options.validate()?;
        let cache = MetadataCache::new(introspector, options.cache_capacity);
        debug!(capacity = options.cache_capacity, seed = ?options.seed, "fixture session created");
        Ok(Self {
            inner: Arc::new(SessionInner {
                options,
                cache,
                backend,
            }),
        })
    }

    /// Options every builder of this session uses
    pub fn options(&self) -> &GenerateOptions {
        &self.inner.options
    }

    /// The shared metadata cache
    pub fn cache(&self) -> &MetadataCache {
        &self.inner.cache
    }

    /// Start a builder for `type_name`
    pub fn builder(&self, type_name: impl Into<TypeName>) -> FixtureBuilder {
        FixtureBuilder {
            session:       self.clone(),
            type_name:     type_name.into(),
            size_rules:    Vec::new(),
            manipulations: Manipulations::new(),
            seed:          None,
        }
    }

    /// Drop every cached shape, member list, factory list and strategy
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Current entry counts of the metadata caches
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }
}

/// Manipulations and sizing rules for one root type
///
/// Cloning forks the builder: both copies share the session but grow their manipulation
/// lists independently.
#[derive(Debug, Clone)]
pub struct FixtureBuilder {
    session:       FixtureSession,
    type_name:     TypeName,
    size_rules:    Vec<SizeRule>,
    manipulations: Manipulations,
    seed:          Option<u64>,
}

impl Manipulate for FixtureBuilder {
    fn push_step(mut self, step: Step) -> Self {
        self.manipulations = self.manipulations.push_step(step);
        self
    }
}

impl FixtureBuilder {
    /// Root type
    pub const fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Manipulations recorded so far
    pub const fn manipulations(&self) -> &Manipulations {
        &self.manipulations
    }

    /// Build-time size bounds for containers matching `path`
    ///
    /// Later rules take precedence over earlier ones. Unlike manipulations, rules are checked
    /// immediately.
    pub fn default_size(mut self, path: &str, min: usize, max: usize) -> Result<Self> {
        let expression = PathExpression::parse(path)?;
        self.size_rules.push(SizeRule::new(expression, min, max)?);
        Ok(self)
    }

    /// Seed this builder's samples, overriding the session seed
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed.or(self.session.options().seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn tree_builder(&self) -> TreeBuilder<'_> {
        TreeBuilder::new(
            self.session.cache(),
            self.session.options(),
            &self.size_rules,
        )
    }

    fn manipulated_tree(&self, rng: &mut StdRng) -> Result<PropertyNode> {
        let builder = self.tree_builder();
        let mut tree = builder.build(&self.type_name, rng)?;
        Pipeline::new(builder, self.session.inner.backend.as_ref()).apply(
            &mut tree,
            &self.manipulations,
            rng,
        )?;
        Ok(tree)
    }

    fn sample_with(&self, rng: &mut StdRng) -> Result<Value> {
        let tree = self.manipulated_tree(rng)?;
        let mut context = SampleContext {
            cache:   self.session.cache(),
            options: self.session.options(),
            rng,
        };
        self.session.inner.backend.sample(&tree, &mut context)
    }

    /// The tree with every manipulation applied
    pub fn build_tree(&self) -> Result<PropertyNode> {
        self.manipulated_tree(&mut self.rng())
    }

    /// Generate one value
    pub fn sample(&self) -> Result<Value> {
        self.sample_with(&mut self.rng())
    }

    /// Generate `count` values from one random stream
    pub fn sample_many(&self, count: usize) -> Result<Vec<Value>> {
        let mut rng = self.rng();
        (0..count).map(|_| self.sample_with(&mut rng)).collect()
    }

    /// Generate one value and deserialize it into `T`
    pub fn sample_as<T: DeserializeOwned>(&self) -> Result<T> {
        let value = self.sample()?;
        serde_json::from_value(value)
            .change_context(Error::cannot("deserialize sample", &self.type_name))
            .attach(format!("Target type: {}", std::any::type_name::<T>()))
    }
}
