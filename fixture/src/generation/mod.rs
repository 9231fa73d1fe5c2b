//! Materializing a manipulated tree into a value
//!
//! [`GenerationBackend`] is the seam between the engine and whatever manufactures values.
//! [`RandomBackend`] is the default: random leaves, bottom-up assembly through each type's
//! construction strategy, post-conditions enforced by regeneration.

mod combinator;
mod random;
pub(crate) mod scalar;

pub use combinator::BuilderCombinator;
pub use random::RandomBackend;
use rand::rngs::StdRng;
use serde_json::Value;

use crate::error::Result;
use crate::metadata_cache::MetadataCache;
use crate::options::GenerateOptions;
use crate::tree::PropertyNode;

/// Per-sample state handed to a backend
pub struct SampleContext<'a> {
    /// Type metadata and construction strategies
    pub cache:   &'a MetadataCache,
    /// Options of the owning session
    pub options: &'a GenerateOptions,
    /// Randomness for this request
    pub rng:     &'a mut StdRng,
}

impl std::fmt::Debug for SampleContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleContext")
            .field("options", self.options)
            .finish_non_exhaustive()
    }
}

/// Turns a fully shaped tree into a concrete value
pub trait GenerationBackend: Send + Sync {
    /// Produce one sample of `tree`
    fn sample(&self, tree: &PropertyNode, context: &mut SampleContext<'_>) -> Result<Value>;
}
