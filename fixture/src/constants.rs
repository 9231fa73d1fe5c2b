// ============================================================================
// GENERATION DEFAULTS
// ============================================================================

/// Maximum object/container nesting before the tree builder truncates a subtree
pub const MAX_TYPE_RECURSION_DEPTH: usize = 10;

/// Default lower bound for container element counts
pub const DEFAULT_MIN_CONTAINER_SIZE: usize = 0;

/// Default upper bound for container element counts
pub const DEFAULT_MAX_CONTAINER_SIZE: usize = 3;

/// Default probability that a nullable node materializes as null
pub const DEFAULT_NULL_INJECT: f64 = 0.2;

/// Candidates generated for a filtered node before giving up
pub const DEFAULT_MAX_FILTER_ATTEMPTS: usize = 1000;

/// Retries spent looking for a non-duplicate set element or map key
pub const DEFAULT_MAX_UNIQUE_ATTEMPTS: usize = 100;

/// Entries kept per metadata cache before least-recently-used eviction
pub const DEFAULT_CACHE_CAPACITY: usize = 2000;

// ============================================================================
// ENVIRONMENT OVERRIDES
// ============================================================================

/// Environment variable that fixes the generation seed
pub const SEED_ENV_VAR: &str = "FIXTURE_FORGE_SEED";

/// Environment variable that overrides the maximum recursion depth
pub const MAX_DEPTH_ENV_VAR: &str = "FIXTURE_FORGE_MAX_DEPTH";

// ============================================================================
// TYPE NAME CONSTANTS
// ============================================================================

// Primitive types
pub const TYPE_BOOL: &str = "bool";
pub const TYPE_CHAR: &str = "char";
pub const TYPE_I8: &str = "i8";
pub const TYPE_I16: &str = "i16";
pub const TYPE_I32: &str = "i32";
pub const TYPE_I64: &str = "i64";
pub const TYPE_ISIZE: &str = "isize";
pub const TYPE_U8: &str = "u8";
pub const TYPE_U16: &str = "u16";
pub const TYPE_U32: &str = "u32";
pub const TYPE_U64: &str = "u64";
pub const TYPE_USIZE: &str = "usize";
pub const TYPE_F32: &str = "f32";
pub const TYPE_F64: &str = "f64";

// String types
pub const TYPE_STRING: &str = "String";
pub const TYPE_STD_STRING: &str = "std::string::String";
pub const TYPE_ALLOC_STRING: &str = "alloc::string::String";
pub const TYPE_STR_REF: &str = "&str";

// Container bases
pub const TYPE_VEC: &str = "Vec";
pub const TYPE_VEC_DEQUE: &str = "VecDeque";
pub const TYPE_LINKED_LIST: &str = "LinkedList";
pub const TYPE_HASH_SET: &str = "HashSet";
pub const TYPE_BTREE_SET: &str = "BTreeSet";
pub const TYPE_HASH_MAP: &str = "HashMap";
pub const TYPE_BTREE_MAP: &str = "BTreeMap";
pub const TYPE_MAP_ENTRY: &str = "MapEntry";
pub const TYPE_OPTION: &str = "Option";

// ============================================================================
// MEMBER AND METHOD NAMES
// ============================================================================

/// Member name of a map entry's key
pub const ENTRY_KEY: &str = "key";

/// Member name of a map entry's value
pub const ENTRY_VALUE: &str = "value";

/// Static method that produces a builder instance
pub const BUILDER_METHOD: &str = "builder";

/// Builder method that produces the finished instance
pub const BUILD_METHOD: &str = "build";

// ============================================================================
// PATH EXPRESSION TOKENS
// ============================================================================

/// Root marker in path expressions
pub const ROOT_MARKER: &str = "$";

/// Wildcard token matching any name or any index
pub const WILDCARD: &str = "*";
